//! Construction-time settings for tables and stores.

/// Bucket count used by `ChainedHashTable::new`.
pub const DEFAULT_TABLE_CAPACITY: usize = 100;

/// Bucket count used by a default `ProductStore`.
pub const DEFAULT_STORE_CAPACITY: usize = 10;

pub const DEFAULT_ID_PREFIX: &str = "BP";
pub const DEFAULT_ID_WIDTH: usize = 3;

/// Settings for a bare `ChainedHashTable`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableConfig {
    /// Number of buckets. Fixed for the lifetime of the table; zero is rejected
    /// when the table is built.
    pub capacity: usize,
}

impl TableConfig {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_TABLE_CAPACITY,
        }
    }
}

/// Settings for a `ProductStore`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    /// Bucket count of the backing table.
    pub capacity: usize,
    /// Upper-case prefix every product id starts with.
    pub id_prefix: String,
    /// Minimum number of digits when formatting generated ids.
    pub id_width: usize,
}

impl StoreConfig {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into().to_uppercase();
        self
    }

    pub fn with_id_width(mut self, width: usize) -> Self {
        self.id_width = width;
        self
    }

    pub(crate) fn table_config(&self) -> TableConfig {
        TableConfig::default().with_capacity(self.capacity)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_STORE_CAPACITY,
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
            id_width: DEFAULT_ID_WIDTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        assert_eq!(TableConfig::default().capacity, 100);
        let s = StoreConfig::default();
        assert_eq!(s.capacity, 10);
        assert_eq!(s.id_prefix, "BP");
        assert_eq!(s.id_width, 3);
    }

    #[test]
    fn builders_override_fields() {
        let s = StoreConfig::default()
            .with_capacity(64)
            .with_id_prefix("sku")
            .with_id_width(5);
        assert_eq!(s.capacity, 64);
        assert_eq!(s.id_prefix, "SKU");
        assert_eq!(s.id_width, 5);
        assert_eq!(s.table_config().capacity, 64);
    }
}
