//! Ordered list of product categories.

pub const DEFAULT_CATEGORIES: [&str; 6] =
    ["Milk Powder", "Diapers", "Care", "Feeding", "Bath", "Travel"];

/// Category names in the order they were added. Selection is 1-based, the
/// way a numbered listing presents them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryRegistry {
    names: Vec<String>,
}

impl CategoryRegistry {
    pub fn empty() -> Self {
        Self { names: Vec::new() }
    }

    pub fn list(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Category at 1-based position `choice`.
    pub fn by_choice(&self, choice: usize) -> Option<&str> {
        choice
            .checked_sub(1)
            .and_then(|i| self.names.get(i))
            .map(String::as_str)
    }

    /// Append a name; returns false if it is already listed.
    pub fn add(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.names.push(name);
        true
    }

    /// Remove the category at 1-based `choice`.
    pub(crate) fn remove_choice(&mut self, choice: usize) -> Option<String> {
        let i = choice.checked_sub(1)?;
        (i < self.names.len()).then(|| self.names.remove(i))
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self {
            names: DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}
