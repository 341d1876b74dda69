//! ProductStore: the inventory layer over `ChainedHashTable`.
//!
//! Identifiers are upper-cased here, before every table call, so the table
//! itself can keep exact key matching.

use crate::categories::CategoryRegistry;
use crate::chained_table::{ChainedHashTable, InsertOutcome, TableError};
use crate::config::StoreConfig;
use crate::product::{Product, ProductDraft};
use log::{debug, info, warn};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("invalid product id {0:?}: expected the prefix followed by digits")]
    InvalidId(String),
    #[error("product name cannot be empty")]
    EmptyName,
    #[error("product id {0} already exists")]
    DuplicateId(String),
    #[error("product {0} not found")]
    NotFound(String),
    #[error("category {0:?} already exists")]
    DuplicateCategory(String),
    #[error("category {0:?} is used by at least one product")]
    CategoryInUse(String),
    #[error("no category at position {0}")]
    UnknownCategory(usize),
    #[error(transparent)]
    Table(#[from] TableError),
}

/// (id, name, category, price, quantity, remarks)
const SAMPLE_PRODUCTS: [(&str, &str, &str, f64, u32, &str); 7] = [
    ("BP001", "Baby Milk Powder", "Milk Powder", 25.99, 50, "For 0-6 months"),
    ("BP002", "Baby Diapers", "Diapers", 15.50, 100, "Size S, hypoallergenic"),
    ("BP003", "Baby Wipes", "Care", 5.99, 200, "Alcohol-free, gentle"),
    ("BP004", "Feeding Bottle", "Feeding", 8.99, 30, "240ml, BPA-free"),
    ("BP005", "Baby Shampoo", "Bath", 12.99, 40, "Tear-free formula"),
    ("BP006", "Baby Stroller", "Travel", 199.99, 10, "Lightweight, foldable"),
    ("BP007", "Pacifier", "Feeding", 4.99, 60, "Orthodontic, silicone"),
];

pub struct ProductStore {
    table: ChainedHashTable<String, Product>,
    categories: CategoryRegistry,
    config: StoreConfig,
}

impl ProductStore {
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        let table = ChainedHashTable::from_config(&config.table_config())?;
        Ok(Self {
            table,
            categories: CategoryRegistry::default(),
            config,
        })
    }

    /// Store built from `config` and filled with the bundled sample products.
    pub fn with_sample_data(config: StoreConfig) -> Result<Self, StoreError> {
        let mut store = Self::new(config)?;
        store.preload_sample_data()?;
        Ok(store)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Read-only access to the backing table.
    pub fn table(&self) -> &ChainedHashTable<String, Product> {
        &self.table
    }

    fn normalize(id: &str) -> String {
        id.trim().to_uppercase()
    }

    /// Numeric part of a normalized id, if it has this store's prefix.
    fn id_number(&self, normalized: &str) -> Option<u64> {
        let digits = normalized.strip_prefix(self.config.id_prefix.as_str())?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    fn format_id(&self, n: u64) -> String {
        format!(
            "{}{:0width$}",
            self.config.id_prefix,
            n,
            width = self.config.id_width
        )
    }

    pub fn add_product(&mut self, id: &str, draft: ProductDraft) -> Result<&Product, StoreError> {
        let id = Self::normalize(id);
        if self.id_number(&id).is_none() {
            return Err(StoreError::InvalidId(id));
        }
        if draft.name.trim().is_empty() {
            return Err(StoreError::EmptyName);
        }
        if self.table.contains_key(id.as_str()) {
            return Err(StoreError::DuplicateId(id));
        }

        let product = Product::from_draft(id.clone(), draft);
        let outcome = self.table.insert(id.clone(), product);
        debug_assert_eq!(outcome, InsertOutcome::Inserted);
        debug!("added product {} ({} stored)", id, self.table.len());
        self.table
            .search(id.as_str())
            .ok_or(StoreError::NotFound(id))
    }

    pub fn get_product(&self, id: &str) -> Option<&Product> {
        self.table.search(Self::normalize(id).as_str())
    }

    /// Replace every field but the id of an existing product.
    pub fn update_product(
        &mut self,
        id: &str,
        draft: ProductDraft,
    ) -> Result<&Product, StoreError> {
        let id = Self::normalize(id);
        if draft.name.trim().is_empty() {
            return Err(StoreError::EmptyName);
        }
        let product = Product::from_draft(id.clone(), draft);
        if !self.table.update(id.as_str(), product) {
            return Err(StoreError::NotFound(id));
        }
        debug!("updated product {}", id);
        self.table
            .search(id.as_str())
            .ok_or(StoreError::NotFound(id))
    }

    pub fn delete_product(&mut self, id: &str) -> Result<Product, StoreError> {
        let id = Self::normalize(id);
        match self.table.remove(id.as_str()) {
            Some((_, product)) => {
                debug!("deleted product {} ({} stored)", id, self.table.len());
                Ok(product)
            }
            None => Err(StoreError::NotFound(id)),
        }
    }

    /// Snapshot of every product in the order it was first added.
    pub fn all_products(&self) -> Vec<Product> {
        self.table.all_values()
    }

    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.table.iter().map(|(_, p)| p)
    }

    pub fn products_by_category(&self, category: &str) -> Vec<&Product> {
        let wanted = category.to_lowercase();
        self.products()
            .filter(|p| p.category.to_lowercase() == wanted)
            .collect()
    }

    /// Products with `keyword` anywhere in their fields, ignoring case.
    pub fn search_products(&self, keyword: &str) -> Vec<&Product> {
        let needle = keyword.to_lowercase();
        self.products()
            .filter(|p| p.matches_lowercase(&needle))
            .collect()
    }

    /// Highest id currently stored, or the zero id when there is none.
    pub fn latest_product_id(&self) -> String {
        self.format_id(self.max_id_number())
    }

    pub fn next_product_id(&self) -> String {
        self.format_id(self.max_id_number().saturating_add(1))
    }

    fn max_id_number(&self) -> u64 {
        self.products()
            .filter_map(|p| self.id_number(&p.id))
            .max()
            .unwrap_or(0)
    }

    /// Load the bundled sample products, skipping ids that already exist.
    pub fn preload_sample_data(&mut self) -> Result<usize, StoreError> {
        let mut loaded = 0;
        for (id, name, category, price, quantity, remarks) in SAMPLE_PRODUCTS {
            let draft = ProductDraft::new(name, category, price, quantity).with_remarks(remarks);
            match self.add_product(id, draft) {
                Ok(_) => loaded += 1,
                Err(StoreError::DuplicateId(_)) => {}
                Err(e) => return Err(e),
            }
        }
        info!("preloaded {} sample products", loaded);
        Ok(loaded)
    }

    pub fn categories(&self) -> &CategoryRegistry {
        &self.categories
    }

    pub fn add_category(&mut self, name: &str) -> Result<(), StoreError> {
        let name = name.trim();
        if !self.categories.add(name) {
            return Err(StoreError::DuplicateCategory(name.to_string()));
        }
        debug!("added category {:?}", name);
        Ok(())
    }

    /// Whether any product uses exactly this category name.
    pub fn is_category_used(&self, category: &str) -> bool {
        self.products().any(|p| p.category == category)
    }

    /// Remove the category at 1-based `choice` unless a product still uses it.
    pub fn delete_category(&mut self, choice: usize) -> Result<String, StoreError> {
        let name = self
            .categories
            .by_choice(choice)
            .ok_or(StoreError::UnknownCategory(choice))?
            .to_string();
        if self.is_category_used(&name) {
            warn!("refusing to delete category {:?}: still in use", name);
            return Err(StoreError::CategoryInUse(name));
        }
        let removed = self
            .categories
            .remove_choice(choice)
            .ok_or(StoreError::UnknownCategory(choice))?;
        debug!("deleted category {:?}", removed);
        Ok(removed)
    }
}
