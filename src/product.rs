//! Product records stored in the inventory table.

use core::fmt;

/// Remark stored when the caller leaves remarks empty.
pub const NO_REMARK: &str = "(no remark)";

/// A single inventory record. The table owns these; callers see them by
/// reference or as snapshot clones.
#[derive(Clone, Debug, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: u32,
    pub remarks: String,
}

/// Everything about a product except its identifier; used for both adding
/// and editing.
#[derive(Clone, Debug, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: u32,
    pub remarks: String,
}

impl ProductDraft {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        price: f64,
        quantity: u32,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            price,
            quantity,
            remarks: String::new(),
        }
    }

    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = remarks.into();
        self
    }
}

impl Product {
    pub(crate) fn from_draft(id: String, draft: ProductDraft) -> Self {
        let remarks = if draft.remarks.trim().is_empty() {
            NO_REMARK.to_string()
        } else {
            draft.remarks
        };
        Self {
            id,
            name: draft.name,
            category: draft.category,
            price: draft.price,
            quantity: draft.quantity,
            remarks,
        }
    }

    /// Case-insensitive substring match over every field, numeric fields
    /// included in their display form. `needle` must already be lower-case.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        [&self.id, &self.name, &self.category, &self.remarks]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
            || self.price.to_string().contains(needle)
            || self.quantity.to_string().contains(needle)
    }
}

/// One fixed-width row, suitable for a listing.
impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "|{:<10}|{:<30}|{:<20}|RM {:<10}|{:<10}|{:<20}",
            self.id, self.name, self.category, self.price, self.quantity, self.remarks
        )
    }
}
