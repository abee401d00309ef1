use serde::{Deserialize, Serialize};

/// A product under watch. Defined in configuration, immutable for the
/// duration of a run; never persisted by the agent itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    /// Unique identifier, e.g. an Amazon ASIN or a store SKU.
    pub sku: String,
    pub name: String,
    /// Product page URL; also decides which source handles this product.
    pub url: String,
}

impl Product {
    pub fn new(sku: impl Into<String>, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            sku: sku.into(),
            name: name.into(),
            url: url.into(),
        }
    }
}
