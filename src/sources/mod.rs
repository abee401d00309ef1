use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{SourceBinding, SourceKind};
use crate::models::Product;
use crate::utils::error::AppError;

pub mod fixed;

pub use fixed::FixedSource;

/// A price reading as returned by a site-specific source, before it is
/// tied to a product and persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Quote {
    pub site: String,
    pub price: Decimal,
    pub shipping: Decimal,
    pub available: bool,
}

/// Site-specific price source. Real implementations scrape a store page or
/// call its API; they must report availability explicitly and map any
/// failure to `AppError::Fetch` so the run can skip the product and move on.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch(&self, product: &Product) -> Result<Quote, AppError>;
}

/// Maps URL domain prefixes to price source implementations. The first
/// registered prefix contained in a product URL wins, so registration
/// order matters for overlapping prefixes.
#[derive(Default)]
pub struct SourceRegistry {
    sources: Vec<(String, Arc<dyn PriceSource>)>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, prefix: impl Into<String>, source: Arc<dyn PriceSource>) {
        self.sources.push((prefix.into(), source));
    }

    pub fn resolve(&self, url: &str) -> Option<Arc<dyn PriceSource>> {
        self.sources
            .iter()
            .find(|(prefix, _)| url.contains(prefix.as_str()))
            .map(|(_, source)| Arc::clone(source))
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Build a registry from the configured prefix -> source kind bindings.
    pub fn from_bindings(bindings: &[SourceBinding]) -> Self {
        let mut registry = Self::new();
        for binding in bindings {
            let source: Arc<dyn PriceSource> = match binding.kind {
                SourceKind::Fixed => Arc::new(FixedSource::default()),
            };
            registry.register(binding.prefix.clone(), source);
        }
        registry
    }
}
