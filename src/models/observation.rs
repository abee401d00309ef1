use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Product;
use crate::sources::Quote;
use crate::utils::error::AppError;

/// A single price reading for a product. Observations are append-only:
/// once written to the store they are never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Observation {
    pub sku: String,
    /// Which source produced this reading, e.g. "ExampleSite".
    pub site: String,
    pub price: Decimal,
    pub shipping: Decimal,
    /// Explicit availability flag, never inferred from a missing price.
    pub available: bool,
}

impl Observation {
    pub fn from_quote(product: &Product, quote: &Quote) -> Self {
        Self {
            sku: product.sku.clone(),
            site: quote.site.clone(),
            price: quote.price,
            shipping: quote.shipping,
            available: quote.available,
        }
    }

    /// Reject readings that cannot be a real price.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.price.is_sign_negative() {
            return Err(AppError::InvalidObservation(format!(
                "negative price {} for {}",
                self.price, self.sku
            )));
        }
        if self.shipping.is_sign_negative() {
            return Err(AppError::InvalidObservation(format!(
                "negative shipping {} for {}",
                self.shipping, self.sku
            )));
        }
        Ok(())
    }
}
