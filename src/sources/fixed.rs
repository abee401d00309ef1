use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::models::Product;
use crate::sources::{PriceSource, Quote};
use crate::utils::error::AppError;

/// Placeholder source returning a canned quote. Stands in for a real
/// scraper during development and doubles as a test fixture; swap in a
/// site-specific `PriceSource` implementation for production use.
pub struct FixedSource {
    quote: Quote,
}

impl FixedSource {
    pub fn with_quote(quote: Quote) -> Self {
        Self { quote }
    }
}

impl Default for FixedSource {
    fn default() -> Self {
        Self {
            quote: Quote {
                site: "ExampleSite".to_string(),
                price: Decimal::new(19999, 2),
                shipping: Decimal::ZERO,
                available: true,
            },
        }
    }
}

#[async_trait]
impl PriceSource for FixedSource {
    async fn fetch(&self, _product: &Product) -> Result<Quote, AppError> {
        Ok(self.quote.clone())
    }
}
