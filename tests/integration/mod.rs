pub mod run_tests;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal::Decimal;

use price_sentry::models::{Observation, Product};
use price_sentry::notify::{alert_message, AlertNotifier};
use price_sentry::sources::{PriceSource, Quote};
use price_sentry::store::ObservationStore;
use price_sentry::AppError;

pub async fn test_store() -> ObservationStore {
    ObservationStore::connect("sqlite::memory:", 1)
        .await
        .expect("in-memory store should open")
}

pub fn quote(price_cents: i64, available: bool) -> Quote {
    Quote {
        site: "ExampleSite".to_string(),
        price: Decimal::new(price_cents, 2),
        shipping: Decimal::ZERO,
        available,
    }
}

pub fn observation(sku: &str, price_cents: i64, available: bool) -> Observation {
    Observation {
        sku: sku.to_string(),
        site: "ExampleSite".to_string(),
        price: Decimal::new(price_cents, 2),
        shipping: Decimal::ZERO,
        available,
    }
}

/// Collects delivered alert bodies instead of sending them anywhere.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn delivered(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl AlertNotifier for RecordingNotifier {
    async fn notify(&self, product: &Product, observation: &Observation) -> Result<(), AppError> {
        self.messages
            .lock()
            .unwrap()
            .push(alert_message(product, observation));
        Ok(())
    }
}

/// Always fails delivery, for exercising the notify-failure path.
pub struct BrokenNotifier;

#[async_trait]
impl AlertNotifier for BrokenNotifier {
    async fn notify(&self, _product: &Product, _observation: &Observation) -> Result<(), AppError> {
        Err(AppError::Notify("simulated channel outage".to_string()))
    }
}

/// Source whose fetch always fails, for exercising per-product isolation.
pub struct FailingSource;

#[async_trait]
impl PriceSource for FailingSource {
    async fn fetch(&self, product: &Product) -> Result<Quote, AppError> {
        Err(AppError::Fetch {
            sku: product.sku.clone(),
            message: "simulated site outage".to_string(),
        })
    }
}
