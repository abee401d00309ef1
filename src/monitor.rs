use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::evaluator::is_new_low;
use crate::models::{Observation, Product};
use crate::notify::AlertNotifier;
use crate::sources::SourceRegistry;
use crate::store::ObservationStore;
use crate::utils::error::AppError;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunSummary {
    pub checked: usize,
    pub failed: usize,
    pub alerts: usize,
}

/// Sequences fetch -> persist -> trailing minimum -> evaluate -> notify for
/// each configured product. Products are processed one at a time and in
/// isolation: any per-product failure is logged and the batch moves on.
pub struct PriceMonitor {
    store: ObservationStore,
    registry: SourceRegistry,
    notifier: Box<dyn AlertNotifier>,
    window: Duration,
}

impl PriceMonitor {
    pub fn new(
        store: ObservationStore,
        registry: SourceRegistry,
        notifier: Box<dyn AlertNotifier>,
        window: Duration,
    ) -> Self {
        Self {
            store,
            registry,
            notifier,
            window,
        }
    }

    /// One full pass over the product list. Never fails: per-product errors
    /// are counted and logged, and recurring execution is the scheduler's
    /// concern, not ours.
    pub async fn run_once(&self, products: &[Product]) -> RunSummary {
        let mut summary = RunSummary::default();

        for product in products {
            summary.checked += 1;
            match self.check_product(product).await {
                Ok(true) => summary.alerts += 1,
                Ok(false) => {}
                Err(e) => {
                    summary.failed += 1;
                    warn!(
                        sku = %product.sku,
                        kind = e.kind(),
                        error = %e,
                        "product check failed; continuing with next product"
                    );
                }
            }
        }

        info!(
            checked = summary.checked,
            failed = summary.failed,
            alerts = summary.alerts,
            "monitoring pass complete"
        );
        summary
    }

    /// Returns whether an alert fired for this product.
    async fn check_product(&self, product: &Product) -> Result<bool, AppError> {
        let source = self
            .registry
            .resolve(&product.url)
            .ok_or_else(|| AppError::Fetch {
                sku: product.sku.clone(),
                message: format!("no source registered for {}", product.url),
            })?;

        let quote = source.fetch(product).await?;
        let observation = Observation::from_quote(product, &quote);

        // Baseline taken before the insert: the fresh reading must not
        // compete with itself, and a first-ever reading must not alert.
        let as_of = Utc::now();
        let prior_minimum = self
            .store
            .trailing_minimum(&product.sku, self.window, as_of)
            .await?;
        self.store.record(&observation).await?;

        if !is_new_low(&observation, prior_minimum) {
            return Ok(false);
        }

        info!(sku = %product.sku, price = %observation.price, "new trailing low observed");
        if let Err(e) = self.notifier.notify(product, &observation).await {
            // Reported, never escalated; the observation is already durable.
            warn!(sku = %product.sku, kind = e.kind(), error = %e, "alert delivery failed");
        }
        Ok(true)
    }
}
