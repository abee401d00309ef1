use async_trait::async_trait;

use crate::models::{Observation, Product};
use crate::notify::{alert_message, AlertNotifier};
use crate::utils::error::AppError;

/// Fallback channel used when SMS credentials are absent. A plain console
/// write; defined to never fail.
pub struct ConsoleNotifier;

#[async_trait]
impl AlertNotifier for ConsoleNotifier {
    async fn notify(&self, product: &Product, observation: &Observation) -> Result<(), AppError> {
        println!("[NOTIFICATION] {}", alert_message(product, observation));
        Ok(())
    }
}
