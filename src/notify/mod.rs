use async_trait::async_trait;

use crate::config::Channel;
use crate::models::{Observation, Product};
use crate::utils::error::AppError;

pub mod console;
pub mod sms;

pub use console::ConsoleNotifier;
pub use sms::SmsNotifier;

/// Delivers a new-low alert through one channel. Failure maps to
/// `AppError::Notify` and is reported but never aborts the run.
#[async_trait]
pub trait AlertNotifier: Send + Sync {
    async fn notify(&self, product: &Product, observation: &Observation) -> Result<(), AppError>;
}

/// Human-readable alert body shared by every channel.
pub fn alert_message(product: &Product, observation: &Observation) -> String {
    format!(
        "Price alert: '{}' (SKU {}) has a new low price of {} on {}. See {} for details.",
        product.name, product.sku, observation.price, observation.site, product.url
    )
}

/// Build the notifier for the channel resolved at startup.
pub fn notifier_for(channel: Channel) -> Box<dyn AlertNotifier> {
    match channel {
        Channel::Sms(settings) => Box::new(SmsNotifier::new(settings)),
        Channel::Console => Box::new(ConsoleNotifier),
    }
}
