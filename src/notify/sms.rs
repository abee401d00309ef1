use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

use crate::config::SmsSettings;
use crate::models::{Observation, Product};
use crate::notify::{alert_message, AlertNotifier};
use crate::utils::error::AppError;

const DEFAULT_API_BASE: &str = "https://api.twilio.com";

/// Sends one outbound SMS per alert through a Twilio-compatible Messages
/// API. Delivery failures surface as `AppError::Notify` and are handled at
/// the run level, not here.
pub struct SmsNotifier {
    client: Client,
    settings: SmsSettings,
    api_base: String,
}

impl SmsNotifier {
    pub fn new(settings: SmsSettings) -> Self {
        Self::with_api_base(settings, DEFAULT_API_BASE)
    }

    /// Point the notifier at a different API host. Used by tests.
    pub fn with_api_base(settings: SmsSettings, api_base: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            settings,
            api_base: api_base.into(),
        }
    }
}

#[async_trait]
impl AlertNotifier for SmsNotifier {
    async fn notify(&self, product: &Product, observation: &Observation) -> Result<(), AppError> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base, self.settings.account_sid
        );
        let body = alert_message(product, observation);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.settings.account_sid, Some(&self.settings.auth_token))
            .form(&[
                ("Body", body.as_str()),
                ("From", self.settings.from_number.as_str()),
                ("To", self.settings.to_number.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Notify(format!("SMS request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
                .unwrap_or_else(|| status.to_string());
            return Err(AppError::Notify(format!(
                "SMS provider rejected message: {detail}"
            )));
        }

        info!(sku = %product.sku, "SMS alert sent");
        Ok(())
    }
}
