use ::config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use url::Url;

use crate::models::Product;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub watch: WatchConfig,
    #[serde(default)]
    pub sources: Vec<SourceBinding>,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Trailing lookback window; the original 52-week low is 364 days.
    pub window_days: i64,
    #[serde(default)]
    pub products: Vec<Product>,
}

/// Ties a URL domain prefix to a source implementation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceBinding {
    pub prefix: String,
    pub kind: SourceKind,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Placeholder source returning canned values; replace per site.
    Fixed,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default)]
    pub sms: SmsConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SmsConfig {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    pub from_number: Option<String>,
    pub to_number: Option<String>,
}

/// Alert channel, resolved once at startup rather than per alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Channel {
    Sms(SmsSettings),
    Console,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsSettings {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
    pub to_number: String,
}

impl NotificationsConfig {
    /// SMS when all four credentials are present and non-blank, console
    /// otherwise.
    pub fn channel(&self) -> Channel {
        let sms = &self.sms;
        match (
            sms.account_sid.as_deref(),
            sms.auth_token.as_deref(),
            sms.from_number.as_deref(),
            sms.to_number.as_deref(),
        ) {
            (Some(sid), Some(token), Some(from), Some(to))
                if [sid, token, from, to].iter().all(|s| !s.trim().is_empty()) =>
            {
                Channel::Sms(SmsSettings {
                    account_sid: sid.to_string(),
                    auth_token: token.to_string(),
                    from_number: from.to_string(),
                    to_number: to.to_string(),
                })
            }
            _ => Channel::Console,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default"))
            // Add environment-specific config
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add local config (ignored by git)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with prefix "PRICE_SENTRY"
            .add_source(Environment::with_prefix("PRICE_SENTRY").separator("__"))
            .build()?;

        let config: AppConfig = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::Message(
                "Database max_connections must be greater than 0".into(),
            ));
        }

        if self.watch.window_days <= 0 {
            return Err(ConfigError::Message(
                "Watch window_days must be greater than 0".into(),
            ));
        }

        for product in &self.watch.products {
            if product.sku.trim().is_empty() {
                return Err(ConfigError::Message("Product sku must not be empty".into()));
            }
            if Url::parse(&product.url).is_err() {
                return Err(ConfigError::Message(format!(
                    "Invalid URL for product {}: {}",
                    product.sku, product.url
                )));
            }
        }

        for binding in &self.sources {
            if binding.prefix.trim().is_empty() {
                return Err(ConfigError::Message(
                    "Source binding prefix must not be empty".into(),
                ));
            }
        }

        Ok(())
    }
}
