use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Fetch failed for {sku}: {message}")]
    Fetch { sku: String, message: String },

    #[error("Invalid observation: {0}")]
    InvalidObservation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Notification error: {0}")]
    Notify(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl AppError {
    /// Short failure kind used in per-product log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Fetch { .. } => "fetch",
            AppError::InvalidObservation(_) => "invalid_observation",
            AppError::Database(_) => "store",
            AppError::Notify(_) => "notify",
            AppError::Config(_) => "config",
        }
    }
}

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
