pub mod config;
pub mod evaluator;
pub mod models;
pub mod monitor;
pub mod notify;
pub mod sources;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use crate::config::AppConfig;
pub use crate::utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
