pub mod observation;
pub mod product;

// Re-exports for convenience
pub use observation::*;
pub use product::*;
