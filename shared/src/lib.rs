//! Diet Tracker Shared Library
//!
//! Domain models, API types, validation and calorie math shared by the
//! backend and the WASM calculator.

pub mod errors;
pub mod health_metrics;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use health_metrics::*;
pub use models::*;
pub use types::*;
