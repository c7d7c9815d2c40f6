//! Convenience re-exports for common Compound usage
//!
//! # Example
//!
//! ```rust
//! use compound::prelude::*;
//! ```

// Core components
pub use crate::core::Compound;
pub use crate::errors::CompoundError;
pub use crate::server::{AppState, router, serve};

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, LoggingConfig, ServerConfig};

// Store models, stores and the query builder
pub use finance_store::prelude::*;

// Common external dependencies
pub use async_trait;
pub use sqlx;
pub use tokio;
