//! Shared types for the storefront workspace
//!
//! Wire models and the unified error system used by `storefront-server`
//! and by its integration tests.

pub mod error;
pub mod models;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
