//! # Catalog Error Types
//!
//! Errors raised at the Product Service boundary.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  Product Service failure / bad payload                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CatalogError (this module)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Fetch::Failed ← logged, then shown as an error/empty state            │
//! │                                                                         │
//! │  Store contents are never touched by a failed fetch.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use storefront_core::{CoreError, ValidationError};
use thiserror::Error;

/// Product Service errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The service could not be reached or timed out.
    #[error("Product service unavailable: {0}")]
    Unavailable(String),

    /// Domain error (missing product, invalid record).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The payload was not valid catalog JSON.
    #[error("Invalid catalog payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<ValidationError> for CatalogError {
    fn from(err: ValidationError) -> Self {
        CatalogError::Core(CoreError::Validation(err))
    }
}

/// Convenience type alias for catalog results.
pub type CatalogResult<T> = Result<T, CatalogError>;
