//! # storefront-core: Pure Domain Types for the Storefront
//!
//! This crate holds the catalog value types shared by every layer of the
//! storefront. It contains no I/O: products arrive from the external
//! Product Service, are validated here, and then live inside the stores of
//! `storefront-state`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    View layer (external)                        │   │
//! │  │    Product list ──► Detail ──► Cart ──► Favorites               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ mount / read / mutate                 │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  storefront-state                               │   │
//! │  │    CartStore, FavoritesStore, ShopState, catalog contract       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ★ storefront-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │   types   │  │   money   │  │ validation│                  │   │
//! │  │   │  Product  │  │   Price   │  │   rules   │                  │   │
//! │  │   │ ProductId │  │ (Decimal) │  │  checks   │                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Catalog types (Product, ProductId)
//! - [`money`] - Decimal price type
//! - [`error`] - Domain error types
//! - [`validation`] - Product validation rules
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::{Price, Product, ProductId};
//!
//! let product = Product::summary(
//!     ProductId::new(1),
//!     "Backpack",
//!     Price::from_cents(10995),
//!     "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
//! );
//! assert!(product.validate().is_ok());
//! assert_eq!(product.price.to_string(), "$109.95");
//! ```

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Price;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Number of decimal places prices are rounded to at the display boundary.
pub const DISPLAY_DECIMALS: u32 = 2;

/// Largest accepted catalog price, in cents ($1,000,000,000.00).
pub const MAX_PRICE_CENTS: i64 = 100_000_000_000;

/// Maximum length of a product title, in characters.
pub const MAX_TITLE_LEN: usize = 200;
