//! # Storefront State
//!
//! Client-side shared state for the storefront: the cart, the favorites,
//! and the access layer that keeps every mounted view in step with them.
//!
//! ## Module Organization
//! ```text
//! storefront_state/
//! ├── lib.rs          ◄─── You are here (re-exports, logging setup)
//! ├── state/
//! │   ├── mod.rs      ◄─── ShopState access layer, View, Mounted
//! │   ├── cart.rs     ◄─── Cart sequence and CartStore
//! │   ├── favorites.rs◄─── Favorites set and FavoritesStore
//! │   └── observer.rs ◄─── Subscriber registry and Subscription guard
//! ├── catalog.rs      ◄─── ProductService contract, Fetch, InMemoryCatalog
//! ├── config.rs       ◄─── StorefrontConfig and price formatting
//! └── error.rs        ◄─── CatalogError
//! ```
//!
//! ## Execution Model
//! Everything runs on the UI event loop. A mutation applies its change and
//! notifies every subscriber before it returns, so a read right after an
//! add in the same handler already sees the new entry. Stores use
//! `Arc<Mutex<_>>` only so handles can be shared; the lock is never held
//! while subscribers run.

pub mod catalog;
pub mod config;
pub mod error;
pub mod state;

pub use catalog::{load_product, load_products, Fetch, InMemoryCatalog, ProductService};
pub use config::StorefrontConfig;
pub use error::{CatalogError, CatalogResult};
pub use state::{
    Badges, Cart, CartEntry, CartEvent, CartStore, CartTotals, Favorites, FavoritesEvent,
    FavoritesStore, Mounted, ShopState, StoreChange, Subscription, View,
};

use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber.
///
/// - Default filter: `info,storefront_state=debug`
/// - Override with `RUST_LOG`
///
/// Does nothing if a subscriber is already installed.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,storefront_state=debug"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
