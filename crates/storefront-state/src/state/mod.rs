//! # State Module
//!
//! The shared state of a storefront session and the access layer views use
//! to reach it.
//!
//! ## Why Separate Stores?
//! Cart and favorites are independent state types, each with its own lock
//! and its own subscribers. [`ShopState`] only bundles the two handles so a
//! view can be given "the session state" in one value.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  ShopState (cloned into every view, same instances)             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                   │                              │                      │
//! │                   ▼                              ▼                      │
//! │  ┌──────────────────────────────┐  ┌──────────────────────────────┐    │
//! │  │   CartStore                  │  │   FavoritesStore             │    │
//! │  │   Arc<Mutex<Cart>>           │  │   Arc<Mutex<Favorites>>      │    │
//! │  │   Subscribers<CartEvent>     │  │   Subscribers<FavoritesEvent>│    │
//! │  └──────────────────────────────┘  └──────────────────────────────┘    │
//! │                                                                         │
//! │  mount(view)  ──► render now, then after every change to EITHER store  │
//! │  drop(Mounted) ─► both registrations released                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod favorites;
mod observer;

pub use cart::{Cart, CartEntry, CartEvent, CartStore, CartTotals, WeakCartStore};
pub use favorites::{Favorites, FavoritesEvent, FavoritesStore, WeakFavoritesStore};
pub use observer::{SubscriberId, Subscribers, Subscription};

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use storefront_core::ProductId;
use tracing::debug;
use ts_rs::TS;

/// A change to either store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange {
    Cart(CartEvent),
    Favorites(FavoritesEvent),
}

/// Counts shown on navigation badges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Badges {
    pub cart_count: usize,
    pub favorites_count: usize,
}

/// Something that renders from the shared state.
///
/// `render` is called once on mount and again after every change to the
/// cart or the favorites. It must derive everything it shows from `state`
/// on each call.
pub trait View: Send + Sync + 'static {
    fn render(&self, state: &ShopState);
}

/// Registrations of one mounted view or observer.
///
/// Dropping it unsubscribes from both stores.
#[must_use = "dropping Mounted unmounts the view immediately"]
#[derive(Debug)]
pub struct Mounted {
    cart: Subscription,
    favorites: Subscription,
}

impl Mounted {
    /// Unmounts now. Equivalent to dropping the guard.
    pub fn unmount(self) {}

    pub fn is_active(&self) -> bool {
        self.cart.is_active() && self.favorites.is_active()
    }
}

/// The state of one storefront session.
///
/// ## Usage
/// ```rust
/// use storefront_core::{Price, Product, ProductId};
/// use storefront_state::ShopState;
///
/// let state = ShopState::new();
/// let for_list_view = state.clone();
///
/// for_list_view.cart().add_to_cart(Product::summary(
///     ProductId::new(1),
///     "Backpack",
///     Price::from_cents(10995),
///     "https://fakestoreapi.com/img/1.jpg",
/// ));
///
/// assert_eq!(state.badges().cart_count, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ShopState {
    cart: CartStore,
    favorites: FavoritesStore,
}

impl ShopState {
    /// Creates a session with an empty cart and no favorites.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a session around existing stores.
    pub fn with_stores(cart: CartStore, favorites: FavoritesStore) -> Self {
        ShopState { cart, favorites }
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    pub fn badges(&self) -> Badges {
        Badges {
            cart_count: self.cart.len(),
            favorites_count: self.favorites.len(),
        }
    }

    /// Copies a favorite into the cart.
    ///
    /// Returns false, and changes nothing, when `id` is not a favorite.
    pub fn add_favorite_to_cart(&self, id: ProductId) -> bool {
        match self.favorites.get(id) {
            Some(product) => {
                self.cart.add_to_cart(product);
                true
            }
            None => false,
        }
    }

    /// Registers `observer` for changes to either store.
    pub fn subscribe<F>(&self, observer: F) -> Mounted
    where
        F: Fn(&StoreChange) + Send + Sync + 'static,
    {
        let observer = Arc::new(observer);
        let on_cart = Arc::clone(&observer);
        let cart = self
            .cart
            .subscribe(move |event| on_cart(&StoreChange::Cart(*event)));
        let favorites = self
            .favorites
            .subscribe(move |event| observer(&StoreChange::Favorites(*event)));
        Mounted { cart, favorites }
    }

    /// Renders `view` now and after every change until the guard is dropped.
    ///
    /// The view's callbacks hold the stores weakly, so a mounted view never
    /// keeps the session alive.
    pub fn mount<V: View>(&self, view: Arc<V>) -> Mounted {
        view.render(self);
        let weak = self.downgrade();
        let mounted = self.subscribe(move |_| {
            if let Some(state) = weak.upgrade() {
                view.render(&state);
            }
        });
        debug!(
            cart_subscribers = self.cart.subscriber_count(),
            favorites_subscribers = self.favorites.subscriber_count(),
            "view mounted"
        );
        mounted
    }

    /// Returns true when both handles refer to the same stores.
    pub fn ptr_eq(&self, other: &ShopState) -> bool {
        self.cart.ptr_eq(&other.cart) && self.favorites.ptr_eq(&other.favorites)
    }

    fn downgrade(&self) -> WeakShopState {
        WeakShopState {
            cart: self.cart.downgrade(),
            favorites: self.favorites.downgrade(),
        }
    }
}

struct WeakShopState {
    cart: WeakCartStore,
    favorites: WeakFavoritesStore,
}

impl WeakShopState {
    fn upgrade(&self) -> Option<ShopState> {
        Some(ShopState {
            cart: self.cart.upgrade()?,
            favorites: self.favorites.upgrade()?,
        })
    }
}
