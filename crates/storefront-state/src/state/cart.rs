//! # Cart State
//!
//! Manages the shopping cart: an ordered, duplicate-tolerant sequence of
//! products plus its derived total.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  View Gesture             Store Call              Cart Change           │
//! │  ────────────             ──────────              ───────────           │
//! │                                                                         │
//! │  Tap "add" ──────────────► add_to_cart() ───────► items.push(p)        │
//! │                                                                         │
//! │  Tap trash (row i) ──────► remove_from_cart(i) ─► items.remove(i)      │
//! │                                                   (no-op if i >= len)   │
//! │                                                                         │
//! │  Tap "empty cart" ───────► clear_cart() ────────► items.clear()        │
//! │                                                                         │
//! │  Render ─────────────────► items() / total() ───► (read only)          │
//! │                                                                         │
//! │  Every change notifies all subscribers before the call returns.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stale Indices
//! Removal is by position, and positions shift on every removal. Views must
//! take indices from [`CartStore::entries`] on each render and never keep
//! them across a mutation.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use serde::{Deserialize, Serialize};
use storefront_core::{Price, Product, ProductId, DISPLAY_DECIMALS};
use tracing::{debug, trace};
use ts_rs::TS;

use super::observer::{Subscribers, Subscription};

/// A product at a position in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    /// Position at the time the entry was read.
    pub index: usize,
    pub product: Product,
}

impl CartEntry {
    /// Render key that stays unique when the same product appears twice.
    pub fn key(&self) -> String {
        format!("{}-{}", self.product.id, self.index)
    }
}

/// The cart sequence.
///
/// ## Invariants
/// - Insertion order is preserved
/// - The same product id may appear any number of times
/// - Prices keep full precision; only [`Cart::total`] rounds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    items: Vec<Product>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Appends a product and returns its position.
    pub fn push(&mut self, product: Product) -> usize {
        self.items.push(product);
        self.items.len() - 1
    }

    /// Removes the entry at `index`, shifting later entries down by one.
    ///
    /// Returns `None` (and changes nothing) when `index` is out of range.
    pub fn remove(&mut self, index: usize) -> Option<Product> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Empties the cart, returning how many entries were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.items.len();
        self.items.clear();
        removed
    }

    pub fn items(&self) -> &[Product] {
        &self.items
    }

    /// Entries with their current positions.
    pub fn entries(&self) -> Vec<CartEntry> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, product)| CartEntry {
                index,
                product: product.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of entries sharing `id`.
    pub fn count_of(&self, id: ProductId) -> usize {
        self.items.iter().filter(|p| p.id == id).count()
    }

    /// Unrounded sum of all prices, saturating at [`Price::MAX`].
    pub fn exact_total(&self) -> Price {
        self.items.iter().map(|p| p.price).sum()
    }

    /// Sum of all prices rounded for display.
    pub fn total(&self) -> Price {
        self.exact_total().rounded(DISPLAY_DECIMALS)
    }
}

/// Cart totals summary for views (badge + footer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    pub item_count: usize,
    #[ts(type = "number")]
    pub total: Price,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.len(),
            total: cart.total(),
        }
    }
}

/// What changed in the cart.
///
/// Events arrive in the order the changes were applied, so `index` is
/// valid against the cart as it stood right after that change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartEvent {
    Added { index: usize, product_id: ProductId },
    Removed { index: usize, product_id: ProductId },
    Cleared { removed: usize },
}

// =============================================================================
// Cart Store
// =============================================================================

/// Shared handle to the one cart of the session.
///
/// Cloning is cheap and every clone refers to the same cart. The cart sits
/// behind `Arc<Mutex<_>>`; the lock is held only while the sequence is read
/// or changed, never while subscribers run.
#[derive(Clone, Default)]
pub struct CartStore {
    inner: Arc<CartInner>,
}

#[derive(Default)]
struct CartInner {
    cart: Mutex<Cart>,
    subscribers: Subscribers<CartEvent>,
}

impl CartStore {
    /// Creates a new empty cart store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Cart> {
        self.inner.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends `product` to the end of the cart. Never fails, never dedups.
    pub fn add_to_cart(&self, product: Product) {
        let product_id = product.id;
        let (index, len) = {
            let mut cart = self.lock();
            let index = cart.push(product);
            (index, cart.len())
        };
        debug!(product_id = %product_id, index, len, "added to cart");
        self.inner
            .subscribers
            .notify(&CartEvent::Added { index, product_id });
    }

    /// Removes the entry at `index`. Out-of-range indices are ignored.
    pub fn remove_from_cart(&self, index: usize) {
        let removed = self.lock().remove(index);
        match removed {
            Some(product) => {
                debug!(product_id = %product.id, index, "removed from cart");
                self.inner.subscribers.notify(&CartEvent::Removed {
                    index,
                    product_id: product.id,
                });
            }
            None => trace!(index, "ignored out-of-range cart removal"),
        }
    }

    /// Empties the cart. Does not notify when the cart was already empty.
    pub fn clear_cart(&self) {
        let removed = self.lock().clear();
        if removed == 0 {
            return;
        }
        debug!(removed, "cart cleared");
        self.inner
            .subscribers
            .notify(&CartEvent::Cleared { removed });
    }

    /// Total price, rounded to two decimals for display.
    pub fn total(&self) -> Price {
        self.lock().total()
    }

    /// Total price at full precision.
    pub fn exact_total(&self) -> Price {
        self.lock().exact_total()
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals::from(&*self.lock())
    }

    /// Snapshot of the cart in insertion order.
    ///
    /// The returned vector is a copy; changing it does not touch the store.
    pub fn items(&self) -> Vec<Product> {
        self.lock().items().to_vec()
    }

    /// Snapshot with positions, for rendering rows with remove buttons.
    pub fn entries(&self) -> Vec<CartEntry> {
        self.lock().entries()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn count_of(&self, id: ProductId) -> usize {
        self.lock().count_of(id)
    }

    /// Executes a function with read access to a snapshot of the cart.
    ///
    /// The lock is released before `f` runs, so `f` may call back into the
    /// store. Changes it makes are not visible in the snapshot.
    ///
    /// ## Usage
    /// ```rust
    /// use storefront_state::CartStore;
    ///
    /// let store = CartStore::new();
    /// let empty = store.with_cart(|cart| cart.is_empty());
    /// assert!(empty);
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let snapshot = self.lock().clone();
        f(&snapshot)
    }

    /// Registers a callback run after every cart change.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&CartEvent) + Send + Sync + 'static,
    {
        self.inner.subscribers.subscribe(callback)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.len()
    }

    /// Returns true when both handles refer to the same cart.
    pub fn ptr_eq(&self, other: &CartStore) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// A handle that does not keep the cart alive.
    pub fn downgrade(&self) -> WeakCartStore {
        WeakCartStore {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("len", &self.len())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Non-owning cart handle, see [`CartStore::downgrade`].
#[derive(Clone, Debug, Default)]
pub struct WeakCartStore {
    inner: Weak<CartInner>,
}

impl WeakCartStore {
    pub fn upgrade(&self) -> Option<CartStore> {
        self.inner.upgrade().map(|inner| CartStore { inner })
    }
}
