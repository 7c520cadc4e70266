//! # Favorites State
//!
//! The set of bookmarked products, keyed by product id.
//!
//! Unlike the cart, favorites have set semantics: adding a product whose id
//! is already present changes nothing and notifies nobody. The list keeps
//! insertion order so the favorites screen is stable between renders.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use storefront_core::{Product, ProductId};
use tracing::{debug, trace};

use super::observer::{Subscribers, Subscription};

/// Favorites collection.
///
/// ## Invariants
/// - No two entries share an id
/// - `ids` always mirrors the ids in `items`
#[derive(Debug, Clone, Default)]
pub struct Favorites {
    items: Vec<Product>,
    ids: HashSet<ProductId>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `product` unless its id is already present.
    ///
    /// Returns true when the collection changed.
    pub fn insert(&mut self, product: Product) -> bool {
        if !self.ids.insert(product.id) {
            return false;
        }
        self.items.push(product);
        true
    }

    /// Removes the entry with `id`, if any.
    pub fn remove(&mut self, id: ProductId) -> Option<Product> {
        if !self.ids.remove(&id) {
            return None;
        }
        let pos = self.items.iter().position(|p| p.id == id)?;
        Some(self.items.remove(pos))
    }

    /// Removes `product` if present, inserts it otherwise.
    pub fn toggle(&mut self, product: Product) -> FavoritesEvent {
        let id = product.id;
        if self.remove(id).is_some() {
            FavoritesEvent::Removed(id)
        } else {
            self.insert(product);
            FavoritesEvent::Added(id)
        }
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.ids.contains(&id)
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        if !self.contains(id) {
            return None;
        }
        self.items.iter().find(|p| p.id == id)
    }

    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// What changed in favorites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoritesEvent {
    Added(ProductId),
    Removed(ProductId),
}

impl FavoritesEvent {
    pub fn product_id(&self) -> ProductId {
        match *self {
            FavoritesEvent::Added(id) | FavoritesEvent::Removed(id) => id,
        }
    }
}

// =============================================================================
// Favorites Store
// =============================================================================

/// Shared handle to the favorites of the session.
///
/// Same sharing model as [`crate::CartStore`]: clones refer to one
/// collection, and subscribers run after the lock is released.
#[derive(Clone, Default)]
pub struct FavoritesStore {
    inner: Arc<FavoritesInner>,
}

#[derive(Default)]
struct FavoritesInner {
    favorites: Mutex<Favorites>,
    subscribers: Subscribers<FavoritesEvent>,
}

impl FavoritesStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Favorites> {
        self.inner
            .favorites
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, event: FavoritesEvent) {
        debug!(product_id = %event.product_id(), ?event, "favorites changed");
        self.inner.subscribers.notify(&event);
    }

    /// Adds `product` unless it is already a favorite.
    ///
    /// Subscribers are notified only when the product was actually added.
    pub fn add_to_favorites(&self, product: Product) {
        let id = product.id;
        let inserted = self.lock().insert(product);
        if inserted {
            self.publish(FavoritesEvent::Added(id));
        } else {
            trace!(product_id = %id, "ignored duplicate favorite");
        }
    }

    /// Removes the favorite with `id`; unknown ids are ignored.
    pub fn remove_from_favorites(&self, id: ProductId) {
        let removed = self.lock().remove(id);
        if removed.is_some() {
            self.publish(FavoritesEvent::Removed(id));
        } else {
            trace!(product_id = %id, "ignored removal of unknown favorite");
        }
    }

    /// Membership test against the current state.
    pub fn is_favorite(&self, id: ProductId) -> bool {
        self.lock().contains(id)
    }

    /// Flips the favorite state of `product` and returns the new state.
    ///
    /// The check and the change happen under one lock, so no other call can
    /// slip between them.
    pub fn toggle_favorite(&self, product: Product) -> bool {
        let event = self.lock().toggle(product);
        self.publish(event);
        matches!(event, FavoritesEvent::Added(_))
    }

    /// Snapshot of favorites in insertion order.
    pub fn items(&self) -> Vec<Product> {
        self.lock().items().to_vec()
    }

    /// Resolves a favorite back to its catalog record.
    pub fn get(&self, id: ProductId) -> Option<Product> {
        self.lock().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Executes a function with read access to a snapshot of the favorites.
    ///
    /// The lock is released before `f` runs, so `f` may call back into the
    /// store.
    pub fn with_favorites<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Favorites) -> R,
    {
        let snapshot = self.lock().clone();
        f(&snapshot)
    }

    /// Registers a callback run after every favorites change.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&FavoritesEvent) + Send + Sync + 'static,
    {
        self.inner.subscribers.subscribe(callback)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.len()
    }

    pub fn ptr_eq(&self, other: &FavoritesStore) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn downgrade(&self) -> WeakFavoritesStore {
        WeakFavoritesStore {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

impl fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FavoritesStore")
            .field("len", &self.len())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Non-owning favorites handle.
#[derive(Clone, Debug, Default)]
pub struct WeakFavoritesStore {
    inner: Weak<FavoritesInner>,
}

impl WeakFavoritesStore {
    pub fn upgrade(&self) -> Option<FavoritesStore> {
        self.inner.upgrade().map(|inner| FavoritesStore { inner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use storefront_core::Price;

    fn test_product(id: u32) -> Product {
        Product::summary(
            ProductId::new(id),
            format!("Product {}", id),
            Price::from_cents(1000 + i64::from(id)),
            format!("https://fakestoreapi.com/img/{}.jpg", id),
        )
    }

    fn counting(store: &FavoritesStore) -> (Arc<AtomicUsize>, Subscription) {
        let count = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&count);
        let sub = store.subscribe(move |_| {
            sink.fetch_add(1, Ordering::SeqCst);
        });
        (count, sub)
    }

    #[test]
    fn test_add_twice_keeps_one_entry() {
        let store = FavoritesStore::new();
        let product = test_product(5);

        store.add_to_favorites(product.clone());
        assert!(store.is_favorite(ProductId::new(5)));

        store.add_to_favorites(product.clone());
        assert!(store.is_favorite(ProductId::new(5)));
        assert_eq!(store.items(), vec![product]);

        store.remove_from_favorites(ProductId::new(5));
        assert!(!store.is_favorite(ProductId::new(5)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_duplicate_add_does_not_notify() {
        let store = FavoritesStore::new();
        let (count, _sub) = counting(&store);

        store.add_to_favorites(test_product(1));
        store.add_to_favorites(test_product(1));

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let store = FavoritesStore::new();
        store.add_to_favorites(test_product(1));
        let (count, _sub) = counting(&store);

        store.remove_from_favorites(ProductId::new(99));

        assert_eq!(store.len(), 1);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        let store = FavoritesStore::new();
        store.add_to_favorites(test_product(1));
        store.add_to_favorites(test_product(2));
        let before = store.items();

        assert!(store.toggle_favorite(test_product(3)));
        assert!(!store.toggle_favorite(test_product(3)));
        assert_eq!(store.items(), before);

        assert!(!store.toggle_favorite(test_product(1)));
        assert!(store.toggle_favorite(test_product(1)));
        assert!(store.is_favorite(ProductId::new(1)));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_keeps_insertion_order() {
        let store = FavoritesStore::new();
        for id in [4, 2, 9] {
            store.add_to_favorites(test_product(id));
        }
        store.remove_from_favorites(ProductId::new(2));

        let ids: Vec<u32> = store.items().iter().map(|p| p.id.get()).collect();
        assert_eq!(ids, vec![4, 9]);
    }

    #[test]
    fn test_get_resolves_catalog_record() {
        let store = FavoritesStore::new();
        store.add_to_favorites(test_product(6));

        assert_eq!(store.get(ProductId::new(6)), Some(test_product(6)));
        assert_eq!(store.get(ProductId::new(7)), None);
    }

    #[test]
    fn test_subscriber_reads_fresh_membership() {
        let store = FavoritesStore::new();
        let reader = store.clone();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = store.subscribe(move |event| {
            sink.lock()
                .unwrap()
                .push(reader.is_favorite(event.product_id()));
        });

        store.toggle_favorite(test_product(1));
        store.toggle_favorite(test_product(1));

        assert_eq!(*seen.lock().unwrap(), vec![true, false]);
    }

    #[test]
    fn test_favorites_set_invariant() {
        let mut favorites = Favorites::new();
        assert!(favorites.insert(test_product(1)));
        assert!(!favorites.insert(test_product(1)));
        assert_eq!(favorites.toggle(test_product(2)), FavoritesEvent::Added(ProductId::new(2)));
        assert_eq!(favorites.toggle(test_product(1)), FavoritesEvent::Removed(ProductId::new(1)));
        assert_eq!(favorites.len(), 1);
        assert!(favorites.get(ProductId::new(1)).is_none());
    }

    #[test]
    fn test_with_favorites_may_call_back_into_store() {
        let store = FavoritesStore::new();
        store.add_to_favorites(test_product(1));

        let toggled = store.with_favorites(|favorites| {
            favorites
                .items()
                .first()
                .map(|product| store.toggle_favorite(product.clone()))
        });

        assert_eq!(toggled, Some(false));
        assert!(store.is_empty());
    }
}
