//! Multi-view behaviour through the public API.

use std::sync::{Arc, Mutex};

use storefront_core::{Price, Product, ProductId};
use storefront_state::{ShopState, View};

fn product(id: u32, cents: i64) -> Product {
    Product::summary(
        ProductId::new(id),
        format!("Product {}", id),
        Price::from_cents(cents),
        format!("https://fakestoreapi.com/img/{}.jpg", id),
    )
}

/// Header badge: remembers the last cart count it rendered.
#[derive(Default)]
struct CartBadge {
    count: Mutex<usize>,
}

impl View for CartBadge {
    fn render(&self, state: &ShopState) {
        *self.count.lock().unwrap() = state.cart().len();
    }
}

/// Cart screen: remembers the rows and total it rendered.
#[derive(Default)]
struct CartScreen {
    rows: Mutex<Vec<String>>,
    total: Mutex<String>,
}

impl View for CartScreen {
    fn render(&self, state: &ShopState) {
        *self.rows.lock().unwrap() = state.cart().entries().iter().map(|e| e.key()).collect();
        *self.total.lock().unwrap() = state.cart().total().to_string();
    }
}

/// Product detail: remembers whether the heart is filled.
struct DetailHeart {
    id: ProductId,
    filled: Mutex<bool>,
}

impl View for DetailHeart {
    fn render(&self, state: &ShopState) {
        *self.filled.lock().unwrap() = state.favorites().is_favorite(self.id);
    }
}

#[test]
fn test_badge_and_list_never_disagree() {
    let state = ShopState::new();
    let badge = Arc::new(CartBadge::default());
    let screen = Arc::new(CartScreen::default());
    let _badge = state.mount(Arc::clone(&badge));
    let _screen = state.mount(Arc::clone(&screen));

    let list_view = state.clone();
    list_view.cart().add_to_cart(product(1, 999));
    assert_eq!(*badge.count.lock().unwrap(), screen.rows.lock().unwrap().len());

    list_view.cart().add_to_cart(product(1, 999));
    assert_eq!(*badge.count.lock().unwrap(), 2);
    assert_eq!(
        *screen.rows.lock().unwrap(),
        vec!["1-0".to_string(), "1-1".to_string()]
    );
    assert_eq!(*screen.total.lock().unwrap(), "$19.98");

    state.cart().remove_from_cart(0);
    assert_eq!(*badge.count.lock().unwrap(), 1);
    assert_eq!(*screen.rows.lock().unwrap(), vec!["1-0".to_string()]);
    assert_eq!(*screen.total.lock().unwrap(), "$9.99");
}

#[test]
fn test_second_view_reads_new_entry_without_refresh() {
    let state = ShopState::new();
    let detail_view = state.clone();
    let cart_view = state.clone();

    detail_view.cart().add_to_cart(product(3, 550));

    let items = cart_view.cart().items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, ProductId::new(3));
}

#[test]
fn test_stale_index_from_previous_render_is_harmless() {
    let state = ShopState::new();
    state.cart().add_to_cart(product(1, 100));
    state.cart().add_to_cart(product(2, 200));

    let rendered = state.cart().entries();
    let last = rendered.last().map(|e| e.index).unwrap();

    // Another view removes a row before this one reacts.
    state.cart().remove_from_cart(0);
    state.cart().remove_from_cart(last);

    assert_eq!(state.cart().len(), 1);
    assert_eq!(state.cart().exact_total(), Price::from_cents(200));
}

#[test]
fn test_favorites_scenario_across_views() {
    let state = ShopState::new();
    let heart = Arc::new(DetailHeart {
        id: ProductId::new(5),
        filled: Mutex::new(false),
    });
    let _heart = state.mount(Arc::clone(&heart));

    let favorites_screen = state.clone();
    state.favorites().add_to_favorites(product(5, 69500));
    assert!(*heart.filled.lock().unwrap());

    state.favorites().add_to_favorites(product(5, 69500));
    assert_eq!(favorites_screen.favorites().len(), 1);

    favorites_screen.favorites().remove_from_favorites(ProductId::new(5));
    assert!(!*heart.filled.lock().unwrap());
    assert!(!state.favorites().is_favorite(ProductId::new(5)));
}

#[test]
fn test_unmounting_releases_every_subscription() {
    let state = ShopState::new();
    let mounted: Vec<_> = (0..10)
        .map(|_| state.mount(Arc::new(CartBadge::default())))
        .collect();
    assert_eq!(state.cart().subscriber_count(), 10);
    assert_eq!(state.favorites().subscriber_count(), 10);

    drop(mounted);

    assert_eq!(state.cart().subscriber_count(), 0);
    assert_eq!(state.favorites().subscriber_count(), 0);
}
