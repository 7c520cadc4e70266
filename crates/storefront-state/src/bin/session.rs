//! # Session Walkthrough
//!
//! Drives the state core the way the mobile views do, printing what each
//! mounted view would show.
//!
//! ## Usage
//! ```bash
//! cargo run -p storefront-state --bin session
//!
//! # Simulate the Product Service being down
//! cargo run -p storefront-state --bin session -- --offline
//!
//! # See every store mutation
//! RUST_LOG=storefront_state=trace cargo run -p storefront-state --bin session
//! ```

use std::env;
use std::sync::Arc;

use storefront_core::ProductId;
use storefront_state::{
    init_tracing, load_product, load_products, InMemoryCatalog, ShopState, StorefrontConfig, View,
};
use tracing::info;

/// A trimmed copy of the public catalog's `/products` response.
const SAMPLE_CATALOG: &str = r#"[
    {
        "id": 1,
        "title": "Fjallraven - Foldsack No. 1 Backpack, Fits 15 Laptops",
        "price": 109.95,
        "description": "Your perfect pack for everyday use and walks in the forest.",
        "category": "men's clothing",
        "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg"
    },
    {
        "id": 2,
        "title": "Mens Casual Premium Slim Fit T-Shirts",
        "price": 22.3,
        "description": "Slim-fitting style, contrast raglan long sleeve.",
        "category": "men's clothing",
        "image": "https://fakestoreapi.com/img/71-3HjGNDUL._AC_SY879._SX._UX._SY._UY_.jpg"
    },
    {
        "id": 5,
        "title": "John Hardy Women's Legends Naga Gold & Silver Dragon Station Chain Bracelet",
        "price": 695,
        "description": "From our Legends Collection, the Naga was inspired by the mythical water dragon.",
        "category": "jewelery",
        "image": "https://fakestoreapi.com/img/71pWzhdJNwL._AC_UL640_QL65_ML3_.jpg"
    },
    {
        "id": 9,
        "title": "WD 2TB Elements Portable External Hard Drive - USB 3.0",
        "price": 64,
        "description": "USB 3.0 and USB 2.0 compatibility, fast data transfers.",
        "category": "electronics",
        "image": "https://fakestoreapi.com/img/61IBBVJvSDL._AC_SY879_.jpg"
    }
]"#;

/// The cart icon in the header.
struct CartBadge;

impl View for CartBadge {
    fn render(&self, state: &ShopState) {
        let badges = state.badges();
        println!(
            "  [header] cart: {}  favorites: {}",
            badges.cart_count, badges.favorites_count
        );
    }
}

/// The cart screen.
struct CartList {
    config: StorefrontConfig,
}

impl View for CartList {
    fn render(&self, state: &ShopState) {
        let entries = state.cart().entries();
        if entries.is_empty() {
            println!("  [cart] empty");
        }
        for entry in &entries {
            println!(
                "  [cart] #{} {} {}",
                entry.key(),
                entry.product.title,
                self.config.format_price(entry.product.price)
            );
        }
        println!(
            "  [cart] total: {}",
            self.config.format_price(state.cart().total())
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let offline = env::args().skip(1).any(|arg| arg == "--offline");
    let config = StorefrontConfig::from_env();
    info!(catalog = %config.products_url(), offline, "starting session");

    let catalog = if offline {
        InMemoryCatalog::unavailable("offline mode")
    } else {
        InMemoryCatalog::from_json(SAMPLE_CATALOG)?
    };

    println!("{}", config.store_name);
    println!("================================");

    let products = match load_products(&catalog).await.into_data() {
        Some(products) => products,
        None => {
            println!("Catalog unavailable, nothing to show.");
            return Ok(());
        }
    };

    for product in &products {
        println!("  {} {}", product.title, config.format_price(product.price));
    }
    println!();

    let state = ShopState::new();
    let _badge = state.mount(Arc::new(CartBadge));
    let cart_view = state.mount(Arc::new(CartList {
        config: config.clone(),
    }));

    println!("Add the backpack twice");
    if let Some(backpack) = load_product(&catalog, ProductId::new(1)).await.into_data() {
        state.cart().add_to_cart(backpack.clone());
        state.cart().add_to_cart(backpack);
    }

    println!("Favorite the bracelet, then move it to the cart");
    if let Some(bracelet) = products.iter().find(|p| p.id == ProductId::new(5)) {
        state.favorites().toggle_favorite(bracelet.clone());
        state.add_favorite_to_cart(bracelet.id);
    }

    println!("Remove the first row");
    state.cart().remove_from_cart(0);

    println!("Leave the cart screen and empty the cart");
    cart_view.unmount();
    state.cart().clear_cart();

    let totals = state.cart().totals();
    println!();
    println!(
        "Done: {} item(s), {}",
        totals.item_count,
        config.format_price(totals.total)
    );

    Ok(())
}
