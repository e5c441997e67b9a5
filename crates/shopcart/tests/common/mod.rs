//! Shared fixtures for the cart integration tests.

#![allow(dead_code)]

use shopcart::{CartItem, CartManager, MemorySession, RecordingDispatcher, ShopCartConfig};
use tracing_subscriber::EnvFilter;

pub type TestCart = CartManager<MemorySession, RecordingDispatcher>;

/// Installs a test-writer subscriber once per binary. `RUST_LOG=shopcart=debug`
/// shows the manager's logs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Empty cart with a zero default tax and a handle on its event buffer.
pub fn empty_cart() -> (TestCart, RecordingDispatcher) {
    init_tracing();
    let events = RecordingDispatcher::new();
    let cart = CartManager::new(
        MemorySession::new(),
        events.clone(),
        ShopCartConfig::default().with_default_tax(0.0),
    );
    (cart, events)
}

pub struct Stocked {
    pub cart: TestCart,
    pub events: RecordingDispatcher,
    pub socks: CartItem,
    pub shoes: CartItem,
    pub pants: CartItem,
    pub shirts: CartItem,
    pub shades: CartItem,
}

/// Five-line cart: socks (no tax), shoes, pants, shirts and shades.
pub fn stocked_cart() -> Stocked {
    let (mut cart, events) = empty_cart();

    let mut add = |id, name: &str, quantity, price, tax| {
        cart.add(CartItem::make(id, name, quantity, price, tax).unwrap())
            .unwrap()
    };

    let socks = add(1, "Socks", 12, 10.00, None);
    let shoes = add(2, "Shoes", 2, 119.95, Some(8.25));
    let pants = add(3, "Pants", 3, 30.00, Some(7.25));
    let shirts = add(4, "Shirts", 5, 40.00, Some(5.30));
    let shades = add(5, "Shades", 1, 99.95, Some(6.25));

    events.clear();

    Stocked {
        cart,
        events,
        socks,
        shoes,
        pants,
        shirts,
        shades,
    }
}
