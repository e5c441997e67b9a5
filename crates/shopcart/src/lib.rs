//! # shopcart: Session-Backed Shopping Cart
//!
//! Keeps a shopping cart in the host application's session and publishes
//! lifecycle events when it changes.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        shopcart Architecture                            │
//! │                                                                         │
//! │   Host application                                                      │
//! │   ┌───────────────┐  ┌──────────────────┐  ┌───────────────────────┐   │
//! │   │ SessionStore  │  │ EventDispatcher  │  │ Validator (optional)  │   │
//! │   └───────┬───────┘  └────────┬─────────┘  └───────────┬───────────┘   │
//! │           │                   │                        │               │
//! │   ┌───────▼───────────────────▼────────────────────────▼───────────┐   │
//! │   │              ★ shopcart (THIS CRATE) ★                         │   │
//! │   │                                                                │   │
//! │   │   manager ──► cart (ordered rows) ──► query (where_)           │   │
//! │   │   config (default tax, number format, session key)             │   │
//! │   └───────────────────────────────┬────────────────────────────────┘   │
//! │                                   │                                    │
//! │   ┌───────────────────────────────▼────────────────────────────────┐   │
//! │   │   shopcart-core: CartItem, validation, rounding, formatting    │   │
//! │   └────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`manager`] - `CartManager`, the operations a host calls
//! - [`cart`] - Ordered row collection and its session encoding
//! - [`query`] - Field lookup and operators for `where_`
//! - [`session`] - `SessionStore` seam and an in-memory store
//! - [`events`] - Lifecycle events and dispatchers
//! - [`config`] - TOML/env configuration
//! - [`error`] - Error types
//!
//! ## Example Usage
//!
//! ```rust
//! use shopcart::{
//!     CartItem, CartManager, MemorySession, RecordingDispatcher, ShopCartConfig,
//! };
//!
//! let events = RecordingDispatcher::new();
//! let mut cart = CartManager::new(
//!     MemorySession::new(),
//!     events.clone(),
//!     ShopCartConfig::default().with_default_tax(0.0),
//! );
//!
//! let item = cart.add(CartItem::make(1, "Hat", 1, 1295.0, None).unwrap()).unwrap();
//! assert_eq!(cart.total("price").unwrap(), "1,295.00");
//!
//! cart.remove(&item).unwrap();
//! assert!(cart.is_empty().unwrap());
//! assert_eq!(events.events().len(), 2);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod config;
pub mod error;
pub mod events;
pub mod manager;
pub mod query;
pub mod session;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::Cart;
pub use config::ShopCartConfig;
pub use error::{CartError, CartResult, ConfigError, ConfigResult, SessionError, SessionResult};
pub use events::{
    CartAction, CartEvent, EventDispatcher, NullDispatcher, RecordingDispatcher,
    TracingDispatcher,
};
pub use manager::{CartManager, TotalProperty};
pub use query::Operator;
pub use session::{MemorySession, SessionStore};

pub use shopcart_core::{
    number_format, round, CartItem, CoreError, NumberFormat, NumberFormatOverrides, Options,
    RoundMode, RowId, RuleValidator, ValidationError, Validator,
};

/// Session key used when none is configured.
pub const DEFAULT_SESSION_KEY: &str = "shopcart.default";
