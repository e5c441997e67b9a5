//! # Cart Manager
//!
//! Session-backed cart operations.
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Mutating Operation Flow                              │
//! │                                                                         │
//! │  add / update / remove / forget                                         │
//! │       │                                                                 │
//! │       ├── 1. validate input (update) / look up row (remove)             │
//! │       ├── 2. load cart from session (absent ⇒ empty)                    │
//! │       ├── 3. apply change, recompute line totals                        │
//! │       ├── 4. persist whole cart under the session key                   │
//! │       └── 5. dispatch shopcart.<action> event                           │
//! │                                                                         │
//! │  Any error in 1-4 returns before the session is written and before     │
//! │  anything is dispatched.                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use shopcart::{CartItem, CartManager, MemorySession, NullDispatcher, ShopCartConfig};
//!
//! let config = ShopCartConfig::default();
//! let mut cart = CartManager::new(MemorySession::new(), NullDispatcher, config);
//!
//! let socks = cart.add(CartItem::make(1, "Socks", 2, 10.0, Some(0.0)).unwrap()).unwrap();
//! assert!(cart.has(&socks.row_id()).unwrap());
//! assert_eq!(cart.total("price").unwrap(), "20.00");
//! ```

use std::fmt;

use serde_json::{Map, Value};
use shopcart_core::{CartItem, NumberFormatOverrides, RowId, RuleValidator, Validator};
use tracing::debug;

use crate::cart::Cart;
use crate::config::ShopCartConfig;
use crate::error::{CartError, CartResult, SessionError};
use crate::events::{CartAction, CartEvent, EventDispatcher};
use crate::query::{field_value, Operator};
use crate::session::SessionStore;

// =============================================================================
// Total Property
// =============================================================================

/// Which per-line value `total` sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TotalProperty {
    /// Σ totalTax
    Tax,
    /// Σ totalPrice
    #[default]
    Price,
    /// Σ subTotal
    Subtotal,
    /// Σ quantity
    Quantity,
}

impl TotalProperty {
    pub fn as_str(&self) -> &'static str {
        match self {
            TotalProperty::Tax => "tax",
            TotalProperty::Price => "price",
            TotalProperty::Subtotal => "subtotal",
            TotalProperty::Quantity => "quantity",
        }
    }

    fn of(&self, item: &CartItem) -> f64 {
        match self {
            TotalProperty::Tax => item.totals().total_tax,
            TotalProperty::Price => item.totals().total_price,
            TotalProperty::Subtotal => item.totals().sub_total,
            TotalProperty::Quantity => item.quantity as f64,
        }
    }
}

/// Names are matched exactly; anything else falls back to
/// [`TotalProperty::Price`].
impl From<&str> for TotalProperty {
    fn from(name: &str) -> Self {
        match name {
            "tax" => TotalProperty::Tax,
            "subtotal" => TotalProperty::Subtotal,
            "quantity" => TotalProperty::Quantity,
            _ => TotalProperty::Price,
        }
    }
}

impl fmt::Display for TotalProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Cart Manager
// =============================================================================

/// Cart operations over a host session.
///
/// Holds no items itself: every call reads the cart stored under
/// `config.session_key`, and mutating calls write it back.
pub struct CartManager<S, D, V = RuleValidator> {
    session: S,
    events: D,
    validator: V,
    config: ShopCartConfig,
}

impl<S, D> CartManager<S, D, RuleValidator>
where
    S: SessionStore,
    D: EventDispatcher,
{
    pub fn new(session: S, events: D, config: ShopCartConfig) -> Self {
        CartManager {
            session,
            events,
            validator: RuleValidator,
            config,
        }
    }
}

impl<S, D, V> CartManager<S, D, V>
where
    S: SessionStore,
    D: EventDispatcher,
    V: Validator,
{
    /// Replaces the validator used by `update`.
    pub fn with_validator<W: Validator>(self, validator: W) -> CartManager<S, D, W> {
        CartManager {
            session: self.session,
            events: self.events,
            validator,
            config: self.config,
        }
    }

    pub fn config(&self) -> &ShopCartConfig {
        &self.config
    }

    pub fn session_key(&self) -> &str {
        &self.config.session_key
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn into_session(self) -> S {
        self.session
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// All lines in insertion order.
    pub fn all(&self) -> CartResult<Cart> {
        self.load()
    }

    /// All lines as `(row id, item)` pairs.
    pub fn all_keyed(&self) -> CartResult<Vec<(RowId, CartItem)>> {
        Ok(self.load()?.keyed())
    }

    pub fn has(&self, row_id: &RowId) -> CartResult<bool> {
        Ok(self.load()?.has(row_id))
    }

    /// Gets a line by row id.
    pub fn get(&self, row_id: &RowId) -> CartResult<CartItem> {
        self.load()?
            .get(row_id)
            .cloned()
            .ok_or(CartError::ItemNotFound(*row_id))
    }

    /// Number of lines (not units).
    pub fn count(&self) -> CartResult<usize> {
        Ok(self.load()?.len())
    }

    /// Lines whose `key` field satisfies `<field> <operator> <value>`.
    ///
    /// See [`crate::query`] for key resolution and comparison rules.
    pub fn where_(&self, key: &str, operator: &str, value: impl Into<Value>) -> CartResult<Cart> {
        let operator: Operator = operator.parse()?;
        let value = value.into();

        let mut matched = Cart::new();
        for item in self.load()? {
            if operator.matches(&field_value(&item, key)?, &value) {
                matched.put(item);
            }
        }
        Ok(matched)
    }

    pub fn is_empty(&self) -> CartResult<bool> {
        Ok(self.load()?.is_empty())
    }

    pub fn is_not_empty(&self) -> CartResult<bool> {
        Ok(self.load()?.is_not_empty())
    }

    /// Sum of `property` over all lines, formatted with the configured
    /// number format.
    pub fn total(&self, property: impl Into<TotalProperty>) -> CartResult<String> {
        let sum = self.total_raw(property)?;
        Ok(self.config.number_format.format(sum))
    }

    /// Like [`total`](Self::total), with per-call format overrides.
    pub fn total_formatted(
        &self,
        property: impl Into<TotalProperty>,
        overrides: &NumberFormatOverrides,
    ) -> CartResult<String> {
        let sum = self.total_raw(property)?;
        Ok(self.config.number_format.with_overrides(overrides).format(sum))
    }

    /// Unformatted sum of `property` over all lines.
    pub fn total_raw(&self, property: impl Into<TotalProperty>) -> CartResult<f64> {
        let property = property.into();
        Ok(self.load()?.sum(|item| property.of(item)))
    }

    /// The cart as a JSON object string keyed by row id.
    pub fn to_json(&self) -> CartResult<String> {
        Ok(serde_json::to_string(&self.load()?)?)
    }

    /// The cart as a JSON object keyed by row id.
    pub fn to_array(&self) -> CartResult<Map<String, Value>> {
        Ok(self.load()?.to_map()?)
    }

    // -------------------------------------------------------------------------
    // Writes
    // -------------------------------------------------------------------------

    /// Adds a line. A missing tax rate takes the configured default.
    ///
    /// Adding an item whose row id is already in the cart replaces that
    /// line in place.
    pub fn add(&mut self, mut item: CartItem) -> CartResult<CartItem> {
        item.apply_default_tax(self.config.default_tax);
        item.process();
        item.ensure_finite_totals()?;

        debug!(
            row_id = %item.row_id(),
            session_key = %self.config.session_key,
            "Adding cart item"
        );

        let mut cart = self.load()?;
        cart.put(item.clone());
        self.persist(&cart)?;

        self.dispatch(CartAction::Add, Some(item.clone()));
        Ok(item)
    }

    /// Re-validates and stores a changed line.
    ///
    /// A row id that is not in the cart is inserted.
    pub fn update(&mut self, mut item: CartItem) -> CartResult<CartItem> {
        item.validate_with(&self.validator)?;
        item.process();
        item.ensure_finite_totals()?;

        debug!(
            row_id = %item.row_id(),
            session_key = %self.config.session_key,
            "Updating cart item"
        );

        let mut cart = self.load()?;
        if cart.put(item.clone()).is_none() {
            debug!(row_id = %item.row_id(), "Row not in cart, inserting");
        }
        self.persist(&cart)?;

        self.dispatch(CartAction::Update, Some(item.clone()));
        Ok(item)
    }

    /// Removes the line with `item`'s row id, returning the stored line.
    pub fn remove(&mut self, item: &CartItem) -> CartResult<CartItem> {
        self.remove_by_id(&item.row_id())
    }

    pub fn remove_by_id(&mut self, row_id: &RowId) -> CartResult<CartItem> {
        let mut cart = self.load()?;
        let removed = cart
            .forget(row_id)
            .ok_or(CartError::ItemNotFound(*row_id))?;

        debug!(
            row_id = %row_id,
            session_key = %self.config.session_key,
            "Removing cart item"
        );

        self.persist(&cart)?;

        self.dispatch(CartAction::Remove, Some(removed.clone()));
        Ok(removed)
    }

    /// Discards the whole cart.
    pub fn forget(&mut self) -> CartResult<()> {
        debug!(session_key = %self.config.session_key, "Forgetting cart");

        self.session.forget(&self.config.session_key)?;

        self.dispatch(CartAction::Forget, None);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Session plumbing
    // -------------------------------------------------------------------------

    fn load(&self) -> CartResult<Cart> {
        let key = &self.config.session_key;
        match self.session.get(key)? {
            None | Some(Value::Null) => Ok(Cart::new()),
            Some(value) => Cart::from_value(value).map_err(|e| {
                SessionError::Corrupt {
                    key: key.clone(),
                    reason: e.to_string(),
                }
                .into()
            }),
        }
    }

    fn persist(&mut self, cart: &Cart) -> CartResult<()> {
        let value = cart.to_value()?;
        self.session.put(&self.config.session_key, value)?;
        Ok(())
    }

    fn dispatch(&self, action: CartAction, item: Option<CartItem>) {
        let event = CartEvent::new(action, &self.config.session_key, item);
        self.events.dispatch(&event);
    }
}

impl<S, D, V> fmt::Debug for CartManager<S, D, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartManager")
            .field("session_key", &self.config.session_key)
            .finish_non_exhaustive()
    }
}
