//! # Cart Item
//!
//! One line of a cart: a product reference, quantity, unit price, tax rate
//! and free-form options, plus the totals derived from them.
//!
//! ## Derived Totals
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Line Item Math                                       │
//! │                                                                         │
//! │  quantity × price ─────────────► subTotal                               │
//! │                                      │                                  │
//! │                     subTotal × tax/100 ─────► totalTax                  │
//! │                                      │            │                     │
//! │                                      └─────┬──────┘                     │
//! │                                            ▼                            │
//! │                                  totalPrice = subTotal + totalTax       │
//! │                                                                         │
//! │  Getters compute fresh. The stored copies (`totals()`) are only         │
//! │  refreshed by `process()`, which the cart manager calls on add/update.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Tax Policy
//! A line whose tax is still `None` is taxed at 0%. The cart manager fills
//! in the configured default before it processes a line, so this only shows
//! up when an item is used on its own.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::format::{round, RoundMode};
use crate::types::{Options, RowId};
use crate::validation::{self, Record, Validator, CART_ITEM_RULES};

// =============================================================================
// Line Totals
// =============================================================================

/// Totals captured by the last [`CartItem::process`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineTotals {
    #[serde(default)]
    pub sub_total: f64,
    #[serde(default)]
    pub total_tax: f64,
    #[serde(default)]
    pub total_price: f64,
}

// =============================================================================
// Cart Item
// =============================================================================

/// A line item in the cart.
///
/// `row_id` is fixed at construction; everything else is public and may be
/// changed before handing the item back to the cart manager's `update`,
/// which validates it again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[ts(as = "String")]
    row_id: RowId,

    /// Caller's product id.
    pub id: i64,

    /// Display name, 3 to 255 characters.
    pub name: String,

    /// Units on this line, at least 1.
    pub quantity: i64,

    /// Unit price.
    pub price: f64,

    /// Tax percentage (8.25 = 8.25%). `None` until defaulted.
    pub tax: Option<f64>,

    #[serde(default)]
    #[ts(type = "Record<string, unknown>")]
    options: Options,

    #[serde(flatten)]
    totals: LineTotals,
}

impl CartItem {
    /// Creates a validated cart item with a fresh row id.
    ///
    /// ## Example
    /// ```rust
    /// use shopcart_core::CartItem;
    ///
    /// let item = CartItem::make(1, "Socks", 12, 10.0, None).unwrap();
    /// assert_eq!(item.sub_total(), 120.0);
    ///
    /// assert!(CartItem::make(1, "", 1, 1.0, None).is_err());
    /// assert!(CartItem::make(1, "Test Item", 0, 1.0, None).is_err());
    /// ```
    pub fn make(
        id: i64,
        name: impl Into<String>,
        quantity: i64,
        price: f64,
        tax: Option<f64>,
    ) -> CoreResult<Self> {
        Self::make_with_options(id, name, quantity, price, tax, Options::new())
    }

    /// Like [`CartItem::make`], with options attached up front.
    pub fn make_with_options(
        id: i64,
        name: impl Into<String>,
        quantity: i64,
        price: f64,
        tax: Option<f64>,
        options: Options,
    ) -> CoreResult<Self> {
        let name = name.into();
        Self::validate(id, &name, quantity, price, tax)?;

        Ok(CartItem {
            row_id: RowId::new(),
            id,
            name,
            quantity,
            price,
            tax,
            options,
            totals: LineTotals::default(),
        })
    }

    /// Replaces the options bag.
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    /// Validates raw field values against the cart item rules.
    ///
    /// Returns the first failing rule as [`CoreError::InvalidItem`].
    pub fn validate(
        id: i64,
        name: &str,
        quantity: i64,
        price: f64,
        tax: Option<f64>,
    ) -> CoreResult<()> {
        let record = build_record(id, name, quantity, price, tax);
        validation::validate_record(&record)?;
        Ok(())
    }

    /// Validates this item's current field values with the given validator.
    pub fn validate_with<V: Validator + ?Sized>(&self, validator: &V) -> CoreResult<()> {
        validator
            .validate(&self.to_record(), CART_ITEM_RULES)
            .into_result()?;
        Ok(())
    }

    /// Validates a single named field.
    ///
    /// ## Example
    /// ```rust
    /// use serde_json::json;
    /// use shopcart_core::CartItem;
    ///
    /// assert!(CartItem::validate_field("price", &json!(9.99)).is_ok());
    /// assert!(CartItem::validate_field("sku", &json!("ABC")).is_err());
    /// ```
    pub fn validate_field(name: &str, value: &Value) -> CoreResult<()> {
        validation::validate_field(name, value)?;
        Ok(())
    }

    /// The validated fields as a record.
    ///
    /// Non-finite floats are kept as their text form (`"NaN"`, `"inf"`), so
    /// they fail the `numeric` rule instead of passing as absent.
    pub fn to_record(&self) -> Record {
        build_record(self.id, &self.name, self.quantity, self.price, self.tax)
    }

    // -------------------------------------------------------------------------
    // Identity
    // -------------------------------------------------------------------------

    #[inline]
    pub fn row_id(&self) -> RowId {
        self.row_id
    }

    // -------------------------------------------------------------------------
    // Totals
    // -------------------------------------------------------------------------

    /// Recomputes and stores subtotal, tax and total price.
    pub fn process(&mut self) {
        self.totals = LineTotals {
            sub_total: self.sub_total(),
            total_tax: self.total_tax(),
            total_price: self.total_price(),
        };
    }

    /// Fails when any stored total is NaN or infinite.
    ///
    /// Run after [`CartItem::process`]; the cart manager refuses to persist
    /// such a line.
    pub fn ensure_finite_totals(&self) -> CoreResult<()> {
        let LineTotals {
            sub_total,
            total_tax,
            total_price,
        } = self.totals;

        if sub_total.is_finite() && total_tax.is_finite() && total_price.is_finite() {
            Ok(())
        } else {
            Err(CoreError::NonFiniteTotal {
                row_id: self.row_id.to_string(),
            })
        }
    }

    /// Totals as of the last [`CartItem::process`] call.
    #[inline]
    pub fn totals(&self) -> &LineTotals {
        &self.totals
    }

    /// `quantity × price`.
    pub fn sub_total(&self) -> f64 {
        self.quantity as f64 * self.price
    }

    /// `sub_total × tax / 100`, with a missing tax counted as 0.
    pub fn total_tax(&self) -> f64 {
        self.sub_total() * (self.tax_rate() / 100.0)
    }

    /// `sub_total + total_tax`.
    pub fn total_price(&self) -> f64 {
        self.sub_total() + self.total_tax()
    }

    /// The tax percentage used for calculations.
    #[inline]
    pub fn tax_rate(&self) -> f64 {
        self.tax.unwrap_or(0.0)
    }

    /// Sets `tax` to `default` if it has not been set yet.
    pub fn apply_default_tax(&mut self, default: f64) {
        if self.tax.is_none() {
            self.tax = Some(default);
        }
    }

    /// Derives the effective tax percentage back from the totals.
    ///
    /// `(total_price - sub_total) / sub_total × 100`, rounded to `precision`
    /// digits with `mode` when `round_result` is set.
    ///
    /// ## Errors
    /// [`CoreError::ZeroSubtotal`] when price or quantity is zero.
    ///
    /// ## Example
    /// ```rust
    /// use shopcart_core::{CartItem, RoundMode};
    ///
    /// let item = CartItem::make(1, "Socks", 1, 10.0, Some(6.25)).unwrap();
    /// let rate = item.calculated_tax_rate(true, 2, RoundMode::HalfUp).unwrap();
    /// assert_eq!(rate, 6.25);
    /// ```
    pub fn calculated_tax_rate(
        &self,
        round_result: bool,
        precision: i32,
        mode: RoundMode,
    ) -> CoreResult<f64> {
        let sub_total = self.sub_total();
        if sub_total == 0.0 || !sub_total.is_finite() {
            return Err(CoreError::ZeroSubtotal {
                row_id: self.row_id.to_string(),
            });
        }

        let rate = (self.total_price() - sub_total) / sub_total * 100.0;

        Ok(if round_result {
            round(rate, precision, mode)
        } else {
            rate
        })
    }

    // -------------------------------------------------------------------------
    // Options
    // -------------------------------------------------------------------------

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Inserts or overwrites an option, returning the previous value.
    pub fn set_option(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Option<Value> {
        self.options.insert(key.into(), value.into())
    }

    pub fn has_option(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    pub fn remove_option(&mut self, key: &str) -> Option<Value> {
        self.options.remove(key)
    }
}

fn build_record(id: i64, name: &str, quantity: i64, price: f64, tax: Option<f64>) -> Record {
    let mut record = Record::new();
    record.insert("id".into(), Value::from(id));
    record.insert("name".into(), Value::from(name));
    record.insert("quantity".into(), Value::from(quantity));
    record.insert("price".into(), float_value(price));
    record.insert("tax".into(), tax.map_or(Value::Null, float_value));
    record
}

fn float_value(value: f64) -> Value {
    if value.is_finite() {
        Value::from(value)
    } else {
        Value::from(value.to_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
