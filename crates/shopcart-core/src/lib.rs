//! # shopcart-core: Pure Cart Item Logic
//!
//! This crate holds everything about a single cart line that does not need a
//! session, an event bus or a config file.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        shopcart Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Host web framework                              │   │
//! │  │     routes ──► controllers ──► session ──► event listeners      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               shopcart (CartManager)                            │   │
//! │  │   load from session ─► mutate ─► persist ─► dispatch event      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ shopcart-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   item    │  │ validation│  │  format   │  │   types   │  │   │
//! │  │   │ CartItem  │  │ rule table│  │ rounding  │  │  RowId    │  │   │
//! │  │   │ totals    │  │ Validator │  │ grouping  │  │  Options  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO SESSION • NO EVENTS • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`item`] - `CartItem` and its derived totals
//! - [`validation`] - Field rules and the `Validator` seam
//! - [`format`] - Rounding modes and grouped-thousands formatting
//! - [`types`] - Row ids and the options bag
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use shopcart_core::{CartItem, NumberFormat};
//!
//! let mut item = CartItem::make(3, "Pants", 3, 30.0, Some(7.25)).unwrap();
//! item.process();
//!
//! assert_eq!(NumberFormat::default().format(item.totals().total_price), "96.53");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod format;
pub mod item;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use format::{
    number_format, round, NumberFormat, NumberFormatOverrides, RoundMode, MAX_DECIMALS,
};
pub use item::{CartItem, LineTotals};
pub use types::{Options, RowId};
pub use validation::{RuleValidator, ValidationOutcome, Validator};
