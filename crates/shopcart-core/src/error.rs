//! # Error Types
//!
//! Domain-specific error types for shopcart-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  shopcart-core errors (this file)                                      │
//! │  ├── CoreError        - Line item domain errors                        │
//! │  └── ValidationError  - Field rule failures                            │
//! │                                                                         │
//! │  shopcart errors (outer crate)                                         │
//! │  └── CartError        - Session, lookup and serialization failures     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CartError → host framework        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. The `Display` text of a `ValidationError` IS the user-facing message
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Line item errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A field failed its validation rule.
    ///
    /// ## When This Occurs
    /// - `CartItem::make` with a short name or zero quantity
    /// - `CartManager::update` after the caller mutated a field to a bad value
    /// - `CartItem::validate_field` with an unknown field name
    #[error("Invalid cart item: {0}")]
    InvalidItem(#[from] ValidationError),

    /// The effective tax rate cannot be derived because the subtotal is zero.
    ///
    /// ## When This Occurs
    /// - `calculated_tax_rate` on an item whose price or quantity is 0
    #[error("Cannot derive tax rate for row {row_id}: subtotal is zero")]
    ZeroSubtotal { row_id: String },

    /// A line total is NaN or infinite and cannot be stored.
    ///
    /// ## When This Occurs
    /// - `quantity × price` overflows `f64`
    /// - a public field was set to a non-finite value after `make`
    #[error("Line totals for row {row_id} are not finite numbers")]
    NonFiniteTotal { row_id: String },
}

impl CoreError {
    /// Returns the validation failure, if this is one.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            CoreError::InvalidItem(err) => Some(err),
            CoreError::ZeroSubtotal { .. } | CoreError::NonFiniteTotal { .. } => None,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Field rule failures.
///
/// The messages follow the wording hosts already show to shoppers
/// ("The name field is required."), so the first error of a failed
/// validation can be surfaced as-is.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing, null or blank.
    #[error("The {field} field is required.")]
    Required { field: String },

    /// Field is not a number or numeric string.
    #[error("The {field} field must be a number.")]
    NotNumeric { field: String },

    /// Field is not a string.
    #[error("The {field} field must be a string.")]
    NotString { field: String },

    /// String is shorter than allowed.
    #[error("The {field} field must be at least {min} characters.")]
    TooShort { field: String, min: usize },

    /// String is longer than allowed.
    #[error("The {field} field must not be greater than {max} characters.")]
    TooLong { field: String, max: usize },

    /// Number is below the allowed minimum.
    #[error("The {field} field must be at least {min}.")]
    BelowMinimum { field: String, min: f64 },

    /// Number is above the allowed maximum.
    #[error("The {field} field must not be greater than {max}.")]
    AboveMaximum { field: String, max: f64 },

    /// The field name has no rule attached to it.
    #[error("Invalid property name: {field}")]
    UnknownField { field: String },
}

impl ValidationError {
    /// Name of the field that failed.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::NotNumeric { field }
            | ValidationError::NotString { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::BelowMinimum { field, .. }
            | ValidationError::AboveMaximum { field, .. }
            | ValidationError::UnknownField { field } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
