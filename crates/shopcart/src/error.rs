//! # Cart Error Types
//!
//! Error types for cart manager operations.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Cart Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │     Domain      │  │     Lookup      │  │       Storage           │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Core           │  │  ItemNotFound   │  │  Session                │ │
//! │  │  (validation,   │  │  UnknownOperator│  │  Serialization          │ │
//! │  │   zero subtotal)│  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Every variant is raised before the session is written, so a failed    │
//! │  call leaves the stored cart untouched.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use shopcart_core::{CoreError, RowId};
use thiserror::Error;

/// Result type alias for cart operations.
pub type CartResult<T> = Result<T, CartError>;

/// Cart manager errors.
#[derive(Debug, Error)]
pub enum CartError {
    /// Line item validation or arithmetic failure.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// No line with this row id in the cart.
    ///
    /// ## When This Occurs
    /// - `get` / `remove` with an item that was never added
    /// - `remove` after `forget` cleared the session
    #[error("Cart item not found: {0}")]
    ItemNotFound(RowId),

    /// `where_` got an operator it does not understand.
    #[error("Unknown comparison operator: '{0}'")]
    UnknownOperator(String),

    /// The host session store failed.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// The cart could not be encoded as JSON.
    #[error("Cart serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CartError {
    /// True when the error is caller-fixable input (bad field, unknown row).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CartError::Core(_) | CartError::ItemNotFound(_) | CartError::UnknownOperator(_)
        )
    }
}

/// Session store failure, reported by [`crate::session::SessionStore`] impls.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The backing store could not be read or written.
    #[error("Session backend unavailable: {0}")]
    Unavailable(String),

    /// The stored value is not what the cart expects.
    ///
    /// ## When This Occurs
    /// - the value under the cart's key is not a map of row id to item
    /// - another writer stored a different shape under the same key
    #[error("Corrupt session value under '{key}': {reason}")]
    Corrupt { key: String, reason: String },
}

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

// =============================================================================
// Config Error
// =============================================================================

/// Configuration load/save failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid cart configuration: {0}")]
    Invalid(String),

    #[error("Failed to save config: {0}")]
    SaveFailed(String),

    #[error("Config file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config could not be encoded as TOML: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Result type alias for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;
    use shopcart_core::ValidationError;

    #[test]
    fn test_core_error_is_transparent() {
        let err: CartError = CoreError::from(ValidationError::Required {
            field: "name".into(),
        })
        .into();
        assert_eq!(err.to_string(), "Invalid cart item: The name field is required.");
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_not_found_message() {
        let row_id = RowId::new();
        let err = CartError::ItemNotFound(row_id);
        assert_eq!(err.to_string(), format!("Cart item not found: {row_id}"));
    }

    #[test]
    fn test_session_error_not_recoverable() {
        let err: CartError = SessionError::Unavailable("redis down".into()).into();
        assert!(!err.is_recoverable());
        assert_eq!(err.to_string(), "Session error: Session backend unavailable: redis down");
    }
}
