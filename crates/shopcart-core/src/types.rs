//! # Domain Types
//!
//! Identifier and extension-data types shared by cart items and the cart.
//!
//! ## Dual-Key Identity Pattern
//! Every cart line has:
//! - `row_id`: UUID v4 - immutable, the key of the line inside the cart
//! - `id`: the caller's product id - several lines may point at one product

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

// =============================================================================
// Row Id
// =============================================================================

/// Unique key of a line item inside a cart.
///
/// ## Why UUID?
/// Row ids are generated without looking at the cart they will land in.
/// A bounded random integer can collide once carts are large or long-lived;
/// a v4 UUID cannot in practice, so two `add` calls never overwrite each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(Uuid);

impl RowId {
    /// Generates a fresh row id.
    pub fn new() -> Self {
        RowId(Uuid::new_v4())
    }

    #[inline]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        RowId(uuid)
    }

    #[inline]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RowId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RowId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(RowId)
    }
}

impl From<Uuid> for RowId {
    fn from(uuid: Uuid) -> Self {
        RowId(uuid)
    }
}

// =============================================================================
// Options
// =============================================================================

/// Free-form extension data attached to a line item (size, colour, ...).
///
/// Values are JSON values so anything a host stores survives the session
/// round trip unchanged.
pub type Options = BTreeMap<String, Value>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_ids_are_unique() {
        let a = RowId::new();
        let b = RowId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_row_id_parse_display() {
        let id = RowId::new();
        let parsed: RowId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-row".parse::<RowId>().is_err());
    }

    #[test]
    fn test_row_id_serializes_as_string() {
        let id = RowId::new();
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, Value::String(id.to_string()));
    }
}
