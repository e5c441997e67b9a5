//! # Cart Queries
//!
//! Field lookup and comparison behind `CartManager::where_`.
//!
//! ## Field Resolution
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  key              resolves to                                           │
//! │  ───              ───────────                                           │
//! │  "totalPrice"     item field, as serialized                             │
//! │  "total_price"    same field, snake_case spelling                       │
//! │  "options.size"   option "size"                                         │
//! │  "size"           option "size" when no item field has that name       │
//! │  anything else    null                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Comparison
//! Loose operators (`=`, `==`, `!=`, `<>`, `<`, `>`, `<=`, `>=`) compare as
//! numbers when both sides are numbers or numeric strings, and as strings
//! otherwise. `null` and booleans compare by truthiness. Strict operators
//! (`===`, `!==`) require the same JSON type and value, so `1` and `1.0`
//! are not strictly equal.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use shopcart_core::validation::as_number;
use shopcart_core::CartItem;

use crate::error::{CartError, CartResult};

/// Comparison operator accepted by `where_`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    StrictEq,
    StrictNe,
    Lt,
    Gt,
    Le,
    Ge,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::StrictEq => "===",
            Operator::StrictNe => "!==",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Le => "<=",
            Operator::Ge => ">=",
        }
    }

    /// Applies the operator to `left <op> right`.
    pub fn matches(&self, left: &Value, right: &Value) -> bool {
        match self {
            Operator::Eq => loose_eq(left, right),
            Operator::Ne => !loose_eq(left, right),
            Operator::StrictEq => left == right,
            Operator::StrictNe => left != right,
            Operator::Lt => loose_cmp(left, right) == Some(Ordering::Less),
            Operator::Gt => loose_cmp(left, right) == Some(Ordering::Greater),
            Operator::Le => matches!(
                loose_cmp(left, right),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Operator::Ge => matches!(
                loose_cmp(left, right),
                Some(Ordering::Greater | Ordering::Equal)
            ),
        }
    }
}

impl FromStr for Operator {
    type Err = CartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "=" | "==" => Ok(Operator::Eq),
            "!=" | "<>" => Ok(Operator::Ne),
            "===" => Ok(Operator::StrictEq),
            "!==" => Ok(Operator::StrictNe),
            "<" => Ok(Operator::Lt),
            ">" => Ok(Operator::Gt),
            "<=" => Ok(Operator::Le),
            ">=" => Ok(Operator::Ge),
            other => Err(CartError::UnknownOperator(other.to_string())),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Field Lookup
// =============================================================================

/// Value of `key` on `item`, or `Value::Null` when it has no such field.
pub fn field_value(item: &CartItem, key: &str) -> CartResult<Value> {
    let record = serde_json::to_value(item)?;

    if let Some(option_key) = key.strip_prefix("options.") {
        return Ok(item.option(option_key).cloned().unwrap_or(Value::Null));
    }

    let found = record
        .get(key)
        .or_else(|| record.get(camel_case(key).as_str()))
        .or_else(|| item.option(key));

    Ok(found.cloned().unwrap_or(Value::Null))
}

fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for c in key.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

// =============================================================================
// Comparison
// =============================================================================

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn loose_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null | Value::Bool(_), _) | (_, Value::Null | Value::Bool(_)) => {
            truthy(left) == truthy(right)
        }
        _ => loose_cmp(left, right) == Some(Ordering::Equal) || left == right,
    }
}

fn loose_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    if let (Some(l), Some(r)) = (as_number(left), as_number(right)) {
        return l.partial_cmp(&r);
    }
    match (left, right) {
        (Value::Null | Value::Bool(_), _) | (_, Value::Null | Value::Bool(_)) => {
            Some(truthy(left).cmp(&truthy(right)))
        }
        _ => match (as_text(left), as_text(right)) {
            (Some(l), Some(r)) => Some(l.cmp(&r)),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn socks() -> CartItem {
        let mut item = CartItem::make(7, "Socks", 3, 10.0, Some(0.0)).unwrap();
        item.set_option("size", "L");
        item.process();
        item
    }

    #[test]
    fn test_parse_operators() {
        assert_eq!("=".parse::<Operator>().unwrap(), Operator::Eq);
        assert_eq!("==".parse::<Operator>().unwrap(), Operator::Eq);
        assert_eq!("<>".parse::<Operator>().unwrap(), Operator::Ne);
        assert_eq!("!==".parse::<Operator>().unwrap(), Operator::StrictNe);
        assert!(matches!(
            "~=".parse::<Operator>(),
            Err(CartError::UnknownOperator(op)) if op == "~="
        ));
    }

    #[test]
    fn test_field_resolution() {
        let item = socks();
        assert_eq!(field_value(&item, "name").unwrap(), json!("Socks"));
        assert_eq!(field_value(&item, "totalPrice").unwrap(), json!(30.0));
        assert_eq!(field_value(&item, "total_price").unwrap(), json!(30.0));
        assert_eq!(field_value(&item, "options.size").unwrap(), json!("L"));
        assert_eq!(field_value(&item, "size").unwrap(), json!("L"));
        assert_eq!(field_value(&item, "colour").unwrap(), Value::Null);
    }

    #[test]
    fn test_loose_comparison() {
        assert!(Operator::Eq.matches(&json!(3), &json!("3")));
        assert!(Operator::Eq.matches(&json!(30.0), &json!(30)));
        assert!(Operator::Ne.matches(&json!("Socks"), &json!("Shoes")));
        assert!(Operator::Gt.matches(&json!(10), &json!("9")));
        assert!(Operator::Eq.matches(&json!(" 10 "), &json!(10)));
        assert!(Operator::Lt.matches(&json!("apple"), &json!("banana")));
        assert!(Operator::Ge.matches(&json!(2), &json!(2.0)));
        assert!(Operator::Eq.matches(&Value::Null, &json!(0)));
        assert!(!Operator::Lt.matches(&json!([1]), &json!("a")));
    }

    #[test]
    fn test_strict_comparison() {
        assert!(Operator::StrictEq.matches(&json!("L"), &json!("L")));
        assert!(!Operator::StrictEq.matches(&json!(3), &json!("3")));
        assert!(!Operator::StrictEq.matches(&json!(1), &json!(1.0)));
        assert!(Operator::StrictNe.matches(&json!(3), &json!("3")));
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("sub_total"), "subTotal");
        assert_eq!(camel_case("row_id"), "rowId");
        assert_eq!(camel_case("name"), "name");
    }
}
