//! # Validation Module
//!
//! Rule-table validation for cart item fields.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Flow                                    │
//! │                                                                         │
//! │  CartItem fields ──► Record (JSON object) ──► Validator + rule table    │
//! │                                                   │                     │
//! │                                                   ▼                     │
//! │                                       ValidationOutcome (ordered)       │
//! │                                                   │                     │
//! │                         passes ◄──────────────────┴────► first error    │
//! │                                                          becomes the    │
//! │                                                          item error     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The rules are data ([`CART_ITEM_RULES`]) so a host can plug in its own
//! [`Validator`] and still evaluate the same table.
//!
//! ## Usage
//! ```rust
//! use serde_json::json;
//! use shopcart_core::validation::validate_field;
//!
//! assert!(validate_field("name", &json!("Socks")).is_ok());
//! assert!(validate_field("quantity", &json!(0)).is_err());
//! assert!(validate_field("colour", &json!("red")).is_err());
//! ```

use serde_json::{Map, Value};

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// A flat record of field name to value, the unit a [`Validator`] checks.
pub type Record = Map<String, Value>;

// =============================================================================
// Rules
// =============================================================================

/// A single validation rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rule {
    /// Value must be present and not null or blank.
    Required,
    /// Null or missing values skip the remaining rules.
    Nullable,
    /// Number, or a string that parses as one.
    Numeric,
    /// Must be a string.
    String,
    /// Minimum size: character count for strings, value for numerics.
    Min(f64),
    /// Maximum size: character count for strings, value for numerics.
    Max(f64),
}

/// The rules attached to one field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRules {
    pub field: &'static str,
    pub rules: &'static [Rule],
}

impl FieldRules {
    fn is_numeric(&self) -> bool {
        self.rules.contains(&Rule::Numeric)
    }

    fn is_nullable(&self) -> bool {
        self.rules.contains(&Rule::Nullable)
    }
}

/// Rule table for cart items.
///
/// | field    | rules                         |
/// |----------|-------------------------------|
/// | id       | required, numeric             |
/// | name     | required, string, min 3, max 255 |
/// | price    | required, numeric             |
/// | quantity | required, numeric, min 1      |
/// | tax      | nullable, numeric             |
pub const CART_ITEM_RULES: &[FieldRules] = &[
    FieldRules {
        field: "id",
        rules: &[Rule::Required, Rule::Numeric],
    },
    FieldRules {
        field: "name",
        rules: &[Rule::Required, Rule::String, Rule::Min(3.0), Rule::Max(255.0)],
    },
    FieldRules {
        field: "price",
        rules: &[Rule::Required, Rule::Numeric],
    },
    FieldRules {
        field: "quantity",
        rules: &[Rule::Required, Rule::Numeric, Rule::Min(1.0)],
    },
    FieldRules {
        field: "tax",
        rules: &[Rule::Nullable, Rule::Numeric],
    },
];

/// Looks up the rules for a cart item field.
pub fn rules_for(field: &str) -> Option<&'static FieldRules> {
    CART_ITEM_RULES.iter().find(|r| r.field == field)
}

// =============================================================================
// Validator
// =============================================================================

/// Ordered result of running a rule table against a record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationOutcome {
    errors: Vec<ValidationError>,
}

impl ValidationOutcome {
    pub fn passes(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn fails(&self) -> bool {
        !self.passes()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Human-readable messages, in rule-table order.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    pub fn first(&self) -> Option<&ValidationError> {
        self.errors.first()
    }

    /// Converts to a `Result`, keeping only the first error.
    pub fn into_result(self) -> ValidationResult<()> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl From<Vec<ValidationError>> for ValidationOutcome {
    fn from(errors: Vec<ValidationError>) -> Self {
        ValidationOutcome { errors }
    }
}

/// Checks a record against a rule table.
///
/// Hosts that already own a validation facility implement this trait and
/// hand it to the cart manager; [`RuleValidator`] is the built-in one.
pub trait Validator {
    fn validate(&self, record: &Record, rules: &[FieldRules]) -> ValidationOutcome;
}

/// Built-in validator evaluating [`Rule`]s in order.
///
/// Evaluation stops at the first failing rule of each field, but every field
/// in the table is checked, so the outcome lists at most one error per field.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleValidator;

impl Validator for RuleValidator {
    fn validate(&self, record: &Record, rules: &[FieldRules]) -> ValidationOutcome {
        let errors = rules
            .iter()
            .filter_map(|field_rules| {
                let value = record.get(field_rules.field).unwrap_or(&Value::Null);
                check_field(field_rules, value).err()
            })
            .collect::<Vec<_>>();

        ValidationOutcome::from(errors)
    }
}

impl<V: Validator + ?Sized> Validator for &V {
    fn validate(&self, record: &Record, rules: &[FieldRules]) -> ValidationOutcome {
        (**self).validate(record, rules)
    }
}

fn check_field(field_rules: &FieldRules, value: &Value) -> ValidationResult<()> {
    let field = field_rules.field;

    if is_missing(value) {
        if field_rules.rules.contains(&Rule::Required) {
            return Err(ValidationError::Required {
                field: field.to_string(),
            });
        }
        if field_rules.is_nullable() || value.is_null() {
            return Ok(());
        }
    }

    for rule in field_rules.rules {
        match *rule {
            Rule::Required | Rule::Nullable => {}
            Rule::Numeric => {
                if as_number(value).is_none() {
                    return Err(ValidationError::NotNumeric {
                        field: field.to_string(),
                    });
                }
            }
            Rule::String => {
                if !value.is_string() {
                    return Err(ValidationError::NotString {
                        field: field.to_string(),
                    });
                }
            }
            Rule::Min(min) => {
                if let Some(size) = size_of(value, field_rules.is_numeric()) {
                    if size < min {
                        return Err(size_error(field, value, min, true));
                    }
                }
            }
            Rule::Max(max) => {
                if let Some(size) = size_of(value, field_rules.is_numeric()) {
                    if size > max {
                        return Err(size_error(field, value, max, false));
                    }
                }
            }
        }
    }

    Ok(())
}

/// Null, blank strings and empty arrays count as missing.
fn is_missing(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(a) => a.is_empty(),
        _ => false,
    }
}

/// Numeric value of a JSON number or numeric string.
///
/// Strings that parse to NaN or infinity are not numeric.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

fn size_of(value: &Value, numeric: bool) -> Option<f64> {
    if numeric {
        if let Some(n) = as_number(value) {
            return Some(n);
        }
    }
    match value {
        Value::String(s) => Some(s.chars().count() as f64),
        Value::Array(a) => Some(a.len() as f64),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

fn size_error(field: &str, value: &Value, bound: f64, is_min: bool) -> ValidationError {
    let field = field.to_string();
    match (value.is_string(), is_min) {
        (true, true) => ValidationError::TooShort {
            field,
            min: bound as usize,
        },
        (true, false) => ValidationError::TooLong {
            field,
            max: bound as usize,
        },
        (false, true) => ValidationError::BelowMinimum { field, min: bound },
        (false, false) => ValidationError::AboveMaximum { field, max: bound },
    }
}

// =============================================================================
// Cart Item Helpers
// =============================================================================

/// Validates a full cart item record with the built-in rules.
pub fn validate_record(record: &Record) -> ValidationResult<()> {
    RuleValidator.validate(record, CART_ITEM_RULES).into_result()
}

/// Validates a single cart item field.
///
/// ## Rules
/// - `name` must be one of the fields in [`CART_ITEM_RULES`]
/// - `value` must satisfy that field's rules
pub fn validate_field(name: &str, value: &Value) -> ValidationResult<()> {
    let rules = rules_for(name).ok_or_else(|| ValidationError::UnknownField {
        field: name.to_string(),
    })?;

    let mut record = Record::new();
    record.insert(name.to_string(), value.clone());

    RuleValidator
        .validate(&record, std::slice::from_ref(rules))
        .into_result()
}

// =============================================================================
// Unit Tests
// =============================================================================
