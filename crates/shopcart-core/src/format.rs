//! # Number Formatting
//!
//! Rounding and grouped-thousands formatting for cart totals.
//!
//! ## Why Pre-Rounding?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE BINARY FRACTION PROBLEM                                            │
//! │                                                                         │
//! │    1.005 is stored as 1.00499999999999989...                            │
//! │    1.005 × 100 = 100.49999999999999     → naive round → 1.00  ❌        │
//! │                                                                         │
//! │  OUR SOLUTION: round the scaled value to 15 significant digits first   │
//! │    100.49999999999999 → 100.500000000000 → half up → 1.01  ✅           │
//! │                                                                         │
//! │  15 digits is what an f64 can carry reliably, so no real value is moved │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use shopcart_core::format::{number_format, round, RoundMode};
//!
//! assert_eq!(number_format(1295.0, 2, ".", ","), "1,295.00");
//! assert_eq!(number_format(1234567.891, 2, ",", "."), "1.234.567,89");
//! assert_eq!(round(2.5, 0, RoundMode::HalfEven), 2.0);
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Rounding
// =============================================================================

/// How a value exactly halfway between two candidates is rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RoundMode {
    /// Away from zero: 1.5 → 2, -1.5 → -2.
    #[default]
    HalfUp,
    /// Towards zero: 1.5 → 1, -1.5 → -1.
    HalfDown,
    /// To the even neighbour: 1.5 → 2, 2.5 → 2.
    HalfEven,
    /// To the odd neighbour: 1.5 → 1, 2.5 → 3.
    HalfOdd,
}

/// Rounds `value` to `precision` decimal digits.
///
/// Negative precision rounds left of the decimal point
/// (`round(1250.0, -2, HalfUp) == 1300.0`). Non-finite input is returned
/// unchanged.
pub fn round(value: f64, precision: i32, mode: RoundMode) -> f64 {
    if !value.is_finite() || value == 0.0 {
        return value;
    }

    let factor = 10f64.powi(precision.abs());
    let scaled = if precision >= 0 {
        value * factor
    } else {
        value / factor
    };
    if !scaled.is_finite() {
        return value;
    }

    let rounded = round_half(pre_round(scaled), mode);
    let result = if precision >= 0 {
        rounded / factor
    } else {
        rounded * factor
    };

    if result.is_finite() {
        result
    } else {
        value
    }
}

/// Rounds to 15 significant digits.
fn pre_round(value: f64) -> f64 {
    format!("{value:.14e}").parse().unwrap_or(value)
}

fn round_half(value: f64, mode: RoundMode) -> f64 {
    let magnitude = value.abs();
    let base = magnitude.floor();
    let fraction = magnitude - base;

    let rounded = if fraction > 0.5 {
        base + 1.0
    } else if fraction < 0.5 {
        base
    } else {
        let base_is_even = base % 2.0 == 0.0;
        match mode {
            RoundMode::HalfUp => base + 1.0,
            RoundMode::HalfDown => base,
            RoundMode::HalfEven if base_is_even => base,
            RoundMode::HalfEven => base + 1.0,
            RoundMode::HalfOdd if base_is_even => base + 1.0,
            RoundMode::HalfOdd => base,
        }
    };

    rounded.copysign(value)
}

// =============================================================================
// Number Formatting
// =============================================================================

/// Most decimal digits `number_format` will print; an `f64` carries no more.
pub const MAX_DECIMALS: u32 = 15;

/// Formats a number with grouped thousands.
///
/// ## Rules
/// - Rounded half up to `decimals` digits
/// - Integer part grouped by three with `thousands_separator`
/// - `decimal_separator` is only emitted when `decimals > 0`
/// - `decimals` above [`MAX_DECIMALS`] is clamped
/// - A value that rounds to zero never carries a minus sign
///
/// ## Example
/// ```rust
/// use shopcart_core::format::number_format;
///
/// assert_eq!(number_format(922.8595, 2, ".", ","), "922.86");
/// assert_eq!(number_format(-1234.5, 0, ".", " "), "-1 235");
/// assert_eq!(number_format(-0.001, 2, ".", ","), "0.00");
/// ```
pub fn number_format(
    value: f64,
    decimals: u32,
    decimal_separator: &str,
    thousands_separator: &str,
) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let decimals = decimals.min(MAX_DECIMALS);
    let rounded = round(value, decimals as i32, RoundMode::HalfUp);
    let digits = format!("{:.*}", decimals as usize, rounded.abs());
    let (integer, fraction) = match digits.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (digits.as_str(), None),
    };

    let is_zero = digits.chars().all(|c| c == '0' || c == '.');
    let capacity = digits.len() + digits.len() / 3 * thousands_separator.len() + 1;
    let mut out = String::with_capacity(capacity);
    if rounded < 0.0 && !is_zero {
        out.push('-');
    }
    out.push_str(&group_thousands(integer, thousands_separator));
    if let Some(fraction) = fraction {
        out.push_str(decimal_separator);
        out.push_str(fraction);
    }
    out
}

fn group_thousands(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}

// =============================================================================
// Format Settings
// =============================================================================

/// Default number format applied to cart totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NumberFormat {
    /// Digits after the decimal separator.
    #[serde(default = "default_decimals")]
    pub decimals: u32,

    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: String,

    #[serde(default = "default_thousands_separator")]
    pub thousands_separator: String,
}

fn default_decimals() -> u32 {
    2
}

fn default_decimal_separator() -> String {
    ".".to_string()
}

fn default_thousands_separator() -> String {
    ",".to_string()
}

impl Default for NumberFormat {
    fn default() -> Self {
        NumberFormat {
            decimals: default_decimals(),
            decimal_separator: default_decimal_separator(),
            thousands_separator: default_thousands_separator(),
        }
    }
}

impl NumberFormat {
    /// Formats `value` with these settings.
    pub fn format(&self, value: f64) -> String {
        number_format(
            value,
            self.decimals,
            &self.decimal_separator,
            &self.thousands_separator,
        )
    }

    /// Returns these settings with the given per-call overrides applied.
    pub fn with_overrides(&self, overrides: &NumberFormatOverrides) -> NumberFormat {
        NumberFormat {
            decimals: overrides.decimals.unwrap_or(self.decimals),
            decimal_separator: overrides
                .decimal_separator
                .clone()
                .unwrap_or_else(|| self.decimal_separator.clone()),
            thousands_separator: overrides
                .thousands_separator
                .clone()
                .unwrap_or_else(|| self.thousands_separator.clone()),
        }
    }
}

/// Per-call overrides for [`NumberFormat`]. `None` keeps the configured value.
///
/// `Some(0)` decimals and `Some("")` separators are honoured as given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberFormatOverrides {
    pub decimals: Option<u32>,
    pub decimal_separator: Option<String>,
    pub thousands_separator: Option<String>,
}

impl NumberFormatOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decimals(mut self, decimals: u32) -> Self {
        self.decimals = Some(decimals);
        self
    }

    pub fn decimal_separator(mut self, separator: impl Into<String>) -> Self {
        self.decimal_separator = Some(separator.into());
        self
    }

    pub fn thousands_separator(mut self, separator: impl Into<String>) -> Self {
        self.thousands_separator = Some(separator.into());
        self
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
