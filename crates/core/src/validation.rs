//! Request-payload validation helpers shared by the HTTP layer.
//!
//! Validation happens before any store call so that a rejected request
//! leaves no partial effect.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Returns true if `code` has the shape of an approval code: exactly six
/// ASCII digits.
///
/// Shape and value are checked separately on purpose — a malformed code is a
/// validation failure (400), a well-formed but wrong code is an
/// authorization failure (401).
#[must_use]
pub fn is_valid_approval_code(code: &str) -> bool {
    code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit())
}

/// Parses a strictly positive decimal amount from its string form.
///
/// Returns `None` for unparseable, zero, or negative input.
#[must_use]
pub fn parse_positive_amount(raw: &str) -> Option<Decimal> {
    let amount = Decimal::from_str(raw.trim()).ok()?;
    if amount > Decimal::ZERO {
        Some(amount)
    } else {
        None
    }
}

/// Parses a non-negative decimal amount from its string form.
///
/// Like [`parse_positive_amount`] but admits zero, for conversion endpoints
/// where `$0` is a valid query.
#[must_use]
pub fn parse_non_negative_amount(raw: &str) -> Option<Decimal> {
    let amount = Decimal::from_str(raw.trim()).ok()?;
    if amount >= Decimal::ZERO {
        Some(amount)
    } else {
        None
    }
}
