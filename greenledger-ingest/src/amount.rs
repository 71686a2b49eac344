//! Monetary token normalization.
//!
//! Accepts `-1,700.41`, `7,065.43`, `$12.00`, `-$5.00` and ungrouped forms
//! such as `2000.00` or a bare `123`. No rounding happens here.
//!
//! Tokens above [`MAX_INTEGER_DIGITS`] integer digits are rejected so sums and
//! factor products over a ledger stay inside `Decimal` range.

use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::error::{IngestError, IngestResult};

/// Up to 999 trillion before the decimal point.
pub const MAX_INTEGER_DIGITS: usize = 15;

fn unsigned_amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:\d{1,3}(?:,\d{3})*|\d+)(?:\.\d{1,2})?$").expect("amount regex")
    })
}

/// Parse a monetary token into an exact signed decimal.
pub fn normalize(token: &str) -> IngestResult<Decimal> {
    let malformed = || IngestError::MalformedAmount(token.to_string());

    let trimmed = token.trim();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let rest = rest.strip_prefix('$').unwrap_or(rest);
    // "$-12.00" puts the sign after the symbol
    let (negative, digits) = match rest.strip_prefix('-') {
        Some(after) if !negative => (true, after),
        _ => (negative, rest),
    };

    if !unsigned_amount_re().is_match(digits) {
        return Err(malformed());
    }
    let integer_digits = digits
        .split('.')
        .next()
        .unwrap_or_default()
        .bytes()
        .filter(u8::is_ascii_digit)
        .count();
    if integer_digits > MAX_INTEGER_DIGITS {
        return Err(malformed());
    }

    let plain = digits.replace(',', "");
    let value = Decimal::from_str(&plain).map_err(|_| malformed())?;
    Ok(if negative { -value } else { value })
}
