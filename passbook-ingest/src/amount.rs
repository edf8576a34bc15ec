//! Fixed-point parsing of statement amounts and balances.

use rust_decimal::Decimal;

use crate::error::FieldErrorKind;
use crate::layout::NumberFormat;
use crate::types::Sign;

/// Fraction digits every amount and balance must carry.
pub const SCALE: u32 = 2;

/// True if the token is made only of digits, separators and `+`/`-`, with at least one digit.
pub fn looks_numeric(token: &str, numbers: &NumberFormat) -> bool {
    token.chars().any(|c| c.is_ascii_digit())
        && token.chars().all(|c| {
            c.is_ascii_digit()
                || c == numbers.decimal_separator
                || c == numbers.thousands_separator
                || c == '+'
                || c == '-'
        })
}

/// Split an attached `+`/`-` prefix or suffix off an amount token.
pub fn split_sign(token: &str) -> Result<(&str, Option<Sign>), FieldErrorKind> {
    let marker = |c: char| match c {
        '+' => Some(Sign::Credit),
        '-' => Some(Sign::Debit),
        _ => None,
    };

    let mut body = token;
    let mut prefix = None;
    let mut suffix = None;
    if let Some(first) = body.chars().next().and_then(marker) {
        prefix = Some(first);
        body = &body[1..];
    }
    if let Some(last) = body.chars().last().and_then(marker) {
        suffix = Some(last);
        body = &body[..body.len() - 1];
    }

    match (prefix, suffix) {
        (Some(_), Some(_)) => Err(FieldErrorKind::MalformedNumber {
            token: token.to_string(),
            problem: "sign marker on both ends",
        }),
        (sign, None) | (None, sign) => Ok((body, sign)),
    }
}

/// Parse an unsigned amount: thousands separators stripped, exactly one
/// decimal separator, exactly two fraction digits.
pub fn parse_fixed_point(token: &str, numbers: &NumberFormat) -> Result<Decimal, FieldErrorKind> {
    let malformed = |problem: &'static str| FieldErrorKind::MalformedNumber {
        token: token.to_string(),
        problem,
    };

    let mut parts = token.split(numbers.decimal_separator);
    let int_part = parts.next().unwrap_or_default();
    let frac_part = parts.next().ok_or_else(|| malformed("missing decimal separator"))?;
    if parts.next().is_some() {
        return Err(malformed("more than one decimal separator"));
    }
    if frac_part.len() != SCALE as usize || !frac_part.chars().all(|c| c.is_ascii_digit()) {
        return Err(malformed("expected exactly two fraction digits"));
    }

    let digits: String = int_part
        .chars()
        .filter(|&c| c != numbers.thousands_separator)
        .collect();
    if digits.is_empty() {
        return Err(malformed("missing integer digits"));
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(malformed("unexpected character"));
    }

    let mantissa: i128 = format!("{digits}{frac_part}")
        .parse()
        .map_err(|_| malformed("out of range"))?;
    Decimal::try_from_i128_with_scale(mantissa, SCALE).map_err(|_| malformed("out of range"))
}
