//! Decoding of German formatted amounts such as `+ 1.234,56` or `- 50,00`.
//!
//! Two text extraction artifacts are healed before decoding: a period in
//! place of the decimal comma, and a missing space after the sign.

use regex::Regex;
use rust_decimal::Decimal;
use std::borrow::Cow;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

static AMOUNT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?P<sign>[+-]) )?(?P<int>\d{1,3}(?:\.\d{3})+|\d+),(?P<frac>\d{1,2})$")
        .expect("valid amount regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{token}' is not a valid amount")]
pub struct AmountFormatError {
    pub token: String,
}

/// Insert the space between a leading sign and the digits if it is missing.
pub fn repair_sign_spacing(token: &str) -> Cow<'_, str> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(sign @ ('+' | '-')), Some(c)) if c != ' ' => Cow::Owned(format!("{sign} {}", &token[1..])),
        _ => Cow::Borrowed(token),
    }
}

/// Replace a period found exactly three characters from the end with a comma.
pub fn repair_decimal_separator(token: &str) -> Cow<'_, str> {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() >= 3 && chars[chars.len() - 3] == '.' {
        let mut repaired = chars;
        let index = repaired.len() - 3;
        repaired[index] = ',';
        Cow::Owned(repaired.into_iter().collect())
    } else {
        Cow::Borrowed(token)
    }
}

/// Decode a signed German amount. Tokens without a sign are positive.
pub fn decode_amount(token: &str) -> Result<Decimal, AmountFormatError> {
    let trimmed = token.trim();
    let spaced = repair_sign_spacing(trimmed);
    let normalized = repair_decimal_separator(&spaced);

    let err = || AmountFormatError {
        token: token.to_string(),
    };

    let caps = AMOUNT_PATTERN.captures(&normalized).ok_or_else(err)?;
    let digits = format!("{}.{}", caps["int"].replace('.', ""), &caps["frac"]);
    let value = Decimal::from_str(&digits).map_err(|_| err())?;

    match caps.name("sign").map(|m| m.as_str()) {
        Some("-") => Ok(-value),
        _ => Ok(value),
    }
}

/// Encode `value` the way statements print it, e.g. `- 1.234,50`.
pub fn encode_amount(value: Decimal) -> String {
    let sign = if value.is_sign_negative() && !value.is_zero() { '-' } else { '+' };
    let rounded = value.abs().round_dp(2);
    let plain = format!("{rounded:.2}");
    let (int, frac) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    format!("{sign} {grouped},{frac}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    #[test]
    fn test_decodes_signed_grouped_amounts() {
        assert_eq!(decode_amount("+ 1.000,00").unwrap(), dec(100000));
        assert_eq!(decode_amount("- 50,00").unwrap(), dec(-5000));
        assert_eq!(decode_amount("- 1.234.567,89").unwrap(), dec(-123456789));
        assert_eq!(decode_amount("12,5").unwrap(), Decimal::new(125, 1));
        assert_eq!(decode_amount("0,00").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_heals_missing_space_after_sign() {
        assert_eq!(decode_amount("-50,00").unwrap(), dec(-5000));
        assert_eq!(decode_amount("+1.000,00").unwrap(), dec(100000));
    }

    #[test]
    fn test_heals_period_instead_of_comma() {
        assert_eq!(decode_amount("- 50.00").unwrap(), dec(-5000));
        assert_eq!(decode_amount("+ 1.234.56").unwrap(), dec(123456));
        assert_eq!(decode_amount("-1.234.56").unwrap(), dec(-123456));
    }

    #[test]
    fn test_rejects_malformed_tokens() {
        for token in ["", "+", "abc", "+ 1.000", "1,234,56", "- 12.34,56", "1,000", "+  5,00"] {
            let err = decode_amount(token).unwrap_err();
            assert_eq!(err.token, token);
        }
    }

    #[test]
    fn test_repairs_are_noops_on_clean_tokens() {
        for token in ["+ 1.000,00", "- 50,00", "0,01", "123.456,78"] {
            assert!(matches!(repair_decimal_separator(token), Cow::Borrowed(_)));
            assert!(matches!(repair_sign_spacing(token), Cow::Borrowed(_)));
        }
    }

    #[test]
    fn test_repairs_are_idempotent() {
        for token in ["-50.00", "+1.000.00", "- 3,50", "7.25"] {
            let once = repair_decimal_separator(&repair_sign_spacing(token)).into_owned();
            let twice = repair_decimal_separator(&repair_sign_spacing(&once)).into_owned();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_encode_decode_round_trip() {
        for cents in [0, 1, -1, 99, 100, -5000, 100000, 123456789, -99999999999] {
            let value = dec(cents);
            let encoded = encode_amount(value);
            assert_eq!(decode_amount(&encoded).unwrap(), value, "{encoded}");
        }
        assert_eq!(encode_amount(dec(-123456)), "- 1.234,56");
        assert_eq!(encode_amount(dec(100000)), "+ 1.000,00");
    }
}
