//! Parsing of key/value fields shared by the handlers

use std::str::FromStr;

use rust_decimal::Decimal;
use sha2::{Digest, Sha256};

use crate::domain::errors::ProtocolError;

/// Largest supported number of token decimals
pub const MAX_DECIMALS: u32 = 18;

/// `value × 10^decimals`, `None` on overflow
pub fn scale(value: Decimal, decimals: u32) -> Option<Decimal> {
    let factor = Decimal::from(10u64.checked_pow(decimals)?);
    value.checked_mul(factor).map(|v| v.normalize())
}

fn parse_decimal(field: &'static str, value: &str) -> Result<Decimal, ProtocolError> {
    Decimal::from_str(value.trim())
        .map_err(|_| ProtocolError::invalid(field, format!("'{}' is not a number", value)))
}

/// Positive whole number, e.g. a supply
pub fn parse_positive_integer(field: &'static str, value: &str) -> Result<Decimal, ProtocolError> {
    let number = parse_decimal(field, value)?.normalize();
    if number <= Decimal::ZERO || number.scale() != 0 {
        return Err(ProtocolError::invalid(field, "must be a positive integer"));
    }
    Ok(number)
}

/// Human amount with at most `decimals` fractional digits, scaled to smallest units
pub fn parse_amount(field: &'static str, value: &str, decimals: u32) -> Result<Decimal, ProtocolError> {
    let amount = parse_decimal(field, value)?.normalize();
    if amount <= Decimal::ZERO {
        return Err(ProtocolError::invalid(field, "must be positive"));
    }
    if amount.scale() > decimals {
        return Err(ProtocolError::invalid(
            field,
            format!("more than {} fractional digits", decimals),
        ));
    }
    scale(amount, decimals).ok_or_else(|| ProtocolError::invalid(field, "amount overflows"))
}

/// Positive decimal number such as a price
pub fn parse_positive_decimal(field: &'static str, value: &str) -> Result<Decimal, ProtocolError> {
    let number = parse_decimal(field, value)?.normalize();
    if number <= Decimal::ZERO {
        return Err(ProtocolError::invalid(field, "must be positive"));
    }
    Ok(number)
}

/// Fraction in `(0, 1]`
pub fn parse_fraction(field: &'static str, value: &str) -> Result<Decimal, ProtocolError> {
    let number = parse_decimal(field, value)?.normalize();
    if number <= Decimal::ZERO || number > Decimal::ONE {
        return Err(ProtocolError::invalid(field, "must be in (0, 1]"));
    }
    Ok(number)
}

pub fn parse_i64(field: &'static str, value: &str) -> Result<i64, ProtocolError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| ProtocolError::invalid(field, format!("'{}' is not an integer", value)))
}

/// Bech32 account address on this chain
pub fn validate_address(field: &'static str, value: &str) -> Result<String, ProtocolError> {
    bech32::decode(value)
        .map_err(|e| ProtocolError::invalid(field, format!("invalid address: {}", e)))?;
    Ok(value.to_string())
}

/// Lower-case hex sha256 of content bytes
pub fn content_hash(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

/// Lower-case 64 character hex digest
pub fn parse_content_hash(field: &'static str, value: &str) -> Result<String, ProtocolError> {
    let hash = value.trim().to_lowercase();
    if hash.len() != 64 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ProtocolError::invalid(field, "must be a sha256 hex digest"));
    }
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_supply() {
        let supply = parse_positive_integer("sup", "21000000").unwrap();
        assert_eq!(
            scale(supply, 6).unwrap(),
            Decimal::from(21_000_000u64 * 1_000_000)
        );
    }

    #[test]
    fn scale_overflow_is_reported() {
        let huge = Decimal::from_str("79228162514264337593543950335").unwrap();
        assert!(scale(huge, 18).is_none());
        assert!(scale(Decimal::ONE, 20).is_none());
    }

    #[test]
    fn amounts_respect_decimals() {
        assert_eq!(parse_amount("amt", "1.5", 6).unwrap(), Decimal::from(1_500_000));
        assert_eq!(parse_amount("amt", "2.000", 0).unwrap(), Decimal::from(2));
        assert!(parse_amount("amt", "1.5", 0).is_err());
        assert!(parse_amount("amt", "0", 6).is_err());
        assert!(parse_amount("amt", "-3", 6).is_err());
        assert!(parse_amount("amt", "abc", 6).is_err());
    }

    #[test]
    fn integers_and_fractions() {
        assert!(parse_positive_integer("sup", "1.5").is_err());
        assert!(parse_positive_integer("sup", "0").is_err());
        assert_eq!(parse_fraction("mindep", "0.25").unwrap(), Decimal::new(25, 2));
        assert!(parse_fraction("mindep", "1.01").is_err());
        assert!(parse_fraction("mindep", "0").is_err());
    }

    #[test]
    fn content_hashes() {
        assert_eq!(
            content_hash(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert!(parse_content_hash("h", "BA7816BF8F01CFEA414140DE5DAE2223B00361A396177A9CB410FF61F20015AD").is_ok());
        assert!(parse_content_hash("h", "xyz").is_err());
    }
}
