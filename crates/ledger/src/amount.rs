//! Arbitrary-precision monetary amounts.
//!
//! Balances, fees, transfer amounts, and vote weights are `BigInt` over
//! integer base units. The wire carries them as decimal strings to avoid
//! precision loss; native floating point never touches a monetary path.

use crate::error::{LedgerError, LedgerResult};
use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive};
use std::str::FromStr;

/// Parses a non-negative decimal-string amount from a wire field.
///
/// Rejects signs, decimal points, exponents, and empty strings: wire amounts
/// are plain base-unit integers.
pub fn parse_unsigned(field: &str, raw: &str) -> LedgerResult<BigInt> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LedgerError::construction(
            field,
            format!("expected unsigned decimal string, got {raw:?}"),
        ));
    }
    BigInt::from_str(raw)
        .map_err(|e| LedgerError::construction(field, e.to_string()))
}

/// Encodes an amount as the 8-byte little-endian word used in signable
/// bytes. Fails if the value is negative or wider than 64 bits.
pub fn to_u64_le(value: &BigInt) -> LedgerResult<[u8; 8]> {
    let word = value.to_u64().ok_or_else(|| {
        LedgerError::Arithmetic(format!("amount {value} does not fit in 8 bytes"))
    })?;
    Ok(word.to_le_bytes())
}

/// Returns true if `value` is negative.
pub fn is_negative(value: &BigInt) -> bool {
    value.is_negative()
}

/// Serde codec storing `BigInt` as a decimal string.
///
/// Signed on purpose: delegate vote weights may transit through negative
/// values even though balances never do.
pub mod decimal {
    use num_bigint::BigInt;
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(value: &BigInt, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigInt, D::Error> {
        let raw = String::deserialize(deserializer)?;
        BigInt::from_str(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    #[test]
    fn test_parse_unsigned_accepts_plain_integers() {
        assert_eq!(parse_unsigned("amount", "0").unwrap(), BigInt::from(0));
        assert_eq!(
            parse_unsigned("amount", "10000000000000000000000000").unwrap(),
            BigInt::from_str("10000000000000000000000000").unwrap()
        );
    }

    #[test]
    fn test_parse_unsigned_rejects_malformed_input() {
        for raw in ["", "-5", "+5", "1.5", "1e8", "12a", " 12"] {
            let err = parse_unsigned("fee", raw).unwrap_err();
            assert!(matches!(err, LedgerError::Construction { .. }), "{raw}");
        }
    }

    #[test]
    fn test_to_u64_le_layout() {
        let bytes = to_u64_le(&BigInt::from(0x0102030405060708u64)).unwrap();
        assert_eq!(bytes, [8, 7, 6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_to_u64_le_rejects_out_of_range() {
        assert!(to_u64_le(&BigInt::from(-1)).is_err());
        let wide = BigInt::from(u64::MAX) + 1;
        assert!(to_u64_le(&wide).is_err());
    }
}
