//! STARK prime field element
//!
//! p = 2^251 + 17 * 2^192 + 1
//!
//! The assembler treats field elements as opaque containers for
//! instruction words and immediates. Values are stored in canonical
//! form: 0 ≤ value < p

use crate::error::SpecError;
use lazy_static::lazy_static;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{ToPrimitive, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Size of a serialized field element in bytes
pub const FELT_BYTES: usize = 32;

/// Big-endian bytes of p = 0x0800000000000011000000000000000000000000000000000000000000000001
pub const STARK_PRIME_BYTES: [u8; FELT_BYTES] = [
    0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x11,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01,
];

lazy_static! {
    /// The field modulus
    pub static ref STARK_PRIME: BigUint = BigUint::from_bytes_be(&STARK_PRIME_BYTES);

    /// (p - 1) / 2, the largest value rendered as non-negative
    static ref HALF_PRIME: BigUint = &*STARK_PRIME >> 1u32;
}

/// STARK field element
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Felt(BigUint);

impl Felt {
    pub fn zero() -> Self {
        Felt(BigUint::zero())
    }

    /// Create from an unsigned value that must already be below p
    pub fn from_biguint(value: BigUint) -> Result<Self, SpecError> {
        if value >= *STARK_PRIME {
            return Err(SpecError::LiteralOutOfRange(value.to_string()));
        }
        Ok(Felt(value))
    }

    /// Create from a signed integer literal.
    ///
    /// A negative literal `-v` maps to `p - v`. The magnitude must be
    /// below p in both cases: literals are never silently reduced.
    pub fn from_bigint(value: &BigInt) -> Result<Self, SpecError> {
        let magnitude = value.magnitude();
        if *magnitude >= *STARK_PRIME {
            return Err(SpecError::LiteralOutOfRange(value.to_string()));
        }

        if value.sign() == Sign::Minus {
            Ok(Felt(&*STARK_PRIME - magnitude))
        } else {
            Ok(Felt(magnitude.clone()))
        }
    }

    /// Parse a decimal literal with an optional sign
    pub fn from_dec_str(text: &str) -> Result<Self, SpecError> {
        let value = BigInt::from_str(text.trim())
            .map_err(|_| SpecError::InvalidLiteral(text.to_string()))?;
        Self::from_bigint(&value)
    }

    /// Parse a hexadecimal literal, with or without a `0x` prefix
    pub fn from_hex_str(text: &str) -> Result<Self, SpecError> {
        let digits = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .unwrap_or(text);
        let value = BigUint::parse_bytes(digits.as_bytes(), 16)
            .ok_or_else(|| SpecError::InvalidLiteral(text.to_string()))?;
        Self::from_biguint(value)
    }

    /// Decode a 32-byte big-endian element
    pub fn from_bytes_be(bytes: &[u8; FELT_BYTES]) -> Result<Self, SpecError> {
        let value = BigUint::from_bytes_be(bytes);
        if value >= *STARK_PRIME {
            return Err(SpecError::NonCanonicalElement(format!("{:#x}", value)));
        }
        Ok(Felt(value))
    }

    /// Encode as 32 big-endian bytes
    pub fn to_bytes_be(&self) -> [u8; FELT_BYTES] {
        let raw = self.0.to_bytes_be();
        let mut bytes = [0u8; FELT_BYTES];
        bytes[FELT_BYTES - raw.len()..].copy_from_slice(&raw);
        bytes
    }

    /// The canonical value, if it fits in 64 bits
    #[inline]
    pub fn to_u64(&self) -> Option<u64> {
        self.0.to_u64()
    }

    #[inline]
    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Render values above (p - 1) / 2 as negative numbers
    pub fn to_signed_string(&self) -> String {
        if self.0 > *HALF_PRIME {
            format!("-{}", &*STARK_PRIME - &self.0)
        } else {
            self.0.to_string()
        }
    }
}

impl Default for Felt {
    fn default() -> Self {
        Self::zero()
    }
}

// Conversions

impl From<u64> for Felt {
    #[inline]
    fn from(value: u64) -> Self {
        Felt(BigUint::from(value))
    }
}

impl FromStr for Felt {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_dec_str(s)
    }
}

// Display

impl fmt::Display for Felt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::LowerHex for Felt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

// Serde: `0x`-prefixed hex strings

impl Serialize for Felt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{:#x}", self.0))
    }
}

impl<'de> Deserialize<'de> for Felt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Felt::from_hex_str(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prime_value() {
        let expected = (BigUint::from(1u32) << 251u32)
            + (BigUint::from(17u32) << 192u32)
            + BigUint::from(1u32);
        assert_eq!(*STARK_PRIME, expected);
    }

    #[test]
    fn test_from_u64() {
        assert_eq!(Felt::from(5u64).to_u64(), Some(5));
        assert_eq!(Felt::from(u64::MAX).to_u64(), Some(u64::MAX));
        assert!(Felt::from(0u64).is_zero());
    }

    #[test]
    fn test_dec_literals() {
        assert_eq!(Felt::from_dec_str("150").unwrap(), Felt::from(150u64));
        assert_eq!(Felt::from_dec_str("-0").unwrap(), Felt::zero());

        let minus_one = Felt::from_dec_str("-1").unwrap();
        assert_eq!(*minus_one.as_biguint(), &*STARK_PRIME - 1u32);
    }

    #[test]
    fn test_literal_bounds() {
        let p = STARK_PRIME.to_string();
        let p_minus_one = (&*STARK_PRIME - 1u32).to_string();

        assert!(Felt::from_dec_str(&p_minus_one).is_ok());
        assert!(Felt::from_dec_str(&format!("-{}", p_minus_one)).is_ok());
        assert_eq!(
            Felt::from_dec_str(&p).unwrap_err(),
            SpecError::LiteralOutOfRange(p.clone())
        );
        assert!(matches!(
            Felt::from_dec_str(&format!("-{}", p)),
            Err(SpecError::LiteralOutOfRange(_))
        ));
    }

    #[test]
    fn test_invalid_literal() {
        assert!(matches!(Felt::from_dec_str("12a"), Err(SpecError::InvalidLiteral(_))));
        assert!(matches!(Felt::from_dec_str(""), Err(SpecError::InvalidLiteral(_))));
    }

    #[test]
    fn test_signed_string() {
        assert_eq!(Felt::from(7u64).to_signed_string(), "7");
        assert_eq!(Felt::from_dec_str("-7").unwrap().to_signed_string(), "-7");
    }

    #[test]
    fn test_bytes() {
        let felt = Felt::from(0x0102u64);
        let bytes = felt.to_bytes_be();
        assert_eq!(bytes[30], 0x01);
        assert_eq!(bytes[31], 0x02);
        assert_eq!(Felt::from_bytes_be(&bytes).unwrap(), felt);

        assert!(matches!(
            Felt::from_bytes_be(&STARK_PRIME_BYTES),
            Err(SpecError::NonCanonicalElement(_))
        ));
    }

    #[test]
    fn test_hex() {
        let felt = Felt::from(255u64);
        assert_eq!(format!("{:#x}", felt), "0xff");
        assert_eq!(Felt::from_hex_str("0xff").unwrap(), felt);
        assert_eq!(Felt::from_hex_str("FF").unwrap(), felt);
        assert!(Felt::from_hex_str("0xzz").is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let felt = Felt::from_dec_str("-3").unwrap();
        let bytes = bincode::serialize(&felt).unwrap();
        let back: Felt = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, felt);
    }
}
