//! Arbitrary-precision signed integer.
//!
//! A thin newtype over [`num_bigint::BigInt`]. The underlying crate's
//! `FromStr` is more permissive than this type wants (it accepts a leading
//! `+`, for instance), so parsing and export rules live here rather than
//! being re-derived at every call site.

use crate::error::{Error, Result};
use num_bigint::{BigInt as Inner, Sign};
use num_traits::{Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BigInt(Inner);

impl BigInt {
    pub fn zero() -> Self {
        BigInt(Inner::zero())
    }

    /// Parses a decimal string. Rejects the empty string, surrounding or
    /// embedded whitespace, a leading `+`, and fractional values; a leading
    /// `-` is the only accepted sign marker.
    pub fn from_decimal_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::invalid_argument("empty decimal string"));
        }
        if s.chars().any(char::is_whitespace) {
            return Err(Error::invalid_argument("decimal string contains whitespace"));
        }
        let digits = s.strip_prefix('-').unwrap_or(s);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::invalid_argument(format!(
                "not a valid decimal integer: '{s}'"
            )));
        }
        let value = Inner::parse_bytes(s.as_bytes(), 10)
            .ok_or_else(|| Error::invalid_argument(format!("not a valid decimal integer: '{s}'")))?;
        Ok(BigInt(value))
    }

    /// Parses a `0x`-prefixed (or bare) hex string as an unsigned magnitude.
    pub fn from_hex_str(s: &str) -> Result<Self> {
        let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::invalid_argument(format!("not a valid hex integer: '{s}'")));
        }
        let value = Inner::parse_bytes(digits.as_bytes(), 16)
            .ok_or_else(|| Error::invalid_argument(format!("not a valid hex integer: '{s}'")))?;
        Ok(BigInt(value))
    }

    pub fn from_i64(value: i64) -> Self {
        BigInt(Inner::from(value))
    }

    pub fn from_u64(value: u64) -> Self {
        BigInt(Inner::from(value))
    }

    /// Constructs from a magnitude in big-endian byte order and an explicit
    /// sign; `negative = true` with an all-zero magnitude still yields zero.
    pub fn from_bytes_be(negative: bool, bytes: &[u8]) -> Self {
        let sign = if negative { Sign::Minus } else { Sign::Plus };
        let value = Inner::from_bytes_be(sign, bytes);
        BigInt(value)
    }

    pub fn from_bytes_le(negative: bool, bytes: &[u8]) -> Self {
        let sign = if negative { Sign::Minus } else { Sign::Plus };
        let value = Inner::from_bytes_le(sign, bytes);
        BigInt(value)
    }

    pub fn to_decimal_string(&self) -> String {
        self.0.to_string()
    }

    pub fn to_i64(&self) -> Result<i64> {
        self.0
            .to_i64()
            .ok_or_else(|| Error::out_of_range(format!("{} does not fit in i64", self.0)))
    }

    pub fn to_u64(&self) -> Result<u64> {
        if self.0.is_negative() {
            return Err(Error::out_of_range(format!("{} is negative", self.0)));
        }
        self.0
            .to_u64()
            .ok_or_else(|| Error::out_of_range(format!("{} does not fit in u64", self.0)))
    }

    /// Big-endian magnitude bytes (sign is not encoded).
    pub fn to_bytes_be(&self) -> Vec<u8> {
        self.0.to_bytes_be().1
    }

    /// Little-endian magnitude bytes (sign is not encoded).
    pub fn to_bytes_le(&self) -> Vec<u8> {
        self.0.to_bytes_le().1
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    pub fn add(&self, other: &BigInt) -> BigInt {
        BigInt(&self.0 + &other.0)
    }

    pub fn sub(&self, other: &BigInt) -> BigInt {
        BigInt(&self.0 - &other.0)
    }

    pub fn mul(&self, other: &BigInt) -> BigInt {
        BigInt(&self.0 * &other.0)
    }

    pub fn add_i64(&self, scalar: i64) -> BigInt {
        BigInt(&self.0 + Inner::from(scalar))
    }

    pub fn mul_i64(&self, scalar: i64) -> BigInt {
        BigInt(&self.0 * Inner::from(scalar))
    }
}

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialOrd for BigInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigInt {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_round_trips() {
        for s in ["0", "1", "-1", "123456789012345678901234567890", "-42"] {
            assert_eq!(BigInt::from_decimal_str(s).unwrap().to_decimal_string(), s);
        }
    }

    #[test]
    fn rejects_malformed_input() {
        for s in ["", " ", "1 2", "+1", "1.5", "abc", "-"] {
            assert!(BigInt::from_decimal_str(s).is_err(), "expected '{s}' to be rejected");
        }
    }

    #[test]
    fn i64_round_trip_and_range() {
        assert_eq!(BigInt::from_i64(-5).to_i64().unwrap(), -5);
        let too_big = BigInt::from_decimal_str("99999999999999999999999999").unwrap();
        assert!(too_big.to_i64().is_err());
    }

    #[test]
    fn u64_rejects_negative() {
        assert!(BigInt::from_i64(-1).to_u64().is_err());
        assert_eq!(BigInt::from_u64(7).to_u64().unwrap(), 7);
    }

    #[test]
    fn hex_parses_with_or_without_prefix() {
        assert_eq!(BigInt::from_hex_str("0x2a").unwrap().to_decimal_string(), "42");
        assert_eq!(BigInt::from_hex_str("2a").unwrap().to_decimal_string(), "42");
        assert!(BigInt::from_hex_str("0xzz").is_err());
    }

    #[test]
    fn byte_round_trip() {
        let value = BigInt::from_decimal_str("305419896").unwrap(); // 0x12345678
        assert_eq!(value.to_bytes_be(), vec![0x12, 0x34, 0x56, 0x78]);
        assert_eq!(BigInt::from_bytes_be(false, &[0x12, 0x34, 0x56, 0x78]), value);
    }

    #[test]
    fn arithmetic() {
        let a = BigInt::from_i64(10);
        let b = BigInt::from_i64(3);
        assert_eq!(a.add(&b).to_i64().unwrap(), 13);
        assert_eq!(a.sub(&b).to_i64().unwrap(), 7);
        assert_eq!(a.mul(&b).to_i64().unwrap(), 30);
    }
}
