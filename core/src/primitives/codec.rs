//! Text codec bridge: hex, Base58Check, Base32.

use crate::error::{Error, Result};

/// Encodes `data` as lowercase hex.
pub fn hex_encode(data: &[u8]) -> String {
    hex::encode(data)
}

/// Decodes a hex string, rejecting odd length or non-hex characters.
pub fn hex_decode(s: &str) -> Result<Vec<u8>> {
    hex::decode(s).map_err(|e| Error::invalid_argument(format!("invalid hex: {e}")))
}

/// Encodes `data` with a trailing 4-byte double-SHA256 checksum, Base58.
pub fn base58check_encode(data: &[u8]) -> String {
    bs58::encode(data).with_check().into_string()
}

/// Decodes a Base58Check string, verifying and stripping the checksum.
pub fn base58check_decode(s: &str) -> Result<Vec<u8>> {
    bs58::decode(s)
        .with_check(None)
        .into_vec()
        .map_err(|e| Error::invalid_argument(format!("invalid base58check: {e}")))
}

/// Encodes `data` plain Base58 (no checksum), used for signature text forms.
pub fn base58_encode(data: &[u8]) -> String {
    bs58::encode(data).into_string()
}

/// Decodes a plain Base58 string (no checksum).
pub fn base58_decode(s: &str) -> Result<Vec<u8>> {
    bs58::decode(s)
        .into_vec()
        .map_err(|e| Error::invalid_argument(format!("invalid base58: {e}")))
}

/// Encodes `data` as RFC 4648 Base32 (upper-case, no padding trimmed).
pub fn base32_encode(data: &[u8]) -> String {
    base32::encode(base32::Alphabet::Rfc4648 { padding: true }, data)
}

/// Decodes an RFC 4648 Base32 string.
pub fn base32_decode(s: &str) -> Result<Vec<u8>> {
    base32::decode(base32::Alphabet::Rfc4648 { padding: true }, s)
        .ok_or_else(|| Error::invalid_argument("invalid base32"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trips() {
        let data = [0u8, 1, 2, 255];
        assert_eq!(hex_decode(&hex_encode(&data)).unwrap(), data);
    }

    #[test]
    fn base58check_round_trips() {
        let data = b"hello world";
        let encoded = base58check_encode(data);
        assert_eq!(base58check_decode(&encoded).unwrap(), data);
    }

    #[test]
    fn base58check_rejects_corrupted_checksum() {
        let data = b"hello world";
        let mut encoded = base58check_encode(data);
        encoded.push('1');
        assert!(base58check_decode(&encoded).is_err());
    }

    #[test]
    fn base32_round_trips() {
        let data = [1u8, 2, 3, 4, 5];
        let encoded = base32_encode(&data);
        assert_eq!(base32_decode(&encoded).unwrap(), data);
    }
}
