//! Ethereum address derivation and text form.

use wallet_core::primitives::hash::keccak256;
use wallet_core::{Error, Result};

/// Keccak-256 of the 64-byte uncompressed public key (no `0x04` prefix),
/// last 20 bytes, rendered as `0x` + lowercase hex.
pub fn derive_address(public_key_uncompressed: &[u8; 65]) -> [u8; 20] {
    let digest = keccak256(&public_key_uncompressed[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&digest[12..]);
    address
}

pub fn format_address(address: &[u8; 20]) -> String {
    format!("0x{}", hex::encode(address))
}

pub fn parse_address(text: &str) -> Result<[u8; 20]> {
    let hex_part = text.strip_prefix("0x").unwrap_or(text);
    let bytes = hex::decode(hex_part).map_err(|_| Error::invalid_address(text))?;
    if bytes.len() != 20 {
        return Err(Error::invalid_address(format!("{text}: expected 20 bytes")));
    }
    let mut out = [0u8; 20];
    out.copy_from_slice(&bytes);
    Ok(out)
}

pub fn is_valid_address(text: &str) -> bool {
    parse_address(text).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_and_parse_round_trip() {
        let address = [0xABu8; 20];
        let text = format_address(&address);
        assert_eq!(parse_address(&text).unwrap(), address);
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(parse_address("0x1234").is_err());
    }
}
