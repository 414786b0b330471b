//! `EosName`: up to 13 characters from the 32-symbol EOS alphabet, packed
//! 5 bits per character (4 for the 13th) into a little-endian `u64`.

use wallet_core::{Error, Result};

const ALPHABET: &[u8] = b".12345abcdefghijklmnopqrstuvwxyz";

fn char_to_symbol(c: u8) -> Result<u8> {
    ALPHABET
        .iter()
        .position(|&b| b == c)
        .map(|pos| pos as u8)
        .ok_or_else(|| Error::invalid_address(format!("invalid EOS name character '{}'", c as char)))
}

fn symbol_to_char(symbol: u8) -> u8 {
    ALPHABET[symbol as usize]
}

/// A packed EOS name value. Construct with [`EosName::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EosName(u64);

impl EosName {
    pub fn parse(s: &str) -> Result<EosName> {
        if s.is_empty() || s.len() > 13 {
            return Err(Error::invalid_address(format!(
                "EOS name '{s}' must be 1 to 13 characters"
            )));
        }
        let bytes = s.as_bytes();
        let head_len = bytes.len().min(12);
        let mut value: u64 = 0;
        for (i, &b) in bytes[..head_len].iter().enumerate() {
            value |= (char_to_symbol(b)? as u64 & 0x1f) << (64 - 5 * (i as u64 + 1));
        }
        if bytes.len() == 13 {
            value |= char_to_symbol(bytes[12])? as u64 & 0x0f;
        }
        Ok(EosName(value))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }

    pub fn to_display_string(self) -> String {
        let mut chars = [b'.'; 13];
        let mut remaining = self.0;
        for i in 0..13 {
            let mask = if i == 0 { 0x0f } else { 0x1f };
            let symbol = (remaining & mask) as u8;
            chars[12 - i] = symbol_to_char(symbol);
            remaining >>= if i == 0 { 4 } else { 5 };
        }
        let text = String::from_utf8(chars.to_vec()).expect("alphabet is ASCII");
        text.trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_twelve_char_name() {
        let name = EosName::parse("eosio.token").unwrap();
        assert_eq!(name.to_display_string(), "eosio.token");
    }

    #[test]
    fn round_trips_short_name() {
        let name = EosName::parse("transfer").unwrap();
        assert_eq!(name.to_display_string(), "transfer");
    }

    #[test]
    fn rejects_uppercase_and_invalid_symbols() {
        assert!(EosName::parse("Transfer").is_err());
        assert!(EosName::parse("foo_bar").is_err());
    }

    #[test]
    fn rejects_too_long() {
        assert!(EosName::parse("toolongeosnamexx").is_err());
    }
}
