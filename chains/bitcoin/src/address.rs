//! P2PKH address and script construction.

use wallet_core::primitives::codec::{base58check_decode, base58check_encode};
use wallet_core::primitives::hash::hash160;
use wallet_core::{BlockchainType, Error, Result};

/// Version byte for a P2PKH address, per network.
pub fn version_byte(blockchain_type: BlockchainType) -> u8 {
    if blockchain_type.is_mainnet() {
        0x00
    } else {
        0x6F
    }
}

/// `RIPEMD160(SHA256(pubkey))`, prefixed with the network version byte,
/// suffixed with a double-SHA256 checksum, and rendered in Base58.
pub fn derive_address(public_key_compressed: &[u8; 33], blockchain_type: BlockchainType) -> Result<String> {
    let hash = hash160(public_key_compressed);
    let mut payload = Vec::with_capacity(21);
    payload.push(version_byte(blockchain_type));
    payload.extend_from_slice(&hash);
    Ok(base58check_encode(&payload))
}

/// Strips the version byte and checksum from a Base58Check address,
/// returning the raw 20-byte hash160.
pub fn decode_address_hash(address: &str) -> Result<[u8; 20]> {
    let payload = base58check_decode(address).map_err(|_| Error::invalid_address(address))?;
    if payload.len() != 21 {
        return Err(Error::invalid_address(format!("{address}: wrong payload length")));
    }
    let mut hash = [0u8; 20];
    hash.copy_from_slice(&payload[1..]);
    Ok(hash)
}

pub fn is_valid_address(address: &str, blockchain_type: BlockchainType) -> bool {
    let Ok(payload) = base58check_decode(address) else { return false };
    payload.len() == 21 && payload[0] == version_byte(blockchain_type)
}

/// `OP_DUP OP_HASH160 <push 20> <hash160> OP_EQUALVERIFY OP_CHECKSIG`.
pub fn p2pkh_script(hash160: &[u8; 20]) -> Vec<u8> {
    let mut script = Vec::with_capacity(25);
    script.push(0x76); // OP_DUP
    script.push(0xA9); // OP_HASH160
    script.push(0x14); // push 20 bytes
    script.extend_from_slice(hash160);
    script.push(0x88); // OP_EQUALVERIFY
    script.push(0xAC); // OP_CHECKSIG
    script
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallet_core::Blockchain;

    #[test]
    fn address_round_trips_through_decode() {
        let pubkey = [2u8; 33];
        let blockchain_type = BlockchainType::mainnet(Blockchain::Bitcoin);
        let address = derive_address(&pubkey, blockchain_type).unwrap();
        let expected_hash = hash160(&pubkey);
        assert_eq!(decode_address_hash(&address).unwrap(), expected_hash);
        assert!(is_valid_address(&address, blockchain_type));
    }

    #[test]
    fn p2pkh_script_shape() {
        let hash = [0xABu8; 20];
        let script = p2pkh_script(&hash);
        assert_eq!(script[0], 0x76);
        assert_eq!(script[1], 0xA9);
        assert_eq!(script[2], 0x14);
        assert_eq!(&script[3..23], &hash[..]);
        assert_eq!(script[23], 0x88);
        assert_eq!(script[24], 0xAC);
    }
}
