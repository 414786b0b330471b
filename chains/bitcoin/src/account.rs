//! WIF private-key encoding and the `AddressCodec` binding for Bitcoin.

use crate::address;
use wallet_core::primitives::codec::{base58check_decode, base58check_encode};
use wallet_core::{AddressCodec, BlockchainType, Error, Result};

fn wif_version_byte(blockchain_type: BlockchainType) -> u8 {
    if blockchain_type.is_mainnet() {
        0x80
    } else {
        0xEF
    }
}

/// Encodes a 32-byte private key as WIF, always in compressed-pubkey form
/// (trailing `0x01` suffix byte).
pub fn encode_wif(private_key: &[u8; 32], blockchain_type: BlockchainType) -> String {
    let mut payload = Vec::with_capacity(34);
    payload.push(wif_version_byte(blockchain_type));
    payload.extend_from_slice(private_key);
    payload.push(0x01);
    base58check_encode(&payload)
}

pub fn decode_wif(wif: &str) -> Result<[u8; 32]> {
    let payload = base58check_decode(wif).map_err(|_| Error::invalid_argument("invalid WIF"))?;
    if payload.len() != 34 || payload[33] != 0x01 {
        return Err(Error::invalid_argument("WIF does not encode a compressed key"));
    }
    let mut key = [0u8; 32];
    key.copy_from_slice(&payload[1..33]);
    Ok(key)
}

pub struct BitcoinCodec;

impl AddressCodec for BitcoinCodec {
    fn derive_address(public_key_compressed: &[u8; 33], blockchain_type: BlockchainType) -> Result<String> {
        address::derive_address(public_key_compressed, blockchain_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallet_core::Blockchain;

    #[test]
    fn wif_round_trips() {
        let key = [9u8; 32];
        let blockchain_type = BlockchainType::mainnet(Blockchain::Bitcoin);
        let wif = encode_wif(&key, blockchain_type);
        assert_eq!(decode_wif(&wif).unwrap(), key);
    }
}
