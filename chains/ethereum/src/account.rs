use crate::address;
use wallet_core::{AddressCodec, BlockchainType, Result};

pub struct EthereumCodec;

impl AddressCodec for EthereumCodec {
    fn derive_address(public_key_compressed: &[u8; 33], _blockchain_type: BlockchainType) -> Result<String> {
        let secp = secp256k1::Secp256k1::verification_only();
        let public_key = secp256k1::PublicKey::from_slice(public_key_compressed)
            .map_err(|e| wallet_core::Error::invalid_argument(format!("invalid public key: {e}")))?;
        let uncompressed = public_key.serialize_uncompressed();
        Ok(address::format_address(&address::derive_address(&uncompressed)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallet_core::primitives::ecdsa;
    use wallet_core::Blockchain;

    #[test]
    fn derives_address_from_compressed_key() {
        let key = ecdsa::secret_key_from_bytes(&[5u8; 32]).unwrap();
        let compressed = ecdsa::public_key_compressed(&key);
        let address = EthereumCodec::derive_address(&compressed, BlockchainType::mainnet(Blockchain::Ethereum)).unwrap();
        assert!(address.starts_with("0x"));
        assert_eq!(address.len(), 42);
    }
}
