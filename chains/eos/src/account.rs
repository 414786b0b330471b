//! EOS public-key text form: `EOS` + Base58(pubkey || ripemd160(pubkey)[..4]).
//!
//! EOS account names are chain state, not derivable from a key pair; the
//! wallet exposes the key's canonical text form as its "address" the same
//! way the other chains expose a derived address string.

use wallet_core::primitives::codec::base58_encode;
use wallet_core::primitives::hash::ripemd160;
use wallet_core::{AddressCodec, BlockchainType, Result};

pub struct EosCodec;

impl AddressCodec for EosCodec {
    fn derive_address(public_key_compressed: &[u8; 33], _blockchain_type: BlockchainType) -> Result<String> {
        let checksum = ripemd160(public_key_compressed);
        let mut payload = public_key_compressed.to_vec();
        payload.extend_from_slice(&checksum[..4]);
        Ok(format!("EOS{}", base58_encode(&payload)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallet_core::primitives::ecdsa;
    use wallet_core::Blockchain;

    #[test]
    fn produces_eos_prefixed_key_text() {
        let key = ecdsa::secret_key_from_bytes(&[4u8; 32]).unwrap();
        let compressed = ecdsa::public_key_compressed(&key);
        let text = EosCodec::derive_address(&compressed, BlockchainType::mainnet(Blockchain::Eos)).unwrap();
        assert!(text.starts_with("EOS"));
    }
}
