//! Golos public-key text form: `GLS` + Base58Check(pubkey), the standard
//! Graphene-family key encoding (Steem uses `STM`, Golos uses `GLS`).
//!
//! As with EOS, a Graphene account name is chain state rather than
//! key-derivable; the wallet exposes the key's canonical text form as its
//! "address" the same way the other chains expose a derived address string.

use wallet_core::primitives::codec::base58check_encode;
use wallet_core::{AddressCodec, BlockchainType, Result};

pub struct GolosCodec;

impl AddressCodec for GolosCodec {
    fn derive_address(public_key_compressed: &[u8; 33], _blockchain_type: BlockchainType) -> Result<String> {
        Ok(format!("GLS{}", base58check_encode(public_key_compressed)))
    }
}
