//! The polymorphic account model: a leaf key pair bound to a path and a
//! blockchain, and the BIP44 machinery that produces one.

use crate::bip32::ExtendedKey;
use crate::blockchain::{AddressType, BlockchainType};
use crate::error::{Error, Result};
use crate::hdpath::HDPath;
use crate::primitives::ecdsa;
use std::marker::PhantomData;

/// Implemented once per chain: turns a public key into that chain's address
/// text. Parameterizing [`HDAccount`]/[`LeafAccount`] over this (rather than
/// storing a trait object) keeps address derivation chain-specific without
/// the core crate naming any chain.
pub trait AddressCodec {
    fn derive_address(public_key_compressed: &[u8; 33], blockchain_type: BlockchainType) -> Result<String>;
}

/// A generic account: owns its private key, knows its derivation path and
/// blockchain type, and can produce its address, public key, and private
/// key on demand.
pub trait Account {
    fn blockchain_type(&self) -> BlockchainType;
    fn path(&self) -> &HDPath;
    fn private_key(&self) -> &secp256k1::SecretKey;
    fn public_key_compressed(&self) -> [u8; 33];
    fn public_key_uncompressed(&self) -> [u8; 65];
    fn address(&self) -> Result<String>;
}

/// A leaf account produced by [`HDAccount::leaf`]. Private-key bytes are
/// zeroized on drop (`secp256k1`'s `zeroize` feature backs `SecretKey`).
pub struct LeafAccount<C: AddressCodec> {
    blockchain_type: BlockchainType,
    path: HDPath,
    private_key: secp256k1::SecretKey,
    _codec: PhantomData<C>,
}

impl<C: AddressCodec> LeafAccount<C> {
    fn new(blockchain_type: BlockchainType, path: HDPath, private_key: secp256k1::SecretKey) -> Self {
        LeafAccount { blockchain_type, path, private_key, _codec: PhantomData }
    }
}

impl<C: AddressCodec> Account for LeafAccount<C> {
    fn blockchain_type(&self) -> BlockchainType {
        self.blockchain_type
    }

    fn path(&self) -> &HDPath {
        &self.path
    }

    fn private_key(&self) -> &secp256k1::SecretKey {
        &self.private_key
    }

    fn public_key_compressed(&self) -> [u8; 33] {
        ecdsa::public_key_compressed(&self.private_key)
    }

    fn public_key_uncompressed(&self) -> [u8; 65] {
        ecdsa::public_key_uncompressed(&self.private_key)
    }

    fn address(&self) -> Result<String> {
        C::derive_address(&self.public_key_compressed(), self.blockchain_type)
    }
}

/// Bound to `(blockchain_type, BIP44 account-level extended key, path prefix
/// = m/44'/coin'/account')`. Produces leaf accounts at `(AddressType, index)`
/// via two non-hardened child derivations (`change`, then `index`).
pub struct HDAccount<C: AddressCodec> {
    blockchain_type: BlockchainType,
    account_key: ExtendedKey,
    path_prefix: HDPath,
    _codec: PhantomData<C>,
}

impl<C: AddressCodec> HDAccount<C> {
    /// Derives the account-level key `m/44'/coin'/account'` from a master
    /// key, fixing the coin type by SLIP-0044 per `blockchain_type`.
    pub fn from_master(master: &ExtendedKey, blockchain_type: BlockchainType, account_index: u32) -> Result<Self> {
        let coin_type = blockchain_type.blockchain.slip44_coin_type();
        let path_prefix = HDPath::from_indices(vec![
            HDPath::harden(44),
            HDPath::harden(coin_type),
            HDPath::harden(account_index),
        ]);
        let account_key = master.derive_path(&path_prefix)?;
        Ok(HDAccount { blockchain_type, account_key, path_prefix, _codec: PhantomData })
    }

    pub fn path_prefix(&self) -> &HDPath {
        &self.path_prefix
    }

    /// Derives the leaf account at `m/44'/coin'/account'/change/index`.
    pub fn leaf(&self, address_type: AddressType, index: u32) -> Result<LeafAccount<C>> {
        let change_key = self.account_key.derive_child(address_type.change_index())?;
        let leaf_key = change_key.derive_child(index)?;
        let private_key = *leaf_key
            .private_key()
            .ok_or_else(|| Error::general("leaf derivation lost its private half"))?;
        let path = self.path_prefix.child(address_type.change_index()).child(index);
        Ok(LeafAccount::new(self.blockchain_type, path, private_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bip32::make_master_key;
    use crate::blockchain::Blockchain;

    struct HexCodec;
    impl AddressCodec for HexCodec {
        fn derive_address(public_key_compressed: &[u8; 33], _blockchain_type: BlockchainType) -> Result<String> {
            Ok(hex::encode(public_key_compressed))
        }
    }

    #[test]
    fn leaf_path_matches_bip44_layout() {
        let seed = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let master = make_master_key(&seed).unwrap();
        let account = HDAccount::<HexCodec>::from_master(&master, BlockchainType::mainnet(Blockchain::Bitcoin), 0).unwrap();
        let leaf = account.leaf(AddressType::External, 5).unwrap();
        assert_eq!(leaf.path().to_string(), "m/44'/0'/0'/0/5");
    }

    #[test]
    fn internal_and_external_leaves_differ() {
        let seed = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let master = make_master_key(&seed).unwrap();
        let account = HDAccount::<HexCodec>::from_master(&master, BlockchainType::mainnet(Blockchain::Ethereum), 0).unwrap();
        let external = account.leaf(AddressType::External, 0).unwrap();
        let internal = account.leaf(AddressType::Internal, 0).unwrap();
        assert_ne!(external.address().unwrap(), internal.address().unwrap());
    }
}
