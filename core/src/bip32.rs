//! BIP32 master-key-from-seed and child-key derivation, built directly on
//! top of `hmac`/`sha2`/`secp256k1` per the primitive bridge.

use crate::error::{Error, Result};
use crate::hdpath::HDPath;
use crate::primitives::codec::base58check_encode;
use crate::primitives::hash::hash160;
use hmac::{Hmac, Mac};
use secp256k1::{PublicKey, Scalar, Secp256k1, SecretKey};
use sha2::Sha512;
use zeroize::Zeroize;

type HmacSha512 = Hmac<Sha512>;

const SEED_KEY: &[u8] = b"Bitcoin seed";
const VERSION_PRIVATE: u32 = 0x0488_ADE4;
const VERSION_PUBLIC: u32 = 0x0488_B21E;

/// BIP32 extended key material: a private/public key pair bound to a chain
/// code and the bookkeeping (depth, parent fingerprint, child number)
/// needed to serialize it.
#[derive(Clone)]
pub struct ExtendedKey {
    depth: u8,
    parent_fingerprint: [u8; 4],
    child_number: u32,
    chain_code: [u8; 32],
    private_key: Option<SecretKey>,
    public_key: PublicKey,
}

impl Drop for ExtendedKey {
    fn drop(&mut self) {
        self.chain_code.zeroize();
    }
}

impl ExtendedKey {
    pub fn private_key(&self) -> Option<&SecretKey> {
        self.private_key.as_ref()
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    fn fingerprint(&self) -> [u8; 4] {
        let digest = hash160(&self.public_key.serialize());
        let mut out = [0u8; 4];
        out.copy_from_slice(&digest[..4]);
        out
    }

    /// Base58Check serialization of the 78-byte BIP32 record. Serializes
    /// the private half when present, otherwise the public half.
    pub fn serialize(&self) -> String {
        let mut record = Vec::with_capacity(78);
        let version = if self.private_key.is_some() { VERSION_PRIVATE } else { VERSION_PUBLIC };
        record.extend_from_slice(&version.to_be_bytes());
        record.push(self.depth);
        record.extend_from_slice(&self.parent_fingerprint);
        record.extend_from_slice(&self.child_number.to_be_bytes());
        record.extend_from_slice(&self.chain_code);
        match &self.private_key {
            Some(key) => {
                record.push(0x00);
                record.extend_from_slice(&key.secret_bytes());
            }
            None => record.extend_from_slice(&self.public_key.serialize()),
        }
        base58check_encode(&record)
    }

    /// Derives a single child at `index` (hardened if bit 31 is set).
    pub fn derive_child(&self, index: u32) -> Result<ExtendedKey> {
        let hardened = HDPath::is_hardened(index);
        if hardened && self.private_key.is_none() {
            return Err(Error::invalid_argument(
                "cannot derive a hardened child from a public-only extended key",
            ));
        }

        let mut mac = HmacSha512::new_from_slice(&self.chain_code)
            .map_err(|e| Error::general(format!("HMAC key error: {e}")))?;
        if hardened {
            let key = self.private_key.as_ref().expect("checked above");
            mac.update(&[0x00]);
            mac.update(&key.secret_bytes());
        } else {
            mac.update(&self.public_key.serialize());
        }
        mac.update(&index.to_be_bytes());
        let i = mac.finalize().into_bytes();
        let (il, ir) = i.split_at(32);

        let secp = Secp256k1::new();
        let tweak = Scalar::from_be_bytes(il.try_into().unwrap())
            .map_err(|_| Error::invalid_argument("derived tweak is not a valid scalar"))?;

        let (private_key, public_key) = match &self.private_key {
            Some(parent_key) => {
                let child_key = parent_key
                    .add_tweak(&tweak)
                    .map_err(|e| Error::invalid_argument(format!("child key derivation failed: {e}")))?;
                let public_key = PublicKey::from_secret_key(&secp, &child_key);
                (Some(child_key), public_key)
            }
            None => {
                let public_key = self
                    .public_key
                    .add_exp_tweak(&secp, &tweak)
                    .map_err(|e| Error::invalid_argument(format!("child key derivation failed: {e}")))?;
                (None, public_key)
            }
        };

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(ir);

        Ok(ExtendedKey {
            depth: self.depth.checked_add(1).ok_or_else(|| Error::invalid_argument("path too deep"))?,
            parent_fingerprint: self.fingerprint(),
            child_number: index,
            chain_code,
            private_key,
            public_key,
        })
    }

    /// Derives the key at the end of `path`, starting from `self`.
    pub fn derive_path(&self, path: &HDPath) -> Result<ExtendedKey> {
        let mut current = self.clone();
        for &index in path.indices() {
            current = current.derive_child(index)?;
        }
        Ok(current)
    }
}

/// Derives the BIP32 master extended private key from a seed.
pub fn make_master_key(seed: &[u8]) -> Result<ExtendedKey> {
    let mut mac = HmacSha512::new_from_slice(SEED_KEY)
        .map_err(|e| Error::general(format!("HMAC key error: {e}")))?;
    mac.update(seed);
    let i = mac.finalize().into_bytes();
    let (il, ir) = i.split_at(32);

    let private_key = SecretKey::from_slice(il)
        .map_err(|e| Error::bad_entropy(format!("seed produced an invalid master key: {e}")))?;
    let secp = Secp256k1::new();
    let public_key = PublicKey::from_secret_key(&secp, &private_key);

    let mut chain_code = [0u8; 32];
    chain_code.copy_from_slice(ir);

    Ok(ExtendedKey {
        depth: 0,
        parent_fingerprint: [0; 4],
        child_number: 0,
        chain_code,
        private_key: Some(private_key),
        public_key,
    })
}

/// Derives a single child of `parent` at `index`. A thin free-function
/// wrapper over [`ExtendedKey::derive_child`] for callers that prefer it.
pub fn make_child_key(parent: &ExtendedKey, index: u32) -> Result<ExtendedKey> {
    parent.derive_child(index)
}
