//! ECDSA / secp256k1 bridge.
//!
//! All signing in this crate is deterministic (RFC 6979); `secp256k1`
//! already signs that way by default, so no extra wiring is required to get
//! byte-stable fixtures.

use crate::error::{Error, Result};
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId, Signature as DerSignature};
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};

/// A 32-byte secp256k1 private key scalar.
pub type PrivateKeyBytes = [u8; 32];

/// Parses a 32-byte private key, failing if it is not a valid scalar.
pub fn secret_key_from_bytes(bytes: &[u8]) -> Result<SecretKey> {
    SecretKey::from_slice(bytes)
        .map_err(|e| Error::invalid_argument(format!("invalid private key: {e}")))
}

/// Derives the compressed (33-byte) public key for `key`.
pub fn public_key_compressed(key: &SecretKey) -> [u8; 33] {
    let secp = Secp256k1::signing_only();
    PublicKey::from_secret_key(&secp, key).serialize()
}

/// Derives the uncompressed (65-byte, 0x04-prefixed) public key for `key`.
pub fn public_key_uncompressed(key: &SecretKey) -> [u8; 65] {
    let secp = Secp256k1::signing_only();
    PublicKey::from_secret_key(&secp, key).serialize_uncompressed()
}

/// Signs a 32-byte message hash, returning a low-S DER-encoded signature.
///
/// This is the shape Bitcoin's legacy scriptSig expects.
pub fn sign_der(key: &SecretKey, hash: &[u8; 32]) -> Result<Vec<u8>> {
    let secp = Secp256k1::signing_only();
    let message = Message::from_digest(*hash);
    let sig: DerSignature = secp.sign_ecdsa(&message, key);
    Ok(sig.serialize_der().to_vec())
}

/// Signs a 32-byte message hash, returning `(r, s, recovery_id)` with low-S
/// normalization. `recovery_id` is in `0..=3`.
pub fn sign_recoverable(key: &SecretKey, hash: &[u8; 32]) -> Result<([u8; 32], [u8; 32], u8)> {
    let secp = Secp256k1::signing_only();
    let message = Message::from_digest(*hash);
    let sig: RecoverableSignature = secp.sign_ecdsa_recoverable(&message, key);
    let (recovery_id, compact) = sig.serialize_compact();
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&compact[..32]);
    s.copy_from_slice(&compact[32..]);
    Ok((r, s, recovery_id.to_i32() as u8))
}

/// Verifies a DER-encoded signature against a 32-byte message hash and a
/// compressed public key. Used by tests and by callers that want to confirm
/// a signature before broadcasting.
pub fn verify_der(pubkey: &[u8], hash: &[u8; 32], der_sig: &[u8]) -> Result<bool> {
    let secp = Secp256k1::verification_only();
    let message = Message::from_digest(*hash);
    let public_key = PublicKey::from_slice(pubkey)
        .map_err(|e| Error::invalid_argument(format!("invalid public key: {e}")))?;
    let sig = DerSignature::from_der(der_sig)
        .map_err(|e| Error::invalid_argument(format!("invalid DER signature: {e}")))?;
    Ok(secp.verify_ecdsa(&message, &sig, &public_key).is_ok())
}

/// Recovers the recovery id from a stored `(recid)` value, building a typed
/// `RecoveryId` for re-serialization paths that need it.
pub fn recovery_id(id: u8) -> Result<RecoveryId> {
    RecoveryId::from_i32(id as i32)
        .map_err(|e| Error::invalid_argument(format!("invalid recovery id: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_is_deterministic() {
        let key = secret_key_from_bytes(&[7u8; 32]).unwrap();
        let hash = [9u8; 32];
        let sig1 = sign_der(&key, &hash).unwrap();
        let sig2 = sign_der(&key, &hash).unwrap();
        assert_eq!(sig1, sig2);
    }

    #[test]
    fn recoverable_signature_verifies() {
        let key = secret_key_from_bytes(&[3u8; 32]).unwrap();
        let hash = [5u8; 32];
        let (r, s, _recid) = sign_recoverable(&key, &hash).unwrap();
        let mut compact = [0u8; 64];
        compact[..32].copy_from_slice(&r);
        compact[32..].copy_from_slice(&s);
        let der = {
            let secp = Secp256k1::signing_only();
            secp.sign_ecdsa(&Message::from_digest(hash), &key)
                .serialize_der()
                .to_vec()
        };
        let pubkey = public_key_compressed(&key);
        assert!(verify_der(&pubkey, &hash, &der).unwrap());
    }
}
