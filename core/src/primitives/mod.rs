//! Narrow bridges to external cryptographic primitives.
//!
//! Nothing outside this module should name `secp256k1`, `sha2`, `ripemd`,
//! `hex`, `bs58`, or `base32` directly; that keeps the rest of the core
//! deterministic and swappable.

pub mod codec;
pub mod ecdsa;
pub mod hash;
