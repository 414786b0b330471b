//! The uniform transaction contract every chain implements.

use crate::bigint::BigInt;
use crate::error::Result;
use crate::properties::Properties;

/// A chain-specific transaction builder. `update` → `sign` → `serialize` is
/// the required call order; `serialize` implies `update`, and
/// `encode_serialized` implies `serialize`.
pub trait Transaction {
    /// Appends a new source property group, returning its index.
    fn add_source(&mut self) -> Result<usize>;

    /// Appends a new destination property group, returning its index.
    fn add_destination(&mut self) -> Result<usize>;

    /// The source property group at `index`.
    fn source(&mut self, index: usize) -> Result<&mut Properties>;

    /// The destination property group at `index`.
    fn destination(&mut self, index: usize) -> Result<&mut Properties>;

    /// The single fee property group. Chains that charge no fee at the
    /// transaction-builder level (EOS, Golos) reject this with
    /// `FeatureNotSupported`.
    fn fee(&mut self) -> Result<&mut Properties>;

    /// Transaction-level properties (nonce, chain id, expiration, ...).
    fn properties(&mut self) -> &mut Properties;

    /// Validates every property container and computes derived fields
    /// (Bitcoin change, Ethereum gas cost, EOS action data). Idempotent
    /// while the transaction stays clean.
    fn update(&mut self) -> Result<()>;

    /// Builds the signing preimage and produces the signature(s). Implies
    /// `update`.
    fn sign(&mut self) -> Result<()>;

    /// Serializes the final on-chain bytes. Implies `sign`.
    fn serialize(&mut self) -> Result<Vec<u8>>;

    /// Renders the transport-level encoded form (hex, or a JSON envelope
    /// for EOS/Golos). Implies `serialize`.
    fn encode_serialized(&mut self) -> Result<String>;

    /// Sum of every source's `amount`.
    fn total_spent(&self) -> Result<BigInt>;

    /// The fee actually charged once the transaction is built.
    fn total_fee(&self) -> Result<BigInt>;

    /// An a-priori fee estimate usable before `sign`.
    fn estimate_total_fee(&self) -> Result<BigInt>;

    /// Downcast hook for chain-specific `TransactionBuilder`s that need to
    /// reach into their own concrete transaction type (EOS's alternate
    /// action shapes, for instance) through the object-safe trait.
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}
