//! Shared core for a cross-chain HD wallet: BIP32/BIP44 derivation, the
//! generic property/binder system, the `Transaction`/`Facade` contracts
//! every chain crate implements, and the cryptographic primitive bridge
//! they're all built on.

pub mod account;
pub mod bigint;
pub mod bip32;
pub mod blockchain;
pub mod error;
pub mod facade;
pub mod hdpath;
pub mod primitives;
pub mod properties;
pub mod stream;
pub mod transaction;

pub use account::{Account, AddressCodec, HDAccount, LeafAccount};
pub use bigint::BigInt;
pub use bip32::{make_child_key, make_master_key, ExtendedKey};
pub use blockchain::{AddressType, Blockchain, BlockchainType, NetType, MAINNET, TESTNET};
pub use error::{Error, Result};
pub use facade::{Facade, HDAccountHandle, TransactionBuilder};
pub use hdpath::HDPath;
pub use properties::{Predicate, Properties, Trait, Value, ValueKind};
pub use transaction::Transaction;
