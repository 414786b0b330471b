//! The blockchain facade contract. Each chain crate implements `Facade`
//! once; the registry crate maps `Blockchain` to a boxed instance so
//! application code never branches on chain identity.

use crate::account::Account;
use crate::blockchain::{AddressType, Blockchain, NetType};
use crate::error::Result;
use crate::hdpath::HDPath;
use crate::properties::Properties;
use crate::transaction::Transaction;

/// A chain's BIP44 account-level key, boxed so the facade can return it
/// without naming the chain's concrete `AddressCodec`.
pub trait HDAccountHandle: Send + Sync {
    fn path_prefix(&self) -> &HDPath;
    fn leaf(&self, address_type: AddressType, index: u32) -> Result<Box<dyn Account>>;
}

/// A registered builder that accepts its own property payload, then
/// validates it and injects the resulting action(s) into a transaction.
/// Grounds the EOS "alternate action shapes" protocol without tying the
/// `Transaction` contract itself to any one chain's action model.
pub trait TransactionBuilder: Send + Sync {
    fn payload(&mut self) -> &mut Properties;
    fn build(&mut self, transaction: &mut dyn Transaction) -> Result<()>;
}

/// One per chain. `net_type` is opaque to the facade caller and interpreted
/// entirely by the implementing chain.
pub trait Facade: Send + Sync {
    fn blockchain(&self) -> Blockchain;

    fn make_hd_account(&self, seed: &[u8], net_type: NetType, account_index: u32) -> Result<Box<dyn HDAccountHandle>>;

    fn make_account(&self, net_type: NetType, private_key: &[u8]) -> Result<Box<dyn Account>>;

    fn make_transaction(&self, net_type: NetType) -> Result<Box<dyn Transaction>>;

    fn make_transaction_builder(&self, net_type: NetType, builder_type: &str, action: &str) -> Result<Box<dyn TransactionBuilder>>;

    fn validate_address(&self, net_type: NetType, address: &str) -> Result<bool>;

    /// Serializes an already-signed transaction to its transport form.
    /// Most chains delegate directly to `Transaction::encode_serialized`;
    /// exposed on the facade too since the JSON front door only ever holds
    /// a `Box<dyn Transaction>`.
    fn encode_serialized_transaction(&self, transaction: &mut dyn Transaction) -> Result<String> {
        transaction.encode_serialized()
    }
}
