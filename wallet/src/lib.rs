//! Top-level façade over the wallet workspace: re-exports the core types a
//! native caller builds transactions with, the chain registry, and the JSON
//! front door, so an embedding application depends on one crate instead of
//! reaching into `core`/`registry`/`json` directly.

pub use wallet_core::{
    Account, AddressType, Blockchain, BlockchainType, Error, Facade, HDAccount, HDAccountHandle,
    HDPath, NetType, Properties, Result, Transaction, TransactionBuilder, Trait, Value, ValueKind,
};
pub use wallet_core::BigInt;

pub use wallet_registry::facade_for;

pub use wallet_json::process_request;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facade_lookup_and_json_front_door_agree_on_supported_chains() {
        for blockchain in [Blockchain::Bitcoin, Blockchain::Ethereum, Blockchain::Eos, Blockchain::Golos] {
            assert_eq!(facade_for(blockchain).unwrap().blockchain(), blockchain);
        }
        let err = process_request(r#"{"blockchain":"not-a-chain"}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
