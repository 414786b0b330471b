//! Golos (Graphene-style) JSON transactions: account-name validation, the
//! `transfer` operation envelope, and the chain's `Facade` binding.

pub mod account;
pub mod address;
pub mod facade;
pub mod transaction;

pub use account::GolosCodec;
pub use facade::GolosFacade;
pub use transaction::GolosTransaction;
