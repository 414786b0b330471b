//! Bitcoin P2PKH: address/script construction, legacy signing, and the
//! chain's `Facade` binding.

pub mod account;
pub mod address;
pub mod facade;
pub mod transaction;

pub use account::BitcoinCodec;
pub use facade::BitcoinFacade;
pub use transaction::BitcoinTransaction;
