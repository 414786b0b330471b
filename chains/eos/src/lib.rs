//! EOS packed binary transactions: name packing, the synthesized transfer
//! action, alternate action builders, and the chain's `Facade` binding.

pub mod account;
pub mod facade;
pub mod name;
pub mod transaction;

pub use account::EosCodec;
pub use facade::EosFacade;
pub use name::EosName;
pub use transaction::EosTransaction;
