//! Maps each [`Blockchain`] to its [`Facade`] singleton. Initialized once,
//! read-only thereafter, so facade lookup never races with registration.

use std::sync::OnceLock;
use wallet_core::{Blockchain, Error, Facade, Result};

fn facades() -> &'static [Box<dyn Facade>] {
    static FACADES: OnceLock<Vec<Box<dyn Facade>>> = OnceLock::new();
    FACADES.get_or_init(|| {
        vec![
            Box::new(wallet_bitcoin::BitcoinFacade),
            Box::new(wallet_ethereum::EthereumFacade),
            Box::new(wallet_eos::EosFacade),
            Box::new(wallet_golos::GolosFacade),
        ]
    })
}

/// Looks up the registered facade for `blockchain`.
pub fn facade_for(blockchain: Blockchain) -> Result<&'static dyn Facade> {
    facades()
        .iter()
        .find(|f| f.blockchain() == blockchain)
        .map(|f| f.as_ref())
        .ok_or_else(|| Error::invalid_argument(format!("no facade registered for {blockchain}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_blockchain_has_a_registered_facade() {
        for blockchain in [Blockchain::Bitcoin, Blockchain::Ethereum, Blockchain::Eos, Blockchain::Golos] {
            assert_eq!(facade_for(blockchain).unwrap().blockchain(), blockchain);
        }
    }
}
