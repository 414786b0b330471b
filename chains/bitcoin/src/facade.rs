use crate::account::BitcoinCodec;
use crate::address;
use crate::transaction::BitcoinTransaction;
use wallet_core::primitives::ecdsa;
use wallet_core::{
    Account, AddressType, Blockchain, BlockchainType, Error, Facade, HDAccount, HDAccountHandle, HDPath, NetType,
    Result, Transaction, TransactionBuilder,
};

pub struct BitcoinFacade;

struct HDAccountWrapper(HDAccount<BitcoinCodec>);

impl HDAccountHandle for HDAccountWrapper {
    fn path_prefix(&self) -> &HDPath {
        self.0.path_prefix()
    }

    fn leaf(&self, address_type: AddressType, index: u32) -> Result<Box<dyn Account>> {
        Ok(Box::new(self.0.leaf(address_type, index)?))
    }
}

impl Facade for BitcoinFacade {
    fn blockchain(&self) -> Blockchain {
        Blockchain::Bitcoin
    }

    fn make_hd_account(&self, seed: &[u8], net_type: NetType, account_index: u32) -> Result<Box<dyn HDAccountHandle>> {
        let master = wallet_core::make_master_key(seed)?;
        let blockchain_type = BlockchainType::new(Blockchain::Bitcoin, net_type);
        let account = HDAccount::<BitcoinCodec>::from_master(&master, blockchain_type, 0)?;
        Ok(Box::new(HDAccountWrapper(account)))
    }

    fn make_account(&self, net_type: NetType, private_key: &[u8]) -> Result<Box<dyn Account>> {
        let wif = std::str::from_utf8(private_key).map_err(|_| Error::invalid_argument("private key is not valid WIF text"))?;
        let key_bytes = crate::account::decode_wif(wif)?;
        let key = ecdsa::secret_key_from_bytes(&key_bytes)?;
        let blockchain_type = BlockchainType::new(Blockchain::Bitcoin, net_type);
        Ok(Box::new(RawAccount { blockchain_type, key, path: HDPath::new() }))
    }

    fn make_transaction(&self, net_type: NetType) -> Result<Box<dyn Transaction>> {
        let blockchain_type = BlockchainType::new(Blockchain::Bitcoin, net_type);
        Ok(Box::new(BitcoinTransaction::new(blockchain_type)))
    }

    fn make_transaction_builder(&self, _net_type: NetType, builder_type: &str, _action: &str) -> Result<Box<dyn TransactionBuilder>> {
        Err(Error::FeatureNotSupported(format!("bitcoin has no alternate transaction builders (requested '{builder_type}')")))
    }

    fn validate_address(&self, net_type: NetType, address: &str) -> Result<bool> {
        let blockchain_type = BlockchainType::new(Blockchain::Bitcoin, net_type);
        Ok(address::is_valid_address(address, blockchain_type))
    }
}

struct RawAccount {
    blockchain_type: BlockchainType,
    key: secp256k1::SecretKey,
    path: HDPath,
}

impl Account for RawAccount {
    fn blockchain_type(&self) -> BlockchainType {
        self.blockchain_type
    }

    fn path(&self) -> &HDPath {
        &self.path
    }

    fn private_key(&self) -> &secp256k1::SecretKey {
        &self.key
    }

    fn public_key_compressed(&self) -> [u8; 33] {
        ecdsa::public_key_compressed(&self.key)
    }

    fn public_key_uncompressed(&self) -> [u8; 65] {
        ecdsa::public_key_uncompressed(&self.key)
    }

    fn address(&self) -> Result<String> {
        address::derive_address(&self.public_key_compressed(), self.blockchain_type)
    }
}
