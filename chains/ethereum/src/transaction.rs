//! RLP-encoded legacy transaction with EIP-155 replay protection.

use crate::address;
use crate::rlp::Item;
use log::debug;
use wallet_core::primitives::ecdsa;
use wallet_core::primitives::hash::keccak256;
use wallet_core::{BigInt, BlockchainType, Error, Properties, Result, Trait, Transaction, ValueKind};

fn bind_source_properties() -> Result<Properties> {
    let mut props = Properties::new();
    props.bind("amount", ValueKind::BigInt, Trait::Required, None)?;
    props.bind("private_key", ValueKind::PrivateKey, Trait::Required, None)?;
    Ok(props)
}

fn bind_destination_properties() -> Result<Properties> {
    let mut props = Properties::new();
    props.bind("address", ValueKind::Bytes, Trait::Required, None)?;
    props.bind("amount", ValueKind::BigInt, Trait::Required, None)?;
    Ok(props)
}

fn bind_fee_properties() -> Result<Properties> {
    let mut props = Properties::new();
    props.bind("gas_price", ValueKind::BigInt, Trait::Required, None)?;
    props.bind("gas_limit", ValueKind::BigInt, Trait::Required, None)?;
    Ok(props)
}

fn bind_tx_properties() -> Result<Properties> {
    let mut props = Properties::new();
    props.bind("nonce", ValueKind::BigInt, Trait::Required, None)?;
    props.bind("chain_id", ValueKind::Int32, Trait::Required, None)?;
    props.bind("payload", ValueKind::Bytes, Trait::Optional, None)?;
    Ok(props)
}

pub struct EthereumTransaction {
    #[allow(dead_code)]
    blockchain_type: BlockchainType,
    source: Option<Properties>,
    destination: Option<Properties>,
    fee: Properties,
    properties: Properties,
    signature: Option<(u64, [u8; 32], [u8; 32])>,
}

impl EthereumTransaction {
    pub fn new(blockchain_type: BlockchainType) -> Self {
        EthereumTransaction {
            blockchain_type,
            source: None,
            destination: None,
            fee: bind_fee_properties().expect("static fee schema"),
            properties: bind_tx_properties().expect("static tx schema"),
            signature: None,
        }
    }

    fn payload(&self) -> Vec<u8> {
        self.properties.get_bytes("payload").map(|b| b.to_vec()).unwrap_or_default()
    }

    fn destination_address(&self) -> Result<[u8; 20]> {
        let dest = self.destination.as_ref().ok_or(Error::TransactionNoDestinations)?;
        let bytes = dest.get_bytes("address")?;
        if bytes.len() != 20 {
            return Err(Error::invalid_address("ethereum address must be 20 bytes"));
        }
        let mut out = [0u8; 20];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    fn unsigned_fields(&self) -> Result<Vec<Item>> {
        let dest = self.destination.as_ref().ok_or(Error::TransactionNoDestinations)?;
        let to = self.destination_address()?;
        Ok(vec![
            Item::uint(self.properties.get_big_int("nonce")?),
            Item::uint(self.fee.get_big_int("gas_price")?),
            Item::uint(self.fee.get_big_int("gas_limit")?),
            Item::bytes(to.to_vec()),
            Item::uint(dest.get_big_int("amount")?),
            Item::bytes(self.payload()),
        ])
    }

    fn signing_hash(&self, chain_id: u32) -> Result<[u8; 32]> {
        let mut fields = self.unsigned_fields()?;
        fields.push(Item::uint(&BigInt::from_u64(chain_id as u64)));
        fields.push(Item::uint(&BigInt::zero()));
        fields.push(Item::uint(&BigInt::zero()));
        Ok(keccak256(&Item::List(fields).encode()))
    }
}

impl Transaction for EthereumTransaction {
    fn add_source(&mut self) -> Result<usize> {
        if self.source.is_some() {
            return Err(Error::TransactionTooManySources);
        }
        self.source = Some(bind_source_properties()?);
        Ok(0)
    }

    fn add_destination(&mut self) -> Result<usize> {
        if self.destination.is_some() {
            return Err(Error::TransactionTooManyDestinations);
        }
        self.destination = Some(bind_destination_properties()?);
        Ok(0)
    }

    fn source(&mut self, index: usize) -> Result<&mut Properties> {
        if index != 0 {
            return Err(Error::invalid_argument("ethereum has exactly one source"));
        }
        self.source.as_mut().ok_or(Error::TransactionNoSources)
    }

    fn destination(&mut self, index: usize) -> Result<&mut Properties> {
        if index != 0 {
            return Err(Error::invalid_argument("ethereum has exactly one destination"));
        }
        self.destination.as_mut().ok_or(Error::TransactionNoDestinations)
    }

    fn fee(&mut self) -> Result<&mut Properties> {
        Ok(&mut self.fee)
    }

    fn properties(&mut self) -> &mut Properties {
        &mut self.properties
    }

    fn update(&mut self) -> Result<()> {
        let source = self.source.as_mut().ok_or(Error::TransactionNoSources)?;
        source.validate()?;
        let destination = self.destination.as_mut().ok_or(Error::TransactionNoDestinations)?;
        destination.validate()?;
        self.fee.validate()?;
        self.properties.validate()?;
        debug!("ethereum transaction updated for chain_id {}", self.properties.get_int32("chain_id")?);
        Ok(())
    }

    fn sign(&mut self) -> Result<()> {
        self.update()?;
        let chain_id = self.properties.get_int32("chain_id")? as u32;
        let hash = self.signing_hash(chain_id)?;
        let private_key = *self.source.as_ref().unwrap().get_private_key("private_key")?;
        let (r, s, recovery_id) = ecdsa::sign_recoverable(&private_key, &hash)?;
        let v = recovery_id as u64 + 35 + 2 * chain_id as u64;
        self.signature = Some((v, r, s));
        debug!("ethereum transaction signed");
        Ok(())
    }

    fn serialize(&mut self) -> Result<Vec<u8>> {
        if self.signature.is_none() {
            self.sign()?;
        }
        let (v, r, s) = self.signature.expect("checked above");
        let mut fields = self.unsigned_fields()?;
        fields.push(Item::uint(&BigInt::from_u64(v)));
        fields.push(Item::uint(&BigInt::from_bytes_be(false, &r)));
        fields.push(Item::uint(&BigInt::from_bytes_be(false, &s)));
        Ok(Item::List(fields).encode())
    }

    fn encode_serialized(&mut self) -> Result<String> {
        Ok(format!("0x{}", hex::encode(self.serialize()?)))
    }

    fn total_spent(&self) -> Result<BigInt> {
        let destination = self.destination.as_ref().ok_or(Error::TransactionNoDestinations)?;
        Ok(destination.get_big_int("amount")?.add(&self.total_fee()?))
    }

    fn total_fee(&self) -> Result<BigInt> {
        Ok(self.fee.get_big_int("gas_price")?.mul(self.fee.get_big_int("gas_limit")?))
    }

    fn estimate_total_fee(&self) -> Result<BigInt> {
        self.total_fee()
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallet_core::primitives::ecdsa;
    use wallet_core::{Blockchain, BlockchainType as Bct};

    #[test]
    fn eip155_sign_vector() {
        // Matches Ethereum's canonical EIP-155 worked example (private key
        // 0x4646...46, nonce 9, value 1 ETH, chain id 1).
        let private_key = ecdsa::secret_key_from_bytes(&[0x46u8; 32]).unwrap();
        let mut tx = EthereumTransaction::new(Bct::mainnet(Blockchain::Ethereum));
        tx.add_source().unwrap();
        tx.source(0).unwrap().set_big_int("amount", BigInt::from_u64(0)).unwrap();
        tx.source(0).unwrap().set_private_key("private_key", private_key).unwrap();
        tx.add_destination().unwrap();
        tx.destination(0).unwrap().set_bytes("address", vec![0x35; 20]).unwrap();
        tx.destination(0).unwrap().set_big_int("amount", BigInt::from_decimal_str("1000000000000000000").unwrap()).unwrap();
        tx.fee().unwrap().set_big_int("gas_price", BigInt::from_decimal_str("20000000000").unwrap()).unwrap();
        tx.fee().unwrap().set_big_int("gas_limit", BigInt::from_u64(21000)).unwrap();
        tx.properties().set_big_int("nonce", BigInt::from_u64(9)).unwrap();
        tx.properties().set_int32("chain_id", 1).unwrap();

        tx.sign().unwrap();
        let (v, _r, _s) = tx.signature.unwrap();
        assert!(v == 37 || v == 38);
    }

    #[test]
    fn rejects_second_source() {
        let mut tx = EthereumTransaction::new(Bct::mainnet(Blockchain::Ethereum));
        tx.add_source().unwrap();
        assert!(matches!(tx.add_source(), Err(Error::TransactionTooManySources)));
    }

    #[test]
    fn total_fee_is_gas_price_times_limit() {
        let mut tx = EthereumTransaction::new(Bct::mainnet(Blockchain::Ethereum));
        tx.fee().unwrap().set_big_int("gas_price", BigInt::from_u64(10)).unwrap();
        tx.fee().unwrap().set_big_int("gas_limit", BigInt::from_u64(21000)).unwrap();
        assert_eq!(tx.total_fee().unwrap().to_decimal_string(), "210000");
    }
}
