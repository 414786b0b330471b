//! P2PKH transaction assembly: per-input preimage, script-swap signing
//! discipline, and the legacy wire format.

use crate::address;
use log::debug;
use wallet_core::primitives::ecdsa;
use wallet_core::primitives::hash::sha256d;
use wallet_core::stream::BinaryStream;
use wallet_core::{BigInt, BlockchainType, Error, Properties, Result, Trait, Transaction, ValueKind};

const SEQUENCE_FINAL: u32 = 0xFFFF_FFFF;
const SIGHASH_ALL: u32 = 1;
const VERSION: u32 = 1;
const LOCKTIME: u32 = 0;

fn bind_source_properties() -> Result<Properties> {
    let mut props = Properties::new();
    props.bind("amount", ValueKind::BigInt, Trait::Required, None)?;
    props.bind("prev_tx_hash", ValueKind::Bytes, Trait::Required, None)?;
    props.bind("prev_tx_out_index", ValueKind::Int32, Trait::Required, None)?;
    props.bind("prev_tx_out_script_pubkey", ValueKind::Bytes, Trait::Required, None)?;
    props.bind("private_key", ValueKind::PrivateKey, Trait::Required, None)?;
    Ok(props)
}

fn bind_destination_properties() -> Result<Properties> {
    let mut props = Properties::new();
    props.bind("amount", ValueKind::BigInt, Trait::Required, None)?;
    props.bind("address", ValueKind::Str, Trait::Required, None)?;
    Ok(props)
}

fn bind_fee_properties() -> Result<Properties> {
    let mut props = Properties::new();
    props.bind("amount_per_byte", ValueKind::BigInt, Trait::Required, None)?;
    props.bind("min_amount_per_byte", ValueKind::BigInt, Trait::Optional, None)?;
    props.bind("max_amount_per_byte", ValueKind::BigInt, Trait::Optional, None)?;
    Ok(props)
}

struct NonZeroDestination {
    amount: u64,
    script: Vec<u8>,
}

pub struct BitcoinTransaction {
    blockchain_type: BlockchainType,
    sources: Vec<Properties>,
    destinations: Vec<Properties>,
    fee: Properties,
    properties: Properties,
    input_scripts: Vec<Vec<u8>>,
    cached_fee: Option<BigInt>,
    signed: bool,
}

impl BitcoinTransaction {
    pub fn new(blockchain_type: BlockchainType) -> Self {
        BitcoinTransaction {
            blockchain_type,
            sources: Vec::new(),
            destinations: Vec::new(),
            fee: bind_fee_properties().expect("static fee schema"),
            properties: Properties::new(),
            input_scripts: Vec::new(),
            cached_fee: None,
            signed: false,
        }
    }

    fn non_zero_destinations(&self) -> Result<Vec<NonZeroDestination>> {
        let mut out = Vec::new();
        for dest in &self.destinations {
            let amount = dest.get_big_int("amount")?.to_u64()?;
            if amount == 0 {
                continue;
            }
            let address_str = dest.get_str("address")?;
            if !address::is_valid_address(address_str, self.blockchain_type) {
                return Err(Error::invalid_address(address_str));
            }
            let hash = address::decode_address_hash(address_str)?;
            out.push(NonZeroDestination { amount, script: address::p2pkh_script(&hash) });
        }
        Ok(out)
    }

    fn size_estimate(&self, non_zero_destinations: usize) -> u64 {
        (self.sources.len() as u64) * 147 + (non_zero_destinations as u64) * 34 + 10
    }

    fn total_sources_amount(&self) -> Result<BigInt> {
        let mut total = BigInt::zero();
        for source in &self.sources {
            total = total.add(source.get_big_int("amount")?);
        }
        Ok(total)
    }

    fn total_destinations_amount(&self) -> Result<BigInt> {
        let mut total = BigInt::zero();
        for dest in &self.destinations {
            total = total.add(dest.get_big_int("amount")?);
        }
        Ok(total)
    }

    /// Serializes the transaction with `signing_index` given its real
    /// `prev_tx_out_script_pubkey` and every other input's script cleared.
    /// Passing `None` serializes with every input script set to whatever
    /// `self.input_scripts` currently holds (the final, signed form).
    fn serialize_with(&self, signing_index: Option<usize>) -> Result<Vec<u8>> {
        let non_zero = self.non_zero_destinations()?;
        let mut stream = BinaryStream::new();
        stream.write_u32_le(VERSION);
        stream.write_compact_size(self.sources.len() as u64);
        for (i, source) in self.sources.iter().enumerate() {
            let prev_hash = source.get_bytes("prev_tx_hash")?;
            if prev_hash.len() != 32 {
                return Err(Error::invalid_argument("prev_tx_hash must be 32 bytes"));
            }
            let mut reversed = prev_hash.to_vec();
            reversed.reverse();
            stream.write_bytes(&reversed);
            stream.write_u32_le(source.get_int32("prev_tx_out_index")? as u32);

            let script: &[u8] = match signing_index {
                Some(idx) if idx == i => source.get_bytes("prev_tx_out_script_pubkey")?,
                Some(_) => &[],
                None => self.input_scripts.get(i).map(Vec::as_slice).unwrap_or(&[]),
            };
            stream.write_var_bytes(script);
            stream.write_u32_le(SEQUENCE_FINAL);
        }
        stream.write_compact_size(non_zero.len() as u64);
        for dest in &non_zero {
            stream.write_u64_le(dest.amount);
            stream.write_var_bytes(&dest.script);
        }
        stream.write_u32_le(LOCKTIME);
        Ok(stream.into_vec())
    }

    fn preimage_hash(&self, signing_index: usize) -> Result<[u8; 32]> {
        let mut bytes = self.serialize_with(Some(signing_index))?;
        bytes.extend_from_slice(&SIGHASH_ALL.to_le_bytes());
        Ok(sha256d(&bytes))
    }
}

impl Transaction for BitcoinTransaction {
    fn add_source(&mut self) -> Result<usize> {
        self.sources.push(bind_source_properties()?);
        Ok(self.sources.len() - 1)
    }

    fn add_destination(&mut self) -> Result<usize> {
        self.destinations.push(bind_destination_properties()?);
        Ok(self.destinations.len() - 1)
    }

    fn source(&mut self, index: usize) -> Result<&mut Properties> {
        self.sources.get_mut(index).ok_or_else(|| Error::invalid_argument("source index out of range"))
    }

    fn destination(&mut self, index: usize) -> Result<&mut Properties> {
        self.destinations.get_mut(index).ok_or_else(|| Error::invalid_argument("destination index out of range"))
    }

    fn fee(&mut self) -> Result<&mut Properties> {
        Ok(&mut self.fee)
    }

    fn properties(&mut self) -> &mut Properties {
        &mut self.properties
    }

    fn update(&mut self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(Error::TransactionNoSources);
        }
        if self.destinations.is_empty() {
            return Err(Error::TransactionNoDestinations);
        }
        for source in &mut self.sources {
            source.validate()?;
        }
        for dest in &mut self.destinations {
            dest.validate()?;
        }
        self.fee.validate()?;

        let non_zero = self.non_zero_destinations()?;
        let size = self.size_estimate(non_zero.len());
        let per_byte = self.fee.get_big_int("amount_per_byte")?.clone();
        let leftover = self.total_sources_amount()?.sub(&self.total_destinations_amount()?);
        if leftover.is_negative() {
            return Err(Error::invalid_argument("sources do not cover destinations"));
        }
        let charged = per_byte.mul(&BigInt::from_u64(size));
        let min = self
            .fee
            .get_big_int("min_amount_per_byte")
            .map(|v| v.clone())
            .unwrap_or_else(|_| BigInt::from_u64(1));
        if leftover < min.mul(&BigInt::from_u64(size)) {
            return Err(Error::invalid_argument("fee leftover below min_amount_per_byte bound"));
        }
        let max = self
            .fee
            .get_big_int("max_amount_per_byte")
            .map(|v| v.clone())
            .unwrap_or_else(|_| per_byte.clone());
        if leftover > max.mul(&BigInt::from_u64(size)) {
            return Err(Error::invalid_argument("fee leftover above max_amount_per_byte bound"));
        }
        self.cached_fee = Some(charged);
        debug!("bitcoin transaction updated: {} sources, {} destinations, size {size}", self.sources.len(), non_zero.len());
        Ok(())
    }

    fn sign(&mut self) -> Result<()> {
        self.update()?;
        self.input_scripts = vec![Vec::new(); self.sources.len()];
        for i in 0..self.sources.len() {
            let hash = self.preimage_hash(i)?;
            let private_key = *self.sources[i].get_private_key("private_key")?;
            let der_sig = ecdsa::sign_der(&private_key, &hash)?;
            let public_key = ecdsa::public_key_compressed(&private_key);

            let mut sig_with_hashtype = der_sig;
            sig_with_hashtype.push(SIGHASH_ALL as u8);

            let mut script_sig = BinaryStream::new();
            script_sig.write_var_bytes(&sig_with_hashtype);
            script_sig.write_var_bytes(&public_key);
            self.input_scripts[i] = script_sig.into_vec();
            debug!("bitcoin input {i} signed");
        }
        self.signed = true;
        Ok(())
    }

    fn serialize(&mut self) -> Result<Vec<u8>> {
        if !self.signed {
            self.sign()?;
        }
        self.serialize_with(None)
    }

    fn encode_serialized(&mut self) -> Result<String> {
        Ok(hex::encode(self.serialize()?))
    }

    fn total_spent(&self) -> Result<BigInt> {
        self.total_sources_amount()
    }

    fn total_fee(&self) -> Result<BigInt> {
        self.cached_fee.clone().ok_or_else(|| Error::general("transaction has not been updated yet"))
    }

    fn estimate_total_fee(&self) -> Result<BigInt> {
        let non_zero_count = self.non_zero_destinations().map(|v| v.len()).unwrap_or(self.destinations.len());
        let size = self.size_estimate(non_zero_count);
        let per_byte = self.fee.get_big_int("amount_per_byte")?;
        Ok(per_byte.mul(&BigInt::from_u64(size)))
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{encode_wif, BitcoinCodec};
    use wallet_core::{AddressCodec, AddressType, Blockchain, HDAccount};

    fn sample_transaction() -> (BitcoinTransaction, [u8; 32]) {
        let seed = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let master = wallet_core::make_master_key(&seed).unwrap();
        let blockchain_type = BlockchainType::mainnet(Blockchain::Bitcoin);
        let account = HDAccount::<BitcoinCodec>::from_master(&master, blockchain_type, 0).unwrap();
        let leaf = account.leaf(AddressType::External, 0).unwrap();
        let private_key = *wallet_core::Account::private_key(&leaf);

        let mut tx = BitcoinTransaction::new(blockchain_type);
        let source_idx = tx.add_source().unwrap();
        {
            let source = tx.source(source_idx).unwrap();
            source.set_big_int("amount", BigInt::from_u64(100_000)).unwrap();
            source.set_bytes("prev_tx_hash", vec![0x11; 32]).unwrap();
            source.set_int32("prev_tx_out_index", 0).unwrap();
            let pubkey = wallet_core::Account::public_key_compressed(&leaf);
            let hash = wallet_core::primitives::hash::hash160(&pubkey);
            source.set_bytes("prev_tx_out_script_pubkey", address::p2pkh_script(&hash)).unwrap();
            source.set_private_key("private_key", private_key).unwrap();
        }
        let dest_idx = tx.add_destination().unwrap();
        {
            let dest = tx.destination(dest_idx).unwrap();
            // Leftover (100_000 - 99_000 = 1_000) must fall within the default
            // min/max-per-byte bounds (size_estimate(1) == 191) once no explicit
            // bounds are set: [191, 1910].
            dest.set_big_int("amount", BigInt::from_u64(99_000)).unwrap();
            dest.set_str("address", encode_wif_to_address(&leaf)).unwrap();
        }
        tx.fee().unwrap().set_big_int("amount_per_byte", BigInt::from_u64(10)).unwrap();
        (tx, private_key.secret_bytes())
    }

    fn sample_transaction_with_leftover(leftover: u64) -> BitcoinTransaction {
        let seed = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let master = wallet_core::make_master_key(&seed).unwrap();
        let blockchain_type = BlockchainType::mainnet(Blockchain::Bitcoin);
        let account = HDAccount::<BitcoinCodec>::from_master(&master, blockchain_type, 0).unwrap();
        let leaf = account.leaf(AddressType::External, 0).unwrap();
        let private_key = *wallet_core::Account::private_key(&leaf);

        let mut tx = BitcoinTransaction::new(blockchain_type);
        let source_idx = tx.add_source().unwrap();
        {
            let source = tx.source(source_idx).unwrap();
            source.set_big_int("amount", BigInt::from_u64(100_000)).unwrap();
            source.set_bytes("prev_tx_hash", vec![0x11; 32]).unwrap();
            source.set_int32("prev_tx_out_index", 0).unwrap();
            let pubkey = wallet_core::Account::public_key_compressed(&leaf);
            let hash = wallet_core::primitives::hash::hash160(&pubkey);
            source.set_bytes("prev_tx_out_script_pubkey", address::p2pkh_script(&hash)).unwrap();
            source.set_private_key("private_key", private_key).unwrap();
        }
        let dest_idx = tx.add_destination().unwrap();
        {
            let dest = tx.destination(dest_idx).unwrap();
            dest.set_big_int("amount", BigInt::from_u64(100_000 - leftover)).unwrap();
            dest.set_str("address", encode_wif_to_address(&leaf)).unwrap();
        }
        tx.fee().unwrap().set_big_int("amount_per_byte", BigInt::from_u64(10)).unwrap();
        tx
    }

    fn encode_wif_to_address(leaf: &impl wallet_core::Account) -> String {
        wallet_core::Account::address(leaf).unwrap()
    }

    #[test]
    fn signs_and_serializes() {
        let (mut tx, _) = sample_transaction();
        let serialized = tx.serialize().unwrap();
        assert_eq!(&serialized[0..4], &VERSION.to_le_bytes());
        let fee = tx.total_fee().unwrap();
        assert_eq!(fee.to_decimal_string(), (tx.size_estimate(1) * 10).to_string());
    }

    #[test]
    fn estimate_matches_final_fee_when_no_bounds_set() {
        let (mut tx, _) = sample_transaction();
        let estimate = tx.estimate_total_fee().unwrap();
        tx.serialize().unwrap();
        assert_eq!(estimate.to_decimal_string(), tx.total_fee().unwrap().to_decimal_string());
    }

    #[test]
    fn rejects_fee_below_default_min_bound() {
        // No min_amount_per_byte set: the default of 1 still applies, so a
        // leftover below size_estimate(1) * 1 == 191 must be rejected.
        let mut tx = sample_transaction_with_leftover(50);
        assert!(matches!(tx.update(), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn rejects_transaction_with_no_sources() {
        let blockchain_type = BlockchainType::mainnet(Blockchain::Bitcoin);
        let mut tx = BitcoinTransaction::new(blockchain_type);
        assert!(matches!(tx.update(), Err(Error::TransactionNoSources)));
    }

    #[test]
    fn wif_helper_is_exercised() {
        let key = [3u8; 32];
        let blockchain_type = BlockchainType::mainnet(Blockchain::Bitcoin);
        let wif = encode_wif(&key, blockchain_type);
        assert!(!wif.is_empty());
        let codec_address = BitcoinCodec::derive_address(&ecdsa::public_key_compressed(&ecdsa::secret_key_from_bytes(&key).unwrap()), blockchain_type).unwrap();
        assert!(!codec_address.is_empty());
    }
}
