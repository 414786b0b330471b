//! Packed binary EOS transaction: synthesized transfer action plus the
//! builder protocol for alternate action shapes.

use crate::name::EosName;
use chrono::{DateTime, Utc};
use log::debug;
use wallet_core::primitives::codec::base58_encode;
use wallet_core::primitives::ecdsa;
use wallet_core::primitives::hash::sha256;
use wallet_core::stream::BinaryStream;
use wallet_core::{BigInt, BlockchainType, Error, Properties, Result, Trait, Transaction, TransactionBuilder, ValueKind};

/// Seconds added to an explicit ISO-8601 expiration, matching the reference
/// implementation's confirmation window.
const TIME_CONFIRM_TRANSACTION: i64 = 30;

const MAINNET_CHAIN_ID: [u8; 32] = [
    0xac, 0xa3, 0x76, 0xf2, 0x06, 0xb8, 0xfc, 0x25, 0xa6, 0xed, 0x44, 0xdb, 0xdc, 0x66, 0x54, 0x7c, 0x36, 0xc6, 0xc3,
    0x3e, 0x3a, 0x11, 0x9f, 0xfb, 0xea, 0xef, 0x94, 0x36, 0x42, 0xf0, 0xe9, 0x06,
];
const TESTNET_CHAIN_ID: [u8; 32] = [
    0x03, 0x8f, 0x4b, 0x0f, 0xc8, 0xff, 0x18, 0xa4, 0xf0, 0x84, 0x2a, 0x8f, 0x05, 0x64, 0x61, 0x1f, 0x6e, 0x96, 0xe8,
    0x53, 0x59, 0x01, 0xdd, 0x45, 0xe4, 0x3a, 0xc8, 0x69, 0x1a, 0x1c, 0x4d, 0xca,
];
const ZERO_SHA256: [u8; 32] = [0u8; 32];

fn chain_id(blockchain_type: BlockchainType) -> [u8; 32] {
    if blockchain_type.is_mainnet() {
        MAINNET_CHAIN_ID
    } else {
        TESTNET_CHAIN_ID
    }
}

/// One EOS action: a named contract entry point, its authorizing actors,
/// and its opaque packed data payload.
#[derive(Clone)]
pub struct Action {
    pub account: EosName,
    pub name: EosName,
    pub authorizations: Vec<(EosName, EosName)>,
    pub data: Vec<u8>,
}

impl Action {
    fn write(&self, stream: &mut BinaryStream) {
        stream.write_u64_le(self.account.as_u64());
        stream.write_u64_le(self.name.as_u64());
        stream.write_compact_size(self.authorizations.len() as u64);
        for (actor, permission) in &self.authorizations {
            stream.write_u64_le(actor.as_u64());
            stream.write_u64_le(permission.as_u64());
        }
        stream.write_var_bytes(&self.data);
    }
}

fn transfer_action_data(from: EosName, to: EosName, amount: u64, memo: &str) -> Result<Vec<u8>> {
    if memo.len() > 255 {
        return Err(Error::invalid_argument("EOS memo must be at most 255 bytes"));
    }
    let mut stream = BinaryStream::new();
    stream.write_u64_le(from.as_u64());
    stream.write_u64_le(to.as_u64());
    stream.write_u64_le(amount);
    stream.write_u8(4); // precision
    let mut symbol = [0u8; 7];
    symbol[..3].copy_from_slice(b"EOS");
    stream.write_bytes(&symbol);
    stream.write_var_bytes(memo.as_bytes());
    Ok(stream.into_vec())
}

fn bind_source_properties() -> Result<Properties> {
    let mut props = Properties::new();
    props.bind("from", ValueKind::Str, Trait::Required, None)?;
    props.bind("private_key", ValueKind::PrivateKey, Trait::Required, None)?;
    Ok(props)
}

fn bind_destination_properties() -> Result<Properties> {
    let mut props = Properties::new();
    props.bind("to", ValueKind::Str, Trait::Required, None)?;
    props.bind("amount", ValueKind::BigInt, Trait::Required, None)?;
    props.bind("memo", ValueKind::Str, Trait::Optional, None)?;
    Ok(props)
}

fn bind_tx_properties() -> Result<Properties> {
    let mut props = Properties::new();
    props.bind("ref_block_num", ValueKind::Int32, Trait::Required, None)?;
    props.bind("ref_block_prefix", ValueKind::BigInt, Trait::Required, None)?;
    props.bind("expiration_iso8601", ValueKind::Str, Trait::Optional, None)?;
    props.bind("expiration_unix", ValueKind::BigInt, Trait::Optional, None)?;
    Ok(props)
}

pub struct EosTransaction {
    blockchain_type: BlockchainType,
    source: Option<Properties>,
    destination: Option<Properties>,
    properties: Properties,
    external_actions: Vec<Action>,
    signature: Option<String>,
    packed: Option<Vec<u8>>,
}

impl EosTransaction {
    pub fn new(blockchain_type: BlockchainType) -> Self {
        EosTransaction {
            blockchain_type,
            source: None,
            destination: None,
            properties: bind_tx_properties().expect("static tx schema"),
            external_actions: Vec::new(),
            signature: None,
            packed: None,
        }
    }

    /// Registers an externally built action; once any are present the
    /// transaction stops synthesizing its own transfer action.
    pub fn push_external_action(&mut self, action: Action) {
        self.external_actions.push(action);
    }

    fn expiration_epoch(&self) -> Result<u32> {
        if let Ok(iso) = self.properties.get_str("expiration_iso8601") {
            let parsed: DateTime<Utc> = iso
                .parse::<DateTime<Utc>>()
                .map_err(|e| Error::invalid_argument(format!("invalid ISO-8601 expiration: {e}")))?;
            let epoch = parsed.timestamp() + TIME_CONFIRM_TRANSACTION;
            return u32::try_from(epoch).map_err(|_| Error::out_of_range("expiration out of u32 range"));
        }
        if let Ok(unix) = self.properties.get_big_int("expiration_unix") {
            return unix.to_u64()?.try_into().map_err(|_| Error::out_of_range("expiration out of u32 range"));
        }
        Err(Error::NotSet("expiration_iso8601 or expiration_unix".to_string()))
    }

    fn actions(&self) -> Result<Vec<Action>> {
        if !self.external_actions.is_empty() {
            return Ok(self.external_actions.clone());
        }
        let source = self.source.as_ref().ok_or(Error::TransactionNoSources)?;
        let destination = self.destination.as_ref().ok_or(Error::TransactionNoDestinations)?;
        let from = EosName::parse(source.get_str("from")?)?;
        let to = EosName::parse(destination.get_str("to")?)?;
        let amount = destination.get_big_int("amount")?.to_u64()?;
        let memo = destination.get_str("memo").unwrap_or("");
        let data = transfer_action_data(from, to, amount, memo)?;
        Ok(vec![Action {
            account: EosName::parse("eosio.token")?,
            name: EosName::parse("transfer")?,
            authorizations: vec![(from, EosName::parse("active")?)],
            data,
        }])
    }

    fn pack(&self) -> Result<Vec<u8>> {
        let expiration = self.expiration_epoch()?;
        let ref_block_num = self.properties.get_int32("ref_block_num")? as u16;
        let ref_block_prefix = self.properties.get_big_int("ref_block_prefix")?.to_u64()? as u32;
        let actions = self.actions()?;

        let mut stream = BinaryStream::new();
        stream.write_u32_le(expiration);
        stream.write_u16_le(ref_block_num);
        stream.write_u32_le(ref_block_prefix);
        stream.write_compact_size(0); // max_net_usage_words
        stream.write_u8(0); // max_cpu_usage_ms
        stream.write_compact_size(0); // delay_sec
        stream.write_compact_size(0); // context_free_actions
        stream.write_compact_size(actions.len() as u64);
        for action in &actions {
            action.write(&mut stream);
        }
        stream.write_compact_size(0); // transaction_extensions
        Ok(stream.into_vec())
    }
}

impl Transaction for EosTransaction {
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
            return Err(Error::invalid_argument("eos has exactly one source"));
        }
        self.source.as_mut().ok_or(Error::TransactionNoSources)
    }

    fn destination(&mut self, index: usize) -> Result<&mut Properties> {
        if index != 0 {
            return Err(Error::invalid_argument("eos has exactly one destination"));
        }
        self.destination.as_mut().ok_or(Error::TransactionNoDestinations)
    }

    fn fee(&mut self) -> Result<&mut Properties> {
        Err(Error::FeatureNotSupported("eos transactions have no fee property group".to_string()))
    }

    fn properties(&mut self) -> &mut Properties {
        &mut self.properties
    }

    fn update(&mut self) -> Result<()> {
        self.properties.validate()?;
        if self.external_actions.is_empty() {
            self.source.as_mut().ok_or(Error::TransactionNoSources)?.validate()?;
            self.destination.as_mut().ok_or(Error::TransactionNoDestinations)?.validate()?;
        }
        self.packed = Some(self.pack()?);
        debug!("eos transaction updated: {} action(s)", self.actions()?.len());
        Ok(())
    }

    fn sign(&mut self) -> Result<()> {
        self.update()?;
        let packed = self.packed.clone().expect("set by update");
        let mut preimage = Vec::with_capacity(32 + packed.len() + 32);
        preimage.extend_from_slice(&chain_id(self.blockchain_type));
        preimage.extend_from_slice(&packed);
        preimage.extend_from_slice(&ZERO_SHA256);
        let digest = sha256(&preimage);

        let private_key = *self
            .source
            .as_ref()
            .ok_or(Error::TransactionNoSources)?
            .get_private_key("private_key")?;
        let (r, s, recovery_id) = ecdsa::sign_recoverable(&private_key, &digest)?;
        let mut sig = Vec::with_capacity(65);
        sig.push(recovery_id + 31); // +27 base, +4 for compressed pubkey
        sig.extend_from_slice(&r);
        sig.extend_from_slice(&s);
        self.signature = Some(format!("SIG_K1_{}", base58_encode(&sig)));
        debug!("eos transaction signed");
        Ok(())
    }

    fn serialize(&mut self) -> Result<Vec<u8>> {
        if self.signature.is_none() {
            self.sign()?;
        }
        Ok(self.packed.clone().expect("set by sign"))
    }

    fn encode_serialized(&mut self) -> Result<String> {
        let packed = self.serialize()?;
        let signature = self.signature.clone().expect("set by serialize");
        Ok(format!(
            "{{\"signatures\":[\"{signature}\"],\"packed_trx\":\"{}\",\"compression\":\"none\",\"packed_context_free_data\":\"\"}}",
            hex::encode(packed)
        ))
    }

    fn total_spent(&self) -> Result<BigInt> {
        let destination = self.destination.as_ref().ok_or(Error::TransactionNoDestinations)?;
        destination.get_big_int("amount").map(|v| v.clone())
    }

    fn total_fee(&self) -> Result<BigInt> {
        Ok(BigInt::zero())
    }

    fn estimate_total_fee(&self) -> Result<BigInt> {
        Ok(BigInt::zero())
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

/// Lets a registered builder validate its own payload and inject a fully
/// formed action, bypassing the synthesized transfer action.
pub struct ActionBuilder {
    payload: Properties,
    account: EosName,
    name: EosName,
}

impl ActionBuilder {
    pub fn new(account: &str, name: &str) -> Result<Self> {
        let mut payload = Properties::new();
        payload.bind("actor", ValueKind::Str, Trait::Required, None)?;
        payload.bind("permission", ValueKind::Str, Trait::Required, None)?;
        payload.bind("data", ValueKind::Bytes, Trait::Required, None)?;
        Ok(ActionBuilder { payload, account: EosName::parse(account)?, name: EosName::parse(name)? })
    }
}

impl TransactionBuilder for ActionBuilder {
    fn payload(&mut self) -> &mut Properties {
        &mut self.payload
    }

    fn build(&mut self, transaction: &mut dyn Transaction) -> Result<()> {
        self.payload.validate()?;
        let actor = EosName::parse(self.payload.get_str("actor")?)?;
        let permission = EosName::parse(self.payload.get_str("permission")?)?;
        let data = self.payload.get_bytes("data")?.to_vec();
        let action = Action { account: self.account, name: self.name, authorizations: vec![(actor, permission)], data };
        let eos_tx = transaction
            .as_any_mut()
            .downcast_mut::<EosTransaction>()
            .ok_or_else(|| Error::FeatureNotSupported("builder requires an EosTransaction".to_string()))?;
        eos_tx.push_external_action(action);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallet_core::primitives::ecdsa;
    use wallet_core::Blockchain;

    fn sample() -> EosTransaction {
        let mut tx = EosTransaction::new(BlockchainType::mainnet(Blockchain::Eos));
        tx.add_source().unwrap();
        let key = ecdsa::secret_key_from_bytes(&[8u8; 32]).unwrap();
        tx.source(0).unwrap().set_str("from", "alice").unwrap();
        tx.source(0).unwrap().set_private_key("private_key", key).unwrap();
        tx.add_destination().unwrap();
        tx.destination(0).unwrap().set_str("to", "bob").unwrap();
        tx.destination(0).unwrap().set_big_int("amount", BigInt::from_u64(10_000)).unwrap();
        tx.properties().set_int32("ref_block_num", 100).unwrap();
        tx.properties().set_big_int("ref_block_prefix", BigInt::from_u64(123456)).unwrap();
        tx.properties().set_big_int("expiration_unix", BigInt::from_u64(1_600_000_000)).unwrap();
        tx
    }

    #[test]
    fn packs_and_signs() {
        let mut tx = sample();
        let serialized = tx.serialize().unwrap();
        assert_eq!(&serialized[0..4], &1_600_000_000u32.to_le_bytes());
        assert!(tx.signature.as_ref().unwrap().starts_with("SIG_K1_"));
    }

    #[test]
    fn encode_serialized_matches_shape() {
        let mut tx = sample();
        let encoded = tx.encode_serialized().unwrap();
        assert!(encoded.contains("\"signatures\":[\"SIG_K1_"));
        assert!(encoded.contains("\"compression\":\"none\""));
    }

    #[test]
    fn explicit_iso8601_adds_confirmation_window() {
        let mut tx = sample();
        tx.properties = bind_tx_properties().unwrap();
        tx.properties.set_int32("ref_block_num", 1).unwrap();
        tx.properties.set_big_int("ref_block_prefix", BigInt::from_u64(1)).unwrap();
        tx.properties.set_str("expiration_iso8601", "2020-01-01T00:00:00Z").unwrap();
        let epoch = tx.expiration_epoch().unwrap();
        assert_eq!(epoch, 1577836800 + 30);
    }

    #[test]
    fn fee_is_not_supported() {
        let mut tx = sample();
        assert!(matches!(tx.fee(), Err(Error::FeatureNotSupported(_))));
    }
}
