//! Textual (JSON) Graphene-style transaction: header, a single `transfer`
//! operation, and real deterministic-ECDSA signing over the packed body.

use crate::address::is_valid_account_name;
use chrono::{DateTime, SecondsFormat, Utc};
use log::debug;
use serde_json::json;
use wallet_core::primitives::ecdsa;
use wallet_core::primitives::hash::sha256;
use wallet_core::stream::BinaryStream;
use wallet_core::{BigInt, BlockchainType, Error, Properties, Result, Trait, Transaction, ValueKind};

const TOKEN_NAME: &str = "GOLOS";
const VALUE_DECIMAL_PLACES: usize = 3;
const EXPIRE_MIN_SECONDS: i32 = 10;

fn validate_account_name(v: &wallet_core::Value) -> Result<()> {
    let name = v.as_str()?;
    if !is_valid_account_name(name) {
        return Err(Error::invalid_address(format!("invalid golos account name '{name}'")));
    }
    Ok(())
}

fn bind_source_properties() -> Result<Properties> {
    let mut props = Properties::new();
    props.bind("address", ValueKind::Str, Trait::Required, Some(Box::new(validate_account_name)))?;
    props.bind("private_key", ValueKind::PrivateKey, Trait::Required, None)?;
    Ok(props)
}

fn bind_destination_properties() -> Result<Properties> {
    let mut props = Properties::new();
    props.bind("address", ValueKind::Str, Trait::Required, Some(Box::new(validate_account_name)))?;
    props.bind(
        "amount",
        ValueKind::BigInt,
        Trait::Required,
        Some(Box::new(|v| {
            if v.as_big_int()?.is_negative() {
                return Err(Error::invalid_argument("amount must not be negative"));
            }
            Ok(())
        })),
    )?;
    props.bind("memo", ValueKind::Str, Trait::Optional, None)?;
    Ok(props)
}

fn bind_tx_properties() -> Result<Properties> {
    let mut props = Properties::new();
    props.bind("ref_block_num", ValueKind::Int32, Trait::Required, None)?;
    props.bind("ref_block_hash", ValueKind::Bytes, Trait::Required, None)?;
    props.bind(
        "expire_duration",
        ValueKind::Int32,
        Trait::Optional,
        Some(Box::new(|v| {
            if v.as_int32()? <= EXPIRE_MIN_SECONDS {
                return Err(Error::invalid_argument(format!(
                    "expire_duration must be greater than {EXPIRE_MIN_SECONDS} seconds"
                )));
            }
            Ok(())
        })),
    )?;
    props.bind("expiration", ValueKind::Str, Trait::Optional, None)?;
    Ok(props)
}

/// Formats a minimal-unit integer amount with exactly three decimal places
/// plus the token suffix, e.g. `1000` -> `"1.000 GOLOS"`.
fn format_amount(amount: &BigInt) -> String {
    let digits = amount.to_decimal_string();
    let padded = if digits.len() <= VALUE_DECIMAL_PLACES {
        format!("{:0>width$}", digits, width = VALUE_DECIMAL_PLACES + 1)
    } else {
        digits
    };
    let split_at = padded.len() - VALUE_DECIMAL_PLACES;
    format!("{}.{} {TOKEN_NAME}", &padded[..split_at], &padded[split_at..])
}

fn ref_block_prefix(block_hash: &[u8]) -> Result<u32> {
    if block_hash.len() != 20 {
        return Err(Error::invalid_argument(format!("ref_block_hash must be 20 bytes, got {}", block_hash.len())));
    }
    Ok(u32::from_le_bytes(block_hash[4..8].try_into().expect("checked length")))
}

struct Transfer {
    from: String,
    to: String,
    amount: BigInt,
    memo: String,
}

impl Transfer {
    fn write_binary(&self, stream: &mut BinaryStream) {
        stream.write_compact_size(0); // operation id: transfer
        stream.write_var_bytes(self.from.as_bytes());
        stream.write_var_bytes(self.to.as_bytes());
        stream.write_u64_le(self.amount.to_u64().unwrap_or(0));
        stream.write_var_bytes(self.memo.as_bytes());
    }

    fn to_json(&self) -> serde_json::Value {
        json!([
            "transfer",
            {
                "from": self.from,
                "to": self.to,
                "amount": format_amount(&self.amount),
                "memo": self.memo,
            }
        ])
    }
}

pub struct GolosTransaction {
    #[allow(dead_code)]
    blockchain_type: BlockchainType,
    source: Option<Properties>,
    destination: Option<Properties>,
    properties: Properties,
    expiration: Option<i64>,
    signature: Option<String>,
    envelope: Option<String>,
}

impl GolosTransaction {
    pub fn new(blockchain_type: BlockchainType) -> Self {
        GolosTransaction {
            blockchain_type,
            source: None,
            destination: None,
            properties: bind_tx_properties().expect("static tx schema"),
            expiration: None,
            signature: None,
            envelope: None,
        }
    }

    fn transfer(&self) -> Result<Transfer> {
        let source = self.source.as_ref().ok_or(Error::TransactionNoSources)?;
        let destination = self.destination.as_ref().ok_or(Error::TransactionNoDestinations)?;
        Ok(Transfer {
            from: source.get_str("address")?.to_string(),
            to: destination.get_str("address")?.to_string(),
            amount: destination.get_big_int("amount")?.clone(),
            memo: destination.get_str("memo").unwrap_or("").to_string(),
        })
    }

    fn resolve_expiration(&self) -> Result<i64> {
        if let Ok(iso) = self.properties.get_str("expiration") {
            let parsed: DateTime<Utc> =
                iso.parse::<DateTime<Utc>>().map_err(|e| Error::invalid_argument(format!("invalid ISO-8601 expiration: {e}")))?;
            return Ok(parsed.timestamp());
        }
        if self.properties.is_set("expire_duration")? {
            let duration = self.properties.get_int32("expire_duration")?;
            return Ok(Utc::now().timestamp() + i64::from(duration));
        }
        Err(Error::NotSet("expiration or expire_duration".to_string()))
    }

    fn pack(&self) -> Result<(u16, u32, i64, Vec<u8>)> {
        let ref_block_num = self.properties.get_int32("ref_block_num")? as u16;
        let prefix = ref_block_prefix(self.properties.get_bytes("ref_block_hash")?)?;
        let expiration = self.expiration.ok_or_else(|| Error::NotSet("expiration".to_string()))?;

        let mut stream = BinaryStream::new();
        stream.write_u16_le(ref_block_num);
        stream.write_u32_le(prefix);
        stream.write_u32_le(u32::try_from(expiration).map_err(|_| Error::out_of_range("expiration out of u32 range"))?);
        self.transfer()?.write_binary(&mut stream);
        stream.write_compact_size(0); // extensions
        Ok((ref_block_num, prefix, expiration, stream.into_vec()))
    }
}

impl Transaction for GolosTransaction {
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
            return Err(Error::invalid_argument("golos has exactly one source"));
        }
        self.source.as_mut().ok_or(Error::TransactionNoSources)
    }

    fn destination(&mut self, index: usize) -> Result<&mut Properties> {
        if index != 0 {
            return Err(Error::invalid_argument("golos has exactly one destination"));
        }
        self.destination.as_mut().ok_or(Error::TransactionNoDestinations)
    }

    fn fee(&mut self) -> Result<&mut Properties> {
        Err(Error::FeatureNotSupported("golos transactions have no fee property group".to_string()))
    }

    fn properties(&mut self) -> &mut Properties {
        &mut self.properties
    }

    fn update(&mut self) -> Result<()> {
        self.properties.validate()?;
        self.source.as_mut().ok_or(Error::TransactionNoSources)?.validate()?;
        self.destination.as_mut().ok_or(Error::TransactionNoDestinations)?.validate()?;
        self.expiration = Some(self.resolve_expiration()?);
        debug!("golos transaction updated");
        Ok(())
    }

    fn sign(&mut self) -> Result<()> {
        self.update()?;
        let (_, _, _, packed) = self.pack()?;
        let digest = sha256(&packed);
        let private_key = *self.source.as_ref().ok_or(Error::TransactionNoSources)?.get_private_key("private_key")?;
        let (r, s, recovery_id) = ecdsa::sign_recoverable(&private_key, &digest)?;
        let mut sig = Vec::with_capacity(65);
        sig.push(recovery_id);
        sig.extend_from_slice(&r);
        sig.extend_from_slice(&s);
        self.signature = Some(hex::encode(sig));
        debug!("golos transaction signed");
        Ok(())
    }

    fn serialize(&mut self) -> Result<Vec<u8>> {
        if self.signature.is_none() {
            self.sign()?;
        }
        let (ref_block_num, ref_block_prefix, expiration, _) = self.pack()?;
        let expiration_str = DateTime::<Utc>::from_timestamp(expiration, 0)
            .ok_or_else(|| Error::out_of_range("expiration out of range"))?
            .to_rfc3339_opts(SecondsFormat::Secs, true);
        let signature = self.signature.clone().expect("set by sign");
        let envelope = json!({
            "ref_block_num": ref_block_num,
            "ref_block_prefix": ref_block_prefix,
            "expiration": expiration_str,
            "operations": [self.transfer()?.to_json()],
            "extensions": [],
            "signatures": [signature],
        })
        .to_string();
        self.envelope = Some(envelope.clone());
        Ok(envelope.into_bytes())
    }

    fn encode_serialized(&mut self) -> Result<String> {
        let bytes = self.serialize()?;
        Ok(String::from_utf8(bytes).expect("envelope is built from valid utf8"))
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

#[cfg(test)]
mod tests {
    use super::*;
    use wallet_core::Blockchain;

    fn sample() -> GolosTransaction {
        let mut tx = GolosTransaction::new(BlockchainType::mainnet(Blockchain::Golos));
        tx.add_source().unwrap();
        let key = ecdsa::secret_key_from_bytes(&[9u8; 32]).unwrap();
        tx.source(0).unwrap().set_str("address", "alice").unwrap();
        tx.source(0).unwrap().set_private_key("private_key", key).unwrap();
        tx.add_destination().unwrap();
        tx.destination(0).unwrap().set_str("address", "bob").unwrap();
        tx.destination(0).unwrap().set_big_int("amount", BigInt::from_u64(1500)).unwrap();
        tx.properties().set_int32("ref_block_num", 42).unwrap();
        tx.properties().set_bytes("ref_block_hash", vec![0u8; 20]).unwrap();
        tx.properties().set_str("expiration", "2030-01-01T00:00:00Z").unwrap();
        tx
    }

    #[test]
    fn formats_amount_with_three_decimal_places() {
        assert_eq!(format_amount(&BigInt::from_u64(1500)), "1.500 GOLOS");
        assert_eq!(format_amount(&BigInt::from_u64(5)), "0.005 GOLOS");
    }

    #[test]
    fn rejects_short_expire_duration() {
        let mut props = bind_tx_properties().unwrap();
        assert!(props.set_int32("expire_duration", 5).is_err());
        props.set_int32("expire_duration", 20).unwrap();
    }

    #[test]
    fn encode_serialized_contains_transfer_envelope() {
        let mut tx = sample();
        let encoded = tx.encode_serialized().unwrap();
        assert!(encoded.contains("\"ref_block_num\":42"));
        assert!(encoded.contains("\"amount\":\"1.500 GOLOS\""));
        assert!(encoded.contains("\"signatures\":["));
    }

    #[test]
    fn rejects_transaction_with_no_destination() {
        let mut tx = GolosTransaction::new(BlockchainType::mainnet(Blockchain::Golos));
        tx.add_source().unwrap();
        assert!(matches!(tx.update(), Err(Error::TransactionNoDestinations)));
    }

    #[test]
    fn fee_is_not_supported() {
        let mut tx = sample();
        assert!(matches!(tx.fee(), Err(Error::FeatureNotSupported(_))));
    }

    #[test]
    fn rejects_malformed_account_name_in_address() {
        let mut tx = GolosTransaction::new(BlockchainType::mainnet(Blockchain::Golos));
        tx.add_source().unwrap();
        assert!(matches!(tx.source(0).unwrap().set_str("address", "Not-Valid!"), Err(Error::InvalidAddress(_))));
    }

    #[test]
    fn escapes_quotes_and_backslashes_in_memo_and_address() {
        let mut tx = sample();
        tx.destination(0).unwrap().set_str("memo", "a \"quoted\" \\memo\\").unwrap();
        let encoded = tx.encode_serialized().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        let operations = parsed["operations"].as_array().unwrap();
        assert_eq!(operations[0][1]["memo"], "a \"quoted\" \\memo\\");
    }
}
