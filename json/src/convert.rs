//! JSON scalar -> bound property `Value` conversion, per §4.10's accepted
//! shapes: big integers as a JSON number, a decimal string, or `0x` hex;
//! byte strings as raw hex by default or an explicit `hex:`/`base32:`/
//! `base58:` prefix; private keys as the chain's own serialized text form.

use serde_json::Value as Json;
use wallet_core::primitives::codec::{base32_decode, base58_decode, hex_decode};
use wallet_core::{BigInt, Error, Facade, NetType, Result, Value, ValueKind};

pub fn convert(facade: &dyn Facade, net_type: NetType, kind: ValueKind, name: &str, json: &Json) -> Result<Value> {
    match kind {
        ValueKind::Int32 => {
            let n = json.as_i64().ok_or_else(|| Error::invalid_argument(format!("'{name}' must be an integer")))?;
            let n = i32::try_from(n).map_err(|_| Error::out_of_range(format!("'{name}' does not fit in i32")))?;
            Ok(Value::Int32(n))
        }
        ValueKind::BigInt => Ok(Value::BigInt(convert_big_int(name, json)?)),
        ValueKind::Str => {
            let s = json.as_str().ok_or_else(|| Error::invalid_argument(format!("'{name}' must be a string")))?;
            Ok(Value::Str(s.to_string()))
        }
        ValueKind::Bytes => Ok(Value::Bytes(convert_bytes(name, json)?)),
        ValueKind::PrivateKey => {
            let s = json.as_str().ok_or_else(|| Error::invalid_argument(format!("'{name}' must be a string")))?;
            let account = facade.make_account(net_type, s.as_bytes())?;
            Ok(Value::PrivateKey(*account.private_key()))
        }
    }
}

fn convert_big_int(name: &str, json: &Json) -> Result<BigInt> {
    if let Some(n) = json.as_i64() {
        return Ok(BigInt::from_i64(n));
    }
    if let Some(n) = json.as_u64() {
        return Ok(BigInt::from_u64(n));
    }
    if let Some(s) = json.as_str() {
        return if s.starts_with("0x") || s.starts_with("0X") { BigInt::from_hex_str(s) } else { BigInt::from_decimal_str(s) };
    }
    Err(Error::invalid_argument(format!("'{name}' must be an integer, decimal string, or hex string")))
}

fn convert_bytes(name: &str, json: &Json) -> Result<Vec<u8>> {
    let s = json.as_str().ok_or_else(|| Error::invalid_argument(format!("'{name}' must be a string")))?;
    if let Some(rest) = s.strip_prefix("hex:") {
        hex_decode(rest)
    } else if let Some(rest) = s.strip_prefix("base32:") {
        base32_decode(rest)
    } else if let Some(rest) = s.strip_prefix("base58:") {
        base58_decode(rest)
    } else {
        hex_decode(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wallet_bitcoin::BitcoinFacade;

    #[test]
    fn int32_rejects_out_of_range() {
        let facade = BitcoinFacade;
        let big = json!(5_000_000_000i64);
        assert!(convert(&facade, 0, ValueKind::Int32, "n", &big).is_err());
    }

    #[test]
    fn big_int_accepts_number_decimal_and_hex() {
        let facade = BitcoinFacade;
        assert_eq!(convert(&facade, 0, ValueKind::BigInt, "n", &json!(42)).unwrap().as_big_int().unwrap().to_decimal_string(), "42");
        assert_eq!(
            convert(&facade, 0, ValueKind::BigInt, "n", &json!("42")).unwrap().as_big_int().unwrap().to_decimal_string(),
            "42"
        );
        assert_eq!(
            convert(&facade, 0, ValueKind::BigInt, "n", &json!("0x2a")).unwrap().as_big_int().unwrap().to_decimal_string(),
            "42"
        );
    }

    #[test]
    fn bytes_default_to_hex_and_honor_explicit_codec_prefix() {
        let facade = BitcoinFacade;
        let plain = convert(&facade, 0, ValueKind::Bytes, "b", &json!("2a")).unwrap();
        assert_eq!(plain.as_bytes().unwrap(), &[0x2a]);
        let prefixed = convert(&facade, 0, ValueKind::Bytes, "b", &json!("hex:2a")).unwrap();
        assert_eq!(prefixed.as_bytes().unwrap(), &[0x2a]);
    }
}
