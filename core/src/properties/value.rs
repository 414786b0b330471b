use crate::bigint::BigInt;
use crate::error::{Error, Result};
use secp256k1::SecretKey;
use std::fmt;

/// The exact set of value kinds a property can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Int32,
    BigInt,
    Str,
    Bytes,
    PrivateKey,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Int32 => "int32",
            ValueKind::BigInt => "big-integer",
            ValueKind::Str => "string",
            ValueKind::Bytes => "byte string",
            ValueKind::PrivateKey => "private key",
        };
        write!(f, "{name}")
    }
}

/// A materialized property value. `Debug` never prints private-key bytes.
#[derive(Clone)]
pub enum Value {
    Int32(i32),
    BigInt(BigInt),
    Str(String),
    Bytes(Vec<u8>),
    PrivateKey(SecretKey),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int32(_) => ValueKind::Int32,
            Value::BigInt(_) => ValueKind::BigInt,
            Value::Str(_) => ValueKind::Str,
            Value::Bytes(_) => ValueKind::Bytes,
            Value::PrivateKey(_) => ValueKind::PrivateKey,
        }
    }

    pub fn as_int32(&self) -> Result<i32> {
        match self {
            Value::Int32(v) => Ok(*v),
            other => Err(type_mismatch("value", ValueKind::Int32, other.kind())),
        }
    }

    pub fn as_big_int(&self) -> Result<&BigInt> {
        match self {
            Value::BigInt(v) => Ok(v),
            other => Err(type_mismatch("value", ValueKind::BigInt, other.kind())),
        }
    }

    pub fn as_str(&self) -> Result<&str> {
        match self {
            Value::Str(v) => Ok(v),
            other => Err(type_mismatch("value", ValueKind::Str, other.kind())),
        }
    }

    pub fn as_bytes(&self) -> Result<&[u8]> {
        match self {
            Value::Bytes(v) => Ok(v),
            other => Err(type_mismatch("value", ValueKind::Bytes, other.kind())),
        }
    }

    pub fn as_private_key(&self) -> Result<&SecretKey> {
        match self {
            Value::PrivateKey(v) => Ok(v),
            other => Err(type_mismatch("value", ValueKind::PrivateKey, other.kind())),
        }
    }
}

fn type_mismatch(name: &str, expected: ValueKind, got: ValueKind) -> Error {
    Error::TypeMismatch {
        name: name.to_string(),
        expected: kind_str(expected),
        got: kind_str(got),
    }
}

fn kind_str(kind: ValueKind) -> &'static str {
    match kind {
        ValueKind::Int32 => "int32",
        ValueKind::BigInt => "big-integer",
        ValueKind::Str => "string",
        ValueKind::Bytes => "byte string",
        ValueKind::PrivateKey => "private key",
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int32(v) => write!(f, "Int32({v})"),
            Value::BigInt(v) => write!(f, "BigInt({v})"),
            Value::Str(v) => write!(f, "Str({v:?})"),
            Value::Bytes(v) => write!(f, "Bytes({} bytes)", v.len()),
            Value::PrivateKey(_) => write!(f, "PrivateKey(<redacted>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_private_key() {
        let key = SecretKey::from_slice(&[7u8; 32]).unwrap();
        let value = Value::PrivateKey(key);
        assert_eq!(format!("{value:?}"), "PrivateKey(<redacted>)");
    }

    #[test]
    fn as_accessors_report_type_mismatch() {
        let value = Value::Int32(3);
        assert!(value.as_str().is_err());
        assert_eq!(value.as_int32().unwrap(), 3);
    }
}
