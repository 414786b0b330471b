use super::binder::{Binder, Predicate, Trait};
use super::value::{Value, ValueKind};
use crate::bigint::BigInt;
use crate::error::{Error, Result};
use secp256k1::SecretKey;

/// A named collection of [`Binder`]s. Insertion order is preserved so
/// [`Properties::specification`] prints a stable schema listing.
#[derive(Default)]
pub struct Properties {
    entries: Vec<(String, Binder)>,
    dirty: bool,
}

impl Properties {
    pub fn new() -> Self {
        Properties { entries: Vec::new(), dirty: false }
    }

    /// Binds a new named slot. Fails with `AlreadyExists` if the name is
    /// already bound.
    pub fn bind(&mut self, name: impl Into<String>, kind: ValueKind, trait_: Trait, predicate: Option<Predicate>) -> Result<()> {
        let name = name.into();
        if self.entries.iter().any(|(n, _)| n == &name) {
            return Err(Error::AlreadyExists(name));
        }
        self.entries.push((name, Binder::new(kind, trait_, predicate)));
        Ok(())
    }

    fn index_of(&self, name: &str) -> Result<usize> {
        self.entries
            .iter()
            .position(|(n, _)| n == name)
            .ok_or_else(|| Error::invalid_argument(format!("unknown property '{name}'")))
    }

    /// Sets `name` to `value`, dispatching on value kind. Leaves the slot
    /// unchanged if the predicate rejects the candidate value.
    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        let idx = self.index_of(name)?;
        self.entries[idx].1.set(value)?;
        self.dirty = true;
        Ok(())
    }

    pub fn reset(&mut self, name: &str) -> Result<()> {
        let idx = self.index_of(name)?;
        self.entries[idx].1.reset();
        self.dirty = true;
        Ok(())
    }

    pub fn is_set(&self, name: &str) -> Result<bool> {
        Ok(self.entries[self.index_of(name)?].1.is_set())
    }

    pub fn get(&self, name: &str) -> Result<&Value> {
        let idx = self.index_of(name)?;
        self.entries[idx].1.value().ok_or_else(|| Error::NotSet(name.to_string()))
    }

    /// The `ValueKind` a name is bound to, without requiring a value to be
    /// set yet. Lets callers like the JSON front door pick the right
    /// conversion before constructing a `Value`.
    pub fn kind_of(&self, name: &str) -> Result<ValueKind> {
        Ok(self.entries[self.index_of(name)?].1.kind())
    }

    /// Succeeds iff every `Required` slot is set; on failure the error
    /// carries the joined list of missing names. Clears the dirty bit only
    /// on success.
    pub fn validate(&mut self) -> Result<()> {
        let missing: Vec<&str> = self
            .entries
            .iter()
            .filter(|(_, b)| b.trait_() == Trait::Required && !b.is_set())
            .map(|(n, _)| n.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(Error::NotSet(missing.join(", ")));
        }
        self.dirty = false;
        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// One line per property: name, kind, and trait.
    pub fn specification(&self) -> String {
        self.entries
            .iter()
            .map(|(name, b)| format!("{name}: {} ({:?})", b.kind(), b.trait_()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn get_int32(&self, name: &str) -> Result<i32> {
        self.get(name)?.as_int32()
    }

    pub fn set_int32(&mut self, name: &str, value: i32) -> Result<()> {
        self.set(name, Value::Int32(value))
    }

    pub fn get_big_int(&self, name: &str) -> Result<&BigInt> {
        self.get(name)?.as_big_int()
    }

    pub fn set_big_int(&mut self, name: &str, value: BigInt) -> Result<()> {
        self.set(name, Value::BigInt(value))
    }

    pub fn get_str(&self, name: &str) -> Result<&str> {
        self.get(name)?.as_str()
    }

    pub fn set_str(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        self.set(name, Value::Str(value.into()))
    }

    pub fn get_bytes(&self, name: &str) -> Result<&[u8]> {
        self.get(name)?.as_bytes()
    }

    pub fn set_bytes(&mut self, name: &str, value: Vec<u8>) -> Result<()> {
        self.set(name, Value::Bytes(value))
    }

    pub fn get_private_key(&self, name: &str) -> Result<&SecretKey> {
        self.get(name)?.as_private_key()
    }

    pub fn set_private_key(&mut self, name: &str, value: SecretKey) -> Result<()> {
        self.set(name, Value::PrivateKey(value))
    }

    /// Looks up the value for `name`, falling back to `default` if unset.
    pub fn get_int32_or(&self, name: &str, default: i32) -> Result<i32> {
        if self.is_set(name)? {
            self.get_int32(name)
        } else {
            Ok(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_rejects_duplicate_names() {
        let mut props = Properties::new();
        props.bind("amount", ValueKind::Int32, Trait::Required, None).unwrap();
        assert!(props.bind("amount", ValueKind::Int32, Trait::Optional, None).is_err());
    }

    #[test]
    fn validate_reports_missing_required_slots() {
        let mut props = Properties::new();
        props.bind("amount", ValueKind::Int32, Trait::Required, None).unwrap();
        props.bind("memo", ValueKind::Str, Trait::Optional, None).unwrap();
        assert!(props.validate().is_err());
        props.set_int32("amount", 5).unwrap();
        props.validate().unwrap();
    }

    #[test]
    fn dirty_bit_tracks_mutation() {
        let mut props = Properties::new();
        props.bind("amount", ValueKind::Int32, Trait::Required, None).unwrap();
        assert!(!props.is_dirty());
        props.set_int32("amount", 1).unwrap();
        assert!(props.is_dirty());
        props.validate().unwrap();
        assert!(!props.is_dirty());
        props.reset("amount").unwrap();
        assert!(props.is_dirty());
    }

    #[test]
    fn specification_lists_every_property() {
        let mut props = Properties::new();
        props.bind("amount", ValueKind::Int32, Trait::Required, None).unwrap();
        let spec = props.specification();
        assert!(spec.contains("amount: int32 (Required)"));
    }
}
