use super::value::{Value, ValueKind};
use crate::error::{Error, Result};

/// Whether a slot must be set before validation passes, may be left unset,
/// or may be set at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trait {
    Optional,
    Required,
    ReadOnly,
}

/// A predicate observes the fully materialized candidate value and may
/// reject it; the slot is left unchanged when it does.
pub type Predicate = Box<dyn Fn(&Value) -> Result<()> + Send + Sync>;

/// One named slot: its kind, its trait, an optional predicate, and the
/// current value (if any).
pub struct Binder {
    kind: ValueKind,
    trait_: Trait,
    predicate: Option<Predicate>,
    value: Option<Value>,
}

impl Binder {
    pub fn new(kind: ValueKind, trait_: Trait, predicate: Option<Predicate>) -> Self {
        Binder { kind, trait_, predicate, value: None }
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn trait_(&self) -> Trait {
        self.trait_
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn set(&mut self, value: Value) -> Result<()> {
        if self.trait_ == Trait::ReadOnly && self.is_set() {
            return Err(Error::invalid_argument("property is read-only once set"));
        }
        if value.kind() != self.kind {
            return Err(Error::TypeMismatch {
                name: "value".to_string(),
                expected: kind_name(self.kind),
                got: kind_name(value.kind()),
            });
        }
        if let Some(predicate) = &self.predicate {
            predicate(&value)?;
        }
        self.value = Some(value);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.value = None;
    }
}

fn kind_name(kind: ValueKind) -> &'static str {
    match kind {
        ValueKind::Int32 => "int32",
        ValueKind::BigInt => "big-integer",
        ValueKind::Str => "string",
        ValueKind::Bytes => "byte string",
        ValueKind::PrivateKey => "private key",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_kind() {
        let mut binder = Binder::new(ValueKind::Int32, Trait::Required, None);
        assert!(binder.set(Value::Str("x".into())).is_err());
        assert!(!binder.is_set());
    }

    #[test]
    fn predicate_failure_leaves_slot_unchanged() {
        let predicate: Predicate = Box::new(|v| match v.as_int32()? {
            n if n > 0 => Ok(()),
            n => Err(Error::invalid_argument(format!("{n} must be positive"))),
        });
        let mut binder = Binder::new(ValueKind::Int32, Trait::Required, Some(predicate));
        binder.set(Value::Int32(5)).unwrap();
        assert!(binder.set(Value::Int32(-1)).is_err());
        assert_eq!(binder.value().unwrap().as_int32().unwrap(), 5);
    }

    #[test]
    fn read_only_rejects_second_set() {
        let mut binder = Binder::new(ValueKind::Int32, Trait::ReadOnly, None);
        binder.set(Value::Int32(1)).unwrap();
        assert!(binder.set(Value::Int32(2)).is_err());
    }
}
