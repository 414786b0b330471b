//! A generic, named, typed property surface shared by every transaction and
//! builder: the JSON front door and native callers both drive it the same
//! way. See [`Properties`] for the container and [`Value`]/[`Trait`] for the
//! vocabulary it validates against.
//!
//! The reference this crate is modeled on binds each property to an
//! out-of-line value slot living inside the owning struct, with the
//! container keeping a reverse address-to-name map for dirty propagation.
//! Rust ownership makes that indirection unnecessary: a [`Properties`]
//! container owns its values directly, and callers read them back through
//! typed getters instead of through a pointer the container also knows
//! about.

mod binder;
mod container;
mod value;

pub use binder::{Predicate, Trait};
pub use container::Properties;
pub use value::{Value, ValueKind};
