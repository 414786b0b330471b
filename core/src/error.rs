use core::fmt;

/// Error taxonomy shared by every chain crate built on top of `wallet-core`.
///
/// Each variant is small and descriptive; messages are produced by `Display`
/// rather than carried as ad-hoc strings, except where a variant legitimately
/// needs caller-supplied context (e.g. the list of unset required properties).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    InvalidArgument(String),
    InvalidAddress(String),
    BadEntropy(String),
    TypeMismatch { name: String, expected: &'static str, got: &'static str },
    AlreadyExists(String),
    NotSet(String),
    TransactionNoSources,
    TransactionNoDestinations,
    TransactionTooManySources,
    TransactionTooManyDestinations,
    TransactionPayloadTooBig { max: usize, got: usize },
    FeatureNotSupported(String),
    OutOfRange(String),
    General(String),
}

impl Error {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub fn invalid_address(msg: impl Into<String>) -> Self {
        Error::InvalidAddress(msg.into())
    }

    pub fn bad_entropy(msg: impl Into<String>) -> Self {
        Error::BadEntropy(msg.into())
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Error::General(msg.into())
    }

    pub fn out_of_range(msg: impl Into<String>) -> Self {
        Error::OutOfRange(msg.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Error::*;
        match self {
            InvalidArgument(m) => write!(f, "Invalid argument: {m}"),
            InvalidAddress(m) => write!(f, "Invalid address: {m}"),
            BadEntropy(m) => write!(f, "Bad entropy: {m}"),
            TypeMismatch { name, expected, got } => write!(
                f,
                "Type mismatch setting property '{name}': expected {expected}, got {got}"
            ),
            AlreadyExists(name) => write!(f, "Property or slot already exists: {name}"),
            NotSet(name) => write!(f, "Property not set: {name}"),
            TransactionNoSources => write!(f, "Transaction has no sources"),
            TransactionNoDestinations => write!(f, "Transaction has no destinations"),
            TransactionTooManySources => write!(f, "Transaction accepts only one source"),
            TransactionTooManyDestinations => {
                write!(f, "Transaction accepts only one destination")
            }
            TransactionPayloadTooBig { max, got } => write!(
                f,
                "Transaction payload too big: max {max} bytes, got {got} bytes"
            ),
            FeatureNotSupported(m) => write!(f, "Feature not supported: {m}"),
            OutOfRange(m) => write!(f, "Value out of range: {m}"),
            General(m) => write!(f, "{m}"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
