//! # Error Definitions
//!
//! The central ledger of every way a message can be refused. All of them are
//! terminal for the message being processed: the codec never repairs input and
//! never substitutes defaults. What to do about the connection is the transport's call.

use thiserror::Error;

use crate::types::DataType;

/// Codec failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A flags byte carries a reserved or undefined bit.
    #[error("malformed {entity} flags {flags:#04x}")]
    MalformedFlags { entity: &'static str, flags: u8 },
    /// The message asks for a feature the codec does not implement (the string table).
    #[error("unsupported feature: {0}")]
    UnsupportedFeature(&'static str),
    /// A computed size disagrees with a buffer length, a size field, or the bytes consumed.
    #[error("{entity} size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { entity: &'static str, expected: u64, actual: u64 },
    /// The input ended before a fixed field or a length/count prefix was satisfied.
    #[error("truncated input: needed {needed} bytes, {remaining} remaining")]
    TruncatedInput { needed: usize, remaining: usize },
    /// The element type code is outside the enumerated set.
    #[error("unknown data type code {0}")]
    UnknownDataType(u16),
    /// The buffer does not start with the message magic.
    #[error("bad message magic {0:02x?}")]
    BadMagic([u8; 4]),
    /// The message declares a format version this codec does not speak.
    #[error("unsupported message version {0}")]
    UnsupportedVersion(u16),
    /// The entry count disagrees with the `MultipleEntries` flag.
    #[error("expected {expected} entries, found {actual}")]
    EntryCountMismatch { expected: usize, actual: usize },
    /// A nested element list was given a primitive type.
    #[error("{0:?} cannot carry a nested element list")]
    NotCompound(DataType),
    /// A nested list's type name disagrees with its element's type name field.
    #[error("nested list type name {nested:?} disagrees with element type name {element:?}")]
    NestedTypeName { element: String, nested: String },
    /// A `void` element declared a non-zero data count.
    #[error("void element declares {0} values")]
    VoidWithData(u64),
    /// A numeric field read from the wire does not fit its in-memory type.
    #[error("{field} value {value} is out of range")]
    OutOfRange { field: &'static str, value: i128 },
    /// String data is not valid UTF-8.
    #[error("string data is not valid UTF-8")]
    InvalidUtf8,
    /// A varint was malformed or not in its shortest form.
    #[error("variable-length integer is malformed or not in its shortest form")]
    NonCanonicalVarint,
    /// Element nesting went deeper than the configured limit.
    #[error("nesting depth exceeds limit of {0}")]
    DepthLimitExceeded(usize),
    /// A declared count or length exceeds the configured limit.
    #[error("{what} of {requested} exceeds limit of {limit}")]
    LimitExceeded { what: &'static str, requested: u64, limit: u64 },
    /// The message does not fit the 32-bit size fields of the format.
    #[error("message of {0} bytes does not fit a 32-bit size field")]
    TooLarge(u64),
    /// The field plan closed a size scope out of order or left one open.
    #[error("size scope closed out of order or left open")]
    UnbalancedScope,
}

impl From<wirepack::Error> for Error {
    fn from(e: wirepack::Error) -> Self {
        match e {
            wirepack::Error::Truncated { needed, remaining } => Self::TruncatedInput { needed, remaining },
            wirepack::Error::Overflow { needed, remaining } => Self::SizeMismatch {
                entity: "buffer",
                expected: needed as u64,
                actual: remaining as u64,
            },
            wirepack::Error::InvalidUtf8 => Self::InvalidUtf8,
            wirepack::Error::NonCanonicalVarint => Self::NonCanonicalVarint,
            wirepack::Error::TooLarge(n) => Self::TooLarge(n),
            wirepack::Error::UnclosedScope => Self::UnbalancedScope,
        }
    }
}

/// A specialized Result type for codec operations.
pub type Result<T> = std::result::Result<T, Error>;
