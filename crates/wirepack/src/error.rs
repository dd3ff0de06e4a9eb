//! # Error Definitions

use thiserror::Error;

/// Failures of the primitive byte layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The reader ran out of bytes before a fixed field or length prefix was satisfied.
    #[error("truncated input: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },
    /// The writer ran past the end of its fixed-size slice.
    #[error("write overflow: needed {needed} bytes, {remaining} remaining")]
    Overflow { needed: usize, remaining: usize },
    /// String data is not valid UTF-8.
    #[error("string data is not valid UTF-8")]
    InvalidUtf8,
    /// A varint used an unknown marker or was not in its shortest form.
    #[error("variable-length integer is malformed or not in its shortest form")]
    NonCanonicalVarint,
    /// A length or size does not fit the field it has to be written into.
    #[error("value {0} does not fit its size field")]
    TooLarge(u64),
    /// A sized scope was closed out of order, or left open at `finish`.
    #[error("sized scope closed out of order or left open")]
    UnclosedScope,
}

/// Specialized `Result` for wirepack operations.
pub type Result<T> = std::result::Result<T, Error>;
