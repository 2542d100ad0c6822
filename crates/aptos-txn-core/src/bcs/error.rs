//! Errors produced by the BCS codec.

use thiserror::Error;

/// A specialized Result type for codec primitives.
pub type BcsResult<T> = Result<T, BcsError>;

/// Errors raised while encoding or decoding BCS.
///
/// Every decoding failure is surfaced; nothing is defaulted, padded or
/// truncated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BcsError {
    /// A read went past the end of the input.
    #[error("unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEndOfInput {
        /// Bytes the read required
        needed: usize,
        /// Bytes that were left
        remaining: usize,
    },

    /// A boolean byte other than 0x00 or 0x01.
    #[error("invalid boolean byte: {0:#04x}")]
    InvalidBoolean(u8),

    /// A ULEB128 value that does not fit in 32 bits.
    #[error("ULEB128 value does not fit in 32 bits")]
    Uleb128Overflow,

    /// A ULEB128 value with a redundant trailing zero group.
    #[error("non-canonical ULEB128 encoding")]
    NonCanonicalUleb128,

    /// A fixed-size payload with the wrong length.
    #[error("length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch {
        /// Length required by the type
        expected: usize,
        /// Length found on the wire
        actual: usize,
    },

    /// An enum tag that the type does not define.
    #[error("invalid variant index {index} for {type_name}")]
    InvalidVariant {
        /// The enum being decoded
        type_name: &'static str,
        /// The tag read from the wire
        index: u32,
    },

    /// String bytes that are not valid UTF-8.
    #[error("invalid UTF-8 string")]
    InvalidUtf8,

    /// A sequence longer than the codec allows.
    #[error("sequence length {0} exceeds the maximum")]
    SequenceTooLong(usize),

    /// Map keys that are not strictly ascending by their encoded bytes.
    #[error("map keys are not in canonical order")]
    NonCanonicalMap,

    /// Two map entries whose keys encode to the same bytes.
    #[error("duplicate map key")]
    DuplicateMapKey,

    /// Nesting deeper than the codec allows.
    #[error("exceeded maximum container depth of {0}")]
    ExceededMaxDepth(usize),

    /// Input left over after a complete value was decoded.
    #[error("{0} bytes remaining after deserialization")]
    RemainingInput(usize),
}
