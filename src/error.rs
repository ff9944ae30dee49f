//! Error types for the RLP codec

use crate::value::ValueKind;

/// Broad classes of decode failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input is truncated, has trailing data, or has no valid interpretation
    MalformedInput,
    /// Input is well formed but not in its single canonical encoding
    NonCanonicalEncoding,
    /// Accessor called on a value of the wrong variant
    TypeMismatch,
    /// Payload (or list) size differs from what the caller expected
    LengthMismatch,
    /// List index beyond the element count
    IndexOutOfRange,
}

/// Errors that can occur while decoding RLP or reading decoded values
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Input ended before a header or its declared payload
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEof {
        /// Offset of the header that could not be satisfied
        offset: usize,
    },
    /// Bytes left over after the top-level value
    #[error("{remaining} trailing bytes after top-level value")]
    TrailingBytes {
        /// Number of unconsumed bytes
        remaining: usize,
    },
    /// A child item runs past the end of its enclosing list
    #[error("list element at offset {offset} overruns its list")]
    ListOverrun {
        /// Offset of the offending child header
        offset: usize,
    },
    /// A declared length does not fit in `usize`
    #[error("declared length overflows at offset {offset}")]
    Overflow {
        /// Offset of the header
        offset: usize,
    },
    /// Length-of-length field starts with a zero byte
    #[error("length prefix with leading zero at offset {offset}")]
    LeadingZeroLength {
        /// Offset of the header
        offset: usize,
    },
    /// Long form header used for a payload that fits the short form
    #[error("long form header for short payload at offset {offset}")]
    NonCanonicalSize {
        /// Offset of the header
        offset: usize,
    },
    /// Single byte below 0x80 wrapped in a string header
    #[error("single byte wrapped in string header at offset {offset}")]
    NonCanonicalSingleByte {
        /// Offset of the header
        offset: usize,
    },
    /// Integer payload has a leading zero byte
    #[error("integer with leading zero byte")]
    LeadingZeroInteger,
    /// Integer payload is wider than the target type
    #[error("integer payload of {len} bytes does not fit in u64")]
    UintOverflow {
        /// Payload length in bytes
        len: usize,
    },
    /// Accessor invoked on the wrong variant
    #[error("expected {expected:?} value, found {found:?}")]
    TypeMismatch {
        /// Variant the accessor needs
        expected: ValueKind,
        /// Variant actually present
        found: ValueKind,
    },
    /// Fixed length accessor got a payload of another size
    #[error("expected {expected} byte payload, found {found}")]
    LengthMismatch {
        /// Required payload length
        expected: usize,
        /// Actual payload length
        found: usize,
    },
    /// Record decoded from a list with the wrong number of elements
    #[error("expected {expected} list elements, found {found}")]
    ElementCount {
        /// Number of fields in the record
        expected: usize,
        /// Number of elements in the list
        found: usize,
    },
    /// `get(index)` beyond the end of a list
    #[error("index {index} out of range for list of {len} elements")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// List element count
        len: usize,
    },
}

impl Error {
    /// Returns the class this error belongs to
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Error::UnexpectedEof { .. }
            | Error::TrailingBytes { .. }
            | Error::ListOverrun { .. }
            | Error::Overflow { .. } => ErrorKind::MalformedInput,
            Error::LeadingZeroLength { .. }
            | Error::NonCanonicalSize { .. }
            | Error::NonCanonicalSingleByte { .. }
            | Error::LeadingZeroInteger
            | Error::UintOverflow { .. } => ErrorKind::NonCanonicalEncoding,
            Error::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Error::LengthMismatch { .. } | Error::ElementCount { .. } => ErrorKind::LengthMismatch,
            Error::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
        }
    }
}

/// Result type alias for RLP operations
pub type Result<T> = core::result::Result<T, Error>;
