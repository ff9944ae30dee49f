//! Value variants shared by built and decoded trees

/// Which variant an RLP value represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Opaque byte string
    Bytes,
    /// Unsigned integer, written as minimal big-endian bytes
    Uint,
    /// Ordered list of values
    List,
    /// The empty string marker (0x80)
    Null,
}

impl ValueKind {
    /// Returns true for every variant that is encoded as a string
    #[inline]
    pub const fn is_string(&self) -> bool {
        !matches!(self, ValueKind::List)
    }
}
