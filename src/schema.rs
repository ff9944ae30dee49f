//! Positional record schemas
//!
//! A [`Schema`] describes how a record's fields map onto the elements of an
//! RLP list. It is plain data, so adapters (hand-written or generated) can
//! share one description, and decoded input can be checked against it
//! without building the record.
//!
//! ```rust
//! use fastrlp::schema::{Field, FieldKind, Schema};
//! use fastrlp::Parser;
//!
//! const LOG: Schema = Schema::new(
//!     "Log",
//!     &[
//!         Field::new("address", FieldKind::FixedBytes(20)),
//!         Field::new("topics", FieldKind::List(&FieldKind::FixedBytes(32))),
//!         Field::new("data", FieldKind::Bytes),
//!     ],
//! );
//!
//! let mut buf = vec![0xd7, 0x94];
//! buf.extend_from_slice(&[0x11; 20]);
//! buf.extend_from_slice(&[0xc0, 0x80]);
//!
//! let mut parser = Parser::new();
//! let v = parser.parse(&buf)?;
//! LOG.check(v)?;
//! # Ok::<(), fastrlp::Error>(())
//! ```

use crate::error::{Error, Result};
use crate::parser::Value;

/// Shape of a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Unsigned integer of at most 8 bytes
    Uint,
    /// Exactly one byte
    Byte,
    /// Byte string of a fixed length
    FixedBytes(usize),
    /// Fixed length byte string that may be absent (encoded as 0x80)
    OptionalFixedBytes(usize),
    /// Byte string of any length
    Bytes,
    /// Nested record
    Record(&'static Schema),
    /// List whose elements all have the given shape
    List(&'static FieldKind),
}

impl FieldKind {
    /// Check a decoded value against this shape
    pub fn check(&self, v: Value<'_>) -> Result<()> {
        match *self {
            FieldKind::Uint => v.get_u64().map(drop),
            FieldKind::Byte => v.get_byte().map(drop),
            FieldKind::FixedBytes(len) => check_len(v, len),
            FieldKind::OptionalFixedBytes(len) => {
                if v.is_null() {
                    Ok(())
                } else {
                    check_len(v, len)
                }
            }
            FieldKind::Bytes => v.bytes().map(drop),
            FieldKind::Record(schema) => schema.check(v),
            FieldKind::List(elem) => v.elems()?.iter().try_for_each(|e| elem.check(e)),
        }
    }
}

fn check_len(v: Value<'_>, len: usize) -> Result<()> {
    let found = v.bytes()?.len();
    if found != len {
        return Err(Error::LengthMismatch {
            expected: len,
            found,
        });
    }
    Ok(())
}

/// Named field at a list position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Field name, used in diagnostics
    pub name: &'static str,
    /// Field shape
    pub kind: FieldKind,
}

impl Field {
    /// Create a field
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// Ordered field layout of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    /// Record name, used in diagnostics
    pub name: &'static str,
    /// Fields in list order
    pub fields: &'static [Field],
}

impl Schema {
    /// Create a schema
    pub const fn new(name: &'static str, fields: &'static [Field]) -> Self {
        Self { name, fields }
    }

    /// Number of list elements a record occupies
    pub const fn len(&self) -> usize {
        self.fields.len()
    }

    /// True for a record without fields
    pub const fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// List position of the field called `name`
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Check that `v` is a list laid out as this schema describes
    pub fn check(&self, v: Value<'_>) -> Result<()> {
        let elems = v.elems()?;
        elems.expect_len(self.fields.len())?;
        for (field, elem) in self.fields.iter().zip(elems) {
            if let Err(err) = field.kind.check(elem) {
                tracing::debug!(
                    schema = self.name,
                    field = field.name,
                    error = %err,
                    "value does not match schema"
                );
                return Err(err);
            }
        }
        Ok(())
    }
}
