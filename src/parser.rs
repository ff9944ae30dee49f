//! Validating zero-copy RLP parser
//!
//! [`Parser::parse`] checks the entire input up front and records one node per
//! item. The returned [`Value`] borrows both the parser and the input buffer,
//! so decoded values can neither outlive the buffer nor observe it being
//! mutated.
//!
//! Items are visited breadth first: when a list is reached, all of its direct
//! children are validated in one pass and stored next to each other. A list
//! is therefore fully checked before any of its children is descended into,
//! and no recursion happens on untrusted input.

use alloc::vec::Vec;
use core::fmt;

use crate::error::{Error, Result};
use crate::header::{self, Header};
use crate::value::ValueKind;
use crate::{ADDRESS_LEN, HASH_LEN};

#[derive(Debug, Clone, Copy)]
struct Node {
    offset: usize,
    header_len: usize,
    payload_len: usize,
    list: bool,
    first_child: usize,
    child_count: usize,
}

impl Node {
    #[inline]
    fn new(offset: usize, header: Header) -> Self {
        Self {
            offset,
            header_len: header.header_len,
            payload_len: header.payload_len,
            list: header.list,
            first_child: 0,
            child_count: 0,
        }
    }

    #[inline]
    fn payload_start(&self) -> usize {
        self.offset + self.header_len
    }

    #[inline]
    fn end(&self) -> usize {
        self.payload_start() + self.payload_len
    }
}

/// Reusable RLP decoder
///
/// Keeps its node table between calls, so a parser that is reused (directly
/// or through [`crate::ParserPool`]) stops allocating once it has seen an
/// input of the largest shape.
#[derive(Debug, Default)]
pub struct Parser {
    nodes: Vec<Node>,
}

impl Parser {
    /// Create an empty parser
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the node table of the previous parse, keeping capacity
    #[inline]
    pub fn reset(&mut self) {
        self.nodes.clear();
    }

    /// Number of items recorded by the last successful parse
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Decode exactly one top-level value spanning all of `buf`
    ///
    /// Fails without exposing any part of the tree if any item is truncated,
    /// misaligned with its enclosing list, or not canonically encoded.
    pub fn parse<'p>(&'p mut self, buf: &'p [u8]) -> Result<Value<'p>> {
        self.nodes.clear();
        if let Err(err) = self.build(buf) {
            tracing::debug!(error = %err, len = buf.len(), "rejected rlp input");
            self.nodes.clear();
            return Err(err);
        }
        Ok(Value {
            nodes: &self.nodes,
            buf,
            idx: 0,
        })
    }

    fn build(&mut self, buf: &[u8]) -> Result<()> {
        let root = Header::decode(buf, 0)?;
        if root.total_len() != buf.len() {
            return Err(Error::TrailingBytes {
                remaining: buf.len() - root.total_len(),
            });
        }
        self.nodes.push(Node::new(0, root));

        let mut cursor = 0;
        while cursor < self.nodes.len() {
            let node = self.nodes[cursor];
            if node.list {
                let first_child = self.nodes.len();
                let end = node.end();
                let list_buf = &buf[..end];
                let mut offset = node.payload_start();
                while offset < end {
                    let child = Header::decode(list_buf, offset).map_err(|err| match err {
                        Error::UnexpectedEof { offset } => Error::ListOverrun { offset },
                        other => other,
                    })?;
                    self.nodes.push(Node::new(offset, child));
                    offset += child.total_len();
                }
                let child_count = self.nodes.len() - first_child;
                let list = &mut self.nodes[cursor];
                list.first_child = first_child;
                list.child_count = child_count;
            }
            cursor += 1;
        }
        Ok(())
    }
}

/// A decoded item borrowed from a [`Parser`] and its input buffer
#[derive(Clone, Copy)]
pub struct Value<'p> {
    nodes: &'p [Node],
    buf: &'p [u8],
    idx: usize,
}

impl<'p> Value<'p> {
    #[inline]
    fn node(&self) -> &'p Node {
        &self.nodes[self.idx]
    }

    /// Variant of this item, read from its header
    ///
    /// `0x80` is reported as [`ValueKind::Null`]; decoded strings are never
    /// reported as [`ValueKind::Uint`].
    #[inline]
    pub fn kind(&self) -> ValueKind {
        let node = self.node();
        if node.list {
            ValueKind::List
        } else if node.header_len == 1 && node.payload_len == 0 {
            ValueKind::Null
        } else {
            ValueKind::Bytes
        }
    }

    /// True for the empty string (0x80)
    #[inline]
    pub fn is_null(&self) -> bool {
        self.kind() == ValueKind::Null
    }

    /// True for any list, including the empty list
    #[inline]
    pub fn is_list(&self) -> bool {
        self.node().list
    }

    /// Full encoding of this item (header included) as it appears in the input
    #[inline]
    pub fn raw(&self) -> &'p [u8] {
        let node = self.node();
        &self.buf[node.offset..node.end()]
    }

    /// Payload of a string item, borrowed from the input
    #[inline]
    pub fn bytes(&self) -> Result<&'p [u8]> {
        let node = self.node();
        if node.list {
            return Err(Error::TypeMismatch {
                expected: ValueKind::Bytes,
                found: ValueKind::List,
            });
        }
        Ok(&self.buf[node.payload_start()..node.end()])
    }

    /// Copy the string payload into `dst`, replacing its contents
    ///
    /// `dst` keeps its capacity, so repeated decodes into the same vector do
    /// not reallocate once it is large enough.
    #[inline]
    pub fn get_bytes(&self, dst: &mut Vec<u8>) -> Result<()> {
        let payload = self.bytes()?;
        dst.clear();
        dst.extend_from_slice(payload);
        Ok(())
    }

    /// Like [`Value::get_bytes`], but the payload must be exactly `len` bytes
    #[inline]
    pub fn get_bytes_exact(&self, dst: &mut Vec<u8>, len: usize) -> Result<()> {
        let payload = self.exact(len)?;
        dst.clear();
        dst.extend_from_slice(payload);
        Ok(())
    }

    /// Copy the string payload into a fixed size buffer of the same length
    #[inline]
    pub fn copy_to(&self, dst: &mut [u8]) -> Result<()> {
        let payload = self.exact(dst.len())?;
        dst.copy_from_slice(payload);
        Ok(())
    }

    #[inline]
    fn exact(&self, len: usize) -> Result<&'p [u8]> {
        let payload = self.bytes()?;
        if payload.len() != len {
            return Err(Error::LengthMismatch {
                expected: len,
                found: payload.len(),
            });
        }
        Ok(payload)
    }

    /// Read a 32 byte string
    #[inline]
    pub fn get_hash(&self, dst: &mut [u8; HASH_LEN]) -> Result<()> {
        self.copy_to(dst)
    }

    /// Read a 20 byte string
    #[inline]
    pub fn get_addr(&self, dst: &mut [u8; ADDRESS_LEN]) -> Result<()> {
        self.copy_to(dst)
    }

    /// Read a minimal big-endian integer of at most 8 bytes
    #[inline]
    pub fn get_u64(&self) -> Result<u64> {
        header::read_uint(self.bytes()?)
    }

    /// Read a string of exactly one byte
    #[inline]
    pub fn get_byte(&self) -> Result<u8> {
        let payload = self.exact(1)?;
        Ok(payload[0])
    }

    /// Elements of a list item
    #[inline]
    pub fn elems(&self) -> Result<Elems<'p>> {
        let node = self.node();
        if !node.list {
            return Err(Error::TypeMismatch {
                expected: ValueKind::List,
                found: self.kind(),
            });
        }
        Ok(Elems {
            nodes: self.nodes,
            buf: self.buf,
            first: node.first_child,
            len: node.child_count,
        })
    }

    /// The `index`th element of a list item
    #[inline]
    pub fn get(&self, index: usize) -> Result<Value<'p>> {
        self.elems()?.get(index)
    }

    /// Append the canonical serialization of this item to `dst`
    ///
    /// Rebuilt from the decoded tree; for any accepted input the result is
    /// byte-identical to [`Value::raw`].
    pub fn marshal_to(&self, dst: &mut Vec<u8>) {
        dst.reserve(self.raw().len());
        let mut stack = Vec::with_capacity(8);
        stack.push(self.idx);
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            if node.list {
                Header::encode(true, node.payload_len, dst);
                stack.extend((node.first_child..node.first_child + node.child_count).rev());
            } else {
                header::put_string(&self.buf[node.payload_start()..node.end()], dst);
            }
        }
    }

    /// Serialize this item into a fresh vector
    pub fn encode_to_vec(&self) -> Vec<u8> {
        let mut dst = Vec::new();
        self.marshal_to(&mut dst);
        dst
    }

    /// Keccak-256 of the raw encoding of this item
    #[cfg(feature = "keccak")]
    pub fn keccak256(&self) -> [u8; HASH_LEN] {
        use sha3::{Digest, Keccak256};
        Keccak256::digest(self.raw()).into()
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("kind", &self.kind())
            .field("raw", &self.raw())
            .finish()
    }
}

/// Elements of a decoded list
#[derive(Clone, Copy)]
pub struct Elems<'p> {
    nodes: &'p [Node],
    buf: &'p [u8],
    first: usize,
    len: usize,
}

impl<'p> Elems<'p> {
    /// Number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True for the empty list
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Element at `index`
    #[inline]
    pub fn get(&self, index: usize) -> Result<Value<'p>> {
        if index >= self.len {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        Ok(self.at(index))
    }

    #[inline]
    fn at(&self, index: usize) -> Value<'p> {
        Value {
            nodes: self.nodes,
            buf: self.buf,
            idx: self.first + index,
        }
    }

    /// Fail unless the list has exactly `expected` elements
    #[inline]
    pub fn expect_len(&self, expected: usize) -> Result<()> {
        if self.len != expected {
            return Err(Error::ElementCount {
                expected,
                found: self.len,
            });
        }
        Ok(())
    }

    /// Iterate over the elements in order
    #[inline]
    pub fn iter(&self) -> ElemsIter<'p> {
        ElemsIter {
            elems: *self,
            pos: 0,
        }
    }
}

impl fmt::Debug for Elems<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'p> IntoIterator for Elems<'p> {
    type Item = Value<'p>;
    type IntoIter = ElemsIter<'p>;

    #[inline]
    fn into_iter(self) -> ElemsIter<'p> {
        self.iter()
    }
}

/// Iterator over [`Elems`]
#[derive(Debug, Clone)]
pub struct ElemsIter<'p> {
    elems: Elems<'p>,
    pos: usize,
}

impl<'p> Iterator for ElemsIter<'p> {
    type Item = Value<'p>;

    #[inline]
    fn next(&mut self) -> Option<Value<'p>> {
        if self.pos >= self.elems.len {
            return None;
        }
        let value = self.elems.at(self.pos);
        self.pos += 1;
        Some(value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.elems.len - self.pos;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ElemsIter<'_> {}
