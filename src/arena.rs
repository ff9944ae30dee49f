//! Arena builder for RLP value trees
//!
//! An [`Arena`] owns every node built during one encode cycle. Nodes live in a
//! flat slab and refer to each other by index, so a whole tree is released by
//! [`Arena::reset`] without touching individual nodes, and the slab capacity
//! carries over to the next cycle.
//!
//! ```rust
//! use fastrlp::Arena;
//!
//! let mut arena = Arena::new();
//! let list = arena.new_array();
//! let empty = arena.new_null();
//! let nested = arena.new_null_array();
//! let zero = arena.new_uint(0);
//! arena.set(list, empty);
//! arena.set(list, nested);
//! arena.set(list, zero);
//!
//! assert_eq!(arena.encode_to_vec(list), [0xc3, 0x80, 0xc0, 0x80]);
//! ```

use alloc::vec::Vec;

use crate::header::{self, Header};
use crate::value::ValueKind;
use crate::{EMPTY_LIST_CODE, EMPTY_STRING_CODE};

/// Handle to a node allocated by an [`Arena`]
///
/// Only meaningful for the arena that returned it, and only until that arena
/// is reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueId(u32);

impl ValueId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy)]
enum Payload {
    /// Range inside the arena's own byte storage
    Owned { start: usize, len: usize },
    /// Index into the borrowed slice table
    Borrowed(usize),
}

#[derive(Debug, Clone, Copy)]
enum NodeData {
    Bytes(Payload),
    Uint(u64),
    Null,
    NullList,
    List {
        head: Option<ValueId>,
        tail: Option<ValueId>,
        len: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct Node {
    data: NodeData,
    next: Option<ValueId>,
    /// List this value was appended to
    parent: Option<ValueId>,
    /// Payload length, filled in by `measure`
    payload_len: usize,
}

impl Node {
    #[inline]
    fn new(data: NodeData) -> Self {
        Self {
            data,
            next: None,
            parent: None,
            payload_len: 0,
        }
    }
}

/// Reusable backing storage of an [`Arena`]
///
/// Holds no borrowed data, so it can be kept across encode cycles (and by
/// the arena pool) while the arena itself is tied to the lifetime of the
/// slices it wraps.
#[derive(Debug, Default)]
pub struct ArenaStorage {
    nodes: Vec<Node>,
    bytes: Vec<u8>,
}

impl ArenaStorage {
    /// Drop all contents, keeping capacity
    #[inline]
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.bytes.clear();
    }

    /// Bytes of capacity retained by the storage
    #[inline]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity() * core::mem::size_of::<Node>() + self.bytes.capacity()
    }
}

/// Builder that allocates value nodes and serializes them to RLP
///
/// `'a` is the lifetime of slices passed to [`Arena::new_bytes`]; they are
/// referenced, not copied, until the arena is reset or dropped.
#[derive(Debug, Default)]
pub struct Arena<'a> {
    storage: ArenaStorage,
    borrowed: Vec<&'a [u8]>,
}

impl<'a> Arena<'a> {
    /// Create an empty arena
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an arena on top of recycled storage
    #[inline]
    pub fn from_storage(mut storage: ArenaStorage) -> Self {
        storage.clear();
        Self {
            storage,
            borrowed: Vec::new(),
        }
    }

    /// Release borrowed slices and hand back the storage for reuse
    #[inline]
    pub fn into_storage(mut self) -> ArenaStorage {
        self.storage.clear();
        self.storage
    }

    /// Invalidate every value built so far, keeping capacity
    #[inline]
    pub fn reset(&mut self) {
        self.storage.clear();
        self.borrowed.clear();
    }

    /// Number of nodes allocated in the current cycle
    #[inline]
    pub fn node_count(&self) -> usize {
        self.storage.nodes.len()
    }

    #[inline]
    fn alloc(&mut self, data: NodeData) -> ValueId {
        let id = ValueId(self.storage.nodes.len() as u32);
        self.storage.nodes.push(Node::new(data));
        id
    }

    /// Wrap a byte string without copying it
    #[inline]
    pub fn new_bytes(&mut self, bytes: &'a [u8]) -> ValueId {
        let idx = self.borrowed.len();
        self.borrowed.push(bytes);
        self.alloc(NodeData::Bytes(Payload::Borrowed(idx)))
    }

    /// Copy a byte string into arena storage
    #[inline]
    pub fn new_copy_bytes(&mut self, bytes: &[u8]) -> ValueId {
        let start = self.storage.bytes.len();
        self.storage.bytes.extend_from_slice(bytes);
        self.alloc(NodeData::Bytes(Payload::Owned {
            start,
            len: bytes.len(),
        }))
    }

    /// Unsigned integer, written in minimal big-endian form (0 is the empty string)
    #[inline]
    pub fn new_uint(&mut self, value: u64) -> ValueId {
        self.alloc(NodeData::Uint(value))
    }

    /// Empty string sentinel (0x80)
    #[inline]
    pub fn new_null(&mut self) -> ValueId {
        self.alloc(NodeData::Null)
    }

    /// Empty list sentinel (0xc0)
    #[inline]
    pub fn new_null_array(&mut self) -> ValueId {
        self.alloc(NodeData::NullList)
    }

    /// Empty list to be filled with [`Arena::set`]
    #[inline]
    pub fn new_array(&mut self) -> ValueId {
        self.alloc(NodeData::List {
            head: None,
            tail: None,
            len: 0,
        })
    }

    /// Append `child` to `list` and return `list`
    ///
    /// # Panics
    ///
    /// Panics if `list` was not created by [`Arena::new_array`], if `child`
    /// already belongs to a list, or if `child` is `list` or one of its
    /// enclosing lists.
    pub fn set(&mut self, list: ValueId, child: ValueId) -> ValueId {
        assert!(
            self.storage.nodes[child.index()].parent.is_none(),
            "value is already an element of a list"
        );
        let mut ancestor = Some(list);
        while let Some(id) = ancestor {
            assert!(id != child, "value cannot be an element of itself");
            ancestor = self.storage.nodes[id.index()].parent;
        }
        let prev_tail = match &mut self.storage.nodes[list.index()].data {
            NodeData::List { head, tail, len } => {
                let prev = *tail;
                if head.is_none() {
                    *head = Some(child);
                }
                *tail = Some(child);
                *len += 1;
                prev
            }
            _ => panic!("set called on a value that is not a list"),
        };
        if let Some(prev) = prev_tail {
            self.storage.nodes[prev.index()].next = Some(child);
        }
        self.storage.nodes[child.index()].parent = Some(list);
        list
    }

    /// Variant of a built value
    #[inline]
    pub fn kind(&self, v: ValueId) -> ValueKind {
        match self.storage.nodes[v.index()].data {
            NodeData::Bytes(_) => ValueKind::Bytes,
            NodeData::Uint(_) => ValueKind::Uint,
            NodeData::Null => ValueKind::Null,
            NodeData::NullList | NodeData::List { .. } => ValueKind::List,
        }
    }

    /// True for the empty string sentinel
    #[inline]
    pub fn is_null(&self, v: ValueId) -> bool {
        matches!(self.storage.nodes[v.index()].data, NodeData::Null)
    }

    /// Element count of a list, `None` for non-list values
    #[inline]
    pub fn len(&self, v: ValueId) -> Option<usize> {
        match self.storage.nodes[v.index()].data {
            NodeData::NullList => Some(0),
            NodeData::List { len, .. } => Some(len),
            _ => None,
        }
    }

    /// The `i`th element of a list
    pub fn get(&self, list: ValueId, i: usize) -> Option<ValueId> {
        self.children(list).nth(i)
    }

    /// Iterate over the elements of a list in insertion order
    ///
    /// Yields nothing for non-list values.
    pub fn children(&self, list: ValueId) -> Children<'_, 'a> {
        let next = match self.storage.nodes[list.index()].data {
            NodeData::List { head, .. } => head,
            _ => None,
        };
        Children { arena: self, next }
    }

    /// Payload of a byte string value
    #[inline]
    pub fn bytes(&self, v: ValueId) -> Option<&[u8]> {
        match self.storage.nodes[v.index()].data {
            NodeData::Bytes(payload) => Some(self.payload(payload)),
            _ => None,
        }
    }

    #[inline]
    fn payload(&self, payload: Payload) -> &[u8] {
        match payload {
            Payload::Owned { start, len } => &self.storage.bytes[start..start + len],
            Payload::Borrowed(idx) => self.borrowed[idx],
        }
    }

    /// Size in bytes of the serialized form of `v`
    pub fn encoded_len(&mut self, v: ValueId) -> usize {
        self.measure(v)
    }

    /// Compute and cache payload lengths bottom-up, returning the item size
    fn measure(&mut self, v: ValueId) -> usize {
        let node = self.storage.nodes[v.index()];
        match node.data {
            NodeData::Bytes(payload) => header::string_len(self.payload(payload)),
            NodeData::Uint(value) => header::uint_item_len(value),
            NodeData::Null | NodeData::NullList => 1,
            NodeData::List { head, .. } => {
                let mut payload_len = 0;
                let mut cursor = head;
                while let Some(child) = cursor {
                    payload_len += self.measure(child);
                    cursor = self.storage.nodes[child.index()].next;
                }
                self.storage.nodes[v.index()].payload_len = payload_len;
                Header::encoded_len(payload_len) + payload_len
            }
        }
    }

    fn write(&self, v: ValueId, dst: &mut Vec<u8>) {
        let node = &self.storage.nodes[v.index()];
        match node.data {
            NodeData::Bytes(payload) => header::put_string(self.payload(payload), dst),
            NodeData::Uint(value) => header::put_uint_item(value, dst),
            NodeData::Null => dst.push(EMPTY_STRING_CODE),
            NodeData::NullList => dst.push(EMPTY_LIST_CODE),
            NodeData::List { head, .. } => {
                Header::encode(true, node.payload_len, dst);
                let mut cursor = head;
                while let Some(child) = cursor {
                    self.write(child, dst);
                    cursor = self.storage.nodes[child.index()].next;
                }
            }
        }
    }

    /// Append the RLP serialization of `v` to `dst`
    ///
    /// List lengths are measured in a first pass so every list header is
    /// written before its payload.
    pub fn marshal_to(&mut self, v: ValueId, dst: &mut Vec<u8>) {
        let total = self.measure(v);
        dst.reserve(total);
        self.write(v, dst);
    }

    /// Serialize `v` into a fresh vector
    pub fn encode_to_vec(&mut self, v: ValueId) -> Vec<u8> {
        let mut dst = Vec::new();
        self.marshal_to(v, &mut dst);
        dst
    }
}

/// Iterator over list elements, see [`Arena::children`]
#[derive(Debug)]
pub struct Children<'r, 'a> {
    arena: &'r Arena<'a>,
    next: Option<ValueId>,
}

impl Iterator for Children<'_, '_> {
    type Item = ValueId;

    #[inline]
    fn next(&mut self) -> Option<ValueId> {
        let current = self.next?;
        self.next = self.arena.storage.nodes[current.index()].next;
        Some(current)
    }
}
