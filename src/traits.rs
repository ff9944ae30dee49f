//! Encode/decode contract for domain types
//!
//! Record types plug into the codec by implementing [`Marshaler`] and
//! [`Unmarshaler`]. Fields map onto list positions; the codec itself never
//! looks inside the record.
//!
//! ```rust
//! use fastrlp::{Arena, Marshaler, Result, Unmarshaler, Value, ValueId};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Pair {
//!     key: Vec<u8>,
//!     count: u64,
//! }
//!
//! impl Marshaler for Pair {
//!     fn encode_with<'a>(&'a self, arena: &mut Arena<'a>) -> ValueId {
//!         let list = arena.new_array();
//!         let key = arena.new_bytes(&self.key);
//!         let count = arena.new_uint(self.count);
//!         arena.set(list, key);
//!         arena.set(list, count)
//!     }
//! }
//!
//! impl Unmarshaler for Pair {
//!     fn decode_from(&mut self, v: Value<'_>) -> Result<()> {
//!         let elems = v.elems()?;
//!         elems.expect_len(2)?;
//!         elems.get(0)?.get_bytes(&mut self.key)?;
//!         self.count = elems.get(1)?.get_u64()?;
//!         Ok(())
//!     }
//! }
//!
//! let pair = Pair { key: b"gas".to_vec(), count: 21_000 };
//! let encoded = pair.to_rlp();
//!
//! let mut decoded = Pair::default();
//! decoded.decode_from_bytes(&encoded)?;
//! assert_eq!(decoded, pair);
//! # Ok::<(), fastrlp::Error>(())
//! ```

use alloc::vec::Vec;

use crate::arena::{Arena, ValueId};
use crate::error::Result;
use crate::parser::Value;

/// Types that can be written as an RLP value
pub trait Marshaler {
    /// Build the value tree for `self` in `arena`
    ///
    /// Byte fields may be wrapped with [`Arena::new_bytes`] since `self`
    /// outlives the arena borrow.
    fn encode_with<'a>(&'a self, arena: &mut Arena<'a>) -> ValueId;

    /// Append the encoding of `self` to `dst`
    fn encode_to_bytes(&self, dst: &mut Vec<u8>) {
        #[cfg(feature = "std")]
        let mut arena = crate::pool::DEFAULT_ARENA_POOL.get();
        #[cfg(not(feature = "std"))]
        let mut arena = Arena::new();

        let v = self.encode_with(&mut arena);
        arena.marshal_to(v, dst);
    }

    /// Encode `self` into a fresh vector
    fn to_rlp(&self) -> Vec<u8> {
        let mut dst = Vec::new();
        self.encode_to_bytes(&mut dst);
        dst
    }
}

/// Types that can be read back from an RLP value
pub trait Unmarshaler {
    /// Populate `self` from a decoded value
    fn decode_from(&mut self, v: Value<'_>) -> Result<()>;

    /// Parse `buf` and populate `self` from it
    fn decode_from_bytes(&mut self, buf: &[u8]) -> Result<()> {
        #[cfg(feature = "std")]
        let mut parser = crate::pool::DEFAULT_PARSER_POOL.get();
        #[cfg(not(feature = "std"))]
        let mut parser = crate::parser::Parser::new();

        let v = parser.parse(buf)?;
        self.decode_from(v)
    }
}
