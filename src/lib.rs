//! fastrlp: allocation-light Recursive-Length-Prefix codec
//!
//! This crate encodes nested byte strings, unsigned integers and lists into
//! the canonical RLP wire format, and decodes untrusted RLP while rejecting
//! every non-canonical or malformed input.
//!
//! # Wire Format
//!
//! ```text
//! +-----------+---------------------------+------------------------------+
//! | Prefix    | Item                      | Payload length               |
//! +-----------+---------------------------+------------------------------+
//! | 0x00-0x7f | single byte               | 1, the prefix itself         |
//! | 0x80-0xb7 | short string              | prefix - 0x80 (0..=55)       |
//! | 0xb8-0xbf | long string               | next (prefix - 0xb7) bytes   |
//! | 0xc0-0xf7 | short list                | prefix - 0xc0 (0..=55)       |
//! | 0xf8-0xff | long list                 | next (prefix - 0xf7) bytes   |
//! +-----------+---------------------------+------------------------------+
//! ```
//!
//! # Features
//!
//! - Arena builder with index-linked nodes, reset and reused between encodes
//! - Zero-copy parser whose values borrow the input buffer
//! - Strict canonical-form validation on decode
//! - Thread-safe recycling pools for arenas and parsers (`std`)
//! - Keccak-256 of decoded sub-structures (`keccak`)
//! - `no_std` support with `alloc`
//!
//! # Example
//!
//! ```rust
//! use fastrlp::*;
//!
//! // Build [ "", [], 0 ]
//! let mut arena = Arena::new();
//! let list = arena.new_array();
//! let empty = arena.new_null();
//! let nested = arena.new_null_array();
//! let zero = arena.new_uint(0);
//! arena.set(list, empty);
//! arena.set(list, nested);
//! arena.set(list, zero);
//!
//! let encoded = arena.encode_to_vec(list);
//! assert_eq!(encoded, [0xc3, 0x80, 0xc0, 0x80]);
//!
//! // Decode it back
//! let mut parser = Parser::new();
//! let v = parser.parse(&encoded)?;
//! let elems = v.elems()?;
//! assert!(elems.get(0)?.is_null());
//! assert!(elems.get(1)?.elems()?.is_empty());
//! assert_eq!(elems.get(2)?.get_u64()?, 0);
//! assert_eq!(v.encode_to_vec(), encoded);
//! # Ok::<(), fastrlp::Error>(())
//! ```

#![no_std]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

pub mod arena;
pub mod error;
pub mod header;
pub mod parser;
#[cfg(feature = "std")]
pub mod pool;
pub mod schema;
pub mod traits;
pub mod value;

// Re-export main types
pub use arena::{Arena, ArenaStorage, ValueId};
pub use error::{Error, ErrorKind, Result};
pub use parser::{Elems, Parser, Value};
#[cfg(feature = "std")]
pub use pool::{
    ArenaPool, ParserPool, PooledArena, PooledParser, DEFAULT_ARENA_POOL, DEFAULT_PARSER_POOL,
};
pub use traits::{Marshaler, Unmarshaler};
pub use value::ValueKind;

/// Prefix of the empty string
pub const EMPTY_STRING_CODE: u8 = 0x80;

/// Prefix of the empty list
pub const EMPTY_LIST_CODE: u8 = 0xc0;

/// Longest payload that uses a single byte header
pub const MAX_SHORT_LEN: usize = 55;

/// Length of a hash field
pub const HASH_LEN: usize = 32;

/// Length of an address field
pub const ADDRESS_LEN: usize = 20;

/// Instances each pool keeps for reuse unless configured otherwise
pub const DEFAULT_POOL_MAX_IDLE: usize = 64;
