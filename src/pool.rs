//! Recycling pools for arenas and parsers
//!
//! Each pool keeps a bounded free-list behind a mutex, so any number of
//! threads can check instances out and back in concurrently. Checkout hands
//! out a guard that resets the instance and returns it to the pool when
//! dropped.
//!
//! ```rust
//! use fastrlp::pool::DEFAULT_ARENA_POOL;
//!
//! let mut arena = DEFAULT_ARENA_POOL.get();
//! let v = arena.new_uint(1024);
//! assert_eq!(arena.encode_to_vec(v), [0x82, 0x04, 0x00]);
//! ```

use core::mem;
use core::ops::{Deref, DerefMut};

use alloc::vec::Vec;
use parking_lot::Mutex;

use crate::arena::{Arena, ArenaStorage};
use crate::parser::Parser;
use crate::DEFAULT_POOL_MAX_IDLE;

/// Process-wide arena pool used by [`crate::Marshaler`]
pub static DEFAULT_ARENA_POOL: ArenaPool = ArenaPool::new();

/// Process-wide parser pool used by [`crate::Unmarshaler`]
pub static DEFAULT_PARSER_POOL: ParserPool = ParserPool::new();

/// Pool of arena storage
///
/// Only the lifetime-free backing storage is kept, so arenas borrowing data
/// of any lifetime can be served from the same pool.
#[derive(Debug)]
pub struct ArenaPool {
    free: Mutex<Vec<ArenaStorage>>,
    max_idle: usize,
}

impl ArenaPool {
    /// Create a pool retaining up to [`DEFAULT_POOL_MAX_IDLE`] arenas
    pub const fn new() -> Self {
        Self::with_max_idle(DEFAULT_POOL_MAX_IDLE)
    }

    /// Create a pool retaining up to `max_idle` arenas
    pub const fn with_max_idle(max_idle: usize) -> Self {
        Self {
            free: parking_lot::const_mutex(Vec::new()),
            max_idle,
        }
    }

    /// Check out a reset arena, allocating one if the pool is empty
    pub fn get<'a>(&self) -> PooledArena<'_, 'a> {
        PooledArena {
            pool: self,
            arena: self.take(),
        }
    }

    /// Check out an arena that is not returned automatically
    ///
    /// Hand it back with [`ArenaPool::put`].
    pub fn take<'a>(&self) -> Arena<'a> {
        match self.free.lock().pop() {
            Some(storage) => {
                tracing::trace!(capacity = storage.capacity(), "reusing pooled arena");
                Arena::from_storage(storage)
            }
            None => {
                tracing::trace!("allocating new arena");
                Arena::new()
            }
        }
    }

    /// Reset `arena` and return its storage to the pool
    pub fn put(&self, arena: Arena<'_>) {
        let storage = arena.into_storage();
        let mut free = self.free.lock();
        if free.len() < self.max_idle {
            free.push(storage);
        } else {
            tracing::trace!(max_idle = self.max_idle, "arena pool full, dropping arena");
        }
    }

    /// Number of arenas waiting in the pool
    pub fn idle(&self) -> usize {
        self.free.lock().len()
    }
}

impl Default for ArenaPool {
    fn default() -> Self {
        Self::new()
    }
}

/// Arena checked out of an [`ArenaPool`]
#[derive(Debug)]
pub struct PooledArena<'p, 'a> {
    pool: &'p ArenaPool,
    arena: Arena<'a>,
}

impl<'a> Deref for PooledArena<'_, 'a> {
    type Target = Arena<'a>;

    fn deref(&self) -> &Arena<'a> {
        &self.arena
    }
}

impl<'a> DerefMut for PooledArena<'_, 'a> {
    fn deref_mut(&mut self) -> &mut Arena<'a> {
        &mut self.arena
    }
}

impl Drop for PooledArena<'_, '_> {
    fn drop(&mut self) {
        self.pool.put(mem::take(&mut self.arena));
    }
}

/// Pool of parsers
#[derive(Debug)]
pub struct ParserPool {
    free: Mutex<Vec<Parser>>,
    max_idle: usize,
}

impl ParserPool {
    /// Create a pool retaining up to [`DEFAULT_POOL_MAX_IDLE`] parsers
    pub const fn new() -> Self {
        Self::with_max_idle(DEFAULT_POOL_MAX_IDLE)
    }

    /// Create a pool retaining up to `max_idle` parsers
    pub const fn with_max_idle(max_idle: usize) -> Self {
        Self {
            free: parking_lot::const_mutex(Vec::new()),
            max_idle,
        }
    }

    /// Check out a reset parser, allocating one if the pool is empty
    pub fn get(&self) -> PooledParser<'_> {
        PooledParser {
            pool: self,
            parser: self.take(),
        }
    }

    /// Check out a parser that is not returned automatically
    ///
    /// Hand it back with [`ParserPool::put`].
    pub fn take(&self) -> Parser {
        match self.free.lock().pop() {
            Some(parser) => {
                tracing::trace!("reusing pooled parser");
                parser
            }
            None => {
                tracing::trace!("allocating new parser");
                Parser::new()
            }
        }
    }

    /// Reset `parser` and return it to the pool
    pub fn put(&self, mut parser: Parser) {
        parser.reset();
        let mut free = self.free.lock();
        if free.len() < self.max_idle {
            free.push(parser);
        } else {
            tracing::trace!(
                max_idle = self.max_idle,
                "parser pool full, dropping parser"
            );
        }
    }

    /// Number of parsers waiting in the pool
    pub fn idle(&self) -> usize {
        self.free.lock().len()
    }
}

impl Default for ParserPool {
    fn default() -> Self {
        Self::new()
    }
}

/// Parser checked out of a [`ParserPool`]
#[derive(Debug)]
pub struct PooledParser<'p> {
    pool: &'p ParserPool,
    parser: Parser,
}

impl Deref for PooledParser<'_> {
    type Target = Parser;

    fn deref(&self) -> &Parser {
        &self.parser
    }
}

impl DerefMut for PooledParser<'_> {
    fn deref_mut(&mut self) -> &mut Parser {
        &mut self.parser
    }
}

impl Drop for PooledParser<'_> {
    fn drop(&mut self) {
        self.pool.put(mem::take(&mut self.parser));
    }
}
