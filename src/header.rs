//! RLP item headers and minimal big-endian helpers
//!
//! Every item starts with a prefix byte that selects one of five forms:
//!
//! ```text
//! 0x00..=0x7f  single byte, the byte is its own payload
//! 0x80..=0xb7  short string, payload length = b - 0x80
//! 0xb8..=0xbf  long string, (b - 0xb7) big-endian length bytes follow
//! 0xc0..=0xf7  short list, payload length = b - 0xc0
//! 0xf8..=0xff  long list, (b - 0xf7) big-endian length bytes follow
//! ```
//!
//! Decoding enforces the canonical form of each header; encoding only ever
//! produces canonical headers.

use alloc::vec::Vec;

use crate::error::{Error, Result};
use crate::{EMPTY_LIST_CODE, EMPTY_STRING_CODE, MAX_SHORT_LEN};

const LONG_STRING_BASE: u8 = 0xb7;
const LONG_LIST_BASE: u8 = 0xf7;

/// Decoded item header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Item is a list
    pub list: bool,
    /// Bytes taken by the prefix and any length-of-length field
    pub header_len: usize,
    /// Bytes of payload after the header
    pub payload_len: usize,
}

impl Header {
    /// Decode and validate the header of the item starting at `offset`
    ///
    /// The whole item (header and payload) must fit in `buf`.
    #[inline]
    pub fn decode(buf: &[u8], offset: usize) -> Result<Self> {
        let prefix = *buf.get(offset).ok_or(Error::UnexpectedEof { offset })?;

        let header = match prefix {
            0x00..=0x7f => Self {
                list: false,
                header_len: 0,
                payload_len: 1,
            },
            0x80..=0xb7 => Self {
                list: false,
                header_len: 1,
                payload_len: (prefix - EMPTY_STRING_CODE) as usize,
            },
            0xb8..=0xbf => {
                let len_of_len = (prefix - LONG_STRING_BASE) as usize;
                Self {
                    list: false,
                    header_len: 1 + len_of_len,
                    payload_len: decode_long_len(buf, offset, len_of_len)?,
                }
            }
            0xc0..=0xf7 => Self {
                list: true,
                header_len: 1,
                payload_len: (prefix - EMPTY_LIST_CODE) as usize,
            },
            0xf8..=0xff => {
                let len_of_len = (prefix - LONG_LIST_BASE) as usize;
                Self {
                    list: true,
                    header_len: 1 + len_of_len,
                    payload_len: decode_long_len(buf, offset, len_of_len)?,
                }
            }
        };

        let end = offset
            .checked_add(header.header_len)
            .and_then(|n| n.checked_add(header.payload_len))
            .ok_or(Error::Overflow { offset })?;
        if end > buf.len() {
            return Err(Error::UnexpectedEof { offset });
        }

        if prefix == EMPTY_STRING_CODE + 1 && buf[offset + 1] < EMPTY_STRING_CODE {
            return Err(Error::NonCanonicalSingleByte { offset });
        }

        Ok(header)
    }

    /// Total encoded size of the item
    #[inline]
    pub fn total_len(&self) -> usize {
        self.header_len + self.payload_len
    }

    /// Append a header for a payload of `payload_len` bytes
    ///
    /// Strings of one byte below 0x80 carry no header; callers handle that
    /// case before calling this.
    #[inline]
    pub fn encode(list: bool, payload_len: usize, dst: &mut Vec<u8>) {
        let (short_base, long_base) = if list {
            (EMPTY_LIST_CODE, LONG_LIST_BASE)
        } else {
            (EMPTY_STRING_CODE, LONG_STRING_BASE)
        };

        if payload_len <= MAX_SHORT_LEN {
            dst.push(short_base + payload_len as u8);
        } else {
            let len_of_len = uint_len(payload_len as u64);
            dst.push(long_base + len_of_len as u8);
            put_uint(payload_len as u64, dst);
        }
    }

    /// Size of the header that `encode` writes for `payload_len`
    #[inline]
    pub const fn encoded_len(payload_len: usize) -> usize {
        if payload_len <= MAX_SHORT_LEN {
            1
        } else {
            1 + uint_len(payload_len as u64)
        }
    }
}

fn decode_long_len(buf: &[u8], offset: usize, len_of_len: usize) -> Result<usize> {
    let start = offset + 1;
    let bytes = buf
        .get(start..start + len_of_len)
        .ok_or(Error::UnexpectedEof { offset })?;

    if bytes[0] == 0 {
        return Err(Error::LeadingZeroLength { offset });
    }
    if len_of_len > core::mem::size_of::<usize>() {
        return Err(Error::Overflow { offset });
    }

    let len = bytes.iter().fold(0, |acc, &b| (acc << 8) | b as usize);
    if len <= MAX_SHORT_LEN {
        return Err(Error::NonCanonicalSize { offset });
    }
    Ok(len)
}

/// Number of bytes in the minimal big-endian form of `value`
///
/// Zero has an empty minimal form.
#[inline]
pub const fn uint_len(value: u64) -> usize {
    8 - (value.leading_zeros() / 8) as usize
}

/// Append the minimal big-endian form of `value`
#[inline]
pub fn put_uint(value: u64, dst: &mut Vec<u8>) {
    let bytes = value.to_be_bytes();
    dst.extend_from_slice(&bytes[8 - uint_len(value)..]);
}

/// Read a minimal big-endian integer payload
#[inline]
pub fn read_uint(payload: &[u8]) -> Result<u64> {
    if payload.len() > 8 {
        return Err(Error::UintOverflow { len: payload.len() });
    }
    if payload.first() == Some(&0) {
        return Err(Error::LeadingZeroInteger);
    }
    Ok(payload.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64))
}

/// Encoded size of a string item with the given payload
#[inline]
pub fn string_len(payload: &[u8]) -> usize {
    if payload.len() == 1 && payload[0] < EMPTY_STRING_CODE {
        1
    } else {
        Header::encoded_len(payload.len()) + payload.len()
    }
}

/// Append a complete string item
#[inline]
pub fn put_string(payload: &[u8], dst: &mut Vec<u8>) {
    if payload.len() == 1 && payload[0] < EMPTY_STRING_CODE {
        dst.push(payload[0]);
    } else {
        Header::encode(false, payload.len(), dst);
        dst.extend_from_slice(payload);
    }
}

/// Encoded size of an integer item
#[inline]
pub const fn uint_item_len(value: u64) -> usize {
    if value < EMPTY_STRING_CODE as u64 && value != 0 {
        1
    } else {
        1 + uint_len(value)
    }
}

/// Append a complete integer item
#[inline]
pub fn put_uint_item(value: u64, dst: &mut Vec<u8>) {
    if value < EMPTY_STRING_CODE as u64 && value != 0 {
        dst.push(value as u8);
    } else {
        dst.push(EMPTY_STRING_CODE + uint_len(value) as u8);
        put_uint(value, dst);
    }
}
