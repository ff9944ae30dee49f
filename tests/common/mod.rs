//! Hand-written adapters for block-chain style records
//!
//! Field order is the list order on the wire. Optional fixed-size fields are
//! written as the empty string when absent and checked for it before any
//! fixed-length read.

#![allow(dead_code)]

use fastrlp::schema::{Field, FieldKind, Schema};
use fastrlp::{Arena, Marshaler, Result, Unmarshaler, Value, ValueId};

pub type Hash = [u8; 32];
pub type Address = [u8; 20];
pub type Bloom = [u8; 256];
pub type Nonce = [u8; 8];

/// Route `tracing` output to stderr, filtered by `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Append one element per item, or the empty list when there are none
fn set_list<'a, T: Marshaler>(arena: &mut Arena<'a>, parent: ValueId, items: &'a [T]) {
    let list = if items.is_empty() {
        arena.new_null_array()
    } else {
        let list = arena.new_array();
        for item in items {
            let v = item.encode_with(arena);
            arena.set(list, v);
        }
        list
    };
    arena.set(parent, list);
}

fn get_list<T: Unmarshaler + Default>(v: Value<'_>, dst: &mut Vec<T>) -> Result<()> {
    dst.clear();
    for elem in v.elems()? {
        let mut item = T::default();
        item.decode_from(elem)?;
        dst.push(item);
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub parent_hash: Hash,
    pub sha3_uncles: Hash,
    pub miner: Address,
    pub state_root: Hash,
    pub tx_root: Hash,
    pub receipts_root: Hash,
    pub logs_bloom: Bloom,
    pub difficulty: u64,
    pub number: u64,
    pub gas_limit: u64,
    pub gas_used: u64,
    pub timestamp: u64,
    pub extra_data: Vec<u8>,
    pub mix_hash: Hash,
    pub nonce: Nonce,
    /// Keccak of the encoded header, filled in on decode; not on the wire
    pub hash: Hash,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            parent_hash: [0; 32],
            sha3_uncles: [0; 32],
            miner: [0; 20],
            state_root: [0; 32],
            tx_root: [0; 32],
            receipts_root: [0; 32],
            logs_bloom: [0; 256],
            difficulty: 0,
            number: 0,
            gas_limit: 0,
            gas_used: 0,
            timestamp: 0,
            extra_data: Vec::new(),
            mix_hash: [0; 32],
            nonce: [0; 8],
            hash: [0; 32],
        }
    }
}

pub const HEADER_SCHEMA: Schema = Schema::new(
    "Header",
    &[
        Field::new("parent_hash", FieldKind::FixedBytes(32)),
        Field::new("sha3_uncles", FieldKind::FixedBytes(32)),
        Field::new("miner", FieldKind::FixedBytes(20)),
        Field::new("state_root", FieldKind::FixedBytes(32)),
        Field::new("tx_root", FieldKind::FixedBytes(32)),
        Field::new("receipts_root", FieldKind::FixedBytes(32)),
        Field::new("logs_bloom", FieldKind::FixedBytes(256)),
        Field::new("difficulty", FieldKind::Uint),
        Field::new("number", FieldKind::Uint),
        Field::new("gas_limit", FieldKind::Uint),
        Field::new("gas_used", FieldKind::Uint),
        Field::new("timestamp", FieldKind::Uint),
        Field::new("extra_data", FieldKind::Bytes),
        Field::new("mix_hash", FieldKind::FixedBytes(32)),
        Field::new("nonce", FieldKind::FixedBytes(8)),
    ],
);

impl Marshaler for Header {
    fn encode_with<'a>(&'a self, arena: &mut Arena<'a>) -> ValueId {
        let vv = arena.new_array();
        for hash in [&self.parent_hash, &self.sha3_uncles] {
            let v = arena.new_bytes(hash);
            arena.set(vv, v);
        }
        let miner = arena.new_bytes(&self.miner);
        arena.set(vv, miner);
        for hash in [&self.state_root, &self.tx_root, &self.receipts_root] {
            let v = arena.new_bytes(hash);
            arena.set(vv, v);
        }
        let bloom = arena.new_bytes(&self.logs_bloom);
        arena.set(vv, bloom);
        for n in [
            self.difficulty,
            self.number,
            self.gas_limit,
            self.gas_used,
            self.timestamp,
        ] {
            let v = arena.new_uint(n);
            arena.set(vv, v);
        }
        let extra = arena.new_copy_bytes(&self.extra_data);
        arena.set(vv, extra);
        let mix = arena.new_bytes(&self.mix_hash);
        arena.set(vv, mix);
        let nonce = arena.new_bytes(&self.nonce);
        arena.set(vv, nonce)
    }
}

impl Unmarshaler for Header {
    fn decode_from(&mut self, v: Value<'_>) -> Result<()> {
        let elems = v.elems()?;
        elems.expect_len(HEADER_SCHEMA.len())?;

        elems.get(0)?.get_hash(&mut self.parent_hash)?;
        elems.get(1)?.get_hash(&mut self.sha3_uncles)?;
        elems.get(2)?.get_addr(&mut self.miner)?;
        elems.get(3)?.get_hash(&mut self.state_root)?;
        elems.get(4)?.get_hash(&mut self.tx_root)?;
        elems.get(5)?.get_hash(&mut self.receipts_root)?;
        elems.get(6)?.copy_to(&mut self.logs_bloom)?;
        self.difficulty = elems.get(7)?.get_u64()?;
        self.number = elems.get(8)?.get_u64()?;
        self.gas_limit = elems.get(9)?.get_u64()?;
        self.gas_used = elems.get(10)?.get_u64()?;
        self.timestamp = elems.get(11)?.get_u64()?;
        elems.get(12)?.get_bytes(&mut self.extra_data)?;
        elems.get(13)?.get_hash(&mut self.mix_hash)?;
        elems.get(14)?.copy_to(&mut self.nonce)?;

        #[cfg(feature = "keccak")]
        {
            self.hash = v.keccak256();
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    pub nonce: u64,
    pub gas_price: Vec<u8>,
    pub gas: u64,
    pub to: Option<Address>,
    pub value: Vec<u8>,
    pub input: Vec<u8>,
    pub v: u8,
    pub r: Vec<u8>,
    pub s: Vec<u8>,
}

pub const TRANSACTION_SCHEMA: Schema = Schema::new(
    "Transaction",
    &[
        Field::new("nonce", FieldKind::Uint),
        Field::new("gas_price", FieldKind::Bytes),
        Field::new("gas", FieldKind::Uint),
        Field::new("to", FieldKind::OptionalFixedBytes(20)),
        Field::new("value", FieldKind::Bytes),
        Field::new("input", FieldKind::Bytes),
        Field::new("v", FieldKind::Byte),
        Field::new("r", FieldKind::Bytes),
        Field::new("s", FieldKind::Bytes),
    ],
);

impl Marshaler for Transaction {
    fn encode_with<'a>(&'a self, arena: &mut Arena<'a>) -> ValueId {
        let vv = arena.new_array();
        let nonce = arena.new_uint(self.nonce);
        arena.set(vv, nonce);
        let gas_price = arena.new_copy_bytes(&self.gas_price);
        arena.set(vv, gas_price);
        let gas = arena.new_uint(self.gas);
        arena.set(vv, gas);
        let to = match &self.to {
            Some(addr) => arena.new_bytes(addr),
            None => arena.new_null(),
        };
        arena.set(vv, to);
        let value = arena.new_copy_bytes(&self.value);
        arena.set(vv, value);
        let input = arena.new_copy_bytes(&self.input);
        arena.set(vv, input);
        let v = arena.new_copy_bytes(&[self.v]);
        arena.set(vv, v);
        let r = arena.new_copy_bytes(&self.r);
        arena.set(vv, r);
        let s = arena.new_copy_bytes(&self.s);
        arena.set(vv, s)
    }
}

impl Unmarshaler for Transaction {
    fn decode_from(&mut self, v: Value<'_>) -> Result<()> {
        let elems = v.elems()?;
        elems.expect_len(TRANSACTION_SCHEMA.len())?;

        self.nonce = elems.get(0)?.get_u64()?;
        elems.get(1)?.get_bytes(&mut self.gas_price)?;
        self.gas = elems.get(2)?.get_u64()?;

        let to = elems.get(3)?;
        self.to = if to.is_null() {
            None
        } else {
            let mut addr = [0u8; 20];
            to.get_addr(&mut addr)?;
            Some(addr)
        };

        elems.get(4)?.get_bytes(&mut self.value)?;
        elems.get(5)?.get_bytes(&mut self.input)?;
        self.v = elems.get(6)?.get_byte()?;
        elems.get(7)?.get_bytes(&mut self.r)?;
        elems.get(8)?.get_bytes(&mut self.s)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Body {
    pub transactions: Vec<Transaction>,
    pub uncles: Vec<Header>,
}

impl Marshaler for Body {
    fn encode_with<'a>(&'a self, arena: &mut Arena<'a>) -> ValueId {
        let vv = arena.new_array();
        set_list(arena, vv, &self.transactions);
        set_list(arena, vv, &self.uncles);
        vv
    }
}

impl Unmarshaler for Body {
    fn decode_from(&mut self, v: Value<'_>) -> Result<()> {
        let elems = v.elems()?;
        elems.expect_len(2)?;
        get_list(elems.get(0)?, &mut self.transactions)?;
        get_list(elems.get(1)?, &mut self.uncles)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    pub header: Header,
    pub transactions: Vec<Transaction>,
    pub uncles: Vec<Header>,
}

pub const BLOCK_SCHEMA: Schema = Schema::new(
    "Block",
    &[
        Field::new("header", FieldKind::Record(&HEADER_SCHEMA)),
        Field::new(
            "transactions",
            FieldKind::List(&FieldKind::Record(&TRANSACTION_SCHEMA)),
        ),
        Field::new(
            "uncles",
            FieldKind::List(&FieldKind::Record(&HEADER_SCHEMA)),
        ),
    ],
);

impl Marshaler for Block {
    fn encode_with<'a>(&'a self, arena: &mut Arena<'a>) -> ValueId {
        let vv = arena.new_array();
        let header = self.header.encode_with(arena);
        arena.set(vv, header);
        set_list(arena, vv, &self.transactions);
        set_list(arena, vv, &self.uncles);
        vv
    }
}

impl Unmarshaler for Block {
    fn decode_from(&mut self, v: Value<'_>) -> Result<()> {
        let elems = v.elems()?;
        elems.expect_len(BLOCK_SCHEMA.len())?;
        self.header.decode_from(elems.get(0)?)?;
        get_list(elems.get(1)?, &mut self.transactions)?;
        get_list(elems.get(2)?, &mut self.uncles)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Log {
    pub address: Address,
    pub topics: Vec<Hash>,
    pub data: Vec<u8>,
}

impl Marshaler for Log {
    fn encode_with<'a>(&'a self, arena: &mut Arena<'a>) -> ValueId {
        let vv = arena.new_array();
        let address = arena.new_bytes(&self.address);
        arena.set(vv, address);

        let topics = if self.topics.is_empty() {
            arena.new_null_array()
        } else {
            let topics = arena.new_array();
            for topic in &self.topics {
                let v = arena.new_bytes(topic);
                arena.set(topics, v);
            }
            topics
        };
        arena.set(vv, topics);

        let data = arena.new_copy_bytes(&self.data);
        arena.set(vv, data)
    }
}

impl Unmarshaler for Log {
    fn decode_from(&mut self, v: Value<'_>) -> Result<()> {
        let elems = v.elems()?;
        elems.expect_len(3)?;
        elems.get(0)?.get_addr(&mut self.address)?;

        self.topics.clear();
        for elem in elems.get(1)?.elems()? {
            let mut topic = [0u8; 32];
            elem.get_hash(&mut topic)?;
            self.topics.push(topic);
        }

        elems.get(2)?.get_bytes(&mut self.data)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Receipt {
    pub root: Vec<u8>,
    pub cumulative_gas_used: u64,
    pub logs: Vec<Log>,
}

impl Marshaler for Receipt {
    fn encode_with<'a>(&'a self, arena: &mut Arena<'a>) -> ValueId {
        let vv = arena.new_array();
        let root = arena.new_copy_bytes(&self.root);
        arena.set(vv, root);
        let gas = arena.new_uint(self.cumulative_gas_used);
        arena.set(vv, gas);
        set_list(arena, vv, &self.logs);
        vv
    }
}

impl Unmarshaler for Receipt {
    fn decode_from(&mut self, v: Value<'_>) -> Result<()> {
        let elems = v.elems()?;
        elems.expect_len(3)?;
        elems.get(0)?.get_bytes(&mut self.root)?;
        self.cumulative_gas_used = elems.get(1)?.get_u64()?;
        get_list(elems.get(2)?, &mut self.logs)
    }
}

/// Record with an empty-able byte field, a list of byte strings and an integer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Simple {
    pub data1: Vec<u8>,
    pub data2: Vec<Vec<u8>>,
    pub data3: u64,
}

impl Marshaler for Simple {
    fn encode_with<'a>(&'a self, arena: &mut Arena<'a>) -> ValueId {
        let vv = arena.new_array();

        let data1 = if self.data1.is_empty() {
            arena.new_null()
        } else {
            arena.new_bytes(&self.data1)
        };
        arena.set(vv, data1);

        let data2 = if self.data2.is_empty() {
            arena.new_null_array()
        } else {
            let list = arena.new_array();
            for item in &self.data2 {
                let v = if item.is_empty() {
                    arena.new_null()
                } else {
                    arena.new_bytes(item)
                };
                arena.set(list, v);
            }
            list
        };
        arena.set(vv, data2);

        let data3 = arena.new_uint(self.data3);
        arena.set(vv, data3)
    }
}

impl Unmarshaler for Simple {
    fn decode_from(&mut self, v: Value<'_>) -> Result<()> {
        let elems = v.elems()?;
        elems.expect_len(3)?;

        elems.get(0)?.get_bytes(&mut self.data1)?;

        let items = elems.get(1)?.elems()?;
        self.data2.resize_with(items.len(), Vec::new);
        for (dst, item) in self.data2.iter_mut().zip(items) {
            item.get_bytes(dst)?;
        }

        self.data3 = elems.get(2)?.get_u64()?;
        Ok(())
    }
}
