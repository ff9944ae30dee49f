//! Basic usage example for fastrlp
//!
//! Run with: cargo run --example basic_usage

use fastrlp::*;

/// Two-field record used by the adapter example
#[derive(Debug, Default, PartialEq)]
struct Account {
    nonce: u64,
    code_hash: [u8; HASH_LEN],
}

impl Marshaler for Account {
    fn encode_with<'a>(&'a self, arena: &mut Arena<'a>) -> ValueId {
        let vv = arena.new_array();
        let nonce = arena.new_uint(self.nonce);
        arena.set(vv, nonce);
        let code_hash = arena.new_bytes(&self.code_hash);
        arena.set(vv, code_hash)
    }
}

impl Unmarshaler for Account {
    fn decode_from(&mut self, v: Value<'_>) -> Result<()> {
        let elems = v.elems()?;
        elems.expect_len(2)?;
        self.nonce = elems.get(0)?.get_u64()?;
        elems.get(1)?.get_hash(&mut self.code_hash)
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn main() -> std::result::Result<(), Error> {
    println!("fastrlp Basic Usage Example");
    println!("===========================");

    // Example 1: Building a value tree
    println!("\n1. Building [ \"cat\", \"dog\" ]:");
    {
        let mut arena = Arena::new();
        let list = arena.new_array();
        let cat = arena.new_bytes(b"cat");
        let dog = arena.new_bytes(b"dog");
        arena.set(list, cat);
        arena.set(list, dog);

        let encoded = arena.encode_to_vec(list);
        println!("  Encoded {} bytes: {}", encoded.len(), hex(&encoded));
    }

    // Example 2: Parsing and inspecting
    println!("\n2. Parsing c88363617483646f67:");
    {
        let buf = [0xc8, 0x83, b'c', b'a', b't', 0x83, b'd', b'o', b'g'];
        let mut parser = Parser::new();
        let v = parser.parse(&buf)?;

        println!("  Kind: {:?}, {} elements", v.kind(), v.elems()?.len());
        for (i, elem) in v.elems()?.iter().enumerate() {
            println!(
                "    [{}] {:?} raw={}",
                i,
                std::str::from_utf8(elem.bytes()?).unwrap_or("?"),
                hex(elem.raw())
            );
        }
    }

    // Example 3: Record adapters
    println!("\n3. Record Adapters:");
    {
        let account = Account {
            nonce: 1024,
            code_hash: [0xc5; HASH_LEN],
        };
        let encoded = account.to_rlp();
        println!("  Encoded account: {} bytes", encoded.len());

        let mut decoded = Account::default();
        decoded.decode_from_bytes(&encoded)?;
        println!(
            "  Decoded: nonce={}, code_hash={}..",
            decoded.nonce,
            hex(&decoded.code_hash[..4])
        );
        assert_eq!(decoded, account);
    }

    // Example 4: Rejecting non-canonical input
    println!("\n4. Rejecting Invalid Input:");
    {
        let cases: [(&str, &[u8]); 4] = [
            ("single byte wrapped", &[0x81, 0x00]),
            ("long form for short list", &[0xf8, 0x01, 0x80]),
            ("truncated string", &[0x83, b'd', b'o']),
            ("trailing bytes", &[0x80, 0x80]),
        ];

        let mut parser = Parser::new();
        for (name, buf) in cases {
            match parser.parse(buf) {
                Ok(_) => println!("  {name}: accepted"),
                Err(err) => println!("  {name}: {:?} ({err})", err.kind()),
            }
        }
    }

    // Example 5: Hashing a sub-structure
    #[cfg(feature = "keccak")]
    {
        println!("\n5. Keccak-256 of the Empty List:");
        let buf = [EMPTY_LIST_CODE];
        let mut parser = Parser::new();
        let v = parser.parse(&buf)?;
        println!("  {}", hex(&v.keccak256()));
    }

    // Example 6: Performance test
    println!("\n6. Performance Test:");
    {
        const N: usize = 10_000;
        let mut buf = Vec::with_capacity(64);
        let mut decoded = Account::default();

        let start = std::time::Instant::now();

        for i in 0..N {
            let account = Account {
                nonce: i as u64,
                code_hash: [i as u8; HASH_LEN],
            };
            buf.clear();
            account.encode_to_bytes(&mut buf);
            decoded.decode_from_bytes(&buf)?;
            std::hint::black_box(&decoded);
        }

        let elapsed = start.elapsed();
        let ns_per_op = elapsed.as_nanos() as u64 / N as u64;
        let ops_per_sec = N as f64 / elapsed.as_secs_f64();

        println!(
            "  {} roundtrips in {:.2}ms",
            N,
            elapsed.as_secs_f64() * 1000.0
        );
        println!("  {} ns/op, {:.0} ops/sec", ns_per_op, ops_per_sec);
        println!(
            "  Idle pooled arenas: {}, parsers: {}",
            DEFAULT_ARENA_POOL.idle(),
            DEFAULT_PARSER_POOL.idle()
        );
    }

    println!("\nAll examples completed successfully!");
    Ok(())
}
