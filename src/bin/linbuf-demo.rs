//! Encodes a byte array, decodes it again and prints every stage.
//!
//! Run with: cargo run --features demo --bin linbuf-demo
//! Pool activity is logged at `RUST_LOG=linbuf=trace`.

use linbuf::{Decoder, Encoder};
use pretty_hex::PrettyHex;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let original: Vec<u8> = (1..=16).collect();
    println!("original: {original:?}");

    let mut enc = Encoder::new();
    enc.write_bytes(&original);
    let encoded = enc.into_buffer();
    info!(len = encoded.len(), "encoded");
    println!("encoded:\n{}", encoded.as_bytes().hex_dump());

    let mut decoded: &[u8] = &[];
    let mut dec = Decoder::new(encoded.as_bytes());
    dec.read_bytes(&mut decoded);
    let result = dec.finalize();
    println!("err: {result:?}");
    println!("decoded: {decoded:?}");

    assert_eq!(decoded, original.as_slice());
    encoded.release();
}
