#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use linbuf::{DecodeError, Decoder, Encoder};

/// Values to round-trip, plus a byte string that doubles as arbitrary decoder input.
#[derive(Debug, Arbitrary)]
struct DecodeCase<'a> {
    data: &'a [u8],
    a: i16,
    b: f64,
    v: u64,
    s: &'a str,
}

fn is_known(result: Result<(), DecodeError>) -> bool {
    matches!(
        result,
        Ok(()) | Err(DecodeError::UnexpectedEof) | Err(DecodeError::InvalidEncoding)
    )
}

fuzz_target!(|case: DecodeCase<'_>| {
    // Round trip: whatever was written must come back, with no fault.
    let mut enc = Encoder::new();
    enc.write_i16(case.a)
        .write_f64(case.b)
        .write_var_u64(case.v)
        .write_bytes(case.data)
        .write_str(case.s);

    let (mut a, mut b, mut v, mut data, mut s) = (0i16, 0f64, 0u64, &[][..], bstr::BStr::new(""));
    let mut dec = Decoder::new(enc.finalize_bytes());
    dec.read_i16(&mut a)
        .read_f64(&mut b)
        .read_var_u64(&mut v)
        .read_bytes(&mut data)
        .read_str(&mut s);
    assert!(dec.remaining().is_empty());
    assert_eq!(dec.finalize(), Ok(()));
    assert_eq!(a, case.a);
    assert_eq!(b.to_bits(), case.b.to_bits());
    assert_eq!(v, case.v);
    assert_eq!(data, case.data);
    assert_eq!(s, case.s);

    // Arbitrary input: every read path must either succeed or report a known fault.
    let mut f = 0f64;
    let mut dec = Decoder::new(case.data);
    dec.read_f64(&mut f);
    assert!(is_known(dec.finalize()));

    let mut i = 0i16;
    let mut dec = Decoder::new(case.data);
    dec.read_i16(&mut i);
    assert!(is_known(dec.finalize()));

    let mut dec = Decoder::new(case.data);
    dec.read_var_i64(&mut 0).read_var_u32(&mut 0).read_var_i16(&mut 0);
    assert!(is_known(dec.finalize()));

    let mut bytes: &[u8] = &[];
    let mut dec = Decoder::new(case.data);
    dec.read_bytes(&mut bytes);
    assert!(dec.position() <= case.data.len());
    assert!(is_known(dec.finalize()));

    let mut text = bstr::BStr::new("");
    let mut dec = Decoder::new(case.data);
    dec.read_str(&mut text).read_bool(&mut false).read_u32(&mut 0);
    assert!(is_known(dec.finalize()));
});
