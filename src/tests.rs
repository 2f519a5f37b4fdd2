use crate::*;
use pretty_hex::PrettyHex;

#[test]
fn basic_u8() {
    let data = [42, 43, 44];
    let mut v = 0;
    let mut d = Decoder::new(&data);
    d.read_u8(&mut v);
    assert_eq!(v, 42);
    assert_eq!(d.remaining(), &[43, 44]);
    assert_eq!(d.finalize(), Ok(()));
}

#[test]
fn basic_u16() {
    let mut v = 0;
    let mut d = Decoder::new(&[]);
    d.read_u16(&mut v);
    assert_eq!(d.finalize(), Err(DecodeError::UnexpectedEof));

    let data = [0xaa, 0x55, 0x33, 0x44];
    let mut d = Decoder::new(&data);
    d.read_u16(&mut v);
    assert_eq!(v, 0x55aa);
    assert_eq!(d.remaining(), &[0x33, 0x44]);
}

#[test]
fn fixed_width_little_endian() {
    let mut e = Encoder::new();
    e.write_u32(0x11223344);
    assert_eq!(e.finalize_bytes(), [0x44, 0x33, 0x22, 0x11]);

    e.reset().write_u32(0xdeadbeef).write_i32(-2);
    assert_eq!(hex::encode(e.finalize_bytes()), "efbeaddefeffffff");

    e.reset().write_u16(0x0102).write_u64(0x0102030405060708);
    assert_eq!(
        e.finalize_bytes(),
        [0x02, 0x01, 0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01]
    );

    e.reset().write_i16(-2).write_i8(-1).write_f32(1.0).write_f64(-2.0);
    assert_eq!(
        e.finalize_bytes(),
        [
            0xfe, 0xff, // i16
            0xff, // i8
            0x00, 0x00, 0x80, 0x3f, // f32
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xc0, // f64
        ]
    );
}

#[test]
fn bool_bytes() {
    let mut e = Encoder::new();
    e.write_bool(true).write_bool(false);
    assert_eq!(e.finalize_bytes(), [1, 0]);

    let (mut a, mut b, mut c) = (false, true, false);
    let mut d = Decoder::new(&[1, 0, 7]);
    d.read_bool(&mut a).read_bool(&mut b).read_bool(&mut c);
    assert_eq!(d.finalize(), Ok(()));
    assert_eq!((a, b, c), (true, false, true));
}

#[test]
fn varint_minimal_lengths() {
    let mut e = Encoder::new();
    e.write_var_u64(0);
    assert_eq!(e.finalize_bytes(), [0x00]);
    e.reset().write_var_u64(127);
    assert_eq!(e.finalize_bytes(), [0x7f]);
    e.reset().write_var_u64(128);
    assert_eq!(e.finalize_bytes(), [0x80, 0x01]);
    assert_ne!(e.finalize_bytes()[0] & 0x80, 0);
}

#[test]
fn var_unsigned() {
    let cases: &[(u64, &[u8])] = &[
        (0, &[0x00]),
        (1, &[0x01]),
        (127, &[0x7f]),
        (128, &[0x80, 0x01]),
        (255, &[0xff, 0x01]),
        (256, &[0x80, 0x02]),
        (12345, &[0xb9, 0x60]),
        (
            u64::MAX,
            &[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01],
        ),
    ];

    // Check encoding
    for &(x, bytes) in cases.iter() {
        let mut e = Encoder::new();
        e.write_var_u64(x);
        assert_eq!(e.finalize_bytes(), bytes, "x = {x} (0x{x:x})");
    }

    // Check decoding
    for &(expected_x, bytes) in cases.iter() {
        let mut x = 0;
        let mut d = Decoder::new(bytes);
        d.read_var_u64(&mut x);
        assert_eq!(d.position(), bytes.len());
        assert_eq!(d.finalize(), Ok(()));
        assert_eq!(x, expected_x, "x = {expected_x} (0x{expected_x:x})");
    }
}

#[test]
fn var_signed_zigzag() {
    let cases: &[(i64, &[u8])] = &[
        (0, &[0x00]),
        (-1, &[0x01]),
        (1, &[0x02]),
        (-2, &[0x03]),
        (-64, &[0x7f]),
        (64, &[0x80, 0x01]),
        (
            i64::MIN,
            &[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01],
        ),
    ];

    for &(x, bytes) in cases.iter() {
        let mut e = Encoder::new();
        e.write_var_i64(x);
        assert_eq!(e.finalize_bytes(), bytes, "x = {x}");

        let mut decoded = 0;
        let mut d = Decoder::new(bytes);
        d.read_var_i64(&mut decoded);
        assert_eq!(d.finalize(), Ok(()));
        assert_eq!(decoded, x);
    }
}

#[test]
fn narrow_varints() {
    let mut e = Encoder::new();
    e.write_var_u8(u8::MAX)
        .write_var_u16(u16::MAX)
        .write_var_u32(u32::MAX)
        .write_var_i16(i16::MIN)
        .write_var_i32(i32::MIN);
    println!("{}", e.finalize_bytes().hex_dump());

    let (mut a, mut b, mut c, mut x, mut y) = (0u8, 0u16, 0u32, 0i16, 0i32);
    let mut d = Decoder::new(e.finalize_bytes());
    d.read_var_u8(&mut a)
        .read_var_u16(&mut b)
        .read_var_u32(&mut c)
        .read_var_i16(&mut x)
        .read_var_i32(&mut y);
    assert!(d.remaining().is_empty());
    assert_eq!(d.finalize(), Ok(()));
    assert_eq!((a, b, c, x, y), (u8::MAX, u16::MAX, u32::MAX, i16::MIN, i32::MIN));
}

#[test]
fn narrow_varint_too_wide() {
    // A valid u32 varint is too large for a u16.
    let mut e = Encoder::new();
    e.write_var_u32(0x1_0000);

    let mut v = 0xbeef;
    let mut d = Decoder::new(e.finalize_bytes());
    d.read_var_u16(&mut v);
    assert_eq!(v, 0xbeef);
    assert_eq!(d.position(), 0);
    assert_eq!(d.finalize(), Err(DecodeError::InvalidEncoding));
}

#[test]
fn overlong_varint() {
    let mut v = 0;
    let mut d = Decoder::new(&[0x80; 12]);
    d.read_var_u64(&mut v);
    assert_eq!(d.finalize(), Err(DecodeError::InvalidEncoding));

    let mut d = Decoder::new(&[0x80, 0x80]);
    d.read_var_u64(&mut v);
    assert_eq!(d.finalize(), Err(DecodeError::UnexpectedEof));
}

#[test]
fn bytes_zero_copy() {
    let mut e = Encoder::new();
    e.write_bytes(&[1, 2, 3]).write_u16(0xaa55);
    assert_eq!(e.finalize_bytes(), [3, 1, 2, 3, 0x55, 0xaa]);

    let input = e.finalize_bytes();
    let mut v: &[u8] = &[];
    let mut d = Decoder::new(input);
    d.read_bytes(&mut v);
    assert_eq!(d.finalize(), Ok(()));
    assert_eq!(v, [1, 2, 3]);
    assert!(core::ptr::eq(v.as_ptr(), input[1..].as_ptr()));
}

#[test]
fn bytes_empty() {
    let mut e = Encoder::new();
    e.write_bytes(&[]);
    assert_eq!(e.finalize_bytes(), [0x00]);

    let mut v: &[u8] = b"untouched";
    let mut d = Decoder::new(e.finalize_bytes());
    d.read_bytes(&mut v);
    assert_eq!(d.finalize(), Ok(()));
    assert!(v.is_empty());
}

#[test]
fn bytes_truncated() {
    let data = [5, b'a', b'b'];
    let mut v: &[u8] = b"untouched";
    let mut d = Decoder::new(&data);
    d.read_bytes(&mut v);
    assert_eq!(v, b"untouched");
    assert_eq!(d.position(), 0);
    assert_eq!(d.finalize(), Err(DecodeError::UnexpectedEof));
}

#[test]
fn bytes_huge_length() {
    let mut e = Encoder::new();
    e.write_var_u64(u64::MAX).write_raw(b"abc");

    let mut v: &[u8] = &[];
    let mut d = Decoder::new(e.finalize_bytes());
    d.read_bytes(&mut v);
    assert_eq!(d.finalize(), Err(DecodeError::UnexpectedEof));
}

#[cfg(feature = "bstr")]
#[test]
fn str_utf8() {
    let mut e = Encoder::new();
    e.write_str("Hello!").write_u16(0xaa55);
    assert_eq!(
        e.finalize_bytes(),
        [6, b'H', b'e', b'l', b'l', b'o', b'!', 0x55, 0xaa]
    );

    let mut s = bstr::BStr::new("");
    let mut d = Decoder::new(e.finalize_bytes());
    d.read_str(&mut s);
    assert_eq!(s, "Hello!");
    assert_eq!(d.remaining(), [0x55, 0xaa]);
}

#[cfg(feature = "bstr")]
#[test]
fn str_not_validated() {
    let data = [2, 0xff, 0xfe];
    let mut s = bstr::BStr::new("");
    let mut d = Decoder::new(&data);
    d.read_str(&mut s);
    assert_eq!(d.finalize(), Ok(()));
    assert_eq!(s, &[0xff, 0xfe][..]);
}

#[test]
fn mixed() {
    let mut e = Encoder::new();
    e.write_u8(42)
        .write_u16(0x0102)
        .write_str("Hello, world!")
        .write_i32(-33)
        .write_var_i32(-33)
        .write_bool(true);

    println!("{}", e.finalize_bytes().hex_dump());

    let (mut a, mut b, mut s, mut c, mut vc, mut t) = (0, 0, &[][..], 0, 0, false);
    let mut d = Decoder::new(e.finalize_bytes());
    d.read_u8(&mut a)
        .read_u16(&mut b)
        .read_bytes(&mut s)
        .read_i32(&mut c)
        .read_var_i32(&mut vc)
        .read_bool(&mut t);
    assert_eq!(d.finalize(), Ok(()));
    assert_eq!(a, 42);
    assert_eq!(b, 0x0102);
    assert_eq!(s, b"Hello, world!");
    assert_eq!(c, -33);
    assert_eq!(vc, -33);
    assert!(t);
}

#[test]
fn truncation_leaves_output_untouched() {
    let mut e = Encoder::new();
    e.write_u64(u64::MAX);
    let full = e.finalize_bytes();

    for len in 0..full.len() {
        let mut v = 7u64;
        let mut d = Decoder::new(&full[..len]);
        d.read_u64(&mut v);
        assert_eq!(v, 7);
        assert_eq!(d.position(), 0);
        assert_eq!(d.finalize(), Err(DecodeError::UnexpectedEof), "len = {len}");
    }
}

#[test]
fn fault_is_fused() {
    // u8, then a truncated u32, then bytes that would decode fine on their own.
    let data = [1, 0xaa, 0xbb, 0x00];
    let (mut a, mut b, mut c, mut v) = (0u8, 9u32, 9u8, 9u64);
    let mut d = Decoder::new(&data);
    d.read_u8(&mut a).read_u32(&mut b);
    assert_eq!(d.fault(), Some(DecodeError::UnexpectedEof));

    d.read_u8(&mut c).read_var_u64(&mut v);
    assert_eq!(a, 1);
    assert_eq!((b, c, v), (9, 9, 9));
    assert_eq!(d.position(), 1);
    assert_eq!(d.finalize(), Err(DecodeError::UnexpectedEof));
}

#[test]
fn first_fault_wins() {
    let mut data = vec![0xff; 10];
    data.push(0x7f);
    let (mut v, mut w) = (0u64, 0u64);
    let mut d = Decoder::new(&data);
    d.read_var_u64(&mut v).read_u64(&mut w);
    assert_eq!(d.finalize(), Err(DecodeError::InvalidEncoding));
}

#[test]
fn finalize_is_repeatable() {
    let mut e = Encoder::with_capacity(16);
    e.write_u8(1);
    assert_eq!(e.finalize_bytes(), [1]);
    e.write_u8(2);
    assert_eq!(e.finalize_bytes(), [1, 2]);
    assert_eq!(e.finalize().as_bytes(), [1, 2]);
    assert_eq!(e.len(), 2);
    e.release();
}

#[test]
fn into_buffer() {
    let mut e = Encoder::new();
    e.write_u16(0x0201);
    let buf = e.into_buffer();
    assert_eq!(buf.as_bytes(), [1, 2]);
    assert_eq!(buf.into_vec(), vec![1, 2]);
}

#[test]
fn new_encoder_is_empty() {
    let mut e = Encoder::new();
    e.write_raw(&[0xcc; 32]);
    e.release();

    for _ in 0..4 {
        let e = Encoder::new();
        assert!(e.is_empty());
        assert!(e.finalize_bytes().is_empty());
    }
}

#[test]
fn decode_error_display() {
    assert_eq!(
        DecodeError::UnexpectedEof.to_string(),
        "unexpected end of input"
    );
    assert_eq!(
        DecodeError::InvalidEncoding.to_string(),
        "invalid variable-length integer encoding"
    );
}
