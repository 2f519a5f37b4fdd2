use zerocopy::byteorder::{LE, U16, U32, U64};
use zerocopy::IntoBytes;

use crate::pool::{PooledBuffer, BUFFERS};
use crate::varint;

/// Appends values to a pooled byte buffer.
///
/// Every `write_*` method appends the encoding of one value and returns `&mut Self`, so calls can
/// be chained. Writing never fails.
///
/// Fixed-size types are encoded with their little-endian byte representation. Signed integers
/// and floats use the bit pattern of the unsigned integer of the same width, so `-1i16` is
/// `ff ff` and `1.0f32` is `00 00 80 3f`.
///
/// The buffer is taken from a process-wide pool by [`Encoder::new`] and goes back to it when the
/// encoder is dropped or [`release`](Encoder::release)d. Views returned by
/// [`finalize_bytes`](Encoder::finalize_bytes) borrow the encoder, so they cannot outlive it.
#[derive(Debug)]
pub struct Encoder {
    buf: PooledBuffer,
}

impl Encoder {
    /// Creates an encoder over an empty buffer taken from the pool.
    pub fn new() -> Self {
        Self {
            buf: BUFFERS.acquire(),
        }
    }

    /// Creates an encoder whose buffer can hold at least `len` bytes without growing.
    pub fn with_capacity(len: usize) -> Self {
        let mut enc = Self::new();
        enc.buf.reserve(len);
        enc
    }

    /// Discards everything written so far, keeping the buffer.
    pub fn reset(&mut self) -> &mut Self {
        self.buf.clear();
        self
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Returns the underlying buffer. The buffer stays owned by the encoder.
    pub fn finalize(&self) -> &PooledBuffer {
        &self.buf
    }

    /// Returns the bytes written so far.
    pub fn finalize_bytes(&self) -> &[u8] {
        self.buf.as_bytes()
    }

    /// Gives up the encoder and hands its buffer to the caller. The buffer returns to the pool
    /// when it is dropped, unless it is detached with [`PooledBuffer::into_vec`].
    pub fn into_buffer(self) -> PooledBuffer {
        self.buf
    }

    /// Returns the buffer to the pool. Equivalent to dropping the encoder.
    pub fn release(self) {
        self.buf.release();
    }

    /// Writes `bytes` to the output as-is, with no length prefix.
    pub fn write_raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Writes a single `u8` value
    pub fn write_u8(&mut self, value: u8) -> &mut Self {
        self.buf.push(value);
        self
    }

    /// Writes a `u16` in little-endian byte order.
    pub fn write_u16(&mut self, value: u16) -> &mut Self {
        self.write_raw(U16::<LE>::new(value).as_bytes())
    }

    /// Writes a `u32` in little-endian byte order.
    pub fn write_u32(&mut self, value: u32) -> &mut Self {
        self.write_raw(U32::<LE>::new(value).as_bytes())
    }

    /// Writes a `u64` in little-endian byte order.
    pub fn write_u64(&mut self, value: u64) -> &mut Self {
        self.write_raw(U64::<LE>::new(value).as_bytes())
    }

    /// Writes a single `i8` value
    pub fn write_i8(&mut self, value: i8) -> &mut Self {
        self.write_u8(value as u8)
    }

    /// Writes an `i16` as the bits of a `u16`.
    pub fn write_i16(&mut self, value: i16) -> &mut Self {
        self.write_u16(value as u16)
    }

    /// Writes an `i32` as the bits of a `u32`.
    pub fn write_i32(&mut self, value: i32) -> &mut Self {
        self.write_u32(value as u32)
    }

    /// Writes an `i64` as the bits of a `u64`.
    pub fn write_i64(&mut self, value: i64) -> &mut Self {
        self.write_u64(value as u64)
    }

    /// Writes an `f32` as its IEEE-754 bits, in little-endian byte order.
    pub fn write_f32(&mut self, value: f32) -> &mut Self {
        self.write_u32(value.to_bits())
    }

    /// Writes an `f64` as its IEEE-754 bits, in little-endian byte order.
    pub fn write_f64(&mut self, value: f64) -> &mut Self {
        self.write_u64(value.to_bits())
    }

    /// Writes a `bool` value. True is encoded as 1. False is encoded as 0.
    pub fn write_bool(&mut self, value: bool) -> &mut Self {
        self.write_u8(value as u8)
    }

    /// Encodes a `u64` value using LEB128.
    ///
    /// Each byte carries 7 bits of the value, lowest bits first. The high bit of each byte is set
    /// if more bytes follow. Values below 128 take a single byte; `u64::MAX` takes 10.
    pub fn write_var_u64(&mut self, value: u64) -> &mut Self {
        let mut bytes = [0; varint::MAX_LEN];
        let n = varint::encode(value, &mut bytes);
        self.write_raw(&bytes[..n])
    }

    /// Encodes a `u32` value using LEB128. Takes at most 5 bytes.
    pub fn write_var_u32(&mut self, value: u32) -> &mut Self {
        self.write_var_u64(value.into())
    }

    /// Encodes a `u16` value using LEB128. Takes at most 3 bytes.
    pub fn write_var_u16(&mut self, value: u16) -> &mut Self {
        self.write_var_u64(value.into())
    }

    /// Encodes a `u8` value using LEB128. Takes at most 2 bytes.
    pub fn write_var_u8(&mut self, value: u8) -> &mut Self {
        self.write_var_u64(value.into())
    }

    /// Encodes an `i64` value using zigzag and LEB128.
    ///
    /// Zigzag maps `0, -1, 1, -2, 2, ...` to `0, 1, 2, 3, 4, ...`, so values close to zero
    /// take few bytes whatever their sign.
    pub fn write_var_i64(&mut self, value: i64) -> &mut Self {
        self.write_var_u64(varint::zigzag_encode(value))
    }

    /// Encodes an `i32` value using zigzag and LEB128. Takes at most 5 bytes.
    pub fn write_var_i32(&mut self, value: i32) -> &mut Self {
        self.write_var_i64(value.into())
    }

    /// Encodes an `i16` value using zigzag and LEB128. Takes at most 3 bytes.
    pub fn write_var_i16(&mut self, value: i16) -> &mut Self {
        self.write_var_i64(value.into())
    }

    /// Writes a byte sequence in length-prefixed form. The length is a LEB128 `u64`.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.write_var_u64(bytes.len() as u64);
        self.write_raw(bytes)
    }

    /// Writes a string in length-prefixed form, using the same encoding as
    /// [`write_bytes`](Encoder::write_bytes).
    pub fn write_str(&mut self, s: &str) -> &mut Self {
        self.write_bytes(s.as_bytes())
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}
