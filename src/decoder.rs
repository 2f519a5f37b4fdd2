use core::mem::size_of;

use zerocopy::byteorder::{LE, U16, U32, U64};
use zerocopy::FromBytes;

use crate::pool::{Pool, Pooled, Recycle};
use crate::varint;

/// Result of [`Decoder::finalize`].
pub type Result<T> = core::result::Result<T, DecodeError>;

static CURSORS: Pool<Cursor> = Pool::new("cursor");

/// Read position and fault slot of a [`Decoder`]. Kept in a pool between decoders.
#[derive(Default, Debug)]
pub struct Cursor {
    pos: usize,
    fault: Option<DecodeError>,
}

impl Recycle for Cursor {
    fn reset(&mut self) {
        self.pos = 0;
        self.fault = None;
    }
}

/// Reads values from a slice of bytes, in the order and with the types an [`Encoder`] wrote
/// them.
///
/// Each `read_*` method takes the location to store the value in and returns `&mut Self`, so
/// reads can be chained. Errors are fused: the first read that fails records a [`DecodeError`],
/// and every read after it does nothing at all. The error is reported once, by
/// [`finalize`](Decoder::finalize).
///
/// A failed read leaves its output untouched and does not move the read position. Outputs of
/// reads that succeeded before the failure keep their values.
///
/// ```
/// use linbuf::{DecodeError, Decoder};
///
/// let (mut a, mut b) = (0u8, 0u32);
/// let mut dec = Decoder::new(&[7, 1, 2]);
/// dec.read_u8(&mut a).read_u32(&mut b);
/// assert_eq!(a, 7);
/// assert_eq!(b, 0);
/// assert_eq!(dec.finalize(), Err(DecodeError::UnexpectedEof));
/// ```
///
/// Byte sequences and strings are not copied: they are returned as sub-slices of the input and
/// live as long as the input does, independently of the decoder.
///
/// [`Encoder`]: crate::Encoder
#[derive(Debug)]
pub struct Decoder<'a> {
    data: &'a [u8],
    cursor: Pooled<Cursor>,
}

impl<'a> Decoder<'a> {
    /// Creates a decoder that reads `data` from the start. `data` is borrowed, not copied.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            cursor: CURSORS.acquire(),
        }
    }

    /// Returns the first error encountered, if any, and gives the cursor state back to the pool.
    pub fn finalize(self) -> Result<()> {
        match self.cursor.fault {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// The first error encountered so far, if any.
    pub fn fault(&self) -> Option<DecodeError> {
        self.cursor.fault
    }

    /// Offset of the next byte to be read.
    pub fn position(&self) -> usize {
        self.cursor.pos
    }

    /// The input that has not been read yet.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.cursor.pos..]
    }

    fn fail(&mut self, e: DecodeError) {
        if self.cursor.fault.is_none() {
            self.cursor.fault = Some(e);
        }
    }

    /// Consumes a fixed-size value. Returns `None` if the decoder has already failed or there
    /// is not enough input.
    #[inline(always)]
    fn fixed<T: FromBytes>(&mut self) -> Option<T> {
        if self.cursor.fault.is_some() {
            return None;
        }
        match T::read_from_prefix(self.remaining()) {
            Ok((value, _)) => {
                self.cursor.pos += size_of::<T>();
                Some(value)
            }
            Err(_) => {
                self.fail(DecodeError::UnexpectedEof);
                None
            }
        }
    }

    /// Consumes a varint for an integer that is `bits` wide.
    fn var(&mut self, bits: u32) -> Option<u64> {
        if self.cursor.fault.is_some() {
            return None;
        }
        match varint::decode(self.remaining(), bits) {
            Ok((value, len)) => {
                self.cursor.pos += len;
                Some(value)
            }
            Err(e) => {
                self.fail(e);
                None
            }
        }
    }

    /// Consumes a length-prefixed byte sequence. On failure the position is left where it was
    /// before the length prefix.
    fn prefixed(&mut self) -> Option<&'a [u8]> {
        let start = self.cursor.pos;
        let len = self.var(64)?;

        let rest = self.remaining();
        match usize::try_from(len) {
            Ok(len) if len <= rest.len() => {
                self.cursor.pos += len;
                Some(&rest[..len])
            }
            _ => {
                self.cursor.pos = start;
                self.fail(DecodeError::UnexpectedEof);
                None
            }
        }
    }

    /// Reads a single `u8` value.
    pub fn read_u8(&mut self, out: &mut u8) -> &mut Self {
        if let Some(v) = self.fixed::<u8>() {
            *out = v;
        }
        self
    }

    /// Reads a `u16` in little-endian byte order.
    pub fn read_u16(&mut self, out: &mut u16) -> &mut Self {
        if let Some(v) = self.fixed::<U16<LE>>() {
            *out = v.get();
        }
        self
    }

    /// Reads a `u32` in little-endian byte order.
    pub fn read_u32(&mut self, out: &mut u32) -> &mut Self {
        if let Some(v) = self.fixed::<U32<LE>>() {
            *out = v.get();
        }
        self
    }

    /// Reads a `u64` in little-endian byte order.
    pub fn read_u64(&mut self, out: &mut u64) -> &mut Self {
        if let Some(v) = self.fixed::<U64<LE>>() {
            *out = v.get();
        }
        self
    }

    /// Reads a single `i8` value.
    pub fn read_i8(&mut self, out: &mut i8) -> &mut Self {
        if let Some(v) = self.fixed::<u8>() {
            *out = v as i8;
        }
        self
    }

    /// Reads an `i16` stored as the bits of a `u16`.
    pub fn read_i16(&mut self, out: &mut i16) -> &mut Self {
        if let Some(v) = self.fixed::<U16<LE>>() {
            *out = v.get() as i16;
        }
        self
    }

    /// Reads an `i32` stored as the bits of a `u32`.
    pub fn read_i32(&mut self, out: &mut i32) -> &mut Self {
        if let Some(v) = self.fixed::<U32<LE>>() {
            *out = v.get() as i32;
        }
        self
    }

    /// Reads an `i64` stored as the bits of a `u64`.
    pub fn read_i64(&mut self, out: &mut i64) -> &mut Self {
        if let Some(v) = self.fixed::<U64<LE>>() {
            *out = v.get() as i64;
        }
        self
    }

    /// Reads an `f32` stored as its IEEE-754 bits.
    pub fn read_f32(&mut self, out: &mut f32) -> &mut Self {
        if let Some(v) = self.fixed::<U32<LE>>() {
            *out = f32::from_bits(v.get());
        }
        self
    }

    /// Reads an `f64` stored as its IEEE-754 bits.
    pub fn read_f64(&mut self, out: &mut f64) -> &mut Self {
        if let Some(v) = self.fixed::<U64<LE>>() {
            *out = f64::from_bits(v.get());
        }
        self
    }

    /// Reads a `bool` value. Zero is false; any other byte is true.
    pub fn read_bool(&mut self, out: &mut bool) -> &mut Self {
        if let Some(v) = self.fixed::<u8>() {
            *out = v != 0;
        }
        self
    }

    /// Reads a LEB128 `u64`.
    ///
    /// Fails with [`DecodeError::InvalidEncoding`] if the encoding is longer than 10 bytes or
    /// its last byte holds bits above bit 63.
    pub fn read_var_u64(&mut self, out: &mut u64) -> &mut Self {
        if let Some(v) = self.var(64) {
            *out = v;
        }
        self
    }

    /// Reads a LEB128 `u32`. At most 5 bytes are accepted.
    pub fn read_var_u32(&mut self, out: &mut u32) -> &mut Self {
        if let Some(v) = self.var(32) {
            *out = v as u32;
        }
        self
    }

    /// Reads a LEB128 `u16`. At most 3 bytes are accepted.
    pub fn read_var_u16(&mut self, out: &mut u16) -> &mut Self {
        if let Some(v) = self.var(16) {
            *out = v as u16;
        }
        self
    }

    /// Reads a LEB128 `u8`. At most 2 bytes are accepted.
    pub fn read_var_u8(&mut self, out: &mut u8) -> &mut Self {
        if let Some(v) = self.var(8) {
            *out = v as u8;
        }
        self
    }

    /// Reads a zigzag LEB128 `i64`.
    pub fn read_var_i64(&mut self, out: &mut i64) -> &mut Self {
        if let Some(v) = self.var(64) {
            *out = varint::zigzag_decode(v);
        }
        self
    }

    /// Reads a zigzag LEB128 `i32`.
    pub fn read_var_i32(&mut self, out: &mut i32) -> &mut Self {
        if let Some(v) = self.var(32) {
            *out = varint::zigzag_decode(v) as i32;
        }
        self
    }

    /// Reads a zigzag LEB128 `i16`.
    pub fn read_var_i16(&mut self, out: &mut i16) -> &mut Self {
        if let Some(v) = self.var(16) {
            *out = varint::zigzag_decode(v) as i16;
        }
        self
    }

    /// Reads a length-prefixed byte sequence.
    ///
    /// This does not copy any data. It reads the prefixed length, locates the contents, and
    /// stores a slice of the input in `out`.
    pub fn read_bytes(&mut self, out: &mut &'a [u8]) -> &mut Self {
        if let Some(v) = self.prefixed() {
            *out = v;
        }
        self
    }

    /// Reads a length-prefixed string, as written by
    /// [`Encoder::write_str`](crate::Encoder::write_str).
    ///
    /// This does not copy any data. The contents are not validated; the caller must check that
    /// they are well-formed UTF-8, if necessary.
    #[cfg(feature = "bstr")]
    pub fn read_str(&mut self, out: &mut &'a bstr::BStr) -> &mut Self {
        if let Some(v) = self.prefixed() {
            *out = bstr::BStr::new(v);
        }
        self
    }
}

/// Error type for `Decoder`
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum DecodeError {
    /// A `read_*` method reached the end of the input data before the value it was reading was
    /// complete.
    UnexpectedEof,

    /// A variable-length integer is longer than its type allows, or holds more bits than its
    /// type has.
    InvalidEncoding,
}

impl core::error::Error for DecodeError {}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnexpectedEof => f.write_str("unexpected end of input"),
            Self::InvalidEncoding => f.write_str("invalid variable-length integer encoding"),
        }
    }
}
