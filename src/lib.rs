//! Chainable binary encoder and decoder for fixed-order records.
//!
//! [`Encoder`] appends typed values to a pooled, growable buffer. [`Decoder`] reads the same
//! values back out of a borrowed slice, in the same order. There are no tags, no headers and no
//! schema: the wire format is simply the concatenation of each field's encoding, so the reader
//! must call the same operations, with the same types, in the same order as the writer.
//!
//! * Fixed-width integers and floats are little-endian. Signed integers and floats are written
//!   as the bit pattern of the unsigned integer of the same width.
//! * Variable-length integers use LEB128. Signed variants are zigzag-mapped first.
//! * Byte sequences and text are prefixed with their length as a variable-length `u64`.
//!
//! ```
//! use linbuf::{Decoder, Encoder};
//!
//! let mut enc = Encoder::new();
//! enc.write_u16(0x0102).write_var_i64(-3).write_bytes(b"hi");
//!
//! let (mut a, mut b, mut c) = (0u16, 0i64, &[][..]);
//! let mut dec = Decoder::new(enc.finalize_bytes());
//! dec.read_u16(&mut a).read_var_i64(&mut b).read_bytes(&mut c);
//! assert_eq!(dec.finalize(), Ok(()));
//! assert_eq!((a, b, c), (0x0102, -3, &b"hi"[..]));
//! ```

#![forbid(unsafe_code)]
#![forbid(unused_must_use)]
#![warn(missing_docs)]

mod decoder;
mod encoder;
mod pool;
mod varint;

#[cfg(test)]
mod tests;

pub use decoder::{DecodeError, Decoder, Result};
pub use encoder::Encoder;
pub use pool::{Pooled, PooledBuffer, MAX_IDLE, MAX_RETAINED_CAPACITY};
