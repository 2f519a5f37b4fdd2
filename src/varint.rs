//! LEB128 variable-length integers and the zigzag mapping for signed values.

use crate::decoder::DecodeError;

const MORE: u8 = 0x80;
const MASK: u8 = 0x7f;

/// Longest encoding of any supported width (`u64`).
pub(crate) const MAX_LEN: usize = max_len(64);

/// Number of bytes needed to encode the largest value of a `bits`-wide integer.
pub(crate) const fn max_len(bits: u32) -> usize {
    bits.div_ceil(7) as usize
}

/// Encodes `value` into `out`, returning the number of bytes used.
pub(crate) fn encode(mut value: u64, out: &mut [u8; MAX_LEN]) -> usize {
    let mut n = 0;
    while value >= u64::from(MORE) {
        out[n] = (value as u8 & MASK) | MORE;
        value >>= 7;
        n += 1;
    }
    out[n] = value as u8;
    n + 1
}

/// Decodes a varint for an integer that is `bits` wide from the front of `data`.
///
/// Returns the value and the number of bytes it occupied. Fails with `UnexpectedEof` if `data`
/// ends before the last byte, and with `InvalidEncoding` if the encoding is longer than
/// [`max_len`] allows or carries bits that do not fit in `bits`.
pub(crate) fn decode(data: &[u8], bits: u32) -> Result<(u64, usize), DecodeError> {
    let mut value: u64 = 0;

    for i in 0..max_len(bits) {
        let Some(&b) = data.get(i) else {
            return Err(DecodeError::UnexpectedEof);
        };

        let shift = 7 * i as u32;
        let payload = u64::from(b & MASK);
        let room = bits - shift;
        if room < 7 && payload >> room != 0 {
            return Err(DecodeError::InvalidEncoding);
        }
        value |= payload << shift;

        if b & MORE == 0 {
            return Ok((value, i + 1));
        }
    }

    Err(DecodeError::InvalidEncoding)
}

pub(crate) fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

pub(crate) fn zigzag_decode(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}
