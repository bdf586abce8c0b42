//! Nibble <-> PCM conversion
//!
//! Kit sample data packs two 4-bit samples per byte, high nibble first.
//! Decoding is exact; encoding truncates each PCM value to its top 4 bits.

use crate::{FRAME_BYTES, NIBBLE_STEP};

/// Decode a single nibble (low 4 bits of `n`) to PCM
///
/// 0 maps to -32768, 15 to 28672, in steps of 4096.
#[inline]
pub fn decode_nibble(n: u8) -> i16 {
    ((i32::from(n & 0x0f) - 8) * NIBBLE_STEP) as i16
}

/// Decode packed nibble bytes to PCM (two samples per byte)
pub fn decode_nibbles(bytes: &[u8]) -> Vec<i16> {
    let mut samples = Vec::with_capacity(bytes.len() * 2);
    for &byte in bytes {
        samples.push(decode_nibble(byte >> 4));
        samples.push(decode_nibble(byte));
    }
    samples
}

/// Number of kit bytes a buffer of `samples` PCM samples encodes to
///
/// Only whole wave frames are stored; a trailing partial frame is dropped.
#[inline]
pub fn nibble_byte_len(samples: usize) -> usize {
    let bytes = samples / 2;
    bytes - bytes % FRAME_BYTES
}

/// Quantize a PCM sample to a nibble by truncation
#[inline]
pub fn encode_nibble(sample: i16) -> u8 {
    ((i32::from(sample) >> 12) + 8) as u8
}

/// Encode PCM to packed nibble bytes
///
/// Emits exactly [`nibble_byte_len`] bytes for the given buffer.
pub fn encode_nibbles(samples: &[i16]) -> Vec<u8> {
    let len = nibble_byte_len(samples.len());
    samples[..len * 2]
        .chunks_exact(2)
        .map(|pair| (encode_nibble(pair[0]) << 4) | encode_nibble(pair[1]))
        .collect()
}
