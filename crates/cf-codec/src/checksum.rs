//! Packet checksum.
//!
//! A 32-bit avalanche hash, seeded with the input length. It detects channel
//! corruption; it is not a MAC and offers no protection against tampering.

/// Substituted when the hash would be zero.
pub const ZERO_SENTINEL: u32 = 0x0080_0800;

const MIX_A: u32 = 0x7feb_352d;
const MIX_B: u32 = 0x846c_a68b;

#[inline]
const fn mix(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(MIX_A);
    h ^= h >> 15;
    h = h.wrapping_mul(MIX_B);
    h ^= h >> 16;
    h
}

/// Hash `bytes`. Never returns zero.
#[must_use]
// Packets are far below 4 GiB; the length only seeds the hash.
#[allow(clippy::cast_possible_truncation)]
pub fn data_hash(bytes: &[u8]) -> u32 {
    let n = bytes.len() as u32;
    let mut h = bytes
        .iter()
        .fold(n, |h, &b| mix(h.wrapping_add(u32::from(b))));

    h = mix(h ^ n).wrapping_add(n);
    if h == 0 { ZERO_SENTINEL } else { h }
}
