//! Magnitude arithmetic on 32-bit words, most-significant word first.
//!
//! Every function returning a `Vec<u32>` returns it trimmed (no leading zero
//! words). Inputs may carry leading zeros unless stated otherwise.

// Allow truncation casts - carries are split out of u64 explicitly
#![allow(clippy::cast_possible_truncation)]

use std::cmp::Ordering;

/// Strip leading zero words.
pub(super) fn trim(mut mag: Vec<u32>) -> Vec<u32> {
    let lead = mag.iter().take_while(|&&w| w == 0).count();
    if lead > 0 {
        mag.drain(..lead);
    }
    mag
}

fn strip(mag: &[u32]) -> &[u32] {
    let lead = mag.iter().take_while(|&&w| w == 0).count();
    &mag[lead..]
}

/// Number of significant bits.
pub(super) fn bit_len(mag: &[u32]) -> u64 {
    let mag = strip(mag);
    match mag.first() {
        None => 0,
        Some(&top) => (mag.len() as u64 - 1) * 32 + u64::from(32 - top.leading_zeros()),
    }
}

/// Compare two magnitudes numerically.
pub(super) fn cmp(a: &[u32], b: &[u32]) -> Ordering {
    let (a, b) = (strip(a), strip(b));
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

pub(super) fn add(a: &[u32], b: &[u32]) -> Vec<u32> {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut out = vec![0_u32; long.len() + 1];
    let mut carry = 0_u64;

    for i in 0..long.len() {
        let l = u64::from(long[long.len() - 1 - i]);
        let s = if i < short.len() {
            u64::from(short[short.len() - 1 - i])
        } else {
            0
        };
        let t = l + s + carry;
        let slot = out.len() - 1 - i;
        out[slot] = t as u32;
        carry = t >> 32;
    }
    out[0] = carry as u32;

    trim(out)
}

/// `a - b`, requires `a >= b`.
pub(super) fn sub(a: &[u32], b: &[u32]) -> Vec<u32> {
    debug_assert!(cmp(a, b) != Ordering::Less);
    let mut out = a.to_vec();
    let mut borrow = 0_u32;

    for i in 0..out.len() {
        let slot = out.len() - 1 - i;
        let s = if i < b.len() { b[b.len() - 1 - i] } else { 0 };
        if i >= b.len() && borrow == 0 {
            break;
        }
        let (d1, o1) = out[slot].overflowing_sub(s);
        let (d2, o2) = d1.overflowing_sub(borrow);
        out[slot] = d2;
        borrow = u32::from(o1 || o2);
    }

    trim(out)
}

/// Schoolbook product, O(n·m).
pub(super) fn mul(x: &[u32], y: &[u32]) -> Vec<u32> {
    let (x, y) = (strip(x), strip(y));
    if x.is_empty() || y.is_empty() {
        return Vec::new();
    }

    let mut z = vec![0_u32; x.len() + y.len()];
    for i in (0..x.len()).rev() {
        let xi = u64::from(x[i]);
        if xi == 0 {
            continue;
        }
        let mut carry = 0_u64;
        for j in (0..y.len()).rev() {
            let k = i + j + 1;
            let t = xi * u64::from(y[j]) + u64::from(z[k]) + carry;
            z[k] = t as u32;
            carry = t >> 32;
        }
        z[i] = carry as u32;
    }

    trim(z)
}

pub(super) fn shl(mag: &[u32], n: u64) -> Vec<u32> {
    let mag = strip(mag);
    if mag.is_empty() {
        return Vec::new();
    }
    let words = (n / 32) as usize;
    let bits = (n % 32) as u32;

    let mut out = Vec::with_capacity(mag.len() + words + 1);
    if bits == 0 {
        out.extend_from_slice(mag);
    } else {
        out.push(mag[0] >> (32 - bits));
        for i in 0..mag.len() {
            let next = if i + 1 < mag.len() {
                mag[i + 1] >> (32 - bits)
            } else {
                0
            };
            out.push((mag[i] << bits) | next);
        }
    }
    out.resize(out.len() + words, 0);

    trim(out)
}

pub(super) fn shr(mag: &[u32], n: u64) -> Vec<u32> {
    let mag = strip(mag);
    let words = usize::try_from(n / 32).unwrap_or(usize::MAX);
    if words >= mag.len() {
        return Vec::new();
    }
    let bits = (n % 32) as u32;
    let src = &mag[..mag.len() - words];

    let out = if bits == 0 {
        src.to_vec()
    } else {
        (0..src.len())
            .map(|i| {
                let hi = if i > 0 { src[i - 1] << (32 - bits) } else { 0 };
                (src[i] >> bits) | hi
            })
            .collect()
    };

    trim(out)
}

/// Divide by a single word. Returns the trimmed quotient and the remainder.
pub(super) fn div_rem_word(x: &[u32], d: u32) -> (Vec<u32>, u32) {
    debug_assert!(d != 0);
    let d = u64::from(d);
    let mut q = Vec::with_capacity(x.len());
    let mut r = 0_u64;

    for &w in x {
        let cur = (r << 32) | u64::from(w);
        q.push((cur / d) as u32);
        r = cur % d;
    }

    (trim(q), r as u32)
}

/// Long division by aligned shift-and-subtract.
///
/// The divisor is shifted once to line up with the dividend and then walked
/// down one bit at a time inside two fixed-size scratch buffers, so the loop
/// does not allocate. `y` must be non-zero.
pub(super) fn div_rem(x: &[u32], y: &[u32]) -> (Vec<u32>, Vec<u32>) {
    let (x, y) = (strip(x), strip(y));
    debug_assert!(!y.is_empty());

    match cmp(x, y) {
        Ordering::Less => return (Vec::new(), x.to_vec()),
        Ordering::Equal => return (vec![1], Vec::new()),
        Ordering::Greater => {}
    }

    if y.len() == 1 {
        let (q, r) = div_rem_word(x, y[0]);
        let r = if r == 0 { Vec::new() } else { vec![r] };
        return (q, r);
    }

    let len = x.len();
    let shift = bit_len(x) - bit_len(y);

    let mut rem = x.to_vec();
    let aligned = shl(y, shift);
    let mut d = vec![0_u32; len];
    d[len - aligned.len()..].copy_from_slice(&aligned);
    let mut q = vec![0_u32; len];

    // Both buffers share a length, so slice ordering is numeric ordering.
    let mut top = 0;
    for s in (0..=shift).rev() {
        while top < len && rem[top] == 0 && d[top] == 0 {
            top += 1;
        }
        if rem[top..] >= d[top..] {
            sub_in_place(&mut rem[top..], &d[top..]);
            q[len - 1 - (s / 32) as usize] |= 1 << (s % 32);
        }
        if s > 0 {
            shr1_in_place(&mut d[top..]);
        }
    }

    (trim(q), trim(rem))
}

/// `a -= b` for equal-length buffers with `a >= b`.
fn sub_in_place(a: &mut [u32], b: &[u32]) {
    let mut borrow = 0_u32;
    for i in (0..a.len()).rev() {
        let (d1, o1) = a[i].overflowing_sub(b[i]);
        let (d2, o2) = d1.overflowing_sub(borrow);
        a[i] = d2;
        borrow = u32::from(o1 || o2);
    }
}

fn shr1_in_place(buf: &mut [u32]) {
    for i in (0..buf.len()).rev() {
        let hi = if i > 0 { buf[i - 1] << 31 } else { 0 };
        buf[i] = (buf[i] >> 1) | hi;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_u128(mag: &[u32]) -> u128 {
        mag.iter().fold(0_u128, |acc, &w| (acc << 32) | u128::from(w))
    }

    fn from_u128(mut v: u128) -> Vec<u32> {
        let mut out = Vec::new();
        while v > 0 {
            out.push(v as u32);
            v >>= 32;
        }
        out.reverse();
        out
    }

    #[test]
    fn trim_strips_leading_zeros() {
        assert_eq!(trim(vec![0, 0, 5, 0]), vec![5, 0]);
        assert!(trim(vec![0, 0]).is_empty());
    }

    #[test]
    fn bit_len_counts_significant_bits() {
        assert_eq!(bit_len(&[]), 0);
        assert_eq!(bit_len(&[1]), 1);
        assert_eq!(bit_len(&[0, 0x8000_0000]), 32);
        assert_eq!(bit_len(&[1, 0]), 33);
    }

    #[test]
    fn add_carries_into_new_word() {
        assert_eq!(add(&[u32::MAX, u32::MAX], &[1]), vec![1, 0, 0]);
    }

    #[test]
    fn sub_borrows_across_words() {
        assert_eq!(sub(&[1, 0, 0], &[1]), vec![u32::MAX, u32::MAX]);
        assert!(sub(&[7, 7], &[7, 7]).is_empty());
    }

    #[test]
    fn mul_matches_u128() {
        let a = 0x1234_5678_9abc_def0_u128;
        let b = 0x0fed_cba9_u128;
        assert_eq!(to_u128(&mul(&from_u128(a), &from_u128(b))), a * b);
    }

    #[test]
    fn shifts_match_u128() {
        let v = 0xdead_beef_cafe_u128;
        for n in [0_u64, 1, 13, 31, 32, 33, 64] {
            assert_eq!(to_u128(&shl(&from_u128(v), n)), v << n, "shl {n}");
            assert_eq!(to_u128(&shr(&from_u128(v), n)), v >> n, "shr {n}");
        }
        assert!(shr(&[1, 2], 100).is_empty());
    }

    #[test]
    fn div_rem_multi_word() {
        let x = 0xffff_ffff_ffff_ffff_ffff_ffff_u128;
        let y = 0x1_0000_0003_u128;
        let (q, r) = div_rem(&from_u128(x), &from_u128(y));
        assert_eq!(to_u128(&q), x / y);
        assert_eq!(to_u128(&r), x % y);
    }

    #[test]
    fn div_rem_single_word_fast_path() {
        let x = 0x0123_4567_89ab_cdef_0011_u128;
        let (q, r) = div_rem(&from_u128(x), &[65_521]);
        assert_eq!(to_u128(&q), x / 65_521);
        assert_eq!(to_u128(&r), x % 65_521);
    }

    #[test]
    fn div_rem_small_dividend() {
        let (q, r) = div_rem(&[5], &[1, 0]);
        assert!(q.is_empty());
        assert_eq!(r, vec![5]);

        let (q, r) = div_rem(&[1, 0], &[1, 0]);
        assert_eq!(q, vec![1]);
        assert!(r.is_empty());
    }
}
