//! Arbitrary-precision signed integers.
//!
//! `BigInt` is an immutable value type in sign-magnitude form. The magnitude
//! is a sequence of 32-bit words, most-significant first, with no leading
//! zero words; zero has an empty magnitude and [`Sign::Zero`]. Because the
//! form is canonical, equality and hashing compare sign and words directly.
//!
//! Every operation returns a new value. Division truncates toward zero
//! ([`BigInt::div_rem`], [`BigInt::checked_rem`]); [`BigInt::modulo`] returns
//! the non-negative residue.
//!
//! # Example
//!
//! ```rust
//! use cf_core::BigInt;
//!
//! let a = BigInt::from_be_bytes(&[0x01, 0x00, 0x00, 0x00, 0x00]);
//! let m = BigInt::from(65_521_u32);
//!
//! let inv = a.mod_inverse(&m).unwrap();
//! assert_eq!((&inv * &a).modulo(&m).unwrap(), BigInt::one());
//! ```

mod fmt;
mod mag;
mod modular;

use std::cmp::Ordering;
use std::ops::{Add, Mul, Neg, Sub};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use crate::error::{FountainError, FountainResult};

static MAX_BITS: AtomicU64 = AtomicU64::new(0);

/// Largest bit length produced by any `BigInt` since the last reset.
///
/// Instrumentation only; nothing depends on it for correctness.
#[must_use]
pub fn max_bits_observed() -> u64 {
    MAX_BITS.load(AtomicOrdering::Relaxed)
}

/// Reset the [`max_bits_observed`] counter.
pub fn reset_max_bits() {
    MAX_BITS.store(0, AtomicOrdering::Relaxed);
}

/// Sign of a [`BigInt`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sign {
    /// Strictly negative.
    Negative,
    /// Exactly zero.
    Zero,
    /// Strictly positive.
    Positive,
}

impl Sign {
    const fn flip(self) -> Self {
        match self {
            Self::Negative => Self::Positive,
            Self::Zero => Self::Zero,
            Self::Positive => Self::Negative,
        }
    }

    fn times(self, other: Self) -> Self {
        match (self, other) {
            (Self::Zero, _) | (_, Self::Zero) => Self::Zero,
            (a, b) if a == b => Self::Positive,
            _ => Self::Negative,
        }
    }
}

/// Arbitrary-precision signed integer.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BigInt {
    sign: Sign,
    mag: Vec<u32>,
}

impl BigInt {
    /// Build from a sign and an untrimmed magnitude, canonicalizing both.
    fn from_parts(sign: Sign, mag: Vec<u32>) -> Self {
        let mag = mag::trim(mag);
        if mag.is_empty() || sign == Sign::Zero {
            return Self::zero();
        }
        let value = Self { sign, mag };
        MAX_BITS.fetch_max(value.bit_len(), AtomicOrdering::Relaxed);
        value
    }

    /// The value 0.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            sign: Sign::Zero,
            mag: Vec::new(),
        }
    }

    /// The value 1.
    #[must_use]
    pub fn one() -> Self {
        Self::from(1_u32)
    }

    /// Sign of the value.
    #[must_use]
    pub const fn sign(&self) -> Sign {
        self.sign
    }

    /// -1, 0 or +1.
    #[must_use]
    pub const fn signum(&self) -> i8 {
        match self.sign {
            Sign::Negative => -1,
            Sign::Zero => 0,
            Sign::Positive => 1,
        }
    }

    #[must_use]
    pub const fn is_zero(&self) -> bool {
        matches!(self.sign, Sign::Zero)
    }

    #[must_use]
    pub const fn is_negative(&self) -> bool {
        matches!(self.sign, Sign::Negative)
    }

    #[must_use]
    pub const fn is_positive(&self) -> bool {
        matches!(self.sign, Sign::Positive)
    }

    /// Magnitude words, most-significant first.
    #[must_use]
    pub fn words(&self) -> &[u32] {
        &self.mag
    }

    /// Number of significant bits in the magnitude.
    #[must_use]
    pub fn bit_len(&self) -> u64 {
        mag::bit_len(&self.mag)
    }

    /// Absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        match self.sign {
            Sign::Negative => Self {
                sign: Sign::Positive,
                mag: self.mag.clone(),
            },
            _ => self.clone(),
        }
    }

    /// The value as a `u64`, if it is non-negative and fits.
    #[must_use]
    pub fn to_u64(&self) -> Option<u64> {
        match (self.sign, self.mag.as_slice()) {
            (Sign::Zero, _) => Some(0),
            (Sign::Positive, [lo]) => Some(u64::from(*lo)),
            (Sign::Positive, [hi, lo]) => Some((u64::from(*hi) << 32) | u64::from(*lo)),
            _ => None,
        }
    }

    /// Interpret `bytes` as a non-negative big-endian magnitude.
    #[must_use]
    pub fn from_be_bytes(bytes: &[u8]) -> Self {
        let lead = bytes.iter().take_while(|&&b| b == 0).count();
        let bytes = &bytes[lead..];
        if bytes.is_empty() {
            return Self::zero();
        }

        let head = bytes.len() % 4;
        let mut mag = Vec::with_capacity(bytes.len().div_ceil(4));
        if head > 0 {
            mag.push(
                bytes[..head]
                    .iter()
                    .fold(0_u32, |acc, &b| (acc << 8) | u32::from(b)),
            );
        }
        mag.extend(
            bytes[head..]
                .chunks_exact(4)
                .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]])),
        );

        Self::from_parts(Sign::Positive, mag)
    }

    /// Big-endian bytes of the magnitude.
    ///
    /// Zero exports as no bytes. Any non-zero value below 65536 exports as
    /// exactly two bytes, so a 2-byte slice never needs re-padding; larger
    /// values export with no leading zero byte. The sign is not encoded.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_be_bytes(&self) -> Vec<u8> {
        match self.mag.as_slice() {
            [] => Vec::new(),
            [w] if *w < 1 << 16 => (*w as u16).to_be_bytes().to_vec(),
            words => {
                let mut out = Vec::with_capacity(words.len() * 4);
                for w in words {
                    out.extend_from_slice(&w.to_be_bytes());
                }
                let lead = out.iter().take_while(|&&b| b == 0).count();
                out.drain(..lead);
                out
            }
        }
    }

    /// Shift the magnitude left by `n` bits; negative `n` shifts right.
    #[must_use]
    pub fn shl(&self, n: i64) -> Self {
        if n < 0 {
            return self.shr(n.saturating_neg());
        }
        Self::from_parts(self.sign, mag::shl(&self.mag, n.unsigned_abs()))
    }

    /// Shift the magnitude right by `n` bits; negative `n` shifts left.
    ///
    /// Operates on the magnitude, so negative values truncate toward zero.
    #[must_use]
    pub fn shr(&self, n: i64) -> Self {
        if n < 0 {
            return self.shl(n.saturating_neg());
        }
        Self::from_parts(self.sign, mag::shr(&self.mag, n.unsigned_abs()))
    }

    /// Truncating division: `self = q * divisor + r` with `r` carrying the
    /// sign of `self`.
    ///
    /// # Errors
    ///
    /// Returns `FountainError::InvalidArgument` if `divisor` is zero.
    pub fn div_rem(&self, divisor: &Self) -> FountainResult<(Self, Self)> {
        if divisor.is_zero() {
            return Err(FountainError::invalid("division by zero"));
        }
        let (q, r) = mag::div_rem(&self.mag, &divisor.mag);
        Ok((
            Self::from_parts(self.sign.times(divisor.sign), q),
            Self::from_parts(self.sign, r),
        ))
    }

    /// Remainder truncated toward zero (C-style).
    ///
    /// # Errors
    ///
    /// Returns `FountainError::InvalidArgument` if `divisor` is zero.
    pub fn checked_rem(&self, divisor: &Self) -> FountainResult<Self> {
        if divisor.is_zero() {
            return Err(FountainError::invalid("division by zero"));
        }
        Ok(self.rem_unchecked(divisor))
    }

    fn rem_unchecked(&self, divisor: &Self) -> Self {
        if let [d] = divisor.mag.as_slice() {
            let (_, r) = mag::div_rem_word(&self.mag, *d);
            return Self::from_parts(self.sign, vec![r]);
        }
        let (_, r) = mag::div_rem(&self.mag, &divisor.mag);
        Self::from_parts(self.sign, r)
    }

    /// Non-negative residue in `[0, modulus)`.
    ///
    /// # Errors
    ///
    /// Returns `FountainError::InvalidArgument` if `modulus` is not positive.
    pub fn modulo(&self, modulus: &Self) -> FountainResult<Self> {
        if !modulus.is_positive() {
            return Err(FountainError::invalid(format!(
                "modulus {modulus} is not positive"
            )));
        }
        let r = self.rem_unchecked(modulus);
        Ok(if r.is_negative() { &r + modulus } else { r })
    }
}

impl Default for BigInt {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<u64> for BigInt {
    fn from(v: u64) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        Self::from_parts(Sign::Positive, vec![(v >> 32) as u32, v as u32])
    }
}

impl From<u32> for BigInt {
    fn from(v: u32) -> Self {
        Self::from_parts(Sign::Positive, vec![v])
    }
}

impl From<u16> for BigInt {
    fn from(v: u16) -> Self {
        Self::from(u32::from(v))
    }
}

impl From<i64> for BigInt {
    fn from(v: i64) -> Self {
        let mag = Self::from(v.unsigned_abs());
        if v < 0 { -mag } else { mag }
    }
}

impl Ord for BigInt {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sign.cmp(&other.sign).then_with(|| match self.sign {
            Sign::Zero => Ordering::Equal,
            Sign::Positive => mag::cmp(&self.mag, &other.mag),
            Sign::Negative => mag::cmp(&other.mag, &self.mag),
        })
    }
}

impl PartialOrd for BigInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Neg for &BigInt {
    type Output = BigInt;

    fn neg(self) -> BigInt {
        BigInt {
            sign: self.sign.flip(),
            mag: self.mag.clone(),
        }
    }
}

impl Neg for BigInt {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            sign: self.sign.flip(),
            mag: self.mag,
        }
    }
}

impl Add for &BigInt {
    type Output = BigInt;

    fn add(self, rhs: &BigInt) -> BigInt {
        match (self.sign, rhs.sign) {
            (_, Sign::Zero) => self.clone(),
            (Sign::Zero, _) => rhs.clone(),
            (a, b) if a == b => BigInt::from_parts(a, mag::add(&self.mag, &rhs.mag)),
            _ => match mag::cmp(&self.mag, &rhs.mag) {
                Ordering::Equal => BigInt::zero(),
                Ordering::Greater => BigInt::from_parts(self.sign, mag::sub(&self.mag, &rhs.mag)),
                Ordering::Less => BigInt::from_parts(rhs.sign, mag::sub(&rhs.mag, &self.mag)),
            },
        }
    }
}

impl Sub for &BigInt {
    type Output = BigInt;

    fn sub(self, rhs: &BigInt) -> BigInt {
        self + &-rhs
    }
}

impl Mul for &BigInt {
    type Output = BigInt;

    fn mul(self, rhs: &BigInt) -> BigInt {
        BigInt::from_parts(self.sign.times(rhs.sign), mag::mul(&self.mag, &rhs.mag))
    }
}

macro_rules! forward_owned_binop {
    ($trait:ident, $method:ident) => {
        impl $trait for BigInt {
            type Output = BigInt;

            fn $method(self, rhs: BigInt) -> BigInt {
                (&self).$method(&rhs)
            }
        }

        impl $trait<&BigInt> for BigInt {
            type Output = BigInt;

            fn $method(self, rhs: &BigInt) -> BigInt {
                (&self).$method(rhs)
            }
        }
    };
}

forward_owned_binop!(Add, add);
forward_owned_binop!(Sub, sub);
forward_owned_binop!(Mul, mul);

#[cfg(test)]
mod tests {
    use super::*;

    fn big(v: i64) -> BigInt {
        BigInt::from(v)
    }

    #[test]
    fn zero_is_canonical() {
        let z = &big(5) - &big(5);
        assert_eq!(z, BigInt::zero());
        assert_eq!(z.sign(), Sign::Zero);
        assert!(z.words().is_empty());
        assert_eq!(BigInt::from(0_u64), BigInt::zero());
    }

    #[test]
    fn add_and_sub_across_signs() {
        assert_eq!(&big(7) + &big(-10), big(-3));
        assert_eq!(&big(-7) + &big(10), big(3));
        assert_eq!(&big(-7) - &big(-7), BigInt::zero());
        assert_eq!(&big(-7) - &big(3), big(-10));
        assert_eq!(big(i64::MAX) + big(i64::MAX), BigInt::from(u64::MAX - 1));
    }

    #[test]
    fn mul_signs() {
        assert_eq!(&big(-3) * &big(4), big(-12));
        assert_eq!(&big(-3) * &big(-4), big(12));
        assert_eq!(&big(-3) * &BigInt::zero(), BigInt::zero());
    }

    #[test]
    fn remainder_truncates_toward_zero() {
        assert_eq!(big(-7).checked_rem(&big(3)).unwrap(), big(-1));
        assert_eq!(big(7).checked_rem(&big(-3)).unwrap(), big(1));

        let (q, r) = big(-7).div_rem(&big(2)).unwrap();
        assert_eq!(q, big(-3));
        assert_eq!(r, big(-1));
    }

    #[test]
    fn modulo_is_non_negative() {
        assert_eq!(big(-7).modulo(&big(3)).unwrap(), big(2));
        assert_eq!(big(-6).modulo(&big(3)).unwrap(), BigInt::zero());
        assert_eq!(big(7).modulo(&big(3)).unwrap(), big(1));
    }

    #[test]
    fn modulo_rejects_non_positive_modulus() {
        assert!(matches!(
            big(7).modulo(&big(-3)),
            Err(FountainError::InvalidArgument { .. })
        ));
        assert!(matches!(
            big(7).modulo(&BigInt::zero()),
            Err(FountainError::InvalidArgument { .. })
        ));
        assert!(big(7).div_rem(&BigInt::zero()).is_err());
    }

    #[test]
    fn ordering_is_numeric() {
        let mut values = vec![big(3), big(-10), BigInt::zero(), big(-2), big(1 << 40)];
        values.sort();
        assert_eq!(
            values,
            vec![big(-10), big(-2), BigInt::zero(), big(3), big(1 << 40)]
        );
    }

    #[test]
    fn byte_import_ignores_leading_zeros() {
        let v = BigInt::from_be_bytes(&[0, 0, 1, 2, 3, 4, 5]);
        assert_eq!(v.words(), &[0x01, 0x0203_0405]);
        assert_eq!(BigInt::from_be_bytes(&[0, 0, 0]), BigInt::zero());
        assert_eq!(BigInt::from_be_bytes(&[]), BigInt::zero());
    }

    #[test]
    fn byte_export_pads_small_values_to_two_bytes() {
        assert!(BigInt::zero().to_be_bytes().is_empty());
        assert_eq!(big(5).to_be_bytes(), vec![0, 5]);
        assert_eq!(big(0xffff).to_be_bytes(), vec![0xff, 0xff]);
        assert_eq!(big(0x1_0000).to_be_bytes(), vec![1, 0, 0]);
        assert_eq!(big(0x0102_0304_05).to_be_bytes(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn byte_round_trip() {
        let bytes = [0x80, 0, 0, 0, 0, 0, 0, 0, 0, 1];
        let v = BigInt::from_be_bytes(&bytes);
        assert_eq!(v.to_be_bytes(), bytes.to_vec());
        assert_eq!(BigInt::from_be_bytes(&v.to_be_bytes()), v);
    }

    #[test]
    fn negative_shift_inverts_direction() {
        assert_eq!(big(1).shl(40), big(1 << 40));
        assert_eq!(big(1 << 40).shl(-40), big(1));
        assert_eq!(big(1 << 40).shr(-1), big(1 << 41));
        assert_eq!(big(-5).shr(1), big(-2));
    }

    #[test]
    fn to_u64_bounds() {
        assert_eq!(BigInt::from(u64::MAX).to_u64(), Some(u64::MAX));
        assert_eq!(big(-1).to_u64(), None);
        assert_eq!(BigInt::from(u64::MAX).shl(1).to_u64(), None);
    }

    #[test]
    fn max_bits_tracks_large_values() {
        let _ = BigInt::one().shl(5000);
        assert!(max_bits_observed() >= 5001);
    }
}
