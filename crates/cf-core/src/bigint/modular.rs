//! Number-theoretic operations: gcd, modular inverse, exponentiation.

use super::{BigInt, Sign, mag};
use crate::error::{FountainError, FountainResult};

impl BigInt {
    /// Greatest common divisor by the iterative Euclidean algorithm.
    ///
    /// Always non-negative; `gcd(0, 0) == 0`.
    #[must_use]
    pub fn gcd(&self, other: &Self) -> Self {
        let mut a = self.mag.clone();
        let mut b = other.mag.clone();
        while !b.is_empty() {
            let (_, r) = mag::div_rem(&a, &b);
            a = b;
            b = r;
        }
        Self::from_parts(Sign::Positive, a)
    }

    /// Multiplicative inverse modulo `modulus` by the extended Euclidean
    /// algorithm, in `[0, modulus)`.
    ///
    /// # Errors
    ///
    /// Returns `FountainError::InvalidArgument` if `modulus` is not positive.
    /// Returns `FountainError::NotInvertible` if `gcd(self, modulus) != 1`.
    pub fn mod_inverse(&self, modulus: &Self) -> FountainResult<Self> {
        if !modulus.is_positive() {
            return Err(FountainError::invalid(format!(
                "modulus {modulus} is not positive"
            )));
        }

        // Invariant: u1 * a ≡ u3 and v1 * a ≡ v3 (mod modulus).
        let mut u1 = Self::one();
        let mut u3 = self.modulo(modulus)?;
        let mut v1 = Self::zero();
        let mut v3 = modulus.clone();

        while v3.is_positive() {
            let (q, r) = u3.div_rem(&v3)?;
            let t1 = &u1 - &(&v1 * &q);
            u1 = std::mem::replace(&mut v1, t1);
            u3 = std::mem::replace(&mut v3, r);
        }

        if u3 != Self::one() {
            return Err(FountainError::NotInvertible {
                modulus: modulus.clone(),
            });
        }
        u1.modulo(modulus)
    }

    /// `base ^ exponent` by repeated squaring; `0 ^ 0 == 1`.
    #[must_use]
    pub fn pow(base: u32, exponent: u32) -> Self {
        let mut result = Self::one();
        let mut square = Self::from(base);
        let mut e = exponent;
        while e > 0 {
            if e & 1 == 1 {
                result = &result * &square;
            }
            e >>= 1;
            if e > 0 {
                square = &square * &square;
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(v: i64) -> BigInt {
        BigInt::from(v)
    }

    #[test]
    fn gcd_small_values() {
        assert_eq!(big(12).gcd(&big(18)), big(6));
        assert_eq!(big(-12).gcd(&big(18)), big(6));
        assert_eq!(big(17).gcd(&big(5)), big(1));
        assert_eq!(big(0).gcd(&big(9)), big(9));
        assert_eq!(big(0).gcd(&big(0)), BigInt::zero());
    }

    #[test]
    fn gcd_of_adjacent_coprime_moduli() {
        assert_eq!(big(65_535).gcd(&big(65_534)), big(1));
        assert_eq!(big(65_535).gcd(&big(65_532)), big(3));
    }

    #[test]
    fn mod_inverse_small() {
        assert_eq!(big(3).mod_inverse(&big(11)).unwrap(), big(4));
        assert_eq!(big(-3).mod_inverse(&big(11)).unwrap(), big(7));
        assert_eq!(big(10).mod_inverse(&big(1)).unwrap(), BigInt::zero());
    }

    #[test]
    fn mod_inverse_large_operand() {
        let a = BigInt::one().shl(200) + big(12_345);
        let m = big(65_521);
        let inv = a.mod_inverse(&m).unwrap();
        assert!(inv < m);
        assert_eq!((&inv * &a).modulo(&m).unwrap(), BigInt::one());
    }

    #[test]
    fn mod_inverse_not_invertible() {
        let err = big(6).mod_inverse(&big(9)).unwrap_err();
        assert_eq!(err, FountainError::NotInvertible { modulus: big(9) });
    }

    #[test]
    fn mod_inverse_rejects_non_positive_modulus() {
        assert!(matches!(
            big(3).mod_inverse(&big(0)),
            Err(FountainError::InvalidArgument { .. })
        ));
        assert!(matches!(
            big(3).mod_inverse(&big(-7)),
            Err(FountainError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn pow_values() {
        assert_eq!(BigInt::pow(0, 0), BigInt::one());
        assert_eq!(BigInt::pow(0, 5), BigInt::zero());
        assert_eq!(BigInt::pow(2, 10), big(1024));
        assert_eq!(BigInt::pow(65_536, 2), BigInt::one().shl(32));
        assert_eq!(BigInt::pow(65_536, 100).bit_len(), 1601);
    }
}
