//! Chinese Remainder Theorem over a subset of coprime moduli.
//!
//! Coefficients depend only on the set of moduli, not on the data, so a
//! decoder computes one [`CoefficientSet`] per recovery pass and reuses it
//! for every hunk: O(k² + hunks·k) big-integer work instead of O(hunks·k²).

use crate::bigint::BigInt;
use crate::error::{FountainError, FountainResult};

/// Precomputed CRT weights for one subset of pairwise-coprime moduli.
///
/// `weights[i] ≡ 1 (mod moduli[i])` and `weights[i] ≡ 0 (mod moduli[j])`
/// for `j != i`, so `Σ weights[i]·parts[i] mod base` reconstructs any value
/// below `base` from its residues.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoefficientSet {
    weights: Vec<BigInt>,
    base: BigInt,
}

impl CoefficientSet {
    /// Compute weights and base for `moduli`.
    ///
    /// # Errors
    ///
    /// Returns `FountainError::InvalidArgument` if a modulus is not positive.
    /// Returns `FountainError::NotInvertible` if the moduli are not pairwise coprime.
    pub fn compute(moduli: &[BigInt]) -> FountainResult<Self> {
        let base = moduli.iter().fold(BigInt::one(), |acc, m| &acc * m);

        let mut weights = Vec::with_capacity(moduli.len());
        for (i, own) in moduli.iter().enumerate() {
            // Reduce after every step to bound the intermediate size.
            let mut partial = BigInt::one();
            for (j, m) in moduli.iter().enumerate() {
                if j != i {
                    partial = (&partial * m).modulo(&base)?;
                }
            }
            let coefficient = partial.modulo(own)?.mod_inverse(own)?;
            weights.push(&coefficient * &partial);
        }

        Ok(Self { weights, base })
    }

    /// Product of all moduli.
    #[must_use]
    pub const fn base(&self) -> &BigInt {
        &self.base
    }

    /// Per-modulus reconstruction weights.
    #[must_use]
    pub fn weights(&self) -> &[BigInt] {
        &self.weights
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Combine one residue per modulus.
    ///
    /// # Errors
    ///
    /// Returns `FountainError::InvalidArgument` if `parts.len()` differs from
    /// the number of moduli.
    pub fn combine(&self, parts: &[BigInt]) -> FountainResult<BigInt> {
        combine(parts, &self.weights, &self.base, self.weights.len())
    }
}

/// Reconstruct the unique value in `[0, base)` from its residues.
///
/// Uses the first `count` weights; `parts` must hold exactly `count` residues.
///
/// # Errors
///
/// Returns `FountainError::InvalidArgument` if `parts.len() != count` or
/// `count` exceeds the number of weights.
pub fn combine(
    parts: &[BigInt],
    weights: &[BigInt],
    base: &BigInt,
    count: usize,
) -> FountainResult<BigInt> {
    if parts.len() != count || count > weights.len() {
        return Err(FountainError::invalid(format!(
            "expected {count} residues for {} weights, got {}",
            weights.len(),
            parts.len()
        )));
    }

    let mut result = BigInt::zero();
    for (w, p) in weights.iter().zip(parts).take(count) {
        result = (&result + &(w * p)).modulo(base)?;
    }
    Ok(result)
}

/// Residues of `value` modulo each of `moduli`; the inverse of [`combine`].
///
/// # Errors
///
/// Returns `FountainError::InvalidArgument` if a modulus is not positive.
pub fn split(value: &BigInt, moduli: &[BigInt]) -> FountainResult<Vec<BigInt>> {
    moduli.iter().map(|m| value.modulo(m)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coprime::CoprimeSequence;

    fn big(v: u64) -> BigInt {
        BigInt::from(v)
    }

    #[test]
    fn textbook_example() {
        // x ≡ 2 (mod 3), x ≡ 3 (mod 5), x ≡ 2 (mod 7) → x = 23
        let set = CoefficientSet::compute(&[big(3), big(5), big(7)]).unwrap();
        assert_eq!(set.base(), &big(105));
        assert_eq!(set.combine(&[big(2), big(3), big(2)]).unwrap(), big(23));
    }

    #[test]
    fn weights_select_their_own_modulus() {
        let moduli = [big(11), big(13), big(17)];
        let set = CoefficientSet::compute(&moduli).unwrap();
        for (i, w) in set.weights().iter().enumerate() {
            for (j, m) in moduli.iter().enumerate() {
                let expected = if i == j { BigInt::one() } else { BigInt::zero() };
                assert_eq!(w.modulo(m).unwrap(), expected, "weight {i} mod {m}");
            }
        }
    }

    #[test]
    fn split_then_combine_recovers_value() {
        let seq = CoprimeSequence::new();
        let moduli = seq.moduli(&(0..9).collect::<Vec<_>>()).unwrap();
        let set = CoefficientSet::compute(&moduli).unwrap();

        let value = BigInt::from_be_bytes(&[0xa5; 16]);
        assert!(&value < set.base());

        let parts = split(&value, &moduli).unwrap();
        assert_eq!(set.combine(&parts).unwrap(), value);
    }

    #[test]
    fn single_modulus() {
        let set = CoefficientSet::compute(&[big(65_535)]).unwrap();
        assert_eq!(set.combine(&[big(1234)]).unwrap(), big(1234));
    }

    #[test]
    fn empty_subset_combines_to_zero() {
        let set = CoefficientSet::compute(&[]).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.base(), &BigInt::one());
        assert_eq!(set.combine(&[]).unwrap(), BigInt::zero());
    }

    #[test]
    fn part_count_mismatch_rejected() {
        let set = CoefficientSet::compute(&[big(3), big(5)]).unwrap();
        assert!(matches!(
            set.combine(&[big(1)]),
            Err(FountainError::InvalidArgument { .. })
        ));
        assert!(matches!(
            combine(&[big(1), big(1), big(1)], set.weights(), set.base(), 3),
            Err(FountainError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn shared_factor_is_not_invertible() {
        let err = CoefficientSet::compute(&[big(6), big(9)]).unwrap_err();
        assert!(matches!(err, FountainError::NotInvertible { .. }));
    }
}
