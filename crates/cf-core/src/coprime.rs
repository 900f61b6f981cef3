//! Shared, append-only sequence of pairwise-coprime 16-bit moduli.
//!
//! Bundle index `i` is encoded against `sequence[i]`. The sequence starts at
//! 65535 and grows downward on demand: each candidate is accepted only if it
//! is coprime with every value already present. Once computed, an
//! index→value mapping never changes, so one cache is shared by every
//! encoder and decoder in a process.

// Allow truncation casts - indices are bounded by the 16-bit candidate space
#![allow(clippy::cast_possible_truncation)]

use parking_lot::RwLock;
use tracing::debug;

use crate::bigint::BigInt;
use crate::error::{FountainError, FountainResult};

/// Seed of the default sequence: the largest 16-bit value.
pub const MAX_COPRIME_16: u16 = u16::MAX;

/// Thread-safe, lazily-extended coprime cache.
///
/// Wrap in an `Arc` and hand it to [`Fountain`](crate::Fountain) and
/// [`Bucket`](crate::Bucket) instances.
#[derive(Debug)]
pub struct CoprimeSequence {
    values: RwLock<Vec<BigInt>>,
}

impl CoprimeSequence {
    /// Create a sequence seeded with 65535.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(MAX_COPRIME_16)
    }

    /// Create a sequence seeded with `seed`.
    ///
    /// Senders and receivers must agree on the seed.
    #[must_use]
    pub fn with_seed(seed: u16) -> Self {
        Self {
            values: RwLock::new(vec![BigInt::from(seed)]),
        }
    }

    /// Number of values computed so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    /// Always false: the seed is present from construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }

    /// Coprime modulus for bundle `index`, extending the cache as needed.
    ///
    /// # Errors
    ///
    /// Returns `FountainError::Exhausted` if candidates run out before
    /// `index` is populated.
    pub fn value_at(&self, index: u32) -> FountainResult<BigInt> {
        if let Some(value) = self.values.read().get(index as usize) {
            return Ok(value.clone());
        }

        let mut values = self.values.write();
        Self::extend_to(&mut values, index)?;
        Ok(values[index as usize].clone())
    }

    /// Moduli for several bundle indices, in the order given.
    ///
    /// # Errors
    ///
    /// Returns `FountainError::Exhausted` if any index cannot be populated.
    pub fn moduli(&self, indices: &[u32]) -> FountainResult<Vec<BigInt>> {
        let Some(&highest) = indices.iter().max() else {
            return Ok(Vec::new());
        };

        if highest as usize >= self.len() {
            let mut values = self.values.write();
            Self::extend_to(&mut values, highest)?;
        }

        let values = self.values.read();
        Ok(indices
            .iter()
            .map(|&i| values[i as usize].clone())
            .collect())
    }

    fn extend_to(values: &mut Vec<BigInt>, index: u32) -> FountainResult<()> {
        let target = index as usize;
        if target < values.len() {
            return Ok(());
        }

        let start = values.len();
        let one = BigInt::one();
        let mut candidate = values.last().cloned().unwrap_or_else(BigInt::zero);

        while target >= values.len() {
            candidate = &candidate - &one;
            if candidate < one {
                return Err(FountainError::Exhausted { index });
            }
            if values.iter().all(|v| v.gcd(&candidate) == one) {
                values.push(candidate.clone());
            }
        }

        debug!(
            from = start,
            to = values.len(),
            smallest = %candidate,
            "extended coprime sequence"
        );
        Ok(())
    }
}

impl Default for CoprimeSequence {
    fn default() -> Self {
        Self::new()
    }
}
