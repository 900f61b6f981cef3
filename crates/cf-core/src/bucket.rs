//! Fountain decoder.
//!
//! A bucket collects bundles by index until the product of their moduli
//! exceeds `65536^min_bundles`, then rebuilds every hunk by CRT.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::bigint::BigInt;
use crate::config::{FountainConfig, SLICE_SIZE};
use crate::coprime::CoprimeSequence;
use crate::crt::CoefficientSet;
use crate::error::{FountainError, FountainResult};
use crate::layout::BundleLayout;

#[derive(Debug)]
struct Received {
    modulus: BigInt,
    data: Vec<u8>,
}

/// Decoder for one payload.
///
/// `push` takes `&self` and may be called from several threads. Bundles are
/// kept in index order, so recovery does not depend on arrival order.
#[derive(Debug)]
pub struct Bucket {
    layout: BundleLayout,
    threshold: BigInt,
    coprimes: Arc<CoprimeSequence>,
    bundles: Mutex<BTreeMap<u32, Received>>,
}

impl Bucket {
    /// Create a decoder with the given bundle size and default limits.
    ///
    /// # Errors
    ///
    /// See [`Bucket::with_config`].
    pub fn new(
        length: usize,
        bundle_size: u32,
        coprimes: Arc<CoprimeSequence>,
    ) -> FountainResult<Self> {
        Self::with_config(
            length,
            &FountainConfig::with_bundle_size(bundle_size),
            coprimes,
        )
    }

    /// Create a decoder for a payload of `length` bytes.
    ///
    /// `length` and the bundle size must match the sender's.
    ///
    /// # Errors
    ///
    /// Returns `FountainError::InvalidArgument` if the bundle size is zero or
    /// odd, or `length` is zero.
    /// Returns `FountainError::DataTooLarge` if the payload needs more than
    /// `config.max_min_bundles` bundles.
    pub fn with_config(
        length: usize,
        config: &FountainConfig,
        coprimes: Arc<CoprimeSequence>,
    ) -> FountainResult<Self> {
        let layout = BundleLayout::new(length, config)?;
        Ok(Self {
            threshold: layout.uniqueness_bound(),
            layout,
            coprimes,
            bundles: Mutex::new(BTreeMap::new()),
        })
    }

    /// Record bundle `index`. A repeated index replaces the earlier bundle.
    ///
    /// # Errors
    ///
    /// Returns `FountainError::InvalidArgument` if `data` is not exactly one
    /// bundle long.
    /// Returns `FountainError::Exhausted` if the coprime sequence has no
    /// value for `index`.
    pub fn push(&self, index: u32, data: &[u8]) -> FountainResult<()> {
        if data.len() != self.layout.bundle_size {
            return Err(FountainError::invalid(format!(
                "bundle {index} has {} bytes, expected {}",
                data.len(),
                self.layout.bundle_size
            )));
        }

        let modulus = self.coprimes.value_at(index)?;
        self.bundles.lock().insert(
            index,
            Received {
                modulus,
                data: data.to_vec(),
            },
        );
        Ok(())
    }

    /// True once the received moduli determine every hunk uniquely.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.sufficient(&self.bundles.lock())
    }

    fn sufficient(&self, bundles: &BTreeMap<u32, Received>) -> bool {
        let product = bundles
            .values()
            .fold(BigInt::one(), |acc, b| &acc * &b.modulus);
        product > self.threshold
    }

    /// Distinct bundle indices received.
    #[must_use]
    pub fn received_count(&self) -> usize {
        self.bundles.lock().len()
    }

    /// Received indices in ascending order.
    #[must_use]
    pub fn indices(&self) -> Vec<u32> {
        self.bundles.lock().keys().copied().collect()
    }

    /// Derived sizes for this payload.
    #[must_use]
    pub const fn layout(&self) -> &BundleLayout {
        &self.layout
    }

    /// Rebuild the original payload.
    ///
    /// A hunk whose combination exceeds its byte budget is recombined
    /// without the highest-indexed bundle, provided the remaining moduli
    /// still determine it uniquely.
    ///
    /// # Errors
    ///
    /// Returns `FountainError::Incomplete` if called before
    /// [`is_complete`](Self::is_complete) holds.
    /// Returns `FountainError::ReconstructionFailed` if the received bundles
    /// are inconsistent with each other.
    pub fn recover_data(&self) -> FountainResult<Vec<u8>> {
        let bundles = self.bundles.lock();
        if !self.sufficient(&bundles) {
            return Err(FountainError::Incomplete {
                received: bundles.len(),
            });
        }

        let hunk_size = self.layout.hunk_size;
        let moduli: Vec<BigInt> = bundles.values().map(|b| b.modulus.clone()).collect();
        let coefficients = CoefficientSet::compute(&moduli)?;
        debug!(
            received = bundles.len(),
            min_bundles = self.layout.min_bundles,
            hunks = self.layout.num_hunks,
            "recovering payload"
        );

        let mut reduced: Option<CoefficientSet> = None;
        let mut reduced_checked = false;
        let mut out = vec![0_u8; self.layout.padded_length];

        for (hunk, target) in out.chunks_exact_mut(hunk_size).enumerate() {
            let offset = hunk * SLICE_SIZE;
            let parts: Vec<BigInt> = bundles
                .values()
                .map(|b| BigInt::from_be_bytes(&b.data[offset..offset + SLICE_SIZE]))
                .collect();

            let mut bytes = coefficients.combine(&parts)?.to_be_bytes();
            if bytes.len() > hunk_size {
                if !reduced_checked {
                    reduced_checked = true;
                    reduced = self.reduced_set(&moduli)?;
                }
                let overshoot = bytes.len();
                let Some(set) = reduced.as_ref() else {
                    warn!(
                        hunk,
                        expected = hunk_size,
                        got = overshoot,
                        "hunk overshoot with no uniquely decodable subset"
                    );
                    return Err(FountainError::ReconstructionFailed {
                        hunk,
                        expected: hunk_size,
                        got: overshoot,
                    });
                };

                bytes = set.combine(&parts[..set.len()])?.to_be_bytes();
                debug!(
                    hunk,
                    overshoot,
                    retry = bytes.len(),
                    "recombined without highest bundle"
                );
                if bytes.len() > hunk_size {
                    warn!(
                        hunk,
                        expected = hunk_size,
                        got = bytes.len(),
                        "hunk reconstruction failed"
                    );
                    return Err(FountainError::ReconstructionFailed {
                        hunk,
                        expected: hunk_size,
                        got: bytes.len(),
                    });
                }
            }
            target[hunk_size - bytes.len()..].copy_from_slice(&bytes);
        }

        out.truncate(self.layout.length);
        Ok(out)
    }

    /// Coefficients for every received modulus but the highest-indexed one,
    /// or `None` if that subset no longer determines a hunk uniquely.
    fn reduced_set(&self, moduli: &[BigInt]) -> FountainResult<Option<CoefficientSet>> {
        let Some((_, rest)) = moduli.split_last() else {
            return Ok(None);
        };
        let set = CoefficientSet::compute(rest)?;
        Ok((set.base() > &self.threshold).then_some(set))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fountain::Fountain;

    fn payload(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i.wrapping_mul(31) ^ (i >> 3)) as u8).collect()
    }

    fn pair(len: usize, bundle_size: u32) -> (Fountain, Bucket) {
        let coprimes = Arc::new(CoprimeSequence::new());
        let data = payload(len);
        (
            Fountain::new(&data, bundle_size, Arc::clone(&coprimes)).unwrap(),
            Bucket::new(len, bundle_size, coprimes).unwrap(),
        )
    }

    #[test]
    fn completes_after_min_bundles_plus_one() {
        let (fountain, bucket) = pair(256, 64);
        assert_eq!(fountain.min_bundles(), 4);

        for i in 0..4 {
            bucket.push(i, &fountain.generate(i).unwrap()).unwrap();
            assert!(!bucket.is_complete());
        }
        bucket.push(4, &fountain.generate(4).unwrap()).unwrap();
        assert!(bucket.is_complete());
        assert_eq!(bucket.recover_data().unwrap(), payload(256));
    }

    #[test]
    fn recover_before_complete_is_incomplete() {
        let (fountain, bucket) = pair(256, 64);
        bucket.push(0, &fountain.generate(0).unwrap()).unwrap();
        assert_eq!(
            bucket.recover_data().unwrap_err(),
            FountainError::Incomplete { received: 1 }
        );
    }

    #[test]
    fn duplicate_index_overwrites() {
        let (fountain, bucket) = pair(128, 64);
        bucket.push(0, &[0xee; 64]).unwrap();
        bucket.push(0, &fountain.generate(0).unwrap()).unwrap();
        for i in 1..3 {
            bucket.push(i, &fountain.generate(i).unwrap()).unwrap();
        }
        assert_eq!(bucket.received_count(), 3);
        assert_eq!(bucket.indices(), vec![0, 1, 2]);
        assert_eq!(bucket.recover_data().unwrap(), payload(128));
    }

    #[test]
    fn wrong_bundle_length_rejected() {
        let (_, bucket) = pair(128, 64);
        assert!(matches!(
            bucket.push(0, &[0; 63]),
            Err(FountainError::InvalidArgument { .. })
        ));
        assert_eq!(bucket.received_count(), 0);
    }

    #[test]
    fn padding_is_truncated() {
        let (fountain, bucket) = pair(37, 16);
        assert_eq!(bucket.layout().padded_length, 48);
        for i in 0..4 {
            bucket.push(i, &fountain.generate(i).unwrap()).unwrap();
        }
        assert_eq!(bucket.recover_data().unwrap(), payload(37));
    }

    #[test]
    fn corrupted_extra_bundle_is_dropped() {
        let (fountain, bucket) = pair(256, 64);
        for i in 0..5 {
            bucket.push(i, &fountain.generate(i).unwrap()).unwrap();
        }
        let mut bad = fountain.generate(9).unwrap();
        for byte in &mut bad {
            *byte ^= 0x5a;
        }
        bucket.push(9, &bad).unwrap();

        assert_eq!(bucket.recover_data().unwrap(), payload(256));
    }

    #[test]
    fn corrupted_bundle_in_minimal_set_fails() {
        let (fountain, bucket) = pair(256, 64);
        for i in 0..4 {
            bucket.push(i, &fountain.generate(i).unwrap()).unwrap();
        }
        let mut bad = fountain.generate(4).unwrap();
        bad[0] ^= 0x80;
        bucket.push(4, &bad).unwrap();

        assert!(matches!(
            bucket.recover_data(),
            Err(FountainError::ReconstructionFailed { hunk: 0, expected: 8, .. })
        ));
    }
}
