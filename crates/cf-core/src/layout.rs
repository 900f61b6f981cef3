//! Partitioning of a payload into hunks and bundles.
//!
//! A payload of `length` bytes is zero-padded to a multiple of the bundle
//! size. `min_bundles = padded / bundle_size` is the number of bundles that
//! carry as many bytes as the payload; each hunk is `min_bundles` slices
//! wide, so there are exactly `bundle_size / 2` hunks and every bundle holds
//! one slice per hunk.

use crate::bigint::BigInt;
use crate::config::{FountainConfig, SLICE_SIZE};
use crate::error::{FountainError, FountainResult};

/// Values a slice can take: 2^16.
const SLICE_RADIX: u32 = 1 << 16;

/// Sizes derived from a payload length and bundle size.
///
/// The encoder and decoder derive the same layout independently from the
/// declared length; nothing here is negotiated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BundleLayout {
    /// Original payload length in bytes.
    pub length: usize,
    /// Bundle size in bytes.
    pub bundle_size: usize,
    /// Payload length rounded up to a multiple of the bundle size.
    pub padded_length: usize,
    /// Bundles needed in the loss-free case.
    pub min_bundles: usize,
    /// Bytes per hunk.
    pub hunk_size: usize,
    /// Number of hunks, equal to slices per bundle.
    pub num_hunks: usize,
}

impl BundleLayout {
    /// Derive the layout for a payload.
    ///
    /// # Errors
    ///
    /// Returns `FountainError::InvalidArgument` if the bundle size is zero or
    /// odd, or the payload is empty.
    /// Returns `FountainError::DataTooLarge` if the payload would need more
    /// than `config.max_min_bundles` bundles.
    pub fn new(length: usize, config: &FountainConfig) -> FountainResult<Self> {
        config.validate()?;
        if length == 0 {
            return Err(FountainError::invalid("payload is empty"));
        }

        let bundle_size = config.bundle_size as usize;
        let padded_length = length.div_ceil(bundle_size) * bundle_size;
        let min_bundles = padded_length / bundle_size;
        let max = config.max_min_bundles as usize;
        if min_bundles > max {
            return Err(FountainError::DataTooLarge { min_bundles, max });
        }

        let hunk_size = min_bundles * SLICE_SIZE;
        let num_hunks = padded_length / hunk_size;
        debug_assert_eq!(num_hunks * hunk_size, padded_length);
        debug_assert_eq!(num_hunks, bundle_size / SLICE_SIZE);

        Ok(Self {
            length,
            bundle_size,
            padded_length,
            min_bundles,
            hunk_size,
            num_hunks,
        })
    }

    /// `65536^min_bundles`: every hunk value lies below this bound.
    ///
    /// A set of bundles is sufficient once the product of its moduli
    /// strictly exceeds it.
    #[must_use]
    pub fn uniqueness_bound(&self) -> BigInt {
        // min_bundles is bounded by max_min_bundles, a u32
        let exponent = u32::try_from(self.min_bundles).unwrap_or(u32::MAX);
        BigInt::pow(SLICE_RADIX, exponent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_for_exact_multiple() {
        let layout = BundleLayout::new(4096, &FountainConfig::with_bundle_size(64)).unwrap();
        assert_eq!(layout.padded_length, 4096);
        assert_eq!(layout.min_bundles, 64);
        assert_eq!(layout.hunk_size, 128);
        assert_eq!(layout.num_hunks, 32);
    }

    #[test]
    fn layout_pads_partial_bundle() {
        let layout = BundleLayout::new(100, &FountainConfig::with_bundle_size(64)).unwrap();
        assert_eq!(layout.padded_length, 128);
        assert_eq!(layout.min_bundles, 2);
        assert_eq!(layout.hunk_size, 4);
        assert_eq!(layout.num_hunks, 32);
    }

    #[test]
    fn layout_single_bundle() {
        let layout = BundleLayout::new(3, &FountainConfig::with_bundle_size(8)).unwrap();
        assert_eq!(layout.min_bundles, 1);
        assert_eq!(layout.hunk_size, 2);
        assert_eq!(layout.num_hunks, 4);
        assert_eq!(layout.uniqueness_bound(), BigInt::from(65_536_u32));
    }

    #[test]
    fn layout_rejects_too_many_bundles() {
        let config = FountainConfig::with_bundle_size(64);
        assert!(BundleLayout::new(6400, &config).is_ok());
        assert_eq!(
            BundleLayout::new(6401, &config).unwrap_err(),
            FountainError::DataTooLarge {
                min_bundles: 101,
                max: 100
            }
        );
    }

    #[test]
    fn layout_rejects_empty_payload_and_odd_size() {
        assert!(matches!(
            BundleLayout::new(0, &FountainConfig::default()),
            Err(FountainError::InvalidArgument { .. })
        ));
        assert!(matches!(
            BundleLayout::new(10, &FountainConfig::with_bundle_size(7)),
            Err(FountainError::InvalidArgument { .. })
        ));
    }
}
