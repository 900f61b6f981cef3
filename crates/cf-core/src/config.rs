//! Fountain configuration.

use serde::{Deserialize, Serialize};

use crate::error::{FountainError, FountainResult};

/// Size of one encoded slice in bytes (one 16-bit residue).
pub const SLICE_SIZE: usize = 2;

/// Default bundle size in bytes.
pub const DEFAULT_BUNDLE_SIZE: u32 = 128;

/// Default ceiling on the minimum bundle count of one payload.
pub const DEFAULT_MAX_MIN_BUNDLES: u32 = 100;

/// Fountain configuration.
///
/// Sender and receiver must use the same bundle size for the same payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FountainConfig {
    /// Bundle size in bytes. Must be even and non-zero.
    ///
    /// Default: 128
    pub bundle_size: u32,

    /// Payloads needing more than this many bundles are rejected.
    ///
    /// Every extra minimum bundle adds a coprime modulus to each CRT
    /// reconstruction, so this bounds decode cost.
    ///
    /// Default: 100
    pub max_min_bundles: u32,
}

impl Default for FountainConfig {
    fn default() -> Self {
        Self {
            bundle_size: DEFAULT_BUNDLE_SIZE,
            max_min_bundles: DEFAULT_MAX_MIN_BUNDLES,
        }
    }
}

impl FountainConfig {
    /// Configuration with the given bundle size and default limits.
    #[must_use]
    pub fn with_bundle_size(bundle_size: u32) -> Self {
        Self {
            bundle_size,
            ..Self::default()
        }
    }

    /// Check the bundle size is usable.
    ///
    /// # Errors
    ///
    /// Returns `FountainError::InvalidArgument` if the bundle size is zero or odd.
    pub fn validate(&self) -> FountainResult<()> {
        if self.bundle_size == 0 {
            return Err(FountainError::invalid("bundle size must be non-zero"));
        }
        if self.bundle_size as usize % SLICE_SIZE != 0 {
            return Err(FountainError::invalid(format!(
                "bundle size {} is odd",
                self.bundle_size
            )));
        }
        Ok(())
    }
}
