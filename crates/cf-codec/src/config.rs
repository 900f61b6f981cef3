//! Codec configuration.

use cf_core::{DEFAULT_MAX_MIN_BUNDLES, FountainConfig};
use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// Packet codec configuration.
///
/// Sender and receiver derive the bundle size from the declared payload
/// length, so both sides must use the same `min_bundle_size` and
/// `target_bundles`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Smallest bundle size in bytes. Must be even.
    ///
    /// Default: 128
    pub min_bundle_size: u32,

    /// Bundles a payload should need when nothing is lost.
    ///
    /// Default: 100
    pub target_bundles: u32,

    /// Index of the first packet an encoder emits.
    ///
    /// Default: 1
    pub first_index: u32,

    /// Forwarded to the fountain core as its `max_min_bundles` limit.
    ///
    /// Default: 100
    pub max_min_bundles: u32,

    /// Packets with a higher bundle index are rejected unread.
    ///
    /// Bounds how far one packet can grow the shared coprime sequence.
    ///
    /// Default: 1024
    pub max_index: u32,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            min_bundle_size: 128,
            target_bundles: 100,
            first_index: 1,
            max_min_bundles: DEFAULT_MAX_MIN_BUNDLES,
            max_index: 1024,
        }
    }
}

impl CodecConfig {
    /// Bundle size for a payload of `len` bytes.
    ///
    /// `ceil(len / target_bundles)`, rounded up to even and floored at
    /// `min_bundle_size`, so the payload never needs more than
    /// `target_bundles` bundles.
    #[must_use]
    pub fn bundle_size_for(&self, len: usize) -> u32 {
        let target = usize::try_from(self.target_bundles.max(1)).unwrap_or(usize::MAX);
        let per_bundle = len.div_ceil(target);
        let even = per_bundle + per_bundle % 2;
        u32::try_from(even)
            .unwrap_or(u32::MAX - 1)
            .max(self.min_bundle_size)
    }

    /// Fountain configuration for a payload of `len` bytes.
    #[must_use]
    pub fn fountain_config(&self, len: usize) -> FountainConfig {
        FountainConfig {
            bundle_size: self.bundle_size_for(len),
            max_min_bundles: self.max_min_bundles,
        }
    }

    /// Check the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::InvalidConfig` if `min_bundle_size` is zero or
    /// odd, or `target_bundles` is zero or above `max_min_bundles`.
    pub fn validate(&self) -> Result<(), CodecError> {
        if self.min_bundle_size == 0 || self.min_bundle_size % 2 != 0 {
            return Err(CodecError::InvalidConfig {
                reason: format!(
                    "min_bundle_size {} must be even and non-zero",
                    self.min_bundle_size
                ),
            });
        }
        if self.target_bundles == 0 || self.target_bundles > self.max_min_bundles {
            return Err(CodecError::InvalidConfig {
                reason: format!(
                    "target_bundles {} must be in 1..={}",
                    self.target_bundles, self.max_min_bundles
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = CodecConfig::default();
        assert_eq!(config.min_bundle_size, 128);
        assert_eq!(config.target_bundles, 100);
        assert_eq!(config.first_index, 1);
        assert_eq!(config.max_min_bundles, 100);
        assert_eq!(config.max_index, 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn small_payloads_use_minimum_bundle_size() {
        let config = CodecConfig::default();
        assert_eq!(config.bundle_size_for(1), 128);
        assert_eq!(config.bundle_size_for(12_800), 128);
    }

    #[test]
    fn large_payloads_round_up() {
        let config = CodecConfig::default();
        assert_eq!(config.bundle_size_for(12_801), 130);
        assert_eq!(config.bundle_size_for(20_000), 200);
        assert_eq!(config.bundle_size_for(20_001), 202);
    }

    #[test]
    fn bundle_count_stays_within_target() {
        let config = CodecConfig::default();
        for len in [10_001_usize, 12_899, 25_555, 99_999, 1_000_001] {
            let bundle_size = config.bundle_size_for(len) as usize;
            assert_eq!(bundle_size % 2, 0);
            assert!(len.div_ceil(bundle_size) <= 100, "len {len}");
        }
    }

    #[test]
    fn invalid_configs_rejected() {
        let odd = CodecConfig {
            min_bundle_size: 127,
            ..CodecConfig::default()
        };
        assert!(matches!(odd.validate(), Err(CodecError::InvalidConfig { .. })));

        let too_many = CodecConfig {
            target_bundles: 101,
            ..CodecConfig::default()
        };
        assert!(matches!(
            too_many.validate(),
            Err(CodecError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn config_serialization_roundtrip() {
        let config = CodecConfig {
            min_bundle_size: 64,
            target_bundles: 50,
            first_index: 0,
            max_min_bundles: 60,
            max_index: 500,
        };
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: CodecConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, config);
    }
}
