//! Fountain encoder.
//!
//! Each bundle holds one 2-byte residue per hunk, taken modulo the coprime
//! assigned to the bundle index. Generation is a pure function of the data,
//! the bundle size and the index.

use std::sync::Arc;

use tracing::trace;

use crate::bigint::BigInt;
use crate::config::{FountainConfig, SLICE_SIZE};
use crate::coprime::CoprimeSequence;
use crate::error::{FountainError, FountainResult};
use crate::layout::BundleLayout;

/// Encoder producing an unbounded stream of bundles for one payload.
#[derive(Debug)]
pub struct Fountain {
    layout: BundleLayout,
    hunks: Vec<BigInt>,
    coprimes: Arc<CoprimeSequence>,
}

impl Fountain {
    /// Create an encoder with the given bundle size and default limits.
    ///
    /// # Errors
    ///
    /// See [`Fountain::with_config`].
    pub fn new(
        data: &[u8],
        bundle_size: u32,
        coprimes: Arc<CoprimeSequence>,
    ) -> FountainResult<Self> {
        Self::with_config(
            data,
            &FountainConfig::with_bundle_size(bundle_size),
            coprimes,
        )
    }

    /// Create an encoder for `data`.
    ///
    /// # Errors
    ///
    /// Returns `FountainError::InvalidArgument` if the bundle size is zero or
    /// odd, or `data` is empty.
    /// Returns `FountainError::DataTooLarge` if `data` needs more than
    /// `config.max_min_bundles` bundles.
    pub fn with_config(
        data: &[u8],
        config: &FountainConfig,
        coprimes: Arc<CoprimeSequence>,
    ) -> FountainResult<Self> {
        let layout = BundleLayout::new(data.len(), config)?;

        let mut padded = data.to_vec();
        padded.resize(layout.padded_length, 0);
        let hunks = padded
            .chunks_exact(layout.hunk_size)
            .map(BigInt::from_be_bytes)
            .collect();

        Ok(Self {
            layout,
            hunks,
            coprimes,
        })
    }

    /// Generate bundle `index` into a buffer of exactly `bundle_size` bytes.
    ///
    /// # Errors
    ///
    /// Returns `FountainError::Exhausted` if the coprime sequence has no
    /// value for `index`.
    /// Returns `FountainError::Overflow` if a residue does not fit its slice.
    pub fn generate(&self, index: u32) -> FountainResult<Vec<u8>> {
        self.generate_framed(index, 0, 0)
    }

    /// Generate bundle `index` into a buffer of `bundle_size + extra_size`
    /// bytes, writing the slices starting at `offset`.
    ///
    /// Bytes outside `[offset, offset + bundle_size)` are left zeroed for an
    /// outer framing layer.
    ///
    /// # Errors
    ///
    /// Returns `FountainError::InvalidArgument` if the slices would not fit
    /// the buffer at `offset`.
    /// Returns `FountainError::Exhausted` if the coprime sequence has no
    /// value for `index`.
    /// Returns `FountainError::Overflow` if a residue does not fit its slice.
    pub fn generate_framed(
        &self,
        index: u32,
        extra_size: usize,
        offset: usize,
    ) -> FountainResult<Vec<u8>> {
        let bundle_size = self.layout.bundle_size;
        if offset > extra_size {
            return Err(FountainError::invalid(format!(
                "offset {offset} leaves no room for {bundle_size} bundle bytes in {} bytes",
                bundle_size + extra_size
            )));
        }

        let modulus = self.coprimes.value_at(index)?;
        let mut out = vec![0_u8; bundle_size + extra_size];

        for (slot, hunk) in out[offset..offset + bundle_size]
            .chunks_exact_mut(SLICE_SIZE)
            .zip(&self.hunks)
        {
            let part = hunk.modulo(&modulus)?.to_be_bytes();
            if part.len() > SLICE_SIZE {
                return Err(FountainError::Overflow {
                    bundle_index: index,
                    len: part.len(),
                });
            }
            // Zero exports as no bytes and leaves the slot zeroed.
            slot[SLICE_SIZE - part.len()..].copy_from_slice(&part);
        }

        trace!(index, modulus = %modulus, "generated bundle");
        Ok(out)
    }

    /// Derived sizes for this payload.
    #[must_use]
    pub const fn layout(&self) -> &BundleLayout {
        &self.layout
    }

    /// Original payload length in bytes.
    #[must_use]
    pub const fn data_len(&self) -> usize {
        self.layout.length
    }

    /// Bundle size in bytes.
    #[must_use]
    pub const fn bundle_size(&self) -> usize {
        self.layout.bundle_size
    }

    /// Bundles needed when nothing is lost.
    #[must_use]
    pub const fn min_bundles(&self) -> usize {
        self.layout.min_bundles
    }
}
