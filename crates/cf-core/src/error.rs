//! Fountain error types.

use thiserror::Error;

use crate::bigint::BigInt;

/// Result type for fountain operations.
pub type FountainResult<T> = Result<T, FountainError>;

/// Errors raised by the big-integer engine, the CRT math, the encoder and the decoder.
///
/// All of these are local, synchronous failures. None are retried inside the core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FountainError {
    /// Malformed size or shape of an input.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the input.
        reason: String,
    },

    /// The value shares a factor with the modulus.
    #[error("value is not invertible modulo {modulus}")]
    NotInvertible {
        /// The modulus the inverse was requested for.
        modulus: BigInt,
    },

    /// The coprime sequence ran out of candidates.
    #[error("coprime sequence exhausted before index {index}")]
    Exhausted {
        /// The index that could not be populated.
        index: u32,
    },

    /// Payload needs more bundles than the configured maximum.
    #[error("data too large: needs {min_bundles} bundles, maximum is {max}")]
    DataTooLarge {
        /// Minimum bundles the payload would need.
        min_bundles: usize,
        /// Configured maximum.
        max: usize,
    },

    /// An encoded residue did not fit in its 2-byte slice.
    #[error("slice overflow in bundle {bundle_index}: residue needs {len} bytes")]
    Overflow {
        /// Bundle being generated.
        bundle_index: u32,
        /// Byte length of the offending residue.
        len: usize,
    },

    /// CRT combination produced a hunk of the wrong size.
    #[error("reconstruction failed at hunk {hunk}: expected {expected} bytes, got {got}")]
    ReconstructionFailed {
        /// Hunk position.
        hunk: usize,
        /// Expected hunk size in bytes.
        expected: usize,
        /// Byte length actually produced.
        got: usize,
    },

    /// Recovery was requested before enough bundles arrived.
    #[error("bucket incomplete: {received} bundles received")]
    Incomplete {
        /// Distinct bundle indices received so far.
        received: usize,
    },
}

impl FountainError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }
}
