//! Codec error types.

use cf_core::FountainError;
use thiserror::Error;

/// Errors raised by the packet codec.
///
/// Damaged or mismatched packets are not errors; see
/// [`Delivery::Rejected`](crate::Delivery::Rejected).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The fountain core failed; the session cannot continue.
    #[error("fountain error: {0}")]
    Core(#[from] FountainError),

    /// Recovery was requested before any packet was accepted.
    #[error("no packet accepted yet")]
    NoSession,

    /// Payload length does not fit the 32-bit length field.
    #[error("payload of {len} bytes exceeds the 32-bit length field")]
    DataTooLong {
        /// Payload length in bytes.
        len: usize,
    },

    /// Codec configuration is unusable.
    #[error("invalid codec config: {reason}")]
    InvalidConfig {
        /// What was wrong with the configuration.
        reason: String,
    },
}
