//! Packet framing over a lossy, corrupting channel.
//!
//! Wire layout, big-endian throughout:
//!
//! ```text
//! [0..4)       bundle index     u32
//! [4..8)       payload length   u32
//! [8..N-4)     bundle bytes
//! [N-4..N)     checksum         u32, over [0..N-4)
//! ```
//!
//! The receiver derives the bundle size from the declared payload length,
//! so the first packet that passes its checksum establishes the session.

use std::fmt;
use std::sync::Arc;

use cf_core::{Bucket, CoprimeSequence, Fountain};
use tracing::{debug, trace, warn};

use crate::checksum::data_hash;
use crate::config::CodecConfig;
use crate::error::CodecError;

/// Size of the bundle index field.
pub const INDEX_SIZE: usize = 4;
/// Size of the payload length field.
pub const LENGTH_SIZE: usize = 4;
/// Size of the trailing checksum.
pub const CHECKSUM_SIZE: usize = 4;
/// Bytes before the bundle.
pub const HEADER_SIZE: usize = INDEX_SIZE + LENGTH_SIZE;
/// Bytes a packet adds around its bundle.
pub const FRAME_OVERHEAD: usize = HEADER_SIZE + CHECKSUM_SIZE;

/// Outcome of delivering one packet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// The bundle was handed to the decoder.
    Accepted,
    /// The packet was discarded; treat as lost.
    Rejected(RejectReason),
}

/// Why a packet was discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// Shorter than the frame overhead.
    TooShort,
    /// Checksum does not match the contents.
    ChecksumMismatch,
    /// Declared length differs from the established session.
    LengthMismatch,
    /// Bundle size does not match the declared length.
    PayloadSizeMismatch,
    /// Declared length is zero or cannot be decoded.
    InvalidLength,
    /// Bundle index above the configured maximum.
    IndexOutOfRange,
}

impl RejectReason {
    /// Short name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TooShort => "too_short",
            Self::ChecksumMismatch => "checksum_mismatch",
            Self::LengthMismatch => "length_mismatch",
            Self::PayloadSizeMismatch => "payload_size_mismatch",
            Self::InvalidLength => "invalid_length",
            Self::IndexOutOfRange => "index_out_of_range",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

// ─────────────────────────────────────────────────────────────────────────────
// Encoder
// ─────────────────────────────────────────────────────────────────────────────

/// Sender side: wraps each bundle in a checksummed frame.
#[derive(Debug)]
pub struct PacketEncoder {
    fountain: Fountain,
    declared_len: u32,
    next_index: u32,
}

impl PacketEncoder {
    /// Create an encoder for `data`.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::InvalidConfig` if `config` is unusable.
    /// Returns `CodecError::DataTooLong` if `data` exceeds the length field.
    /// Returns `CodecError::Core` if the fountain rejects the payload
    /// (e.g. it is empty).
    pub fn new(
        data: &[u8],
        config: &CodecConfig,
        coprimes: Arc<CoprimeSequence>,
    ) -> Result<Self, CodecError> {
        config.validate()?;
        let declared_len =
            u32::try_from(data.len()).map_err(|_| CodecError::DataTooLong { len: data.len() })?;
        let fountain = Fountain::with_config(data, &config.fountain_config(data.len()), coprimes)?;

        debug!(
            len = data.len(),
            bundle_size = fountain.bundle_size(),
            min_bundles = fountain.min_bundles(),
            "packet encoder ready"
        );
        Ok(Self {
            fountain,
            declared_len,
            next_index: config.first_index,
        })
    }

    /// Frame the next bundle in sequence.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::Core` if the bundle cannot be generated.
    pub fn next_packet(&mut self) -> Result<Vec<u8>, CodecError> {
        let index = self.next_index;
        let packet = self.packet_for(index)?;
        self.next_index = index.wrapping_add(1);
        Ok(packet)
    }

    /// Frame bundle `index`. Does not advance the sequence.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::Core` if the bundle cannot be generated.
    pub fn packet_for(&self, index: u32) -> Result<Vec<u8>, CodecError> {
        let mut packet = self
            .fountain
            .generate_framed(index, FRAME_OVERHEAD, HEADER_SIZE)?;

        packet[..INDEX_SIZE].copy_from_slice(&index.to_be_bytes());
        packet[INDEX_SIZE..HEADER_SIZE].copy_from_slice(&self.declared_len.to_be_bytes());

        let body = packet.len() - CHECKSUM_SIZE;
        let checksum = data_hash(&packet[..body]);
        packet[body..].copy_from_slice(&checksum.to_be_bytes());
        Ok(packet)
    }

    /// Index the next call to [`next_packet`](Self::next_packet) will use.
    #[must_use]
    pub const fn next_index(&self) -> u32 {
        self.next_index
    }

    /// Packet size in bytes; every packet of a payload has the same size.
    #[must_use]
    pub const fn packet_size(&self) -> usize {
        self.fountain.bundle_size() + FRAME_OVERHEAD
    }

    /// Bundles the receiver needs if nothing is lost.
    #[must_use]
    pub const fn min_bundles(&self) -> usize {
        self.fountain.min_bundles()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Decoder
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
struct Session {
    declared_len: u32,
    bundle_size: usize,
    bucket: Bucket,
}

/// Receiver side: validates frames and feeds bundles to a [`Bucket`].
#[derive(Debug)]
pub struct PacketDecoder {
    config: CodecConfig,
    coprimes: Arc<CoprimeSequence>,
    session: Option<Session>,
    accepted: u64,
    rejected: u64,
}

impl PacketDecoder {
    /// Create a decoder with no session.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::InvalidConfig` if `config` is unusable.
    pub fn new(config: &CodecConfig, coprimes: Arc<CoprimeSequence>) -> Result<Self, CodecError> {
        config.validate()?;
        Ok(Self {
            config: config.clone(),
            coprimes,
            session: None,
            accepted: 0,
            rejected: 0,
        })
    }

    /// Validate `packet` and hand its bundle to the decoder.
    ///
    /// Damaged or mismatched packets come back as
    /// [`Delivery::Rejected`] and leave the session untouched.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::Core` if the fountain core fails on an accepted
    /// packet; the session should be abandoned.
    pub fn deliver(&mut self, packet: &[u8]) -> Result<Delivery, CodecError> {
        match self.check(packet) {
            Ok(()) => {
                self.accepted += 1;
                Ok(Delivery::Accepted)
            }
            Err(Rejection::Reject(reason)) => {
                self.rejected += 1;
                Ok(Delivery::Rejected(reason))
            }
            Err(Rejection::Fatal(err)) => Err(err),
        }
    }

    fn check(&mut self, packet: &[u8]) -> Result<(), Rejection> {
        if packet.len() < FRAME_OVERHEAD {
            debug!(len = packet.len(), "packet too short");
            return Err(RejectReason::TooShort.into());
        }

        let body = packet.len() - CHECKSUM_SIZE;
        let expected = read_u32(packet, body);
        let actual = data_hash(&packet[..body]);
        if expected != actual {
            debug!(expected, actual, "checksum mismatch");
            return Err(RejectReason::ChecksumMismatch.into());
        }

        let index = read_u32(packet, 0);
        let declared_len = read_u32(packet, INDEX_SIZE);
        let bundle = &packet[HEADER_SIZE..body];

        if declared_len == 0 {
            debug!(index, "zero declared length");
            return Err(RejectReason::InvalidLength.into());
        }
        if index > self.config.max_index {
            debug!(index, max = self.config.max_index, "bundle index out of range");
            return Err(RejectReason::IndexOutOfRange.into());
        }

        if let Some(session) = &self.session {
            if session.declared_len != declared_len {
                warn!(
                    index,
                    session = session.declared_len,
                    declared = declared_len,
                    "declared length changed mid-session"
                );
                return Err(RejectReason::LengthMismatch.into());
            }
        } else {
            let opened = self.open_session(declared_len, bundle.len())?;
            self.session = Some(opened);
        }
        let Some(session) = self.session.as_ref() else {
            return Err(RejectReason::InvalidLength.into());
        };

        if bundle.len() != session.bundle_size {
            debug!(
                index,
                got = bundle.len(),
                expected = session.bundle_size,
                "bundle size mismatch"
            );
            return Err(RejectReason::PayloadSizeMismatch.into());
        }

        session
            .bucket
            .push(index, bundle)
            .map_err(|e| Rejection::Fatal(e.into()))?;
        trace!(index, "bundle accepted");
        Ok(())
    }

    fn open_session(&self, declared_len: u32, bundle_len: usize) -> Result<Session, Rejection> {
        let len = usize::try_from(declared_len).map_err(|_| RejectReason::InvalidLength)?;
        let fountain_config = self.config.fountain_config(len);
        let bundle_size = fountain_config.bundle_size as usize;

        // Check the size before committing to a session this packet cannot join.
        if bundle_len != bundle_size {
            debug!(
                got = bundle_len,
                expected = bundle_size,
                "bundle size mismatch on first packet"
            );
            return Err(RejectReason::PayloadSizeMismatch.into());
        }

        let bucket = Bucket::with_config(len, &fountain_config, Arc::clone(&self.coprimes))
            .map_err(|err| {
                debug!(declared = declared_len, error = %err, "unusable declared length");
                RejectReason::InvalidLength
            })?;

        debug!(declared = declared_len, bundle_size, "session established");
        Ok(Session {
            declared_len,
            bundle_size,
            bucket,
        })
    }

    /// True once enough bundles have been accepted to recover the payload.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.bucket.is_complete())
    }

    /// Recover the payload.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::NoSession` if no packet has been accepted.
    /// Returns `CodecError::Core` if the decoder is incomplete or the
    /// accepted bundles are inconsistent.
    pub fn recover_data(&self) -> Result<Vec<u8>, CodecError> {
        let session = self.session.as_ref().ok_or(CodecError::NoSession)?;
        Ok(session.bucket.recover_data()?)
    }

    /// Payload length declared by the session, if one is established.
    #[must_use]
    pub fn declared_length(&self) -> Option<u32> {
        self.session.as_ref().map(|session| session.declared_len)
    }

    /// Packets accepted so far.
    #[must_use]
    pub const fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Packets rejected so far.
    #[must_use]
    pub const fn rejected(&self) -> u64 {
        self.rejected
    }
}

/// Internal outcome of validating a packet.
enum Rejection {
    Reject(RejectReason),
    Fatal(CodecError),
}

impl From<RejectReason> for Rejection {
    fn from(reason: RejectReason) -> Self {
        Self::Reject(reason)
    }
}
