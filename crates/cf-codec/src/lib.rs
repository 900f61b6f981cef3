//! Sending a payload over a lossy, corrupting, reordering channel.
//!
//! Wraps the fountain bundles of `cf_core` in checksummed packets that carry
//! their bundle index and the payload length. A receiver needs no
//! out-of-band setup: the first intact packet tells it everything.
//!
//! ```
//! use std::sync::Arc;
//!
//! use cf_codec::{CodecConfig, Delivery, PacketDecoder, PacketEncoder};
//! use cf_core::CoprimeSequence;
//!
//! let coprimes = Arc::new(CoprimeSequence::new());
//! let config = CodecConfig::default();
//! let data = vec![0x5a_u8; 1000];
//!
//! let mut sender = PacketEncoder::new(&data, &config, Arc::clone(&coprimes))?;
//! let mut receiver = PacketDecoder::new(&config, coprimes)?;
//!
//! while !receiver.is_complete() {
//!     let mut packet = sender.next_packet()?;
//!     if sender.next_index() % 4 == 0 {
//!         packet[10] ^= 0xff; // damaged in transit
//!     }
//!     if let Delivery::Rejected(reason) = receiver.deliver(&packet)? {
//!         assert_eq!(reason.as_str(), "checksum_mismatch");
//!     }
//! }
//! assert_eq!(receiver.recover_data()?, data);
//! # Ok::<(), cf_codec::CodecError>(())
//! ```

#![forbid(unsafe_code)]

mod checksum;
mod config;
mod error;
mod packet;

pub use checksum::{ZERO_SENTINEL, data_hash};
pub use config::CodecConfig;
pub use error::CodecError;
pub use packet::{
    CHECKSUM_SIZE, Delivery, FRAME_OVERHEAD, HEADER_SIZE, INDEX_SIZE, LENGTH_SIZE, PacketDecoder,
    PacketEncoder, RejectReason,
};
