//! Packet Decoder Fuzz Target
//!
//! Fuzzes `PacketDecoder::deliver`:
//! - Raw arbitrary bytes (almost always fail the checksum)
//! - The same bytes re-framed with a valid checksum, reaching the length,
//!   index and bundle-size checks and the fountain core
//!
//! Goal: no panics; rejections are never errors.

#![no_main]

use std::sync::{Arc, LazyLock};

use cf_codec::{CodecConfig, Delivery, FRAME_OVERHEAD, PacketDecoder, data_hash};
use cf_core::CoprimeSequence;
use libfuzzer_sys::fuzz_target;

// Shared so the coprime sequence is only extended once per process.
static COPRIMES: LazyLock<Arc<CoprimeSequence>> = LazyLock::new(|| Arc::new(CoprimeSequence::new()));

fuzz_target!(|data: &[u8]| {
    let config = CodecConfig::default();
    let Ok(mut decoder) = PacketDecoder::new(&config, Arc::clone(&COPRIMES)) else {
        return;
    };

    // Raw bytes straight off the wire.
    let _ = decoder.deliver(data);

    // Same bytes as header and bundle, with a checksum that passes.
    if data.len() + 4 >= FRAME_OVERHEAD {
        let mut framed = data.to_vec();
        let checksum = data_hash(&framed);
        framed.extend_from_slice(&checksum.to_be_bytes());
        if let Ok(Delivery::Accepted) = decoder.deliver(&framed) {
            let _ = decoder.is_complete();
            let _ = decoder.recover_data();
        }
    }
});
