//! BigInt Byte Import Fuzz Target
//!
//! Fuzzes `BigInt::from_be_bytes` and the arithmetic the decoder runs on
//! imported values:
//! - Export/import round-trip
//! - Division and modular reduction against a second imported value
//!
//! Goal: no panics; `q * d + r == n` and `0 <= n mod d < d` always hold.

#![no_main]

use cf_core::BigInt;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let split = data.first().map_or(0, |&b| usize::from(b)).min(data.len());
    let (left, right) = data.split_at(split);

    let n = BigInt::from_be_bytes(left);
    assert_eq!(BigInt::from_be_bytes(&n.to_be_bytes()), n);

    let d = BigInt::from_be_bytes(right);
    if d.is_zero() {
        return;
    }

    let Ok((q, r)) = n.div_rem(&d) else {
        return;
    };
    assert_eq!(&(&q * &d) + &r, n);

    if let Ok(m) = n.modulo(&d) {
        assert!(!m.is_negative());
        assert!(m < d);
    }
});
