//! Chinese-Remainder-Theorem fountain code.
//!
//! A payload is split into hunks, each read as one big-endian integer. Bundle
//! `i` carries every hunk reduced modulo the `i`-th value of a shared
//! sequence of pairwise-coprime 16-bit moduli, two bytes per hunk.
//!
//! # Overview
//!
//! - The sender emits bundles in any order, for as long as it likes
//! - No bundle is special: any set whose moduli multiply past
//!   `65536^min_bundles` reconstructs the payload
//! - Receivers need no coordination beyond agreeing on payload length and
//!   bundle size
//!
//! ```
//! use std::sync::Arc;
//!
//! use cf_core::{Bucket, CoprimeSequence, Fountain};
//!
//! let coprimes = Arc::new(CoprimeSequence::new());
//! let data = b"any payload at all".to_vec();
//!
//! let fountain = Fountain::new(&data, 8, Arc::clone(&coprimes))?;
//! let bucket = Bucket::new(data.len(), 8, coprimes)?;
//!
//! // Lose every other bundle.
//! let mut index = 0;
//! while !bucket.is_complete() {
//!     bucket.push(index, &fountain.generate(index)?)?;
//!     index += 2;
//! }
//! assert_eq!(bucket.recover_data()?, data);
//! # Ok::<(), cf_core::FountainError>(())
//! ```

#![forbid(unsafe_code)]

pub mod bigint;
mod bucket;
mod config;
mod coprime;
pub mod crt;
mod error;
mod fountain;
mod golden;
mod layout;

pub use bigint::{BigInt, Sign};
pub use bucket::Bucket;
pub use config::{DEFAULT_BUNDLE_SIZE, DEFAULT_MAX_MIN_BUNDLES, FountainConfig, SLICE_SIZE};
pub use coprime::{CoprimeSequence, MAX_COPRIME_16};
pub use crt::CoefficientSet;
pub use error::{FountainError, FountainResult};
pub use fountain::Fountain;
pub use layout::BundleLayout;
