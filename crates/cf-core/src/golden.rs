//! Golden vectors for interoperability.
//!
//! Any sender or receiver speaking this code must derive the same moduli for
//! the same bundle indices, and reach completeness after the same bundles.
