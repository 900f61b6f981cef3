//! Base-10 and base-16 rendering for diagnostics.

use std::fmt;

use super::{BigInt, mag};
use crate::error::{FountainError, FountainResult};

/// Largest power of ten that fits in a `u32`.
const DECIMAL_CHUNK: u32 = 1_000_000_000;

impl BigInt {
    /// Render in base 10 or base 16 (lowercase), with a leading `-` when negative.
    ///
    /// # Errors
    ///
    /// Returns `FountainError::InvalidArgument` for any other radix.
    pub fn to_str_radix(&self, radix: u32) -> FountainResult<String> {
        let digits = match radix {
            10 => self.decimal_digits(),
            16 => self.hex_digits(),
            other => {
                return Err(FountainError::invalid(format!(
                    "unsupported radix {other}"
                )));
            }
        };
        Ok(if self.is_negative() {
            format!("-{digits}")
        } else {
            digits
        })
    }

    fn decimal_digits(&self) -> String {
        if self.mag.is_empty() {
            return "0".to_owned();
        }
        let mut chunks = Vec::new();
        let mut rest = self.mag.clone();
        while !rest.is_empty() {
            let (q, r) = mag::div_rem_word(&rest, DECIMAL_CHUNK);
            chunks.push(r);
            rest = q;
        }

        let mut out = String::with_capacity(chunks.len() * 9);
        let mut iter = chunks.iter().rev();
        if let Some(first) = iter.next() {
            out.push_str(&first.to_string());
        }
        for chunk in iter {
            out.push_str(&format!("{chunk:09}"));
        }
        out
    }

    fn hex_digits(&self) -> String {
        let mut iter = self.mag.iter();
        let Some(first) = iter.next() else {
            return "0".to_owned();
        };
        let mut out = format!("{first:x}");
        for word in iter {
            out.push_str(&format!("{word:08x}"));
        }
        out
    }
}

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.decimal_digits();
        f.pad_integral(!self.is_negative(), "", &digits)
    }
}

impl fmt::LowerHex for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.hex_digits();
        f.pad_integral(!self.is_negative(), "0x", &digits)
    }
}

impl fmt::Debug for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BigInt({self})")
    }
}
