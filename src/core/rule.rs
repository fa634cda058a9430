//! Rule codec: Wolfram code <-> 8-entry lookup table.
//!
//! Neighborhood `(L, C, R)` maps to index `4L + 2C + R`, so `000` is index 0
//! and `111` is index 7. Bit `i` of the Wolfram code is the output for
//! neighborhood `i` (LSB = `000`, MSB = `111`).

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{EcaError, Result};

/// Number of distinct 3-cell neighborhoods.
pub const NEIGHBORHOODS: usize = 8;

/// Largest valid Wolfram code.
pub const MAX_CODE: i64 = 255;

/// Neighborhood index in `0..8`.
pub type NeighborhoodIndex = u8;

/// A total function from neighborhood index to output bit.
///
/// Serializes as its Wolfram code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "u8", into = "u8"))]
pub struct Rule {
    bits: [u8; NEIGHBORHOODS],
}

impl Rule {
    /// Build the lookup table for a Wolfram code. Every `u8` is a valid code.
    pub const fn from_code(code: u8) -> Self {
        let mut bits = [0u8; NEIGHBORHOODS];
        let mut i = 0;
        while i < NEIGHBORHOODS {
            bits[i] = (code >> i) & 1;
            i += 1;
        }
        Self { bits }
    }

    /// The Wolfram code of this table.
    pub fn code(&self) -> u8 {
        self.bits
            .iter()
            .enumerate()
            .fold(0u8, |code, (i, &b)| code | (b << i))
    }

    pub fn bits(&self) -> &[u8; NEIGHBORHOODS] {
        &self.bits
    }

    /// Output bit for a neighborhood. Only the low three bits of `idx` are used.
    #[inline]
    pub fn output(&self, idx: NeighborhoodIndex) -> u8 {
        self.bits[(idx & 7) as usize]
    }

    /// Copy of this rule with one output replaced.
    pub fn with_output(mut self, idx: NeighborhoodIndex, bit: u8) -> Self {
        self.bits[(idx & 7) as usize] = bit & 1;
        self
    }

    /// Copy of this rule with one output flipped (the rule-grid click).
    pub fn toggled(self, idx: NeighborhoodIndex) -> Self {
        let current = self.output(idx);
        self.with_output(idx, current ^ 1)
    }
}

impl From<u8> for Rule {
    fn from(code: u8) -> Self {
        Rule::from_code(code)
    }
}

impl From<Rule> for u8 {
    fn from(rule: Rule) -> Self {
        rule.code()
    }
}

impl fmt::Display for Rule {
    /// Formats as the bit table from `111` down to `000`, e.g. `01011010`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in self.bits.iter().rev() {
            write!(f, "{b}")?;
        }
        Ok(())
    }
}

/// Decode a Wolfram code into a rule table.
///
/// Fails with `InvalidArgument` if `code` is outside `[0, 255]`. Callers that
/// take free-form input should clamp first (see [`crate::config::clamp_int`]).
pub fn decode_rule(code: i64) -> Result<Rule> {
    let code = u8::try_from(code)
        .map_err(|_| EcaError::invalid(format!("rule code {code} outside [0, {MAX_CODE}]")))?;
    Ok(Rule::from_code(code))
}

/// Encode an 8-entry bit table into its Wolfram code.
///
/// Tables of the wrong length, or with entries other than 0 and 1, are
/// rejected rather than coerced.
pub fn encode_rule(bits: &[u8]) -> Result<u8> {
    if bits.len() != NEIGHBORHOODS {
        return Err(EcaError::invalid(format!(
            "rule table must have {NEIGHBORHOODS} entries, got {}",
            bits.len()
        )));
    }
    if let Some((i, &b)) = bits.iter().enumerate().find(|&(_, &b)| b > 1) {
        return Err(EcaError::invalid(format!(
            "rule table entry {i} is {b}, expected 0 or 1"
        )));
    }
    let mut table = [0u8; NEIGHBORHOODS];
    table.copy_from_slice(bits);
    Ok(Rule { bits: table }.code())
}

/// Neighborhood index for a `(left, center, right)` triplet of bits.
#[inline]
pub fn neighborhood_index(left: u8, center: u8, right: u8) -> NeighborhoodIndex {
    ((left & 1) << 2) | ((center & 1) << 1) | (right & 1)
}

/// Three-character pattern for a neighborhood, e.g. `6 -> "110"`.
pub fn neighborhood_label(idx: NeighborhoodIndex) -> String {
    format!("{:03b}", idx & 7)
}

/// Well-known elementary rules.
pub mod elementary_rules {
    /// Chaotic; the classic pseudo-random generator.
    pub const RULE_30: u8 = 30;
    /// Sierpinski triangle.
    pub const RULE_90: u8 = 90;
    /// Turing complete.
    pub const RULE_110: u8 = 110;
    /// Traffic flow.
    pub const RULE_184: u8 = 184;
}
