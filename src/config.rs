//! Run configuration and the input clamping policy used by the front ends.

use core::ops::RangeInclusive;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{EcaError, Result};
use crate::evolve::{run_automaton, Boundary};
use crate::row::{fit_to_width, parse_bit_string, random_row, random_row_seeded, Row};
use crate::rule::{elementary_rules, Rule, MAX_CODE};

/// Where the initial row comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum InitialPattern {
    /// Free-form text; only `0`/`1` characters count. Empty means a single
    /// centered live cell.
    Text(String),
    /// Random cells; unseeded draws differ on every call.
    Random { seed: Option<u64> },
}

impl Default for InitialPattern {
    fn default() -> Self {
        InitialPattern::Text(String::new())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EcaConfig {
    pub rule: Rule,
    pub width: usize,
    /// Number of rows including the initial one.
    pub height: usize,
    pub boundary: Boundary,
    pub initial: InitialPattern,
}

impl Default for EcaConfig {
    fn default() -> Self {
        Self {
            rule: Rule::from_code(elementary_rules::RULE_90),
            width: 101,
            height: 150,
            boundary: Boundary::Fixed,
            initial: InitialPattern::default(),
        }
    }
}

impl EcaConfig {
    /// Width range the front ends clamp to.
    pub const WIDTH_RANGE: RangeInclusive<usize> = 3..=4096;
    /// Height range the front ends clamp to.
    pub const HEIGHT_RANGE: RangeInclusive<usize> = 1..=4096;

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rule = rule;
        self
    }

    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn with_initial(mut self, initial: InitialPattern) -> Self {
        self.initial = initial;
        self
    }

    /// Random initial row with a fixed seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.initial = InitialPattern::Random { seed: Some(seed) };
        self
    }

    /// Copy with width and height pulled into [`Self::WIDTH_RANGE`] and
    /// [`Self::HEIGHT_RANGE`].
    pub fn clamped(mut self) -> Self {
        self.width = self
            .width
            .clamp(*Self::WIDTH_RANGE.start(), *Self::WIDTH_RANGE.end());
        self.height = self
            .height
            .clamp(*Self::HEIGHT_RANGE.start(), *Self::HEIGHT_RANGE.end());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !Self::WIDTH_RANGE.contains(&self.width) {
            return Err(EcaError::invalid(format!(
                "width {} outside {:?}",
                self.width,
                Self::WIDTH_RANGE
            )));
        }
        if !Self::HEIGHT_RANGE.contains(&self.height) {
            return Err(EcaError::invalid(format!(
                "height {} outside {:?}",
                self.height,
                Self::HEIGHT_RANGE
            )));
        }
        Ok(())
    }

    pub fn initial_row(&self) -> Result<Row> {
        match &self.initial {
            InitialPattern::Text(text) => fit_to_width(&parse_bit_string(text), self.width),
            InitialPattern::Random { seed: Some(seed) } => random_row_seeded(self.width, *seed),
            InitialPattern::Random { seed: None } => random_row(self.width),
        }
    }

    /// Validate, build the initial row and evolve it.
    pub fn run(&self) -> Result<Vec<Row>> {
        self.validate()?;
        let initial = self.initial_row()?;
        run_automaton(&initial, &self.rule, self.height, self.boundary)
    }
}

/// Round `v` and clamp it to `[lo, hi]`; non-finite input becomes `lo`.
pub fn clamp_int(v: f64, lo: i64, hi: i64) -> i64 {
    let v = if v.is_finite() { v.round() } else { lo as f64 };
    (v as i64).clamp(lo, hi)
}

/// Clamp free-form rule input to a valid rule.
pub fn clamp_rule(v: f64) -> Rule {
    // Clamped into [0, 255], so the cast is exact.
    Rule::from_code(clamp_int(v, 0, MAX_CODE) as u8)
}
