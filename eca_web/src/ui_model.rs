//! UI models that should be available on both wasm and native.
//!
//! Keeping these out of the wasm-only `web` module allows us to unit-test the
//! rule grid and input handling on the host.

use eca::render::Palette;
use eca::rule::{neighborhood_label, NeighborhoodIndex, Rule};
use eca::session::Session;

/// One column of the rule grid: pattern, output bit and color entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleColumn {
    pub index: NeighborhoodIndex,
    pub pattern: String,
    pub output: u8,
    pub color: String,
    /// Normalized color for the swatch (invalid input shows black).
    pub swatch: String,
}

/// Grid columns ordered `111` down to `000`, the usual Wolfram layout.
pub fn rule_columns(rule: &Rule, palette: &Palette) -> Vec<RuleColumn> {
    (0..8u8)
        .rev()
        .map(|index| RuleColumn {
            index,
            pattern: neighborhood_label(index),
            output: rule.output(index),
            color: palette.get(index).to_string(),
            swatch: palette.css(index),
        })
        .collect()
}

/// Numeric text field value with browser `Number()` leniency: blank is 0,
/// garbage is NaN (which the clamping layer maps to the low bound).
pub fn parse_number(text: &str) -> f64 {
    let t = text.trim();
    if t.is_empty() {
        return 0.0;
    }
    t.parse::<f64>().unwrap_or(f64::NAN)
}

pub fn status_line(session: &Session) -> String {
    let cfg = session.config();
    format!(
        "rule {} | {}x{} | {} | row {}",
        cfg.rule.code(),
        cfg.width,
        cfg.height,
        if cfg.boundary.is_periodic() {
            "periodic"
        } else {
            "fixed"
        },
        session.current_row()
    )
}
