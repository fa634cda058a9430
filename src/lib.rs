//! # eca
//!
//! Elementary cellular automata: 1-D, two-state, radius-1 rules indexed by
//! Wolfram code 0–255.
//!
//! The engine (`rule`, `row`, `evolve`) is a set of pure functions over
//! explicit arguments. Rendering, export, animation and the interactive
//! session are collaborators that consume its rows and traces.
//!
//! ## Quick Start
//!
//! ```
//! use eca::prelude::*;
//!
//! let rule = decode_rule(90).unwrap();
//! let initial = fit_to_width(&parse_bit_string(""), 7).unwrap();
//! let gens = run_automaton(&initial, &rule, 4, Boundary::Fixed).unwrap();
//!
//! assert_eq!(gens[3].to_bit_string(), "1010101");
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): config (de)serialization and JSON/CSV export
//! - `parallel`: run independent automata across threads via rayon
//!
//! ## Modules
//!
//! - [`rule`]: Wolfram code <-> lookup table
//! - [`row`]: rows, initial-pattern parsing and centering, random rows
//! - [`evolve`]: stepping and full runs
//! - [`batch`]: independent runs side by side
//! - [`render`], [`export`], [`animate`], [`session`]: front-end collaborators

#[path = "core/error.rs"]
pub mod error;

#[path = "core/prng.rs"]
pub mod prng;

#[path = "core/rule.rs"]
pub mod rule;

#[path = "core/row.rs"]
pub mod row;

#[path = "core/evolve.rs"]
pub mod evolve;

#[path = "core/batch.rs"]
pub mod batch;

pub mod animate;
pub mod config;
pub mod render;
pub mod session;

#[cfg(feature = "serde")]
pub mod export;

/// Prelude module for convenient imports.
///
/// ```
/// use eca::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{EcaConfig, InitialPattern};
    pub use crate::error::{EcaError, Result};
    pub use crate::evolve::{next_generation, run_automaton, Boundary, Generation};
    pub use crate::row::{fit_to_width, parse_bit_string, random_row, Row};
    pub use crate::rule::{decode_rule, encode_rule, NeighborhoodIndex, Rule};
}
