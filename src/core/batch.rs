//! Independent runs side by side (e.g. comparing rule variants).
//!
//! Generations inside one run are always computed in order; only separate
//! runs are spread across threads, and only with the `parallel` feature.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::Result;
use crate::evolve::{run_automaton, Boundary};
use crate::row::Row;
use crate::rule::Rule;

/// Parameters of one independent run.
#[derive(Debug, Clone)]
pub struct RunSpec {
    pub initial: Row,
    pub rule: Rule,
    pub height: usize,
    pub boundary: Boundary,
}

impl RunSpec {
    pub fn new(initial: Row, rule: Rule, height: usize, boundary: Boundary) -> Self {
        Self {
            initial,
            rule,
            height,
            boundary,
        }
    }

    pub fn run(&self) -> Result<Vec<Row>> {
        run_automaton(&self.initial, &self.rule, self.height, self.boundary)
    }
}

/// Same setup for each rule in `rules`.
pub fn rule_variants(
    initial: &Row,
    rules: &[Rule],
    height: usize,
    boundary: Boundary,
) -> Vec<RunSpec> {
    rules
        .iter()
        .map(|&rule| RunSpec::new(initial.clone(), rule, height, boundary))
        .collect()
}

/// Run every spec; results keep the input order. A failing spec does not
/// affect the others.
pub fn run_many(specs: &[RunSpec]) -> Vec<Result<Vec<Row>>> {
    tracing::debug!(runs = specs.len(), parallel = cfg!(feature = "parallel"), "run batch");

    #[cfg(feature = "parallel")]
    {
        specs.par_iter().map(RunSpec::run).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        specs.iter().map(RunSpec::run).collect()
    }
}
