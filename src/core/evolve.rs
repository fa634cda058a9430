//! Generation stepping.
//!
//! Everything here is a pure function of its arguments: no state is kept
//! between calls and inputs are never mutated, so runs can be recomputed,
//! cached, or issued from several threads freely.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{EcaError, Result};
use crate::row::Row;
use crate::rule::{neighborhood_index, NeighborhoodIndex, Rule};

/// How edge cells find their missing neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Boundary {
    /// The row wraps: cell 0's left neighbor is the last cell and vice versa.
    Periodic,
    /// Out-of-range neighbors read as 0.
    #[default]
    Fixed,
}

impl Boundary {
    pub fn from_periodic(periodic: bool) -> Self {
        if periodic {
            Boundary::Periodic
        } else {
            Boundary::Fixed
        }
    }

    pub fn is_periodic(self) -> bool {
        self == Boundary::Periodic
    }
}

/// One stepped row together with the neighborhood index that produced each cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub row: Row,
    pub trace: Vec<NeighborhoodIndex>,
}

impl Generation {
    /// The initial row: no rule has fired yet, so the trace is all zeros.
    pub fn initial(row: Row) -> Self {
        let trace = vec![0; row.width()];
        Self { row, trace }
    }
}

/// Neighborhood index for cell `i` of `prev`.
#[inline]
fn neighborhood_at(prev: &[u8], i: usize, boundary: Boundary) -> NeighborhoodIndex {
    let last = prev.len() - 1;
    let left = match (i, boundary) {
        (0, Boundary::Periodic) => prev[last],
        (0, Boundary::Fixed) => 0,
        _ => prev[i - 1],
    };
    let right = match (i == last, boundary) {
        (true, Boundary::Periodic) => prev[0],
        (true, Boundary::Fixed) => 0,
        (false, _) => prev[i + 1],
    };
    neighborhood_index(left, prev[i], right)
}

/// Compute the row after `prev` under `rule`.
///
/// Each cell reads only `prev`, never the row being built.
pub fn next_generation(prev: &Row, rule: &Rule, boundary: Boundary) -> Result<Generation> {
    let cells = prev.cells();
    if cells.is_empty() {
        return Err(EcaError::invalid("cannot step an empty row"));
    }

    let n = cells.len();
    let mut row = Vec::with_capacity(n);
    let mut trace = Vec::with_capacity(n);
    for i in 0..n {
        let idx = neighborhood_at(cells, i, boundary);
        row.push(rule.output(idx));
        trace.push(idx);
    }

    Ok(Generation {
        row: Row::from_cells_unchecked(row),
        trace,
    })
}

fn check_height(height: usize) -> Result<()> {
    if height == 0 {
        return Err(EcaError::invalid("height must be >= 1"));
    }
    Ok(())
}

/// Evolve `initial` into a history of `height` rows.
///
/// Element 0 equals `initial`; element `g` is the step of element `g - 1`.
pub fn run_automaton(
    initial: &Row,
    rule: &Rule,
    height: usize,
    boundary: Boundary,
) -> Result<Vec<Row>> {
    check_height(height)?;
    tracing::debug!(
        rule = rule.code(),
        width = initial.width(),
        height,
        ?boundary,
        "run automaton"
    );

    let mut gens = Vec::with_capacity(height);
    gens.push(initial.clone());
    for g in 1..height {
        let next = next_generation(&gens[g - 1], rule, boundary)?;
        gens.push(next.row);
    }
    Ok(gens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::{fit_to_width, random_row_seeded};
    use proptest::prelude::*;

    fn row(bits: &[u8]) -> Row {
        Row::from_bits(bits.to_vec()).unwrap()
    }

    #[test]
    fn rule_90_sierpinski() {
        let initial = row(&[0, 0, 0, 1, 0, 0, 0]);
        let gens = run_automaton(&initial, &Rule::from_code(90), 4, Boundary::Fixed).unwrap();
        assert_eq!(gens.len(), 4);
        assert_eq!(gens[0], initial);
        assert_eq!(gens[1].cells(), &[0, 0, 1, 0, 1, 0, 0]);
        assert_eq!(gens[2].cells(), &[0, 1, 0, 0, 0, 1, 0]);
        assert_eq!(gens[3].cells(), &[1, 0, 1, 0, 1, 0, 1]);
    }

    #[test]
    fn rule_0_kills_everything() {
        let initial = random_row_seeded(33, 5).unwrap();
        let gens = run_automaton(&initial, &Rule::from_code(0), 6, Boundary::Periodic).unwrap();
        assert!(gens[1..].iter().all(|r| r.live_count() == 0));
    }

    #[test]
    fn rule_255_fills_everything() {
        let initial = Row::zeros(17).unwrap();
        let gens = run_automaton(&initial, &Rule::from_code(255), 5, Boundary::Fixed).unwrap();
        assert!(gens[1..].iter().all(|r| r.live_count() == r.width()));
    }

    // Only neighborhood 100 (left alive, center and right dead) fires.
    const LEFT_ONLY: u8 = 1 << 4;

    #[test]
    fn periodic_boundary_wraps() {
        let prev = row(&[1, 0, 0]);
        let next = next_generation(&prev, &Rule::from_code(LEFT_ONLY), Boundary::Periodic).unwrap();
        // Cell 1 sees (1,0,0); cell 0 sees (0,1,0) with left wrapped from cell 2.
        assert_eq!(next.row.cells(), &[0, 1, 0]);
        assert_eq!(next.trace, vec![2, 4, 1]);
    }

    #[test]
    fn fixed_boundary_reads_zero() {
        let prev = row(&[0, 0, 1]);
        let rule = Rule::from_code(LEFT_ONLY);
        let fixed = next_generation(&prev, &rule, Boundary::Fixed).unwrap();
        let periodic = next_generation(&prev, &rule, Boundary::Periodic).unwrap();
        // Cell 0's left neighbor is cell 2 (alive) only when wrapping.
        assert_eq!(fixed.row.cells(), &[0, 0, 0]);
        assert_eq!(periodic.row.cells(), &[1, 0, 0]);
        assert_eq!(fixed.trace[0], 0);
        assert_eq!(periodic.trace[0], 4);
    }

    #[test]
    fn single_cell_row_wraps_onto_itself() {
        let prev = row(&[1]);
        let next = next_generation(&prev, &Rule::from_code(0x80), Boundary::Periodic).unwrap();
        assert_eq!(next.trace, vec![7]);
        assert_eq!(next.row.cells(), &[1]);
        let next = next_generation(&prev, &Rule::from_code(0x80), Boundary::Fixed).unwrap();
        assert_eq!(next.trace, vec![2]);
        assert_eq!(next.row.cells(), &[0]);
    }

    #[test]
    fn height_one_returns_initial_only() {
        let initial = fit_to_width(&[], 9).unwrap();
        let gens = run_automaton(&initial, &Rule::from_code(110), 1, Boundary::Fixed).unwrap();
        assert_eq!(gens, vec![initial]);
    }

    #[test]
    fn zero_height_is_rejected() {
        let initial = fit_to_width(&[], 9).unwrap();
        let err = run_automaton(&initial, &Rule::from_code(30), 0, Boundary::Fixed).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    proptest! {
        #[test]
        fn stepping_is_deterministic(
            cells in proptest::collection::vec(0u8..=1, 1..64),
            code in 0u8..=255,
            periodic in any::<bool>(),
        ) {
            let prev = Row::from_bits(cells).unwrap();
            let rule = Rule::from_code(code);
            let boundary = Boundary::from_periodic(periodic);
            let a = next_generation(&prev, &rule, boundary).unwrap();
            let b = next_generation(&prev, &rule, boundary).unwrap();
            prop_assert_eq!(&a, &b);
            prop_assert_eq!(a.row.width(), prev.width());
            for (cell, idx) in a.row.iter().zip(&a.trace) {
                prop_assert!(*idx < 8);
                prop_assert_eq!(*cell, rule.output(*idx));
            }
        }
    }
}
