//! Rows of cells and the initial-row normalizer.

use core::fmt;
use core::ops::Deref;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{EcaError, Result};
use crate::prng::Prng;

/// A fixed-width sequence of cells, each 0 or 1.
///
/// A row is never empty and never resized; stepping produces a new row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<u8>", into = "Vec<u8>"))]
pub struct Row {
    cells: Vec<u8>,
}

impl Row {
    /// All-dead row of the given width.
    pub fn zeros(width: usize) -> Result<Self> {
        check_width(width)?;
        Ok(Self {
            cells: vec![0; width],
        })
    }

    /// Wrap a cell vector. Fails if it is empty or holds anything but 0/1.
    pub fn from_bits(cells: Vec<u8>) -> Result<Self> {
        check_width(cells.len())?;
        if let Some(i) = cells.iter().position(|&c| c > 1) {
            return Err(EcaError::invalid(format!(
                "cell {i} is {}, expected 0 or 1",
                cells[i]
            )));
        }
        Ok(Self { cells })
    }

    /// Callers guarantee a non-empty vector of 0/1 cells.
    pub(crate) fn from_cells_unchecked(cells: Vec<u8>) -> Self {
        debug_assert!(!cells.is_empty());
        debug_assert!(cells.iter().all(|&c| c <= 1));
        Self { cells }
    }

    pub fn width(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<u8> {
        self.cells
    }

    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == 1).count()
    }

    /// The row as a `0`/`1` string, the format the initial-pattern box accepts.
    pub fn to_bit_string(&self) -> String {
        self.cells.iter().map(|&c| if c == 1 { '1' } else { '0' }).collect()
    }
}

impl Deref for Row {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.cells
    }
}

impl TryFrom<Vec<u8>> for Row {
    type Error = EcaError;

    fn try_from(cells: Vec<u8>) -> Result<Self> {
        Row::from_bits(cells)
    }
}

impl From<Row> for Vec<u8> {
    fn from(row: Row) -> Self {
        row.cells
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_bit_string())
    }
}

fn check_width(width: usize) -> Result<()> {
    if width == 0 {
        return Err(EcaError::invalid("row width must be > 0"));
    }
    Ok(())
}

/// Keep only `'0'` and `'1'` characters, in order. Everything else is dropped.
pub fn parse_bit_string(s: &str) -> Vec<u8> {
    s.chars()
        .filter_map(|ch| match ch {
            '0' => Some(0),
            '1' => Some(1),
            _ => None,
        })
        .collect()
}

/// Center a bit pattern in a row of `width` cells.
///
/// - empty pattern: single live cell at `width / 2`
/// - pattern at least as wide: centered slice starting at `(len - width) / 2`
/// - narrower pattern: placed at `(width - len) / 2` among zeros
///
/// Cells are copied verbatim (masked to one bit).
pub fn fit_to_width(bits: &[u8], width: usize) -> Result<Row> {
    check_width(width)?;
    let mut out = vec![0u8; width];

    if bits.is_empty() {
        out[width / 2] = 1;
    } else if bits.len() >= width {
        let start = (bits.len() - width) / 2;
        for (dst, &src) in out.iter_mut().zip(&bits[start..start + width]) {
            *dst = src & 1;
        }
    } else {
        let offset = (width - bits.len()) / 2;
        for (dst, &src) in out[offset..].iter_mut().zip(bits) {
            *dst = src & 1;
        }
    }

    Ok(Row::from_cells_unchecked(out))
}

/// Random row from an unseeded generator; differs from call to call.
pub fn random_row(n: usize) -> Result<Row> {
    random_row_with(&mut Prng::from_entropy(), n)
}

/// Reproducible random row.
pub fn random_row_seeded(n: usize, seed: u64) -> Result<Row> {
    random_row_with(&mut Prng::new(seed), n)
}

pub fn random_row_with(rng: &mut Prng, n: usize) -> Result<Row> {
    check_width(n)?;
    let cells = (0..n).map(|_| rng.next_bit()).collect();
    Ok(Row::from_cells_unchecked(cells))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keeps_only_bits() {
        assert_eq!(parse_bit_string("1 0x2\n01a"), vec![1, 0, 0, 1]);
        assert!(parse_bit_string("").is_empty());
        assert!(parse_bit_string("abc 23").is_empty());
    }

    #[test]
    fn empty_pattern_gives_centered_cell() {
        for width in [1usize, 2, 7, 8, 101] {
            let row = fit_to_width(&[], width).unwrap();
            assert_eq!(row.width(), width);
            assert_eq!(row.live_count(), 1);
            assert_eq!(row[width / 2], 1);
        }
    }

    #[test]
    fn exact_width_is_unchanged() {
        let bits = vec![1, 0, 1, 1, 0];
        let row = fit_to_width(&bits, 5).unwrap();
        assert_eq!(row.cells(), bits.as_slice());
    }

    #[test]
    fn narrow_pattern_is_centered() {
        let row = fit_to_width(&[1, 1], 7).unwrap();
        assert_eq!(row.cells(), &[0, 0, 1, 1, 0, 0, 0]);
    }

    #[test]
    fn wide_pattern_takes_centered_slice() {
        let row = fit_to_width(&[1, 0, 1, 1, 0, 0, 1], 4).unwrap();
        // offset (7 - 4) / 2 = 1
        assert_eq!(row.cells(), &[0, 1, 1, 0]);
    }

    #[test]
    fn cells_are_masked_to_one_bit() {
        let row = fit_to_width(&[3, 2], 2).unwrap();
        assert_eq!(row.cells(), &[1, 0]);
    }

    #[test]
    fn zero_width_is_rejected() {
        assert!(fit_to_width(&[1], 0).unwrap_err().is_invalid_argument());
        assert!(Row::zeros(0).is_err());
        assert!(random_row(0).is_err());
    }

    #[test]
    fn from_bits_validates_cells() {
        assert!(Row::from_bits(vec![]).is_err());
        assert!(Row::from_bits(vec![0, 2]).is_err());
        assert_eq!(Row::from_bits(vec![0, 1]).unwrap().to_string(), "01");
    }

    #[test]
    fn seeded_random_rows_repeat() {
        let a = random_row_seeded(64, 9).unwrap();
        let b = random_row_seeded(64, 9).unwrap();
        assert_eq!(a, b);
        assert!(a.iter().all(|&c| c <= 1));
    }

    #[test]
    fn unseeded_random_rows_vary() {
        let a = random_row(256).unwrap();
        let b = random_row(256).unwrap();
        assert_eq!(a.width(), 256);
        assert_ne!(a, b);
    }
}
