//! Raster rendering of a generation history.
//!
//! Colors live here and nowhere in the engine: a live cell is painted with
//! the palette entry of the neighborhood index that produced it, dead cells
//! are white, and the initial row (no rule fired yet) uses entry 0.

use crate::error::{EcaError, Result};
use crate::evolve::{next_generation, Boundary, Generation};
use crate::row::Row;
use crate::rule::{Rule, NEIGHBORHOODS};

/// 8-step blue to mint scale, indexed by neighborhood `000..111`.
pub const DEFAULT_PALETTE: [&str; NEIGHBORHOODS] = [
    "#363C8C", "#3B5F9E", "#427DAE", "#4F99BA", "#62B2C3", "#7AC9CC", "#94DED3", "#B1F2DC",
];

pub const DEAD_COLOR: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);
pub const FALLBACK_COLOR: &str = "#000000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (already normalized).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Trim and uppercase `hex`; return it if it is `#RRGGBB`, else `fallback`.
pub fn normalize_hex(hex: &str, fallback: &str) -> String {
    let s = hex.trim().to_uppercase();
    let ok = s.len() == 7
        && s.starts_with('#')
        && s[1..].bytes().all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b));
    if ok {
        s
    } else {
        fallback.to_string()
    }
}

/// One color per neighborhood index. Entries hold whatever the user typed;
/// invalid entries render black.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: [String; NEIGHBORHOODS],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_PALETTE.map(String::from),
        }
    }
}

impl Palette {
    pub fn get(&self, idx: u8) -> &str {
        &self.colors[(idx & 7) as usize]
    }

    pub fn set(&mut self, idx: u8, color: &str) {
        self.colors[(idx & 7) as usize] = color.trim().to_uppercase();
    }

    pub fn colors(&self) -> &[String; NEIGHBORHOODS] {
        &self.colors
    }

    /// Color a live cell produced by neighborhood `idx` is painted with.
    pub fn live_color(&self, idx: u8) -> Rgb {
        let hex = normalize_hex(self.get(idx), FALLBACK_COLOR);
        Rgb::from_hex(&hex).unwrap_or(Rgb::new(0, 0, 0))
    }

    /// `normalize_hex` of an entry, as a CSS color string.
    pub fn css(&self, idx: u8) -> String {
        normalize_hex(self.get(idx), FALLBACK_COLOR)
    }
}

pub const MAX_CELL_SIZE: usize = 64;

/// Upper bound on `width_px * height_px`.
pub const MAX_RASTER_PIXELS: usize = 1 << 28;

/// RGBA8 pixel buffer; each cell is a `cell_size` square.
#[derive(Debug, Clone)]
pub struct Raster {
    width_px: usize,
    height_px: usize,
    cell_size: usize,
    pixels: Vec<u8>,
}

impl Raster {
    pub fn new(cols: usize, rows: usize, cell_size: usize) -> Result<Self> {
        if cols == 0 || rows == 0 || cell_size == 0 {
            return Err(EcaError::invalid(format!(
                "raster needs non-zero size, got {cols}x{rows} cells of {cell_size}px"
            )));
        }
        if cell_size > MAX_CELL_SIZE {
            return Err(EcaError::invalid(format!(
                "cell size {cell_size} exceeds {MAX_CELL_SIZE}px"
            )));
        }
        let (width_px, height_px, bytes) = cols
            .checked_mul(cell_size)
            .zip(rows.checked_mul(cell_size))
            .and_then(|(w, h)| {
                let bytes = w.checked_mul(h)?.checked_mul(4)?;
                Some((w, h, bytes))
            })
            .filter(|&(w, h, _)| w * h <= MAX_RASTER_PIXELS)
            .ok_or_else(|| {
                EcaError::invalid(format!(
                    "raster of {cols}x{rows} cells at {cell_size}px is too large"
                ))
            })?;
        Ok(Self {
            width_px,
            height_px,
            cell_size,
            pixels: vec![0xFF; bytes],
        })
    }

    pub fn width(&self) -> usize {
        self.width_px
    }

    pub fn height(&self) -> usize {
        self.height_px
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width_px || y >= self.height_px {
            return None;
        }
        let i = (y * self.width_px + x) * 4;
        Some(Rgb::new(self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]))
    }

    fn fill_cell(&mut self, cx: usize, cy: usize, color: Rgb) {
        let cs = self.cell_size;
        for y in cy * cs..((cy + 1) * cs).min(self.height_px) {
            for x in cx * cs..((cx + 1) * cs).min(self.width_px) {
                let i = (y * self.width_px + x) * 4;
                self.pixels[i..i + 4].copy_from_slice(&[color.r, color.g, color.b, 0xFF]);
            }
        }
    }

    /// Paint row `y`. Cells beyond the raster are clipped.
    pub fn draw_generation(&mut self, y: usize, row: &[u8], trace: &[u8], palette: &Palette) {
        for (x, &alive) in row.iter().enumerate() {
            let color = if alive == 0 {
                DEAD_COLOR
            } else {
                palette.live_color(trace.get(x).copied().unwrap_or(0))
            };
            self.fill_cell(x, y, color);
        }
    }

    /// Binary PPM (P6) encoding, alpha dropped.
    pub fn to_ppm(&self) -> Vec<u8> {
        let mut out = format!("P6\n{} {}\n255\n", self.width_px, self.height_px).into_bytes();
        out.reserve(self.width_px * self.height_px * 3);
        for px in self.pixels.chunks_exact(4) {
            out.extend_from_slice(&px[..3]);
        }
        out
    }
}

/// Render a whole history, recomputing each row's trace from the row above.
///
/// `generations` must come from `rule` and `boundary`; the traces are not
/// stored with the history.
pub fn render_automaton(
    generations: &[Row],
    rule: &Rule,
    palette: &Palette,
    cell_size: usize,
    boundary: Boundary,
) -> Result<Raster> {
    let first = generations
        .first()
        .ok_or_else(|| EcaError::invalid("nothing to render"))?;
    let mut raster = Raster::new(first.width(), generations.len(), cell_size)?;

    let initial = Generation::initial(first.clone());
    raster.draw_generation(0, &initial.row, &initial.trace, palette);

    for (g, pair) in generations.windows(2).enumerate() {
        let next = next_generation(&pair[0], rule, boundary)?;
        raster.draw_generation(g + 1, &next.row, &next.trace, palette);
    }
    Ok(raster)
}

/// Terminal rendering: `#` for live cells, `.` for dead ones.
pub fn render_ascii(generations: &[Row]) -> String {
    let mut out = String::new();
    for row in generations {
        out.extend(row.iter().map(|&c| if c == 1 { '#' } else { '.' }));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evolve::run_automaton;
    use crate::row::fit_to_width;

    #[test]
    fn normalize_hex_accepts_only_rrggbb() {
        assert_eq!(normalize_hex(" #a1b2c3 ", "#000000"), "#A1B2C3");
        assert_eq!(normalize_hex("#abc", "#000000"), "#000000");
        assert_eq!(normalize_hex("a1b2c3", "#000000"), "#000000");
        assert_eq!(normalize_hex("#GGGGGG", "#111111"), "#111111");
    }

    #[test]
    fn invalid_palette_entry_renders_black() {
        let mut palette = Palette::default();
        palette.set(3, "not a color");
        assert_eq!(palette.live_color(3), Rgb::new(0, 0, 0));
        assert_eq!(palette.live_color(0), Rgb::new(0x36, 0x3C, 0x8C));
    }

    #[test]
    fn live_cells_colored_by_trace() {
        let rule = Rule::from_code(90);
        let initial = fit_to_width(&[], 5).unwrap();
        let gens = run_automaton(&initial, &rule, 2, Boundary::Fixed).unwrap();
        let palette = Palette::default();
        let raster = render_automaton(&gens, &rule, &palette, 2, Boundary::Fixed).unwrap();

        assert_eq!((raster.width(), raster.height()), (10, 4));
        // Initial live cell uses entry 0.
        assert_eq!(raster.pixel(4, 0), Some(palette.live_color(0)));
        assert_eq!(raster.pixel(0, 0), Some(DEAD_COLOR));
        // Gen 1: cell 1 fired from 001, cell 3 from 100.
        assert_eq!(raster.pixel(2, 2), Some(palette.live_color(1)));
        assert_eq!(raster.pixel(6, 3), Some(palette.live_color(4)));
        assert_eq!(raster.pixel(4, 2), Some(DEAD_COLOR));
    }

    #[test]
    fn empty_history_is_rejected() {
        let err = render_automaton(&[], &Rule::from_code(0), &Palette::default(), 4, Boundary::Fixed)
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn oversized_raster_is_rejected() {
        let err = Raster::new(3, 2, usize::MAX / 2).unwrap_err();
        assert!(err.is_invalid_argument());
        let err = Raster::new(usize::MAX / 2, 2, 4).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(Raster::new(3, 2, MAX_CELL_SIZE + 1).is_err());
        assert!(Raster::new(16, 8, MAX_CELL_SIZE).is_ok());
    }

    #[test]
    fn ppm_header_and_size() {
        let raster = Raster::new(3, 2, 1).unwrap();
        let ppm = raster.to_ppm();
        assert!(ppm.starts_with(b"P6\n3 2\n255\n"));
        assert_eq!(ppm.len(), b"P6\n3 2\n255\n".len() + 3 * 2 * 3);
    }

    #[test]
    fn ascii_rows() {
        let row = Row::from_bits(vec![0, 1, 0]).unwrap();
        assert_eq!(render_ascii(&[row.clone(), row]), ".#.\n.#.\n");
    }
}
