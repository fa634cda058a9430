//! Interactive session state shared by the front ends.
//!
//! A session owns the current configuration, palette and history. Any
//! configuration change recomputes the whole history from scratch; the
//! engine itself stays stateless.

use crate::animate::{Animation, Frame};
use crate::config::{clamp_int, clamp_rule, EcaConfig, InitialPattern};
use crate::error::Result;
use crate::evolve::{next_generation, Boundary};
use crate::render::{render_automaton, Palette, Raster};
use crate::row::{random_row, random_row_seeded, Row};
use crate::rule::{NeighborhoodIndex, Rule};

pub const DEFAULT_CELL_SIZE: usize = 4;

#[derive(Debug, Clone)]
pub struct Session {
    config: EcaConfig,
    palette: Palette,
    cell_size: usize,
    generations: Vec<Row>,
    current_row: usize,
}

impl Session {
    pub fn new(config: EcaConfig) -> Result<Self> {
        let mut session = Self {
            config,
            palette: Palette::default(),
            cell_size: DEFAULT_CELL_SIZE,
            generations: Vec::new(),
            current_row: 0,
        };
        session.recompute()?;
        Ok(session)
    }

    pub fn config(&self) -> &EcaConfig {
        &self.config
    }

    pub fn rule(&self) -> Rule {
        self.config.rule
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Palette edits only affect rendering; no recompute needed.
    pub fn palette_mut(&mut self) -> &mut Palette {
        &mut self.palette
    }

    pub fn cell_size(&self) -> usize {
        self.cell_size
    }

    pub fn generations(&self) -> &[Row] {
        &self.generations
    }

    /// Index of the last row drawn.
    pub fn current_row(&self) -> usize {
        self.current_row
    }

    /// Clamp the config, rebuild the initial row and replace the history.
    pub fn recompute(&mut self) -> Result<()> {
        self.config = self.config.clone().clamped();
        self.generations = self.config.run()?;
        self.current_row = self.generations.len() - 1;
        tracing::trace!(rows = self.generations.len(), "session recomputed");
        Ok(())
    }

    /// Free-form rule input (clamped to `[0, 255]`).
    pub fn set_rule_code(&mut self, code: f64) -> Result<()> {
        self.config.rule = clamp_rule(code);
        self.recompute()
    }

    pub fn toggle_rule_bit(&mut self, idx: NeighborhoodIndex) -> Result<()> {
        self.config.rule = self.config.rule.toggled(idx);
        self.recompute()
    }

    pub fn set_width(&mut self, width: f64) -> Result<()> {
        let range = EcaConfig::WIDTH_RANGE;
        self.config.width = clamp_int(width, *range.start() as i64, *range.end() as i64) as usize;
        self.recompute()
    }

    pub fn set_height(&mut self, height: f64) -> Result<()> {
        let range = EcaConfig::HEIGHT_RANGE;
        self.config.height = clamp_int(height, *range.start() as i64, *range.end() as i64) as usize;
        self.recompute()
    }

    pub fn set_boundary(&mut self, boundary: Boundary) -> Result<()> {
        self.config.boundary = boundary;
        self.recompute()
    }

    pub fn set_initial_text(&mut self, text: &str) -> Result<()> {
        self.config.initial = InitialPattern::Text(text.to_string());
        self.recompute()
    }

    /// Clear the initial pattern back to a single centered cell.
    pub fn reset_initial(&mut self) -> Result<()> {
        self.set_initial_text("")
    }

    /// Replace the initial pattern with random bits; returns the new text.
    pub fn randomize(&mut self) -> Result<String> {
        let row = random_row(self.config.width)?;
        self.apply_random(row)
    }

    pub fn randomize_seeded(&mut self, seed: u64) -> Result<String> {
        let row = random_row_seeded(self.config.width, seed)?;
        self.apply_random(row)
    }

    fn apply_random(&mut self, row: Row) -> Result<String> {
        let text = row.to_bit_string();
        self.set_initial_text(&text)?;
        Ok(text)
    }

    /// Append one generation to the history, unless it already holds
    /// `height` rows.
    pub fn step(&mut self) -> Result<Option<Frame>> {
        let next_index = self.current_row + 1;
        if next_index >= self.config.height {
            return Ok(None);
        }
        let last = &self.generations[self.generations.len() - 1];
        let next = next_generation(last, &self.config.rule, self.config.boundary)?;
        self.generations.push(next.row.clone());
        self.current_row = next_index;
        Ok(Some(Frame {
            index: next_index,
            row: next.row,
            trace: next.trace,
        }))
    }

    /// A fresh animated run of the current configuration.
    pub fn animation(&self) -> Result<Animation> {
        let config = self.config.clone().clamped();
        config.validate()?;
        let initial = config.initial_row()?;
        Ok(Animation::new(
            initial,
            config.rule,
            config.height,
            config.boundary,
        ))
    }

    /// Replace the history with a shorter one (what an interrupted
    /// animation drew), so later steps continue from its last row.
    pub fn truncate_to(&mut self, rows: usize) {
        let rows = rows.clamp(1, self.generations.len());
        self.generations.truncate(rows);
        self.current_row = rows - 1;
    }

    pub fn render(&self) -> Result<Raster> {
        render_automaton(
            &self.generations,
            &self.config.rule,
            &self.palette,
            self.cell_size,
            self.config.boundary,
        )
    }

    /// Export file name and bytes. Always covers the full configured
    /// height, even when a paused animation left the history short.
    #[cfg(feature = "serde")]
    pub fn export(&self, format: crate::export::ExportFormat) -> Result<(String, Vec<u8>)> {
        let full;
        let generations = if self.generations.len() < self.config.height {
            full = self.config.run()?;
            &full
        } else {
            &self.generations
        };
        let name = crate::export::export_file_name(
            &self.config.rule,
            self.config.width,
            self.config.height,
            format,
        );
        let bytes = crate::export::export_bytes(
            format,
            &self.config.rule,
            self.config.boundary,
            generations,
        )?;
        Ok((name, bytes))
    }
}
