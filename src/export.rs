//! JSON and CSV export of a generation history.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::{EcaError, Result};
use crate::evolve::Boundary;
use crate::row::Row;
use crate::rule::Rule;

pub const CSV_HEADER: &str = "generation,cell_index,state";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
        }
    }
}

/// The JSON export document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub rule: u8,
    pub width: usize,
    pub height: usize,
    pub periodic: bool,
    pub initial: Vec<u8>,
    pub generations: Vec<Vec<u8>>,
}

impl ExportDocument {
    pub fn new(rule: &Rule, boundary: Boundary, generations: &[Row]) -> Result<Self> {
        let first = generations
            .first()
            .ok_or_else(|| EcaError::invalid("nothing to export"))?;
        Ok(Self {
            rule: rule.code(),
            width: first.width(),
            height: generations.len(),
            periodic: boundary.is_periodic(),
            initial: first.cells().to_vec(),
            generations: generations.iter().map(|r| r.cells().to_vec()).collect(),
        })
    }
}

/// `eca_rule{rule}_w{width}_h{height}.{ext}`
pub fn export_file_name(rule: &Rule, width: usize, height: usize, format: ExportFormat) -> String {
    format!(
        "eca_rule{}_w{}_h{}.{}",
        rule.code(),
        width,
        height,
        format.extension()
    )
}

pub fn write_json<W: Write>(
    w: &mut W,
    rule: &Rule,
    boundary: Boundary,
    generations: &[Row],
) -> Result<()> {
    let doc = ExportDocument::new(rule, boundary, generations)?;
    serde_json::to_writer(&mut *w, &doc)?;
    Ok(())
}

/// One `generation,cell_index,state` line per cell, no trailing newline.
pub fn write_csv<W: Write>(w: &mut W, generations: &[Row]) -> Result<()> {
    write!(w, "{CSV_HEADER}")?;
    for (g, row) in generations.iter().enumerate() {
        for (i, &state) in row.iter().enumerate() {
            write!(w, "\n{g},{i},{state}")?;
        }
    }
    Ok(())
}

/// Serialize to bytes in the requested format.
pub fn export_bytes(
    format: ExportFormat,
    rule: &Rule,
    boundary: Boundary,
    generations: &[Row],
) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    match format {
        ExportFormat::Json => write_json(&mut buf, rule, boundary, generations)?,
        ExportFormat::Csv => write_csv(&mut buf, generations)?,
    }
    tracing::debug!(?format, bytes = buf.len(), "export");
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evolve::run_automaton;
    use crate::row::fit_to_width;

    fn history() -> (Rule, Vec<Row>) {
        let rule = Rule::from_code(90);
        let initial = fit_to_width(&[], 3).unwrap();
        let gens = run_automaton(&initial, &rule, 2, Boundary::Periodic).unwrap();
        (rule, gens)
    }

    #[test]
    fn json_document_shape() {
        let (rule, gens) = history();
        let bytes = export_bytes(ExportFormat::Json, &rule, Boundary::Periodic, &gens).unwrap();
        let doc: ExportDocument = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(doc.rule, 90);
        assert_eq!((doc.width, doc.height), (3, 2));
        assert!(doc.periodic);
        assert_eq!(doc.initial, vec![0, 1, 0]);
        assert_eq!(doc.generations, vec![vec![0, 1, 0], vec![1, 0, 1]]);
    }

    #[test]
    fn csv_lines() {
        let (_, gens) = history();
        let bytes = export_bytes(ExportFormat::Csv, &Rule::default(), Boundary::Fixed, &gens).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1 + 6);
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[2], "0,1,1");
        assert_eq!(lines[6], "1,2,1");
    }

    #[test]
    fn file_names() {
        let rule = Rule::from_code(30);
        assert_eq!(
            export_file_name(&rule, 101, 150, ExportFormat::Csv),
            "eca_rule30_w101_h150.csv"
        );
    }

    #[test]
    fn empty_history_is_rejected() {
        assert!(export_bytes(ExportFormat::Json, &Rule::default(), Boundary::Fixed, &[]).is_err());
    }
}
