//! Writer for .grd workbook snapshots

use crate::error::Result;
use sheetline_engine::engine::{CellType, ErrorToken, FormulaValue, Workbook};
use std::fs;
use std::path::Path;

pub(crate) const GRD_HEADER: &str = "# Sheetline Workbook";
pub(crate) const UNRECOGNIZED_TAG: &str = "#unrecognized";
pub(crate) const NO_EVALUATOR_TAG: &str = "#no-evaluator";

/// Write a Workbook to a .grd file
pub fn write_grd(path: &Path, workbook: &Workbook) -> Result<()> {
    let content = write_grd_content(workbook);
    fs::write(path, content)?;
    Ok(())
}

/// Write a Workbook to a .grd format string
pub fn write_grd_content(workbook: &Workbook) -> String {
    let mut lines = vec![
        GRD_HEADER.to_string(),
        format!("current: {}", workbook.current_index()),
    ];

    for sheet in workbook.sheets() {
        let (rows, cols) = sheet.grid().dimensions();
        lines.push(format!(
            "[sheet {}x{}] \"{}\"",
            rows,
            cols,
            escape_grd_text(sheet.name())
        ));

        // grid.cells() is already row-major, so output is stable
        for (cell_ref, cell) in sheet.grid().cells() {
            if cell.content().is_empty() {
                continue;
            }
            let quoted = format!("\"{}\"", escape_grd_text(cell.content()));
            let line = match cell.contents() {
                CellType::Formula { cached, .. } => {
                    format!("{}: {} -> {}", cell_ref, quoted, format_cached(cached))
                }
                _ => format!("{}: {}", cell_ref, quoted),
            };
            lines.push(line);
        }
    }

    lines.join("\n") + "\n"
}

fn format_cached(value: &FormulaValue) -> String {
    match value {
        FormulaValue::Number(n) => n.to_string(),
        FormulaValue::Error(ErrorToken::Unrecognized) => UNRECOGNIZED_TAG.to_string(),
        FormulaValue::Error(ErrorToken::NoEvaluator) => NO_EVALUATOR_TAG.to_string(),
    }
}

pub(crate) fn escape_grd_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out
}
