use super::Document;
use crate::error::{Result, SheetlineError};
use sheetline_engine::engine::{CellRef, FORMULA_MARKER, FormulaValue};
use tracing::debug;

impl Document {
    /// Set a cell on the current sheet from input text.
    /// Returns false when the address is outside the sheet.
    pub fn set_cell_from_input(&mut self, cell_ref: CellRef, input: &str) -> bool {
        let written = self
            .workbook
            .set_cell_value(cell_ref.row, cell_ref.col, Some(input));
        if written {
            self.modified = true;
        } else {
            debug!(cell = %cell_ref, "write outside the current sheet ignored");
        }
        written
    }

    /// Display string for a cell's derived value on the current sheet.
    pub fn cell_display(&self, cell_ref: &CellRef) -> String {
        self.workbook
            .get_cell(cell_ref.row, cell_ref.col)
            .map(|cell| cell.display())
            .unwrap_or_default()
    }

    /// Editable text of a cell on the current sheet.
    pub fn cell_content(&self, cell_ref: &CellRef) -> String {
        self.workbook.get_cell_content(cell_ref.row, cell_ref.col)
    }

    pub fn add_sheet(&mut self, name: &str) -> Option<usize> {
        let index = self.workbook.add_sheet(name)?;
        self.modified = true;
        Some(index)
    }

    pub fn switch_sheet(&mut self, index: usize) -> bool {
        self.workbook.switch_to(index)
    }

    /// Make the first sheet matching `name` current.
    pub fn switch_sheet_by_name(&mut self, name: &str) -> Result<usize> {
        let index = self
            .workbook
            .position_by_name(name)
            .ok_or_else(|| SheetlineError::UnknownSheet(name.trim().to_string()))?;
        self.workbook.switch_to(index);
        Ok(index)
    }

    /// Evaluate formula text against the workbook without storing it.
    /// The leading `=` is optional.
    pub fn evaluate(&self, formula: &str) -> FormulaValue {
        let trimmed = formula.trim();
        let body = trimmed.strip_prefix(FORMULA_MARKER).unwrap_or(trimmed);
        self.workbook.evaluate_formula(body, 0, 0)
    }

    /// Bounds (inclusive) of the written, non-blank cells on the current sheet.
    pub fn used_bounds(&self) -> Option<(CellRef, CellRef)> {
        let sheet = self.workbook.current_sheet();
        let mut bounds: Option<(CellRef, CellRef)> = None;
        for (cell_ref, cell) in sheet.grid().cells() {
            if cell.content().is_empty() {
                continue;
            }
            bounds = Some(match bounds {
                None => (cell_ref, cell_ref),
                Some((min, max)) => (
                    CellRef::new(min.row.min(cell_ref.row), min.col.min(cell_ref.col)),
                    CellRef::new(max.row.max(cell_ref.row), max.col.max(cell_ref.col)),
                ),
            });
        }
        bounds
    }
}
