use tracing::debug;

use super::cell::{Cell, CellValue, ErrorToken, FormulaValue};
use super::formula::{FormulaEvaluator, WorkbookAccess};
use super::grid::{DEFAULT_COLS, DEFAULT_ROWS, Grid};
use super::sheet::Sheet;

pub const DEFAULT_SHEET_NAME: &str = "Sheet 1";

/// An ordered collection of sheets with one current sheet.
///
/// A workbook always holds at least one sheet. Sheets are only appended;
/// every sheet shares the workbook's grid extent.
#[derive(Clone, Debug)]
pub struct Workbook {
    sheets: Vec<Sheet>,
    current: usize,
    rows: usize,
    cols: usize,
    evaluator: Option<FormulaEvaluator>,
}

impl Workbook {
    /// Create a workbook with one 20×20 sheet named "Sheet 1" and an
    /// attached evaluator.
    pub fn new() -> Self {
        Self::with_layout(DEFAULT_SHEET_NAME, DEFAULT_ROWS, DEFAULT_COLS)
    }

    /// Create a workbook whose sheets are `rows` × `cols`, starting with one
    /// sheet called `first_sheet` (or "Sheet 1" when blank). Extents beyond
    /// [`MAX_CELLS`](super::grid::MAX_CELLS) are shrunk as by
    /// [`Grid::with_dimensions`].
    pub fn with_layout(first_sheet: &str, rows: usize, cols: usize) -> Self {
        let name = match first_sheet.trim() {
            "" => DEFAULT_SHEET_NAME,
            _ => first_sheet,
        };
        let grid = Grid::with_dimensions(rows, cols);
        let (rows, cols) = grid.dimensions();
        Workbook {
            sheets: vec![Sheet::with_grid(name, grid)],
            current: 0,
            rows,
            cols,
            evaluator: Some(FormulaEvaluator::new()),
        }
    }

    /// Rebuild a workbook from existing sheets, e.g. after loading a file.
    /// Returns None when `sheets` is empty. An out-of-range `current` falls
    /// back to the first sheet.
    pub fn from_sheets(sheets: Vec<Sheet>, current: usize) -> Option<Self> {
        let (rows, cols) = sheets.first()?.grid().dimensions();
        let current = if current < sheets.len() { current } else { 0 };
        Some(Workbook {
            sheets,
            current,
            rows,
            cols,
            evaluator: Some(FormulaEvaluator::new()),
        })
    }

    pub fn attach_evaluator(&mut self, evaluator: FormulaEvaluator) {
        self.evaluator = Some(evaluator);
    }

    pub fn detach_evaluator(&mut self) {
        self.evaluator = None;
    }

    pub fn has_evaluator(&self) -> bool {
        self.evaluator.is_some()
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name()).collect()
    }

    pub fn sheet(&self, index: usize) -> Option<&Sheet> {
        self.sheets.get(index)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_sheet(&self) -> &Sheet {
        &self.sheets[self.current]
    }

    pub fn current_sheet_mut(&mut self) -> &mut Sheet {
        &mut self.sheets[self.current]
    }

    /// Append a sheet. Blank or whitespace-only names are ignored.
    /// Duplicate names are allowed. Returns the new sheet's index.
    pub fn add_sheet(&mut self, name: &str) -> Option<usize> {
        if name.trim().is_empty() {
            return None;
        }
        self.sheets
            .push(Sheet::with_grid(name, Grid::with_dimensions(self.rows, self.cols)));
        Some(self.sheets.len() - 1)
    }

    /// Make the sheet at `index` current. Out-of-range indices are ignored.
    pub fn switch_to(&mut self, index: usize) -> bool {
        if index < self.sheets.len() {
            self.current = index;
            true
        } else {
            false
        }
    }

    /// Case-insensitive, trimmed lookup; the first match wins.
    pub fn find_by_name(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.matches_name(name))
    }

    pub fn position_by_name(&self, name: &str) -> Option<usize> {
        self.sheets.iter().position(|s| s.matches_name(name))
    }

    /// Set a cell on the current sheet from raw text.
    ///
    /// Formulas are evaluated once, here, against the workbook as it is
    /// before the write. Other formula cells are not re-evaluated.
    pub fn set_cell_value(&mut self, row: usize, col: usize, text: Option<&str>) -> bool {
        // Built against `&self` first so the formula can read this workbook
        let evaluate = |body: &str, r: usize, c: usize| self.evaluate_formula(body, r, c);
        let Some(cell) = self.current_sheet().grid().build_cell(row, col, text, Some(&evaluate))
        else {
            debug!(row, col, "ignoring write outside the sheet or without text");
            return false;
        };
        self.current_sheet_mut().grid_mut().put(row, col, cell)
    }

    /// Evaluate a formula body as if written at (row, col) of the current
    /// sheet, without storing anything.
    pub fn evaluate_formula(&self, body: &str, row: usize, col: usize) -> FormulaValue {
        match &self.evaluator {
            Some(evaluator) => evaluator.evaluate(body, row, col, self),
            None => FormulaValue::Error(ErrorToken::NoEvaluator),
        }
    }

    pub fn get_cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.current_sheet().grid().get_cell(row, col)
    }

    /// The text to edit: the formula if the cell has one, else its content.
    pub fn get_cell_content(&self, row: usize, col: usize) -> String {
        match self.get_cell(row, col) {
            Some(cell) if !cell.formula().is_empty() => cell.formula().to_string(),
            Some(cell) => cell.content().to_string(),
            None => String::new(),
        }
    }

    pub fn get_cell_value(&self, row: usize, col: usize) -> CellValue {
        self.get_cell(row, col)
            .map(|cell| cell.value())
            .unwrap_or(CellValue::Empty)
    }

    /// Numeric value of a cell on a named sheet; 0.0 when the sheet or cell is
    /// missing or the value is not numeric.
    pub fn sheet_value(&self, sheet_name: &str, row: usize, col: usize) -> f64 {
        self.find_by_name(sheet_name)
            .and_then(|sheet| sheet.grid().get_cell(row, col))
            .and_then(|cell| cell.numeric_value())
            .unwrap_or(0.0)
    }
}

impl WorkbookAccess for Workbook {
    fn current_sheet(&self) -> Option<&Sheet> {
        self.sheets.get(self.current)
    }

    fn find_sheet(&self, name: &str) -> Option<&Sheet> {
        self.find_by_name(name)
    }
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_workbook_has_default_sheet() {
        let wb = Workbook::new();
        assert_eq!(wb.sheet_names(), vec!["Sheet 1"]);
        assert_eq!(wb.current_index(), 0);
        assert!(wb.has_evaluator());
    }

    #[test]
    fn test_add_sheet_rejects_blank_names() {
        let mut wb = Workbook::new();
        assert_eq!(wb.add_sheet("   "), None);
        assert_eq!(wb.add_sheet(""), None);
        assert_eq!(wb.add_sheet("Data"), Some(1));
        assert_eq!(wb.sheet_count(), 2);
    }

    #[test]
    fn test_duplicate_names_tolerated_first_match_wins() {
        let mut wb = Workbook::new();
        wb.add_sheet("Data");
        wb.add_sheet("DATA");
        wb.switch_to(1);
        wb.set_cell_value(0, 0, Some("1"));
        wb.switch_to(2);
        wb.set_cell_value(0, 0, Some("2"));
        assert_eq!(wb.sheet_count(), 3);
        assert_eq!(wb.position_by_name(" data "), Some(1));
        assert_eq!(wb.sheet_value("data", 0, 0), 1.0);
    }

    #[test]
    fn test_switch_out_of_range_is_noop() {
        let mut wb = Workbook::new();
        wb.add_sheet("Two");
        assert!(wb.switch_to(1));
        assert!(!wb.switch_to(2));
        assert!(!wb.switch_to(usize::MAX));
        assert_eq!(wb.current_index(), 1);
    }

    #[test]
    fn test_with_layout_applies_to_added_sheets() {
        let mut wb = Workbook::with_layout("Main", 5, 3);
        wb.add_sheet("Other");
        assert_eq!(wb.sheet_names(), vec!["Main", "Other"]);
        for sheet in wb.sheets() {
            assert_eq!(sheet.grid().dimensions(), (5, 3));
        }
        assert_eq!(Workbook::with_layout("  ", 2, 2).sheet_names(), vec!["Sheet 1"]);
    }

    #[test]
    fn test_oversized_layout_is_shrunk() {
        let mut wb = Workbook::with_layout("Big", usize::MAX, 2);
        let (rows, cols) = wb.current_sheet().grid().dimensions();
        assert!(Grid::extent_fits(rows, cols));
        wb.add_sheet("Next");
        assert_eq!(wb.sheet(1).unwrap().grid().dimensions(), (rows, cols));
    }

    #[test]
    fn test_detached_evaluator_stores_token() {
        let mut wb = Workbook::new();
        wb.detach_evaluator();
        wb.set_cell_value(0, 0, Some("=sum((1,1),(1,2))"));
        assert_eq!(wb.get_cell_value(0, 0), CellValue::Error(ErrorToken::NoEvaluator));
        wb.attach_evaluator(FormulaEvaluator::new());
        wb.set_cell_value(0, 0, Some("=sum((1,2),(1,3))"));
        assert_eq!(wb.get_cell_value(0, 0), CellValue::Number(0.0));
    }

    #[test]
    fn test_get_cell_content_prefers_formula() {
        let mut wb = Workbook::new();
        wb.set_cell_value(0, 0, Some("12"));
        wb.set_cell_value(0, 1, Some("=mult((1,1),(1,1))"));
        assert_eq!(wb.get_cell_content(0, 0), "12");
        assert_eq!(wb.get_cell_content(0, 1), "=mult((1,1),(1,1))");
        assert_eq!(wb.get_cell_content(99, 0), "");
        assert_eq!(wb.get_cell_value(99, 0), CellValue::Empty);
    }

    #[test]
    fn test_sheet_value_defaults_to_zero() {
        let mut wb = Workbook::new();
        wb.set_cell_value(0, 0, Some("text"));
        assert_eq!(wb.sheet_value("Sheet 1", 0, 0), 0.0);
        assert_eq!(wb.sheet_value("missing", 0, 0), 0.0);
    }

    #[test]
    fn test_from_sheets_requires_a_sheet() {
        assert!(Workbook::from_sheets(Vec::new(), 0).is_none());
        let wb = Workbook::from_sheets(vec![Sheet::new("A"), Sheet::new("B")], 7).unwrap();
        assert_eq!(wb.current_index(), 0);
    }
}
