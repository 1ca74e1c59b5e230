//! Spreadsheet engine API.
//!
//! This module provides the core computation engine for the spreadsheet:
//!
//! - [`Cell`], [`CellType`], [`Grid`] - Data structures for cell storage
//! - [`Sheet`], [`Workbook`] - Named grids and the ordered collection of them
//! - [`CellRef`] - Coordinates (1-indexed formula text ↔ row/col indices)
//! - [`FormulaEvaluator`] - Evaluate `sum(...)` / `mult(...)` formulas
//! - [`parse_formula`] - Tokenize a formula body without evaluating it
//! - [`format_number`] - Format values for display

mod cell;
mod cell_ref;
mod format;
mod formula;
mod grid;
mod sheet;
mod workbook;

pub use cell::{Cell, CellKind, CellType, CellValue, ErrorToken, FORMULA_MARKER, FormulaValue};
pub use cell_ref::CellRef;
pub use format::format_number;
pub use formula::{FormulaArgs, FormulaEvaluator, ParsedFormula, WorkbookAccess, parse_formula};
pub use grid::{DEFAULT_COLS, DEFAULT_ROWS, Grid, MAX_CELLS};
pub use sheet::Sheet;
pub use workbook::{DEFAULT_SHEET_NAME, Workbook};

pub use crate::builtins::Aggregate;
