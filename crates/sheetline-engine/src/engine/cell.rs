//! Cell data structures for the spreadsheet grid.
//!
//! This module provides the core data types for representing cells:
//! - [`ErrorToken`] - Error indicator stored in place of a formula result
//! - [`FormulaValue`] - The cached outcome of evaluating a formula
//! - [`CellType`] - The tagged content of a cell (empty, text, number, or formula)
//! - [`Cell`] - A cell with its verbatim input and derived contents
//! - [`CellValue`] / [`CellKind`] - Read-side views used by callers

use thiserror::Error;

use super::format::format_number;

/// Marker that turns a cell's raw text into a formula.
pub const FORMULA_MARKER: char = '=';

/// A formula outcome that is not a number.
///
/// Error tokens are stored as cell values; they never abort an operation.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorToken {
    /// The formula keyword is not `sum`, `multiplication` or `mult`.
    #[error("#ERROR: unrecognized formula")]
    Unrecognized,
    /// A formula was written while no evaluator was attached.
    #[error("#ERROR: no evaluator")]
    NoEvaluator,
}

/// The cached result of a formula cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FormulaValue {
    Number(f64),
    Error(ErrorToken),
}

impl FormulaValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FormulaValue::Number(n) => Some(*n),
            FormulaValue::Error(_) => None,
        }
    }
}

/// The type of content stored in a cell.
#[derive(Clone, Debug, PartialEq)]
pub enum CellType {
    Empty,
    Text(String),
    Number(f64),
    /// `text` keeps the leading `=` marker.
    Formula { text: String, cached: FormulaValue },
}

/// Discriminant of [`CellType`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
    Number,
    Text,
    Formula,
    Empty,
}

/// Derived value of a cell, as shown to the user.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Error(ErrorToken),
}

/// A cell in the spreadsheet grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    content: String,
    contents: CellType,
}

impl Cell {
    pub const fn new_empty() -> Cell {
        Cell {
            content: String::new(),
            contents: CellType::Empty,
        }
    }

    /// Create a formula cell from its full text (including `=`) and a
    /// previously computed result.
    pub fn new_formula(text: &str, cached: FormulaValue) -> Cell {
        Cell {
            content: text.to_string(),
            contents: CellType::Formula {
                text: text.to_string(),
                cached,
            },
        }
    }

    /// Parse user input and create the appropriate cell.
    /// - Starts with '=' -> Formula, `evaluate` receives the text after '='
    /// - Finite decimal number (surrounding whitespace ignored) -> Number
    /// - Empty or whitespace -> Empty
    /// - Otherwise -> Text
    ///
    /// The input is always retained verbatim as the cell's content.
    pub fn from_input<F>(input: &str, evaluate: F) -> Cell
    where
        F: FnOnce(&str) -> FormulaValue,
    {
        if let Some(body) = input.strip_prefix(FORMULA_MARKER) {
            return Cell::new_formula(input, evaluate(body));
        }

        let trimmed = input.trim();
        let contents = if let Some(n) = parse_number(trimmed) {
            CellType::Number(n)
        } else if trimmed.is_empty() {
            CellType::Empty
        } else {
            CellType::Text(input.to_string())
        };

        Cell {
            content: input.to_string(),
            contents,
        }
    }

    /// The raw text the user entered.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn contents(&self) -> &CellType {
        &self.contents
    }

    /// The formula text including its `=` marker, or "" for non-formula cells.
    pub fn formula(&self) -> &str {
        match &self.contents {
            CellType::Formula { text, .. } => text,
            _ => "",
        }
    }

    pub fn kind(&self) -> CellKind {
        match &self.contents {
            CellType::Empty => CellKind::Empty,
            CellType::Text(_) => CellKind::Text,
            CellType::Number(_) => CellKind::Number,
            CellType::Formula { .. } => CellKind::Formula,
        }
    }

    pub fn value(&self) -> CellValue {
        match &self.contents {
            CellType::Empty => CellValue::Empty,
            CellType::Text(s) => CellValue::Text(s.clone()),
            CellType::Number(n) => CellValue::Number(*n),
            CellType::Formula { cached, .. } => match cached {
                FormulaValue::Number(n) => CellValue::Number(*n),
                FormulaValue::Error(token) => CellValue::Error(*token),
            },
        }
    }

    /// The cell's value if it is numeric. Formula cells count through their
    /// cached result; the raw text is never re-parsed here.
    pub fn numeric_value(&self) -> Option<f64> {
        match &self.contents {
            CellType::Number(n) => Some(*n),
            CellType::Formula { cached, .. } => cached.as_number(),
            CellType::Empty | CellType::Text(_) => None,
        }
    }

    /// Get a display string for the cell's derived value.
    pub fn display(&self) -> String {
        match self.value() {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s,
            CellValue::Number(n) => format_number(n),
            CellValue::Error(token) => token.to_string(),
        }
    }
}

/// Parse a finite decimal literal. Words such as `nan` or `inf`, which the
/// `f64` grammar accepts, stay text.
fn parse_number(text: &str) -> Option<f64> {
    if !text.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

impl Default for Cell {
    fn default() -> Self {
        Cell::new_empty()
    }
}
