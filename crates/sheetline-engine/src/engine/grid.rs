//! Fixed-extent cell storage for one sheet.
//!
//! Cells live in a flat row-major arena and are created lazily on first
//! write. Addressing is purely positional; cells know nothing about their
//! neighbours.

use super::cell::{Cell, ErrorToken, FormulaValue};
use super::cell_ref::CellRef;

pub const DEFAULT_ROWS: usize = 20;
pub const DEFAULT_COLS: usize = 20;
/// Largest number of cells a single grid may hold.
pub const MAX_CELLS: usize = 1 << 18;

static EMPTY_CELL: Cell = Cell::new_empty();

/// A rows × cols grid of cells addressed by zero-based (row, col).
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Option<Cell>>,
}

impl Grid {
    pub fn new() -> Grid {
        Grid::with_dimensions(DEFAULT_ROWS, DEFAULT_COLS)
    }

    /// Create a `rows` × `cols` grid. Extents holding more than
    /// [`MAX_CELLS`] cells are shrunk to fit; callers taking extents from
    /// untrusted input should check [`Grid::extent_fits`] first.
    pub fn with_dimensions(rows: usize, cols: usize) -> Grid {
        let (rows, cols) = if Grid::extent_fits(rows, cols) {
            (rows, cols)
        } else {
            let rows = rows.min(MAX_CELLS);
            (rows, cols.min(MAX_CELLS / rows.max(1)))
        };
        let mut cells = Vec::new();
        cells.resize_with(rows * cols, || None);
        Grid { rows, cols, cells }
    }

    /// Whether a `rows` × `cols` grid stays within [`MAX_CELLS`].
    pub fn extent_fits(rows: usize, cols: usize) -> bool {
        rows.checked_mul(cols).is_some_and(|n| n <= MAX_CELLS)
    }

    /// (rows, cols)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        self.in_bounds(row, col).then(|| row * self.cols + col)
    }

    /// Get the cell at (row, col). Never-written in-bounds cells read as
    /// empty; out-of-bounds addresses yield None.
    pub fn get_cell(&self, row: usize, col: usize) -> Option<&Cell> {
        let idx = self.index(row, col)?;
        Some(self.cells[idx].as_ref().unwrap_or(&EMPTY_CELL))
    }

    /// Build the cell that raw `text` would produce at (row, col), without
    /// storing it.
    ///
    /// Formula text (leading `=`) is handed to `evaluator` together with the
    /// cell's coordinate. Without an evaluator the cell holds
    /// [`ErrorToken::NoEvaluator`]. Returns None when the address is out of
    /// bounds or `text` is None.
    pub fn build_cell(
        &self,
        row: usize,
        col: usize,
        text: Option<&str>,
        evaluator: Option<&dyn Fn(&str, usize, usize) -> FormulaValue>,
    ) -> Option<Cell> {
        let text = text?;
        if !self.in_bounds(row, col) {
            return None;
        }
        Some(Cell::from_input(text, |body| match evaluator {
            Some(eval) => eval(body, row, col),
            None => FormulaValue::Error(ErrorToken::NoEvaluator),
        }))
    }

    /// Store an already-built cell. Returns false when out of bounds.
    pub fn put(&mut self, row: usize, col: usize, cell: Cell) -> bool {
        match self.index(row, col) {
            Some(idx) => {
                self.cells[idx] = Some(cell);
                true
            }
            None => false,
        }
    }

    /// Iterate written cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (CellRef, &Cell)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(idx, slot)| {
                slot.as_ref()
                    .map(|cell| (CellRef::new(idx / cols, idx % cols), cell))
            })
    }
}

impl Default for Grid {
    fn default() -> Self {
        Grid::new()
    }
}
