//! Cell coordinates.
//!
//! Internally every cell is addressed by a zero-indexed `(row, col)` pair.
//! Formula text and the command line use the 1-indexed `(r,c)` form, so this
//! module owns the translation between the two.
//!
//! # Examples
//!
//! ```ignore
//! let cell = CellRef::parse_pair("(2,3)").unwrap();
//! assert_eq!(cell.row, 1);  // 0-indexed
//! assert_eq!(cell.col, 2);
//! assert_eq!(cell.to_string(), "(2,3)");
//! ```

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// A reference to a cell by row and column indices (0-indexed).
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(row: usize, col: usize) -> CellRef {
        CellRef { row, col }
    }

    /// Convert a 1-indexed formula coordinate into a cell reference.
    /// Returns None when either component is below 1.
    pub fn from_formula_pair(row: i64, col: i64) -> Option<CellRef> {
        let row = usize::try_from(row.checked_sub(1)?).ok()?;
        let col = usize::try_from(col.checked_sub(1)?).ok()?;
        Some(CellRef::new(row, col))
    }

    /// Parse a 1-indexed `r,c` pair, optionally wrapped in parentheses.
    pub fn parse_pair(text: &str) -> Option<CellRef> {
        let caps = pair_re().captures(text)?;
        let row = caps["row"].parse::<i64>().ok()?;
        let col = caps["col"].parse::<i64>().ok()?;
        CellRef::from_formula_pair(row, col)
    }
}

fn pair_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*\(?\s*(?<row>-?[0-9]+)\s*,\s*(?<col>-?[0-9]+)\s*\)?\s*$")
            .expect("cell pair regex must compile")
    })
}

impl std::str::FromStr for CellRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CellRef::parse_pair(s).ok_or_else(|| format!("Invalid cell reference: {}", s))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row + 1, self.col + 1)
    }
}
