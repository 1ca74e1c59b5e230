//! Aggregate formula parsing and evaluation.
//!
//! A formula body (the text after `=`) has the shape `keyword(args)` where
//! the keyword selects an [`Aggregate`] and `args` is one of:
//!
//! - a cell list `(r1,c1),(r2,c2),...` read from the current sheet
//! - a range `sheet,(r1,c1),(r2,c2)` read from the named sheet
//!
//! Coordinates are 1-indexed in formula text. Operands that are out of
//! bounds or not numeric are skipped. Malformed arguments and missing sheets
//! fold nothing and produce the aggregate's identity; only an unknown keyword
//! produces an [`ErrorToken`].

use tracing::debug;

use super::cell::{ErrorToken, FormulaValue};
use super::cell_ref::CellRef;
use super::sheet::Sheet;
use crate::builtins::{
    Aggregate, list_separator_re, match_builtin, punctuation_space_re, range_args_re,
};

/// Read access to the sheets a formula can reach.
pub trait WorkbookAccess {
    /// The sheet cell-list formulas read from.
    fn current_sheet(&self) -> Option<&Sheet>;

    /// Case-insensitive, trimmed lookup; the first match wins.
    fn find_sheet(&self, name: &str) -> Option<&Sheet>;
}

/// Arguments of an aggregate formula, with coordinates still 1-indexed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormulaArgs {
    CellList(Vec<(i64, i64)>),
    Range {
        sheet: String,
        start: (i64, i64),
        end: (i64, i64),
    },
    Malformed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedFormula {
    pub aggregate: Aggregate,
    pub args: FormulaArgs,
}

/// Tokenize a formula body into its aggregate and argument shape.
///
/// Keywords and sheet names are lower-cased; whitespace next to `(`, `)` and
/// `,` is dropped.
pub fn parse_formula(body: &str) -> Result<ParsedFormula, ErrorToken> {
    let lowered = body.trim().to_lowercase();
    let normalized = punctuation_space_re().replace_all(&lowered, "$1");

    let (aggregate, rest) = match_builtin(&normalized).ok_or(ErrorToken::Unrecognized)?;
    let args = match rest.strip_suffix(')') {
        Some(inner) => parse_args(inner),
        None => FormulaArgs::Malformed,
    };

    Ok(ParsedFormula { aggregate, args })
}

fn parse_args(args: &str) -> FormulaArgs {
    if args.contains("),(") {
        if let Some(pairs) = parse_cell_list(args) {
            return FormulaArgs::CellList(pairs);
        }
    }

    if let Some(caps) = range_args_re().captures(args) {
        let sheet = caps[1]
            .trim()
            .trim_start_matches('(')
            .trim_end_matches(')')
            .to_string();
        let number = |group: usize| caps[group].parse::<i64>().ok();
        if let (Some(r1), Some(c1), Some(r2), Some(c2)) = (number(2), number(3), number(4), number(5))
        {
            return FormulaArgs::Range {
                sheet,
                start: (r1, c1),
                end: (r2, c2),
            };
        }
    }

    FormulaArgs::Malformed
}

fn parse_cell_list(args: &str) -> Option<Vec<(i64, i64)>> {
    list_separator_re()
        .split(args)
        .map(|part| {
            let stripped: String = part.chars().filter(|c| *c != '(' && *c != ')').collect();
            let (row, col) = stripped.split_once(',')?;
            Some((row.trim().parse().ok()?, col.trim().parse().ok()?))
        })
        .collect()
}

/// Stateless evaluator for aggregate formulas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FormulaEvaluator;

impl FormulaEvaluator {
    pub fn new() -> FormulaEvaluator {
        FormulaEvaluator
    }

    /// Evaluate `body` (formula text without `=`) written at
    /// (`origin_row`, `origin_col`) against the sheets reachable via `ctx`.
    pub fn evaluate(
        &self,
        body: &str,
        origin_row: usize,
        origin_col: usize,
        ctx: &dyn WorkbookAccess,
    ) -> FormulaValue {
        debug!(origin = %CellRef::new(origin_row, origin_col), formula = body, "evaluating formula");

        let parsed = match parse_formula(body) {
            Ok(parsed) => parsed,
            Err(token) => {
                debug!(formula = body, "unrecognized formula keyword");
                return FormulaValue::Error(token);
            }
        };

        let result = match &parsed.args {
            FormulaArgs::CellList(pairs) => fold_cell_list(parsed.aggregate, pairs, ctx),
            FormulaArgs::Range { sheet, start, end } => {
                fold_range(parsed.aggregate, sheet, *start, *end, ctx)
            }
            FormulaArgs::Malformed => {
                debug!(formula = body, "malformed formula arguments");
                parsed.aggregate.identity()
            }
        };

        debug!(result, "formula evaluated");
        FormulaValue::Number(result)
    }
}

fn fold_cell_list(aggregate: Aggregate, pairs: &[(i64, i64)], ctx: &dyn WorkbookAccess) -> f64 {
    let Some(sheet) = ctx.current_sheet() else {
        return aggregate.identity();
    };

    pairs
        .iter()
        .filter_map(|&(r, c)| CellRef::from_formula_pair(r, c))
        .filter_map(|cell_ref| sheet.grid().get_cell(cell_ref.row, cell_ref.col))
        .filter_map(|cell| cell.numeric_value())
        .fold(aggregate.identity(), |acc, n| aggregate.fold(acc, n))
}

fn fold_range(
    aggregate: Aggregate,
    sheet_name: &str,
    start: (i64, i64),
    end: (i64, i64),
    ctx: &dyn WorkbookAccess,
) -> f64 {
    let Some(sheet) = ctx.find_sheet(sheet_name) else {
        debug!(sheet = sheet_name, "range formula references a missing sheet");
        return aggregate.identity();
    };

    let grid = sheet.grid();
    let max_row = grid.rows() as i64 - 1;
    let max_col = grid.cols() as i64 - 1;
    let row1 = (start.0 - 1).max(0);
    let col1 = (start.1 - 1).max(0);
    let row2 = (end.0 - 1).min(max_row);
    let col2 = (end.1 - 1).min(max_col);

    debug!(sheet = sheet.name(), row1, col1, row2, col2, "folding clamped range");

    let mut acc = aggregate.identity();
    for row in row1..=row2 {
        for col in col1..=col2 {
            if let Some(n) = grid
                .get_cell(row as usize, col as usize)
                .and_then(|cell| cell.numeric_value())
            {
                acc = aggregate.fold(acc, n);
            }
        }
    }
    acc
}
