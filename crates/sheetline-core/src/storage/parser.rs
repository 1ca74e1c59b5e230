//! Parser for .grd workbook snapshots

use super::writer::{NO_EVALUATOR_TAG, UNRECOGNIZED_TAG};
use crate::error::{Result, SheetlineError};
use regex::Regex;
use sheetline_engine::engine::{
    Cell, CellRef, ErrorToken, FORMULA_MARKER, FormulaValue, Grid, MAX_CELLS, Sheet, Workbook,
};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Parse a .grd file and return a Workbook
pub fn parse_grd(path: &Path) -> Result<Workbook> {
    let content = fs::read_to_string(path)?;
    parse_grd_content(&content)
}

/// Parse .grd content from a string
pub fn parse_grd_content(content: &str) -> Result<Workbook> {
    let mut sheets: Vec<Sheet> = Vec::new();
    let mut current: Option<(usize, usize)> = None;

    for (line_num, line) in content.lines().enumerate() {
        let line_num = line_num + 1;
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(value) = line.strip_prefix("current:") {
            let index = value.trim().parse::<usize>().map_err(|_| {
                parse_error(line_num, format!("Invalid current sheet index: {}", value.trim()))
            })?;
            current = Some((index, line_num));
            continue;
        }

        if line.starts_with("[sheet") {
            sheets.push(parse_sheet_header(line, line_num)?);
            continue;
        }

        let Some(sheet) = sheets.last_mut() else {
            return Err(parse_error(line_num, "Cell entry before any [sheet] header"));
        };

        // Parse "(r,c): "CONTENT"" with an optional " -> CACHED" suffix
        let Some((cell_ref_str, value_str)) = line.split_once(':') else {
            return Err(parse_error(line_num, "Expected '(r,c): \"content\"' format"));
        };
        let cell_ref_str = cell_ref_str.trim();
        let cell_ref = CellRef::parse_pair(cell_ref_str).ok_or_else(|| {
            parse_error(line_num, format!("Invalid cell reference: {}", cell_ref_str))
        })?;
        if !sheet.grid().in_bounds(cell_ref.row, cell_ref.col) {
            return Err(parse_error(
                line_num,
                format!("Cell {} is outside sheet '{}'", cell_ref, sheet.name()),
            ));
        }

        let cell = parse_cell_value(value_str.trim(), line_num)?;
        sheet.grid_mut().put(cell_ref.row, cell_ref.col, cell);
    }

    if sheets.is_empty() {
        return Err(SheetlineError::EmptyWorkbook);
    }

    let current = match current {
        Some((index, _)) if index < sheets.len() => index,
        Some((index, line_num)) => {
            return Err(parse_error(
                line_num,
                format!("Current sheet {} out of range ({} sheets)", index, sheets.len()),
            ));
        }
        None => 0,
    };

    Workbook::from_sheets(sheets, current).ok_or(SheetlineError::EmptyWorkbook)
}

fn parse_error(line: usize, message: impl Into<String>) -> SheetlineError {
    SheetlineError::Parse {
        line,
        message: message.into(),
    }
}

fn sheet_header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^\[sheet\s+(?<rows>[0-9]+)x(?<cols>[0-9]+)\]\s+"(?<name>(?:[^"\\]|\\.)*)"$"#)
            .expect("sheet header regex must compile")
    })
}

/// Parse `[sheet RxC] "name"` into an empty sheet
fn parse_sheet_header(line: &str, line_num: usize) -> Result<Sheet> {
    let caps = sheet_header_re().captures(line).ok_or_else(|| {
        parse_error(line_num, format!("Invalid sheet header: {}", line))
    })?;
    let rows = caps["rows"].parse::<usize>().ok();
    let cols = caps["cols"].parse::<usize>().ok();
    let (Some(rows), Some(cols)) = (rows, cols) else {
        return Err(parse_error(line_num, "Sheet dimensions out of range"));
    };
    if rows == 0 || cols == 0 {
        return Err(parse_error(line_num, "Sheet dimensions must be at least 1x1"));
    }
    if !Grid::extent_fits(rows, cols) {
        return Err(parse_error(
            line_num,
            format!("Sheet extent {}x{} exceeds {} cells", rows, cols, MAX_CELLS),
        ));
    }
    let name = unescape_grd_text(&caps["name"]);
    if name.trim().is_empty() {
        return Err(parse_error(line_num, "Sheet name must not be blank"));
    }
    Ok(Sheet::with_grid(&name, Grid::with_dimensions(rows, cols)))
}

/// Parse a quoted cell value, plus the cached result for formula cells
fn parse_cell_value(value: &str, line_num: usize) -> Result<Cell> {
    let Some((text, rest)) = split_quoted(value) else {
        return Err(parse_error(
            line_num,
            format!("Invalid value: {}. Cell content must be quoted.", value),
        ));
    };
    let text = unescape_grd_text(text);
    let rest = rest.trim();

    let cached = match rest.strip_prefix("->") {
        Some(cached) => Some(parse_cached(cached.trim(), line_num)?),
        None if rest.is_empty() => None,
        None => {
            return Err(parse_error(
                line_num,
                format!("Unexpected text after cell content: {}", rest),
            ));
        }
    };

    match (text.starts_with(FORMULA_MARKER), cached) {
        (true, Some(cached)) => Ok(Cell::new_formula(&text, cached)),
        (true, None) => Err(parse_error(line_num, "Formula cell is missing its cached value")),
        (false, Some(_)) => Err(parse_error(line_num, "Cached value on a non-formula cell")),
        // Loaded cells are never evaluated; only formulas carry a result
        (false, None) => Ok(Cell::from_input(&text, |_| {
            FormulaValue::Error(ErrorToken::NoEvaluator)
        })),
    }
}

fn parse_cached(value: &str, line_num: usize) -> Result<FormulaValue> {
    match value {
        UNRECOGNIZED_TAG => Ok(FormulaValue::Error(ErrorToken::Unrecognized)),
        NO_EVALUATOR_TAG => Ok(FormulaValue::Error(ErrorToken::NoEvaluator)),
        _ => value
            .parse::<f64>()
            .map(FormulaValue::Number)
            .map_err(|_| parse_error(line_num, format!("Invalid cached value: {}", value))),
    }
}

/// Split `"escaped text" rest` into the raw inner text and the remainder.
fn split_quoted(value: &str) -> Option<(&str, &str)> {
    let inner = value.strip_prefix('"')?;
    let mut escaped = false;
    for (idx, ch) in inner.char_indices() {
        match ch {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return Some((&inner[..idx], &inner[idx + 1..])),
            _ => {}
        }
    }
    None
}

fn unescape_grd_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                match next {
                    '\\' => out.push('\\'),
                    '"' => out.push('"'),
                    'n' => out.push('\n'),
                    'r' => out.push('\r'),
                    _ => {
                        out.push('\\');
                        out.push(next);
                    }
                }
            } else {
                out.push('\\');
            }
        } else {
            out.push(ch);
        }
    }
    out
}
