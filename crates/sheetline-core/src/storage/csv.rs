//! CSV export functionality

use crate::document::Document;
use crate::error::Result;
use sheetline_engine::engine::CellRef;
use std::io::Write;
use std::path::Path;

/// Export the current sheet's display values to a CSV file.
/// The output covers the written cells; an empty sheet produces an empty file.
pub fn write_csv(path: &Path, doc: &Document) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(render_csv(doc).as_bytes())?;
    Ok(())
}

pub fn render_csv(doc: &Document) -> String {
    let Some((min, max)) = doc.used_bounds() else {
        return String::new();
    };

    let mut out = String::new();
    for row in min.row..=max.row {
        let row_fields: Vec<String> = (min.col..=max.col)
            .map(|col| escape_csv_field(&doc.cell_display(&CellRef::new(row, col))))
            .collect();
        out.push_str(&row_fields.join(","));
        out.push('\n');
    }
    out
}

/// Escape a field for CSV output
fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_csv_field() {
        assert_eq!(escape_csv_field("plain"), "plain");
        assert_eq!(escape_csv_field("a,b"), "\"a,b\"");
        assert_eq!(escape_csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_render_csv_uses_display_values() {
        let mut doc = Document::default();
        doc.set_cell_from_input(CellRef::new(0, 0), "1.50");
        doc.set_cell_from_input(CellRef::new(0, 2), "x, y");
        doc.set_cell_from_input(CellRef::new(1, 1), "=sum((1,1),(1,1))");
        assert_eq!(render_csv(&doc), "1.5,,\"x, y\"\n,3,\n");
    }

    #[test]
    fn test_render_csv_empty_sheet() {
        assert_eq!(render_csv(&Document::default()), "");
    }
}
