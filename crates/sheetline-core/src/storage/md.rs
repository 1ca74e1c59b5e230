//! Markdown export functionality

use crate::document::Document;
use sheetline_engine::engine::CellRef;
use std::io::Write;
use std::path::Path;

/// Write the current sheet to a markdown file
pub fn write_markdown(path: &Path, doc: &Document) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(render_markdown(doc).as_bytes())
}

/// Render the current sheet as a markdown table bounded by its written cells
pub fn render_markdown(doc: &Document) -> String {
    let mut out = String::new();
    let sheet_name = doc.workbook.current_sheet().name();
    out.push_str(&format!("# {}\n\n", escape_markdown(sheet_name)));

    let Some((min, max)) = doc.used_bounds() else {
        out.push_str("*Empty sheet*\n");
        return out;
    };

    // Column headers are 1-indexed, matching formula coordinates
    out.push_str("|   |");
    for col in min.col..=max.col {
        out.push_str(&format!(" {} |", col + 1));
    }
    out.push('\n');

    out.push_str("|---|");
    for _ in min.col..=max.col {
        out.push_str("---|");
    }
    out.push('\n');

    for row in min.row..=max.row {
        out.push_str(&format!("| {} |", row + 1));
        for col in min.col..=max.col {
            let display = doc.cell_display(&CellRef::new(row, col));
            out.push_str(&format!(" {} |", escape_markdown(&display)));
        }
        out.push('\n');
    }

    out
}

/// Escape special markdown characters in cell content
fn escape_markdown(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ").replace('\r', "")
}
