use crate::error::Result;
use sheetline_engine::engine::{DEFAULT_COLS, DEFAULT_ROWS, DEFAULT_SHEET_NAME, Workbook};
use std::path::PathBuf;

/// Shape of a freshly created workbook.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetLayout {
    pub first_sheet: String,
    pub rows: usize,
    pub cols: usize,
}

impl Default for SheetLayout {
    fn default() -> Self {
        SheetLayout {
            first_sheet: DEFAULT_SHEET_NAME.to_string(),
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
        }
    }
}

/// UI-agnostic document state for one editing session.
pub struct Document {
    /// The workbook being edited
    pub workbook: Workbook,
    /// Current file path
    pub file_path: Option<PathBuf>,
    /// Whether the workbook has been modified since the last save/load
    pub modified: bool,
}

impl Document {
    /// Create a new document state.
    ///
    /// This constructor is side-effect free: it does not touch the filesystem.
    pub fn new(layout: SheetLayout) -> Self {
        Document {
            workbook: Workbook::with_layout(&layout.first_sheet, layout.rows, layout.cols),
            file_path: None,
            modified: false,
        }
    }

    /// Create a new document and load a file if provided.
    /// A path that does not exist yet is remembered as the save target.
    pub fn with_file(path: Option<PathBuf>, layout: SheetLayout) -> Result<Self> {
        let mut doc = Self::new(layout);

        if let Some(ref p) = path {
            if p.exists() {
                doc.load_file(p)?;
            } else {
                doc.file_path = Some(p.clone());
                doc.modified = false;
            }
        }
        Ok(doc)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(SheetLayout::default())
    }
}
