//! Error types for Sheetline core.

use thiserror::Error;

/// Errors that can occur in the Sheetline application
#[derive(Error, Debug)]
pub enum SheetlineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Workbook file contains no sheets")]
    EmptyWorkbook,

    #[error("No file path set")]
    NoFilePath,

    #[error("No sheet named '{0}'")]
    UnknownSheet(String),
}

pub type Result<T> = std::result::Result<T, SheetlineError>;
