//! sheetline-core - UI-agnostic document model + storage.

pub mod document;
pub mod error;
pub mod storage;

pub use document::{Document, SheetLayout};
pub use error::{Result, SheetlineError};

pub use sheetline_engine::engine::{CellRef, Workbook};
