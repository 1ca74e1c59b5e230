use super::Document;
use crate::error::{Result, SheetlineError};
use crate::storage::{parse_grd, write_csv, write_grd, write_markdown};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

impl Document {
    /// Save to current file path.
    /// Returns the path saved to.
    pub fn save_file(&mut self) -> Result<PathBuf> {
        let Some(path) = &self.file_path else {
            return Err(SheetlineError::NoFilePath);
        };

        if let Err(err) = write_grd(path, &self.workbook) {
            warn!(path = %path.display(), error = %err, "save failed");
            return Err(err);
        }
        info!(path = %path.display(), "workbook saved");
        self.modified = false;
        Ok(path.clone())
    }

    /// Save to `path` and make it the current file path.
    pub fn save_as(&mut self, path: &Path) -> Result<PathBuf> {
        let previous = self.file_path.replace(path.to_path_buf());
        let saved = self.save_file();
        if saved.is_err() {
            self.file_path = previous;
        }
        saved
    }

    /// Load from file.
    ///
    /// The whole file is parsed before anything is replaced, so on error the
    /// current workbook and file path are left untouched.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let mut workbook = match parse_grd(path) {
            Ok(workbook) => workbook,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "load failed");
                return Err(err);
            }
        };

        if !self.workbook.has_evaluator() {
            workbook.detach_evaluator();
        }

        self.workbook = workbook;
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        info!(
            path = %path.display(),
            sheets = self.workbook.sheet_count(),
            "workbook loaded"
        );
        Ok(())
    }

    /// Export the current sheet as a markdown table
    pub fn export_markdown(&self, path: &Path) -> Result<()> {
        write_markdown(path, self).map_err(|err| {
            warn!(path = %path.display(), error = %err, "markdown export failed");
            SheetlineError::Io(err)
        })
    }

    /// Export the current sheet's display values as CSV
    pub fn export_csv(&self, path: &Path) -> Result<()> {
        write_csv(path, self).inspect_err(|err| {
            warn!(path = %path.display(), error = %err, "csv export failed");
        })
    }
}
