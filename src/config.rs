//! Optional user configuration (`config.toml`).

use directories::ProjectDirs;
use serde::Deserialize;
use sheetline_core::SheetLayout;
use sheetline_engine::engine::{DEFAULT_COLS, DEFAULT_ROWS, Grid, MAX_CELLS};
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    rows: Option<usize>,
    cols: Option<usize>,
    first_sheet: Option<String>,
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "sheetline")?;
    Some(proj.config_dir().join("config.toml"))
}

/// Load the sheet layout from `explicit`, or from the user config file when
/// none is given. Problems are returned as warnings and never abort; the
/// affected keys keep their defaults.
pub fn load_layout(explicit: Option<&Path>) -> (SheetLayout, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let mut layout = SheetLayout::default();

    let Some(path) = explicit.map(Path::to_path_buf).or_else(user_config_path) else {
        return (layout, warnings);
    };

    if !path.exists() {
        if explicit.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (layout, warnings);
    }

    let file = match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str::<ConfigFile>(&content) {
            Ok(parsed) => parsed,
            Err(err) => {
                warnings.push(format!("Failed to parse {}: {}", path.display(), err));
                return (layout, warnings);
            }
        },
        Err(err) => {
            warnings.push(format!("Failed to read {}: {}", path.display(), err));
            return (layout, warnings);
        }
    };

    match file.rows {
        Some(0) => warnings.push("Config: rows must be at least 1".to_string()),
        Some(rows) => layout.rows = rows,
        None => {}
    }
    match file.cols {
        Some(0) => warnings.push("Config: cols must be at least 1".to_string()),
        Some(cols) => layout.cols = cols,
        None => {}
    }
    if !Grid::extent_fits(layout.rows, layout.cols) {
        warnings.push(format!(
            "Config: {}x{} sheets exceed {} cells, using {}x{}",
            layout.rows, layout.cols, MAX_CELLS, DEFAULT_ROWS, DEFAULT_COLS
        ));
        layout.rows = DEFAULT_ROWS;
        layout.cols = DEFAULT_COLS;
    }
    match file.first_sheet {
        Some(name) if name.trim().is_empty() => {
            warnings.push("Config: first_sheet must not be blank".to_string())
        }
        Some(name) => layout.first_sheet = name,
        None => {}
    }

    (layout, warnings)
}
