//! File formats: the .grd workbook snapshot plus markdown and CSV export.

pub mod csv;
pub mod md;
mod parser;
mod writer;

pub use csv::write_csv;
pub use md::write_markdown;
pub use parser::{parse_grd, parse_grd_content};
pub use writer::{write_grd, write_grd_content};
