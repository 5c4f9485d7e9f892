//! Output formatting for subnet data.
//!
//! This module handles formatting and outputting the partition:
//! - [`csv`] - CSV export
//! - [`json`] - JSON export
//! - [`export`] - shared export columns and file writing
//! - [`terminal`] - aligned table with hierarchy columns

mod csv;
mod export;
mod json;
mod terminal;

pub use csv::{escape_csv_field, to_csv};
pub use export::{
    default_export_path, export_headers, export_value, write_export, ExportFormat,
};
pub use json::to_json;
pub use terminal::{format_field, render_table};
