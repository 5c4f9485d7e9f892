//! CSV output formatting for subnet data.

use super::export::{export_headers, export_value};
use crate::config::DisplayOptions;
use crate::models::SubnetDescriptor;
use serde_json::Value;

/// Quote a CSV field if it holds a comma, quote or newline.
///
/// Embedded double quotes are doubled.
pub fn escape_csv_field(input: &str) -> String {
    if input.contains([',', '"', '\n']) {
        let escaped = input.replace('"', "\"\"");
        format!("\"{}\"", escaped)
    } else {
        input.to_string()
    }
}

fn quote_header(header: &str) -> String {
    format!("\"{}\"", header.replace('"', "\"\""))
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Render the subnets as CSV text, one header row then one row per subnet.
pub fn to_csv(subnets: &[SubnetDescriptor], options: &DisplayOptions) -> String {
    let headers = export_headers(options);
    let mut lines = Vec::with_capacity(subnets.len() + 1);
    lines.push(
        headers
            .iter()
            .map(|h| quote_header(h))
            .collect::<Vec<_>>()
            .join(","),
    );
    for subnet in subnets {
        lines.push(
            headers
                .iter()
                .map(|h| escape_csv_field(&cell_text(&export_value(subnet, h))))
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    lines.join("\n")
}
