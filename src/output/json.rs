//! JSON output formatting for subnet data.

use super::export::{export_headers, export_value};
use crate::config::DisplayOptions;
use crate::models::SubnetDescriptor;
use serde_json::{Map, Value};

/// Render the subnets as a pretty-printed JSON array keyed by column header.
pub fn to_json(
    subnets: &[SubnetDescriptor],
    options: &DisplayOptions,
) -> Result<String, serde_json::Error> {
    let headers = export_headers(options);
    let rows: Vec<Value> = subnets
        .iter()
        .map(|subnet| {
            let row: Map<String, Value> = headers
                .iter()
                .map(|h| (h.to_string(), export_value(subnet, h)))
                .collect();
            Value::Object(row)
        })
        .collect();
    serde_json::to_string_pretty(&rows)
}
