//! Export columns and file writing shared by the CSV and JSON writers.

use super::csv::to_csv;
use super::json::to_json;
use crate::config::DisplayOptions;
use crate::models::{format_address, SubnetDescriptor};
use serde_json::Value;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const H_NAME: &str = "Subnet Name";
pub const H_ADDRESS: &str = "Subnet Address";
pub const H_NETMASK: &str = "Netmask";
pub const H_RANGE: &str = "Range";
pub const H_USABLE: &str = "Useable IPs";
pub const H_HOSTS: &str = "Hosts";
pub const H_NETWORK: &str = "Network Address";
pub const H_BROADCAST: &str = "Broadcast Address";
pub const H_FIRST: &str = "First Usable IP";
pub const H_LAST: &str = "Last Usable IP";
pub const H_TOTAL: &str = "Total Hosts";

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("Unknown export format '{other}' (csv or json)")),
        }
    }
}

/// Column headers for the visible columns, in export order.
pub fn export_headers(options: &DisplayOptions) -> Vec<&'static str> {
    let mut headers = Vec::new();
    if options.show_subnet_name {
        headers.push(H_NAME);
    }
    headers.push(H_ADDRESS);
    if options.show_netmask {
        headers.push(H_NETMASK);
    }
    if options.show_range {
        headers.push(H_RANGE);
    }
    if options.show_usable_ips {
        headers.push(H_USABLE);
    }
    if options.show_hosts {
        headers.push(H_HOSTS);
    }
    headers.extend([H_NETWORK, H_BROADCAST, H_FIRST, H_LAST, H_TOTAL]);
    headers
}

/// Cell value of one subnet under `header`. Counts stay numeric.
pub fn export_value(subnet: &SubnetDescriptor, header: &str) -> Value {
    match header {
        H_NAME => Value::from(subnet.name().unwrap_or("")),
        H_ADDRESS => Value::from(subnet.cidr().to_string()),
        H_NETMASK => Value::from(subnet.subnet_mask()),
        H_RANGE => Value::from(subnet.host_address_range()),
        H_USABLE => Value::from(subnet.usable_host_range()),
        H_HOSTS => Value::from(subnet.usable_hosts()),
        H_NETWORK => Value::from(format_address(subnet.network_address())),
        H_BROADCAST => Value::from(format_address(subnet.broadcast_address())),
        H_FIRST => Value::from(subnet.first_usable_text()),
        H_LAST => Value::from(subnet.last_usable_text()),
        H_TOTAL => Value::from(subnet.total_hosts()),
        _ => Value::Null,
    }
}

/// `cidr-flow-subnets_<date>.<ext>` inside `dir`.
pub fn default_export_path(dir: &Path, format: ExportFormat) -> PathBuf {
    let today = chrono::Local::now().format("%Y-%m-%d");
    dir.join(format!("cidr-flow-subnets_{today}.{}", format.extension()))
}

/// Render the subnets in `format` and write them to `path`.
pub fn write_export(
    subnets: &[SubnetDescriptor],
    options: &DisplayOptions,
    format: ExportFormat,
    path: &Path,
) -> Result<(), Box<dyn Error>> {
    let body = match format {
        ExportFormat::Csv => to_csv(subnets, options),
        ExportFormat::Json => to_json(subnets, options)?,
    };
    std::fs::write(path, body).map_err(|e| format!("Error writing {}: {e}", path.display()))?;
    log::info!(
        "Exported {} subnets to {}",
        subnets.len(),
        path.display()
    );
    Ok(())
}
