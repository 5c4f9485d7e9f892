//! Runtime configuration.
//!
//! Values come from the environment, after `.env` has been loaded by the
//! binary. Every setting has a default so an empty environment works.

use crate::models::NetworkInput;
use std::error::Error;
use std::path::PathBuf;

pub const ENV_NETWORK: &str = "CIDR_FLOW_NETWORK";
pub const ENV_PREFIX: &str = "CIDR_FLOW_PREFIX";
pub const ENV_LOG_CONFIG: &str = "CIDR_FLOW_LOG_CONFIG";
pub const ENV_EXPORT_DIR: &str = "CIDR_FLOW_EXPORT_DIR";
pub const ENV_SHOW: &str = "CIDR_FLOW_SHOW";

const DEFAULT_NETWORK: &str = "192.168.0.0";
const DEFAULT_PREFIX: &str = "16";
const DEFAULT_LOG_CONFIG: &str = "log4rs.yml";

/// Optional columns in the table and in exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOptions {
    pub show_subnet_name: bool,
    pub show_netmask: bool,
    pub show_range: bool,
    pub show_usable_ips: bool,
    pub show_hosts: bool,
    pub show_join: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        DisplayOptions {
            show_subnet_name: true,
            show_netmask: true,
            show_range: true,
            show_usable_ips: true,
            show_hosts: true,
            show_join: true,
        }
    }
}

impl DisplayOptions {
    /// Parse a comma list such as `name,netmask,join`. Listed columns are shown.
    pub fn from_list(list: &str) -> Result<DisplayOptions, Box<dyn Error>> {
        let mut options = DisplayOptions {
            show_subnet_name: false,
            show_netmask: false,
            show_range: false,
            show_usable_ips: false,
            show_hosts: false,
            show_join: false,
        };
        for column in list.split(',').map(str::trim).filter(|c| !c.is_empty()) {
            match column.to_ascii_lowercase().as_str() {
                "name" => options.show_subnet_name = true,
                "netmask" => options.show_netmask = true,
                "range" => options.show_range = true,
                "usable" => options.show_usable_ips = true,
                "hosts" => options.show_hosts = true,
                "join" => options.show_join = true,
                "all" => options = DisplayOptions::default(),
                other => return Err(format!("Unknown column '{other}' in {ENV_SHOW}").into()),
            }
        }
        Ok(options)
    }
}

/// Path of the log4rs file, looked up on its own so logging can start
/// before the rest of the configuration is read.
pub fn log_config_path<F>(lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    PathBuf::from(lookup(ENV_LOG_CONFIG).unwrap_or_else(|| DEFAULT_LOG_CONFIG.to_string()))
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Start network shown when the session opens.
    pub network: NetworkInput,
    pub log_config: PathBuf,
    pub export_dir: PathBuf,
    pub display: DisplayOptions,
}

impl Config {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Config, Box<dyn Error>> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, Box<dyn Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let display = match lookup(ENV_SHOW) {
            Some(list) => DisplayOptions::from_list(&list)?,
            None => DisplayOptions::default(),
        };

        let config = Config {
            network: NetworkInput::new(
                &get(ENV_NETWORK, DEFAULT_NETWORK),
                &get(ENV_PREFIX, DEFAULT_PREFIX),
            ),
            log_config: log_config_path(&lookup),
            export_dir: PathBuf::from(get(ENV_EXPORT_DIR, ".")),
            display,
        };
        log::debug!("Config loaded: {:?}", config);
        Ok(config)
    }
}
