//! Typed configuration sections.
//!
//! # Design
//! - One struct per YAML section, deserialized with serde defaults where the
//!   file may omit a field.
//! - Values that other crates interpret (log format names, router
//!   credentials) stay as plain data here; semantic checks live in
//!   `loader::validate`.

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use serde::Deserialize;

/// Root configuration document.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Router device connection settings.
    pub device: DeviceConfig,
    /// Logging settings.
    pub log: LogConfig,
    /// Local API server settings.
    pub api_server: ApiServerConfig,
}

/// Router device connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceConfig {
    /// Router management address.
    pub ip: String,
    /// Router management port.
    #[serde(default = "default_device_port")]
    pub port: u16,
    /// Login user name.
    pub username: String,
    /// Login password.
    pub password: String,
    /// Number of login attempts before giving up.
    pub login_retry: u32,
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level name (`trace`, `debug`, `info`, `warn`, `error`).
    pub level: String,
    /// Output format name (`pretty` or `json`); inferred from the build when
    /// absent.
    #[serde(default)]
    pub format: Option<String>,
    /// Log file path; logs go to stdout when absent.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// Local API server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiServerConfig {
    /// Whether to start the HTTP front door at all.
    pub enabled: bool,
    /// Listen port.
    pub port: u16,
    /// Bind address.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: IpAddr,
    /// Shared secret expected in the `X-Api-Token` header.
    pub api_token: String,
}

const fn default_device_port() -> u16 {
    80
}

const fn default_bind_addr() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}
