//! Configuration file loading and validation.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::model::Config;

/// Log level names accepted by the `log.level` field.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Output format names accepted by the `log.format` field.
pub const LOG_FORMATS: [&str; 2] = ["pretty", "json"];

impl Config {
    /// Load and validate a configuration document from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read, does not parse as the
    /// expected document shape, or fails semantic validation.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Validate semantic constraints that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns an [`ConfigError::InvalidField`] naming the offending section
    /// and field.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.device.ip.trim().is_empty() {
            return Err(invalid("device", "ip", None, "must not be empty"));
        }
        if self.device.username.trim().is_empty() {
            return Err(invalid("device", "username", None, "must not be empty"));
        }
        if self.device.login_retry == 0 {
            return Err(invalid(
                "device",
                "login_retry",
                Some("0".to_string()),
                "must be at least 1",
            ));
        }
        if !LOG_LEVELS.contains(&self.log.level.as_str()) {
            return Err(invalid(
                "log",
                "level",
                Some(self.log.level.clone()),
                "unknown log level",
            ));
        }
        if let Some(format) = &self.log.format {
            if !LOG_FORMATS.contains(&format.as_str()) {
                return Err(invalid(
                    "log",
                    "format",
                    Some(format.clone()),
                    "unknown log format",
                ));
            }
        }
        if self.api_server.api_token.trim().is_empty() {
            return Err(invalid("api_server", "api_token", None, "must not be empty"));
        }
        Ok(())
    }
}

const fn invalid(
    section: &'static str,
    field: &'static str,
    value: Option<String>,
    reason: &'static str,
) -> ConfigError {
    ConfigError::InvalidField {
        section,
        field,
        value,
        reason,
    }
}
