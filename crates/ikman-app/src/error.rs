//! # Design
//!
//! - Centralize application-level errors for the boot sequence.
//! - Keep error messages constant while carrying context fields for
//!   debugging.
//! - Preserve source errors without re-logging at call sites.

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration operations failed.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: ikman_config::ConfigError,
    },
    /// Telemetry operations failed.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: ikman_telemetry::TelemetryError,
    },
    /// Router session operations failed.
    #[error("router operation failed")]
    Router {
        /// Operation identifier.
        operation: &'static str,
        /// Source router error.
        source: ikman_router::RouterError,
    },
    /// API server operations failed.
    #[error("api server operation failed")]
    ApiServer {
        /// Operation identifier.
        operation: &'static str,
        /// Source API server error.
        source: ikman_api::ApiServerError,
    },
}

impl AppError {
    pub(crate) const fn config(
        operation: &'static str,
        source: ikman_config::ConfigError,
    ) -> Self {
        Self::Config { operation, source }
    }

    pub(crate) const fn telemetry(
        operation: &'static str,
        source: ikman_telemetry::TelemetryError,
    ) -> Self {
        Self::Telemetry { operation, source }
    }

    pub(crate) const fn router(
        operation: &'static str,
        source: ikman_router::RouterError,
    ) -> Self {
        Self::Router { operation, source }
    }

    pub(crate) const fn api_server(
        operation: &'static str,
        source: ikman_api::ApiServerError,
    ) -> Self {
        Self::ApiServer { operation, source }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn app_error_helpers_build_variants() {
        let config = AppError::config(
            "config.load",
            ikman_config::ConfigError::InvalidField {
                section: "log",
                field: "level",
                value: Some("verbose".to_string()),
                reason: "unknown log level",
            },
        );
        assert!(matches!(config, AppError::Config { .. }));

        let telemetry = AppError::telemetry(
            "telemetry.init",
            ikman_telemetry::TelemetryError::Init {
                detail: "already installed".to_string(),
            },
        );
        assert!(matches!(telemetry, AppError::Telemetry { .. }));

        let router = AppError::router(
            "session.connect",
            ikman_router::RouterError::Login {
                attempts: 3,
                detail: "bad credentials".to_string(),
            },
        );
        assert!(matches!(router, AppError::Router { .. }));

        let api = AppError::api_server(
            "api.serve",
            ikman_api::ApiServerError::Serve {
                source: io::Error::other("io"),
            },
        );
        assert!(matches!(api, AppError::ApiServer { .. }));
    }
}
