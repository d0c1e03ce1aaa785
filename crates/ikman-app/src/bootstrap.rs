//! Boot sequence: configuration, telemetry, router session, HTTP front door.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use ikman_api::{ApiServer, ApiState};
use ikman_config::Config;
use ikman_router::{RouterSession, RouterTransport, SessionConfig};
use ikman_telemetry::{LogFormat, LoggingConfig};
use tracing::info;

use crate::error::{AppError, AppResult};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "IKMAN_CONFIG";

/// Configuration path used when [`CONFIG_ENV`] is not set.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Entry point for the ikman boot sequence.
///
/// # Errors
///
/// Returns an error if configuration loading, telemetry setup, the router
/// login, or the API server fails.
pub async fn run_app() -> AppResult<()> {
    let config_path =
        std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load(Path::new(&config_path))
        .map_err(|source| AppError::config("config.load", source))?;

    let logging = LoggingConfig {
        level: &config.log.level,
        format: LogFormat::from_name(config.log.format.as_deref()),
        file: config.log.file.as_deref(),
    };
    ikman_telemetry::init_logging(&logging)
        .map_err(|source| AppError::telemetry("telemetry.init", source))?;

    info!(path = %config_path, "configuration loaded");

    let session = RouterSession::connect(&session_config(&config))
        .await
        .map_err(|source| AppError::router("session.connect", source))?;
    let transport: Arc<dyn RouterTransport> = Arc::new(session);
    let state = Arc::new(ApiState::new(
        transport,
        config.api_server.api_token.clone(),
    ));

    if !config.api_server.enabled {
        info!("api server disabled; nothing to serve");
        return Ok(());
    }

    let addr = SocketAddr::new(config.api_server.bind_addr, config.api_server.port);
    ApiServer::new(state)
        .serve(addr)
        .await
        .map_err(|source| AppError::api_server("api.serve", source))
}

fn session_config(config: &Config) -> SessionConfig {
    SessionConfig {
        host: config.device.ip.clone(),
        port: config.device.port,
        username: config.device.username.clone(),
        password: config.device.password.clone(),
        login_retry: config.device.login_retry,
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};
    use std::path::PathBuf;

    use ikman_config::{ApiServerConfig, DeviceConfig, LogConfig};

    use super::*;

    #[test]
    fn session_config_carries_device_settings() {
        let config = Config {
            device: DeviceConfig {
                ip: "10.0.0.1".to_string(),
                port: 8080,
                username: "admin".to_string(),
                password: "secret".to_string(),
                login_retry: 2,
            },
            log: LogConfig {
                level: "info".to_string(),
                format: None,
                file: Some(PathBuf::from("/var/log/ikman.log")),
            },
            api_server: ApiServerConfig {
                enabled: true,
                port: 9090,
                bind_addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
                api_token: "t0ken".to_string(),
            },
        };

        let session = session_config(&config);
        assert_eq!(session.host, "10.0.0.1");
        assert_eq!(session.port, 8080);
        assert_eq!(session.username, "admin");
        assert_eq!(session.login_retry, 2);
    }
}
