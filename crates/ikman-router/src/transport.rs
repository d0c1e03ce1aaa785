//! Wire envelope and the authenticated router transport.
//!
//! # Design
//! - `RouterTransport` is the only seam the protocol engine depends on; the
//!   production implementation is a reqwest session, tests supply mocks.
//! - The session logs in once at construction and keeps the router cookie in
//!   the client's cookie store. Failures surface immediately; no retry is
//!   performed on the call path.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::error::{RouterError, RouterResult};

/// Router command endpoint, relative to the device base URL.
const CALL_PATH: &str = "/Action/call";

/// Router login endpoint, relative to the device base URL.
const LOGIN_PATH: &str = "/Action/login";

/// Result code the router returns on a successful login.
const LOGIN_OK: i64 = 10000;

/// Command verb understood by the router API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Paginated listing of a rule family.
    Show,
    /// Create a new rule.
    Add,
    /// Full-replace edit of an existing rule.
    Edit,
    /// Delete a rule by remote identifier.
    Del,
}

/// JSON command envelope accepted by the router's call endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CallEnvelope {
    /// Rule family key (e.g. `dnat`).
    pub func_name: &'static str,
    /// Command verb.
    pub action: Action,
    /// Verb-specific parameters.
    pub param: Value,
}

/// Seam between the rule protocol and the router's HTTP API.
#[async_trait]
pub trait RouterTransport: Send + Sync {
    /// POST one command envelope and return the parsed JSON response body.
    async fn call(&self, envelope: &CallEnvelope) -> RouterResult<Value>;
}

/// Connection settings for an authenticated router session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Router management address.
    pub host: String,
    /// Router management port.
    pub port: u16,
    /// Login user name.
    pub username: String,
    /// Login password.
    pub password: String,
    /// Number of login attempts before giving up.
    pub login_retry: u32,
}

/// Authenticated reqwest-backed session against one router device.
pub struct RouterSession {
    client: reqwest::Client,
    base_url: String,
}

impl RouterSession {
    /// Build a client, perform the login handshake, and return the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be constructed or the router
    /// rejects the login after `login_retry` attempts.
    pub async fn connect(config: &SessionConfig) -> RouterResult<Self> {
        let base_url = format!("http://{}:{}", config.host, config.port);
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|source| RouterError::Http {
                operation: "client.build",
                url: base_url.clone(),
                source,
            })?;
        let session = Self { client, base_url };
        session.login(config).await?;
        Ok(session)
    }

    async fn login(&self, config: &SessionConfig) -> RouterResult<()> {
        let url = format!("{}{LOGIN_PATH}", self.base_url);
        let body = json!({
            "username": config.username,
            "passwd": config.password,
        });
        let attempts = config.login_retry.max(1);
        let mut last_detail = String::new();
        for attempt in 1..=attempts {
            match self.try_login(&url, &body).await {
                Ok(()) => {
                    info!(attempt, host = %config.host, "router login succeeded");
                    return Ok(());
                }
                Err(detail) => {
                    warn!(attempt, host = %config.host, %detail, "router login attempt failed");
                    last_detail = detail;
                }
            }
        }
        Err(RouterError::Login {
            attempts,
            detail: last_detail,
        })
    }

    async fn try_login(&self, url: &str, body: &Value) -> Result<(), String> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|err| err.to_string())?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("login returned status {status}"));
        }
        let payload: Value = response.json().await.map_err(|err| err.to_string())?;
        if payload.get("Result").and_then(Value::as_i64) == Some(LOGIN_OK) {
            Ok(())
        } else {
            Err(payload
                .get("ErrMsg")
                .and_then(Value::as_str)
                .unwrap_or("login rejected by router")
                .to_string())
        }
    }
}

#[async_trait]
impl RouterTransport for RouterSession {
    async fn call(&self, envelope: &CallEnvelope) -> RouterResult<Value> {
        let url = format!("{}{CALL_PATH}", self.base_url);
        debug!(func_name = envelope.func_name, action = ?envelope.action, "router call");
        let response = self
            .client
            .post(&url)
            .json(envelope)
            .send()
            .await
            .map_err(|source| RouterError::Http {
                operation: "call.send",
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(RouterError::HttpStatus {
                operation: "call",
                url,
                status: status.as_u16(),
            });
        }
        response
            .json()
            .await
            .map_err(|source| RouterError::Http {
                operation: "call.decode",
                url,
                source,
            })
    }
}
