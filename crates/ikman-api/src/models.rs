//! Response bodies of the HTTP front door.

use ikman_router::RemoteRule;
use serde::Serialize;

/// Problem body attached to error responses.
#[derive(Debug, Serialize)]
pub(crate) struct Problem {
    pub(crate) title: &'static str,
    pub(crate) status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) detail: Option<String>,
}

/// Body returned by upsert endpoints.
#[derive(Debug, Serialize)]
pub(crate) struct MutationResponse {
    pub(crate) status: &'static str,
    pub(crate) msg: String,
}

/// Body returned by listing endpoints.
#[derive(Debug, Serialize)]
pub(crate) struct RulesResponse {
    pub(crate) status: &'static str,
    pub(crate) data: Vec<RemoteRule>,
}

/// Body returned by delete endpoints; absence is not a failure.
#[derive(Debug, Serialize)]
pub(crate) struct DeleteResponse {
    pub(crate) status: &'static str,
    pub(crate) found: bool,
}

/// Body returned by the liveness probe.
#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) status: &'static str,
}
