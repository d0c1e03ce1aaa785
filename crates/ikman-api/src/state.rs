//! Shared application state for the HTTP front door.

use std::sync::Arc;

use ikman_router::{RouterTransport, RuleStore};

/// Dependencies shared by every request handler.
pub struct ApiState {
    pub(crate) port_mapping: RuleStore,
    pub(crate) qos_limit: RuleStore,
    pub(crate) stream_rule: RuleStore,
    pub(crate) api_token: String,
}

impl ApiState {
    /// Build the three family stores over one shared router transport.
    #[must_use]
    pub fn new(transport: Arc<dyn RouterTransport>, api_token: String) -> Self {
        Self {
            port_mapping: RuleStore::port_mapping(Arc::clone(&transport)),
            qos_limit: RuleStore::qos_limit(Arc::clone(&transport)),
            stream_rule: RuleStore::stream_rule(transport),
            api_token,
        }
    }
}
