//! Per-family shaping policies.
//!
//! Each spec type builds the complete desired-config mapping for its rule
//! family, including defaulted fields and policy-fixed constants, from
//! caller-supplied parameters. The specs double as the request bodies of the
//! HTTP front door, so serde defaults mirror the family defaults.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::store::{DEFAULT_PAGE_SIZE, FamilyDescriptor, RemoteRule, RuleStore};
use crate::transport::RouterTransport;

/// Port forwarding rules.
pub const PORT_MAPPING: FamilyDescriptor = FamilyDescriptor {
    func_name: "dnat",
    page_size: DEFAULT_PAGE_SIZE,
};

/// Per-IP bandwidth limiting rules.
pub const QOS_LIMIT: FamilyDescriptor = FamilyDescriptor {
    func_name: "simple_qos",
    page_size: DEFAULT_PAGE_SIZE,
};

/// Traffic-steering rules.
pub const STREAM_RULE: FamilyDescriptor = FamilyDescriptor {
    func_name: "stream_ipport",
    page_size: DEFAULT_PAGE_SIZE,
};

impl RuleStore {
    /// Store over the port forwarding family.
    #[must_use]
    pub fn port_mapping(transport: Arc<dyn RouterTransport>) -> Self {
        Self::new(transport, PORT_MAPPING)
    }

    /// Store over the bandwidth limiting family.
    #[must_use]
    pub fn qos_limit(transport: Arc<dyn RouterTransport>) -> Self {
        Self::new(transport, QOS_LIMIT)
    }

    /// Store over the traffic-steering family.
    #[must_use]
    pub fn stream_rule(transport: Arc<dyn RouterTransport>) -> Self {
        Self::new(transport, STREAM_RULE)
    }
}

/// Desired state of one port forwarding rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortMappingSpec {
    /// Internal address the forward targets.
    pub ip_addr: String,
    /// External port (or range) on the WAN side.
    pub wan_port: String,
    /// Internal port (or range) on the LAN side.
    pub lan_port: String,
    /// Identity label.
    pub comment: String,
    /// WAN interface the forward listens on.
    #[serde(default = "default_wan_interface")]
    pub interface: String,
    /// Forwarded protocol.
    #[serde(default = "default_protocol")]
    pub protocol: String,
}

impl PortMappingSpec {
    /// Build the complete desired-config mapping for the family.
    #[must_use]
    pub fn desired_config(&self) -> RemoteRule {
        let mut config = RemoteRule::new();
        config.insert("ip_addr".to_string(), json!(self.ip_addr));
        config.insert("wan_port".to_string(), json!(self.wan_port));
        config.insert("lan_port".to_string(), json!(self.lan_port));
        config.insert("comment".to_string(), json!(self.comment));
        config.insert("interface".to_string(), json!(self.interface));
        config.insert("protocol".to_string(), json!(self.protocol));
        config
    }
}

/// Desired state of one per-IP bandwidth limit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QosLimitSpec {
    /// Address the limit applies to.
    pub ip_addr: String,
    /// Upload rate limit; stored as provided, no unit conversion.
    pub upload: u64,
    /// Download rate limit; stored as provided, no unit conversion.
    pub download: u64,
    /// Identity label.
    pub comment: String,
    /// WAN interface the limit applies to.
    #[serde(default = "default_wan_interface")]
    pub interface: String,
    /// Limited protocol.
    #[serde(default = "default_protocol")]
    pub protocol: String,
}

impl QosLimitSpec {
    /// Build the complete desired-config mapping for the family.
    #[must_use]
    pub fn desired_config(&self) -> RemoteRule {
        let mut config = RemoteRule::new();
        config.insert("ip_addr".to_string(), json!(self.ip_addr));
        config.insert("upload".to_string(), json!(self.upload));
        config.insert("download".to_string(), json!(self.download));
        config.insert("comment".to_string(), json!(self.comment));
        config.insert("interface".to_string(), json!(self.interface));
        config.insert("protocol".to_string(), json!(self.protocol));
        config
    }
}

/// Desired state of one traffic-steering rule.
///
/// The schedule is policy-fixed: every rule is enabled, active the whole day,
/// every day of the week. Callers can only steer source, interface, protocol,
/// and mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamRuleSpec {
    /// Source address the rule steers.
    pub src_addr: String,
    /// Egress interface the traffic is steered to.
    #[serde(default = "default_stream_interface")]
    pub interface: String,
    /// Identity label.
    pub comment: String,
    /// Steered protocol.
    #[serde(default = "default_protocol")]
    pub protocol: String,
    /// Steering mode selector.
    #[serde(default = "default_stream_mode")]
    pub mode: String,
}

impl StreamRuleSpec {
    /// Build the complete desired-config mapping for the family, injecting
    /// the policy-fixed schedule constants.
    #[must_use]
    pub fn desired_config(&self) -> RemoteRule {
        let mut config = RemoteRule::new();
        config.insert("src_addr".to_string(), json!(self.src_addr));
        config.insert("interface".to_string(), json!(self.interface));
        config.insert("enabled".to_string(), json!("yes"));
        config.insert("mode".to_string(), json!(self.mode));
        config.insert("protocol".to_string(), json!(self.protocol));
        config.insert("time".to_string(), json!("00:00-23:59"));
        config.insert("type".to_string(), json!(0));
        config.insert("week".to_string(), json!("1234567"));
        config.insert("comment".to_string(), json!(self.comment));
        config
    }
}

fn default_wan_interface() -> String {
    "wan1".to_string()
}

fn default_stream_interface() -> String {
    "vwan_cmcc".to_string()
}

fn default_protocol() -> String {
    "tcp+udp".to_string()
}

fn default_stream_mode() -> String {
    "3".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_mapping_defaults_interface_and_protocol() {
        let spec: PortMappingSpec = serde_json::from_value(json!({
            "ip_addr": "192.168.1.10",
            "wan_port": "8080",
            "lan_port": "80",
            "comment": "web",
        }))
        .expect("deserialize spec");

        assert_eq!(spec.interface, "wan1");
        assert_eq!(spec.protocol, "tcp+udp");

        let config = spec.desired_config();
        assert_eq!(config.len(), 6);
        assert_eq!(config.get("ip_addr"), Some(&json!("192.168.1.10")));
        assert_eq!(config.get("comment"), Some(&json!("web")));
    }

    #[test]
    fn qos_limit_keeps_numeric_rates() {
        let spec: QosLimitSpec = serde_json::from_value(json!({
            "ip_addr": "192.168.1.20",
            "upload": 2048,
            "download": 10240,
            "comment": "guest",
        }))
        .expect("deserialize spec");

        let config = spec.desired_config();
        assert_eq!(config.get("upload"), Some(&json!(2048)));
        assert_eq!(config.get("download"), Some(&json!(10240)));
        assert_eq!(config.get("interface"), Some(&json!("wan1")));
    }

    #[test]
    fn stream_rule_injects_schedule_constants() {
        let spec: StreamRuleSpec = serde_json::from_value(json!({
            "src_addr": "192.168.1.30",
            "comment": "nas",
        }))
        .expect("deserialize spec");

        let config = spec.desired_config();
        // Map iteration is key-ordered; this pins the exact field set.
        let keys: Vec<&str> = config.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            [
                "comment",
                "enabled",
                "interface",
                "mode",
                "protocol",
                "src_addr",
                "time",
                "type",
                "week",
            ]
        );
        assert_eq!(config.get("enabled"), Some(&json!("yes")));
        assert_eq!(config.get("time"), Some(&json!("00:00-23:59")));
        assert_eq!(config.get("type"), Some(&json!(0)));
        assert_eq!(config.get("week"), Some(&json!("1234567")));
        assert_eq!(config.get("mode"), Some(&json!("3")));
        assert_eq!(config.get("interface"), Some(&json!("vwan_cmcc")));
        assert_eq!(config.get("protocol"), Some(&json!("tcp+udp")));
    }

    #[test]
    fn stream_rule_mode_is_overridable() {
        let spec: StreamRuleSpec = serde_json::from_value(json!({
            "src_addr": "192.168.1.30",
            "comment": "nas",
            "mode": "1",
        }))
        .expect("deserialize spec");
        assert_eq!(spec.desired_config().get("mode"), Some(&json!("1")));
    }

    #[test]
    fn family_descriptors_use_remote_function_keys() {
        assert_eq!(PORT_MAPPING.func_name, "dnat");
        assert_eq!(QOS_LIMIT.func_name, "simple_qos");
        assert_eq!(STREAM_RULE.func_name, "stream_ipport");
        for family in [PORT_MAPPING, QOS_LIMIT, STREAM_RULE] {
            assert_eq!(family.page_size, DEFAULT_PAGE_SIZE);
        }
    }
}
