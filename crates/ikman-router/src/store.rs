//! Reconcile-by-comment rule protocol.
//!
//! # Design
//! - One protocol engine, instantiated per rule family via a static
//!   descriptor; the engine never caches remote state across calls.
//! - The comment field is the identity key. Duplicate comments are resolved
//!   by taking the first match in listing order.
//! - Upsert performs at most one remote mutation and skips the write entirely
//!   when every desired field already matches the remote rule.

use std::sync::Arc;

use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

use crate::error::RouterResult;
use crate::transport::{Action, CallEnvelope, RouterTransport};

/// Field carrying the router-assigned rule identifier.
pub const ID_KEY: &str = "id";

/// Field carrying the human-assigned identity label.
pub const COMMENT_KEY: &str = "comment";

/// Records fetched per listing page.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// One rule as returned by the router: an opaque field mapping.
pub type RemoteRule = Map<String, Value>;

/// Static description of one remote rule family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FamilyDescriptor {
    /// Remote function key (e.g. `dnat`).
    pub func_name: &'static str,
    /// Listing page size.
    pub page_size: usize,
}

/// Outcome of an upsert call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No matching rule existed; an `add` was issued.
    Created,
    /// A matching rule differed; an `edit` was issued.
    Updated,
    /// The matching rule already carried every desired field; no remote call.
    Unchanged,
}

/// Rule store for one remote family, speaking through a shared transport.
pub struct RuleStore {
    transport: Arc<dyn RouterTransport>,
    family: FamilyDescriptor,
}

impl RuleStore {
    /// Create a store for the given family.
    #[must_use]
    pub fn new(transport: Arc<dyn RouterTransport>, family: FamilyDescriptor) -> Self {
        Self { transport, family }
    }

    /// The family this store manages.
    #[must_use]
    pub const fn family(&self) -> FamilyDescriptor {
        self.family
    }

    /// Fetch every rule of the family, walking pages until an empty one.
    ///
    /// The walk stops on the first empty page rather than on a reported
    /// total, so a concurrent remote mutation cannot strand the listing; the
    /// cost is one extra round trip when the record count is an exact
    /// multiple of the page size.
    ///
    /// # Errors
    ///
    /// Any transport failure aborts the whole listing; no partial result is
    /// returned.
    pub async fn list_all(&self) -> RouterResult<Vec<RemoteRule>> {
        let mut records = Vec::new();
        let mut offset = 0usize;
        loop {
            let envelope = CallEnvelope {
                func_name: self.family.func_name,
                action: Action::Show,
                param: json!({
                    "TYPE": "data,total",
                    "limit": format!("{offset},{}", self.family.page_size),
                    "ORDER": "",
                    "ORDER_BY": "",
                }),
            };
            let payload = self.transport.call(&envelope).await?;
            let page = extract_records(&payload);
            if page.is_empty() {
                break;
            }
            records.extend(page);
            offset += self.family.page_size;
        }
        debug!(
            func_name = self.family.func_name,
            count = records.len(),
            "listed remote rules"
        );
        Ok(records)
    }

    /// Return every rule whose comment equals `comment` exactly.
    ///
    /// # Errors
    ///
    /// Propagates any listing failure.
    pub async fn find_by_comment(&self, comment: &str) -> RouterResult<Vec<RemoteRule>> {
        let records = self.list_all().await?;
        Ok(records
            .into_iter()
            .filter(|rule| rule_comment(rule) == Some(comment))
            .collect())
    }

    /// Create or update the rule labelled `comment` to match `desired`.
    ///
    /// The first existing rule with the comment (listing order) is taken as
    /// canonical. Equality is decided over the keys present on both sides,
    /// comparing trimmed string renderings; keys absent from the remote rule
    /// are ignored. At most one remote mutation is issued per call.
    ///
    /// # Errors
    ///
    /// Propagates listing and mutation transport failures.
    pub async fn upsert(&self, comment: &str, desired: &RemoteRule) -> RouterResult<UpsertOutcome> {
        let existing = self.list_all().await?;
        let matched = existing
            .iter()
            .filter(|rule| rule_comment(rule) == Some(comment))
            .collect::<Vec<_>>();
        if matched.len() > 1 {
            info!(
                func_name = self.family.func_name,
                comment,
                matches = matched.len(),
                "ambiguous comment; first listing-order match wins"
            );
        }
        let Some(rule) = matched.first() else {
            self.transport
                .call(&CallEnvelope {
                    func_name: self.family.func_name,
                    action: Action::Add,
                    param: Value::Object(desired.clone()),
                })
                .await?;
            info!(func_name = self.family.func_name, comment, "created rule");
            return Ok(UpsertOutcome::Created);
        };

        if desired_matches(desired, rule) {
            info!(
                func_name = self.family.func_name,
                comment, "rule unchanged; skipping write"
            );
            return Ok(UpsertOutcome::Unchanged);
        }

        let mut param = desired.clone();
        if let Some(id) = rule.get(ID_KEY) {
            param.insert(ID_KEY.to_string(), id.clone());
        }
        self.transport
            .call(&CallEnvelope {
                func_name: self.family.func_name,
                action: Action::Edit,
                param: Value::Object(param),
            })
            .await?;
        info!(func_name = self.family.func_name, comment, "updated rule");
        Ok(UpsertOutcome::Updated)
    }

    /// Delete the first rule (listing order) labelled `comment`.
    ///
    /// Returns `true` when a rule was deleted and `false` when no rule
    /// carried the comment; absence is not a failure. When several rules
    /// share the comment only the first is deleted.
    ///
    /// # Errors
    ///
    /// Propagates listing and mutation transport failures.
    pub async fn delete_by_comment(&self, comment: &str) -> RouterResult<bool> {
        let records = self.list_all().await?;
        for rule in &records {
            if rule_comment(rule) == Some(comment) {
                let id = rule.get(ID_KEY).cloned().unwrap_or(Value::Null);
                self.transport
                    .call(&CallEnvelope {
                        func_name: self.family.func_name,
                        action: Action::Del,
                        param: json!({ ID_KEY: id }),
                    })
                    .await?;
                info!(func_name = self.family.func_name, comment, "deleted rule");
                return Ok(true);
            }
        }
        warn!(
            func_name = self.family.func_name,
            comment, "no rule found for comment"
        );
        Ok(false)
    }
}

/// Extract the record page from a `show` response body.
///
/// A missing or malformed `Data.data` node reads as an empty page, matching
/// the listing termination contract.
fn extract_records(payload: &Value) -> Vec<RemoteRule> {
    payload
        .get("Data")
        .and_then(|data| data.get("data"))
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_object)
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

fn rule_comment(rule: &RemoteRule) -> Option<&str> {
    rule.get(COMMENT_KEY).and_then(Value::as_str)
}

/// Asymmetric equality over the key intersection.
///
/// Every desired key that also exists on the remote rule must match as a
/// trimmed string; desired keys the remote rule lacks are ignored, so a
/// missing key can neither throw nor force an update.
fn desired_matches(desired: &RemoteRule, remote: &RemoteRule) -> bool {
    desired.iter().all(|(key, value)| match remote.get(key) {
        Some(remote_value) => canonical(remote_value) == canonical(value),
        None => true,
    })
}

/// Trimmed string rendering used for field comparison.
fn canonical(value: &Value) -> String {
    match value {
        Value::String(text) => text.trim().to_string(),
        other => other.to_string().trim().to_string(),
    }
}
