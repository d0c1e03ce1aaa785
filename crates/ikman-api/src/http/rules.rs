//! Rule endpoints: one GET/POST/DELETE quartet per family.
//!
//! The handlers are a mechanical mapping from REST verbs onto the rule store
//! operations; the shared helpers keep the router-failure mapping in one
//! place.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use ikman_router::{
    PortMappingSpec, QosLimitSpec, RemoteRule, RuleStore, StreamRuleSpec, UpsertOutcome,
};
use tracing::error;

use crate::http::errors::ApiError;
use crate::models::{DeleteResponse, MutationResponse, RulesResponse};
use crate::state::ApiState;

async fn upsert_rule(
    store: &RuleStore,
    label: &'static str,
    comment: &str,
    desired: &RemoteRule,
) -> Result<Json<MutationResponse>, ApiError> {
    let outcome = store
        .upsert(comment, desired)
        .await
        .map_err(|err| router_failure(label, "upsert", &err))?;
    let verb = match outcome {
        UpsertOutcome::Created => "created",
        UpsertOutcome::Updated => "updated",
        UpsertOutcome::Unchanged => "unchanged",
    };
    Ok(Json(MutationResponse {
        status: "ok",
        msg: format!("{label} [{comment}] {verb}"),
    }))
}

async fn list_rules(
    store: &RuleStore,
    label: &'static str,
) -> Result<Json<RulesResponse>, ApiError> {
    let data = store
        .list_all()
        .await
        .map_err(|err| router_failure(label, "list", &err))?;
    Ok(Json(RulesResponse { status: "ok", data }))
}

async fn get_rules(
    store: &RuleStore,
    label: &'static str,
    comment: &str,
) -> Result<Json<RulesResponse>, ApiError> {
    let data = store
        .find_by_comment(comment)
        .await
        .map_err(|err| router_failure(label, "get", &err))?;
    Ok(Json(RulesResponse { status: "ok", data }))
}

async fn delete_rule(
    store: &RuleStore,
    label: &'static str,
    comment: &str,
) -> Result<Json<DeleteResponse>, ApiError> {
    let found = store
        .delete_by_comment(comment)
        .await
        .map_err(|err| router_failure(label, "delete", &err))?;
    Ok(Json(DeleteResponse {
        status: "ok",
        found,
    }))
}

fn router_failure(
    label: &'static str,
    operation: &'static str,
    err: &ikman_router::RouterError,
) -> ApiError {
    error!(error = %err, label, operation, "router call failed");
    ApiError::internal("router call failed")
}

pub(crate) async fn upsert_port_mapping(
    State(state): State<Arc<ApiState>>,
    Json(spec): Json<PortMappingSpec>,
) -> Result<Json<MutationResponse>, ApiError> {
    upsert_rule(
        &state.port_mapping,
        "port mapping",
        &spec.comment,
        &spec.desired_config(),
    )
    .await
}

pub(crate) async fn list_port_mappings(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<RulesResponse>, ApiError> {
    list_rules(&state.port_mapping, "port mapping").await
}

pub(crate) async fn get_port_mapping(
    State(state): State<Arc<ApiState>>,
    Path(comment): Path<String>,
) -> Result<Json<RulesResponse>, ApiError> {
    get_rules(&state.port_mapping, "port mapping", &comment).await
}

pub(crate) async fn delete_port_mapping(
    State(state): State<Arc<ApiState>>,
    Path(comment): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    delete_rule(&state.port_mapping, "port mapping", &comment).await
}

pub(crate) async fn upsert_qos_limit(
    State(state): State<Arc<ApiState>>,
    Json(spec): Json<QosLimitSpec>,
) -> Result<Json<MutationResponse>, ApiError> {
    upsert_rule(
        &state.qos_limit,
        "qos limit",
        &spec.comment,
        &spec.desired_config(),
    )
    .await
}

pub(crate) async fn list_qos_limits(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<RulesResponse>, ApiError> {
    list_rules(&state.qos_limit, "qos limit").await
}

pub(crate) async fn get_qos_limit(
    State(state): State<Arc<ApiState>>,
    Path(comment): Path<String>,
) -> Result<Json<RulesResponse>, ApiError> {
    get_rules(&state.qos_limit, "qos limit", &comment).await
}

pub(crate) async fn delete_qos_limit(
    State(state): State<Arc<ApiState>>,
    Path(comment): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    delete_rule(&state.qos_limit, "qos limit", &comment).await
}

pub(crate) async fn upsert_stream_rule(
    State(state): State<Arc<ApiState>>,
    Json(spec): Json<StreamRuleSpec>,
) -> Result<Json<MutationResponse>, ApiError> {
    upsert_rule(
        &state.stream_rule,
        "stream rule",
        &spec.comment,
        &spec.desired_config(),
    )
    .await
}

pub(crate) async fn list_stream_rules(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<RulesResponse>, ApiError> {
    list_rules(&state.stream_rule, "stream rule").await
}

pub(crate) async fn get_stream_rule(
    State(state): State<Arc<ApiState>>,
    Path(comment): Path<String>,
) -> Result<Json<RulesResponse>, ApiError> {
    get_rules(&state.stream_rule, "stream rule", &comment).await
}

pub(crate) async fn delete_stream_rule(
    State(state): State<Arc<ApiState>>,
    Path(comment): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    delete_rule(&state.stream_rule, "stream rule", &comment).await
}
