//! Router construction and server host for the API.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::Request,
    middleware,
    routing::get,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{Span, info};

use crate::error::ApiServerError;
use crate::http::auth::require_api_token;
use crate::http::health::health;
use crate::http::rules::{
    delete_port_mapping, delete_qos_limit, delete_stream_rule, get_port_mapping, get_qos_limit,
    get_stream_rule, list_port_mappings, list_qos_limits, list_stream_rules, upsert_port_mapping,
    upsert_qos_limit, upsert_stream_rule,
};
use crate::state::ApiState;

/// Axum router wrapper that hosts the ikman API.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    /// Construct the route tree over shared application state.
    #[must_use]
    pub fn new(state: Arc<ApiState>) -> Self {
        let require_token = middleware::from_fn_with_state(state.clone(), require_api_token);
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| {
                tracing::info_span!(
                    "http.request",
                    method = %request.method(),
                    route = %request.uri().path(),
                    status_code = tracing::field::Empty,
                    latency_ms = tracing::field::Empty
                )
            })
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &Span| {
                    span.record("status_code", response.status().as_u16());
                    let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
                    span.record("latency_ms", latency_ms);
                },
            );

        let router = Router::new()
            .route(
                "/port-mapping",
                get(list_port_mappings).post(upsert_port_mapping),
            )
            .route(
                "/port-mapping/{comment}",
                get(get_port_mapping).delete(delete_port_mapping),
            )
            .route("/qos-limit", get(list_qos_limits).post(upsert_qos_limit))
            .route(
                "/qos-limit/{comment}",
                get(get_qos_limit).delete(delete_qos_limit),
            )
            .route(
                "/stream-ipport",
                get(list_stream_rules).post(upsert_stream_rule),
            )
            .route(
                "/stream-ipport/{comment}",
                get(get_stream_rule).delete(delete_stream_rule),
            )
            .route_layer(require_token)
            .route("/health", get(health))
            .layer(trace_layer)
            .with_state(state);

        Self { router }
    }

    /// Serve the API on the supplied address until shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener fails to bind or the server
    /// terminates unexpectedly.
    pub async fn serve(self, addr: SocketAddr) -> Result<(), ApiServerError> {
        info!("starting API on {addr}");
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ApiServerError::Bind { addr, source })?;
        axum::serve(listener, self.router.into_make_service())
            .await
            .map_err(|source| ApiServerError::Serve { source })?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn router(&self) -> Router {
        self.router.clone()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header::CONTENT_TYPE};
    use ikman_router::{
        Action, CallEnvelope, RouterError, RouterResult, RouterTransport,
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::http::auth::HEADER_API_TOKEN;

    const TOKEN: &str = "s3cret";

    /// Single-page router stub: `show` serves the fixed record set at offset
    /// zero and an empty page afterwards; mutations report success.
    struct StubRouter {
        records: Vec<Value>,
    }

    #[async_trait]
    impl RouterTransport for StubRouter {
        async fn call(&self, envelope: &CallEnvelope) -> RouterResult<Value> {
            match envelope.action {
                Action::Show => {
                    let offset: usize = envelope
                        .param
                        .get("limit")
                        .and_then(Value::as_str)
                        .and_then(|limit| limit.split(',').next())
                        .and_then(|offset| offset.parse().ok())
                        .expect("limit param");
                    let page = if offset == 0 {
                        self.records.clone()
                    } else {
                        Vec::new()
                    };
                    Ok(json!({"Result": 30000, "Data": {"data": page}}))
                }
                _ => Ok(json!({"Result": 30000})),
            }
        }
    }

    /// Router stub whose every call fails with a transport error.
    struct FailingRouter;

    #[async_trait]
    impl RouterTransport for FailingRouter {
        async fn call(&self, _: &CallEnvelope) -> RouterResult<Value> {
            Err(RouterError::HttpStatus {
                operation: "call",
                url: "http://router/Action/call".to_string(),
                status: 502,
            })
        }
    }

    fn server_with(records: Vec<Value>) -> ApiServer {
        let transport = Arc::new(StubRouter { records }) as Arc<dyn RouterTransport>;
        ApiServer::new(Arc::new(ApiState::new(transport, TOKEN.to_string())))
    }

    fn get_req(path: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(path);
        if let Some(token) = token {
            builder = builder.header(HEADER_API_TOKEN, token);
        }
        builder.body(Body::empty()).expect("request")
    }

    fn post_json(path: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(path)
            .header(HEADER_API_TOKEN, TOKEN)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let server = server_with(Vec::new());
        let response = server
            .router()
            .oneshot(get_req("/port-mapping", None))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wrong_token_is_unauthorized() {
        let server = server_with(Vec::new());
        let response = server
            .router()
            .oneshot(get_req("/qos-limit", Some("wrong")))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["status"], 401);
        assert_eq!(body["title"], "authentication required");
    }

    #[tokio::test]
    async fn health_is_public() {
        let server = server_with(Vec::new());
        let response = server
            .router()
            .oneshot(get_req("/health", None))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn list_returns_remote_rules() {
        let server = server_with(vec![json!({"id": 1, "comment": "web"})]);
        let response = server
            .router()
            .oneshot(get_req("/port-mapping", Some(TOKEN)))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["data"][0]["comment"], "web");
    }

    #[tokio::test]
    async fn get_by_comment_filters() {
        let server = server_with(vec![
            json!({"id": 1, "comment": "web"}),
            json!({"id": 2, "comment": "nas"}),
        ]);
        let response = server
            .router()
            .oneshot(get_req("/stream-ipport/nas", Some(TOKEN)))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["data"][0]["id"], 2);
    }

    #[tokio::test]
    async fn upsert_reports_creation() {
        let server = server_with(Vec::new());
        let request = post_json(
            "/port-mapping",
            &json!({
                "ip_addr": "192.168.1.10",
                "wan_port": "8080",
                "lan_port": "80",
                "comment": "web",
            }),
        );
        let response = server.router().oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["msg"], "port mapping [web] created");
    }

    #[tokio::test]
    async fn upsert_reports_unchanged_without_mutation() {
        let server = server_with(vec![json!({
            "id": 5,
            "comment": "guest",
            "ip_addr": "192.168.1.20",
            "upload": "2048",
            "download": "10240",
            "interface": "wan1",
            "protocol": "tcp+udp",
        })]);
        let request = post_json(
            "/qos-limit",
            &json!({
                "ip_addr": "192.168.1.20",
                "upload": 2048,
                "download": 10240,
                "comment": "guest",
            }),
        );
        let response = server.router().oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["msg"], "qos limit [guest] unchanged");
    }

    #[tokio::test]
    async fn delete_not_found_is_ok_with_found_false() {
        let server = server_with(Vec::new());
        let request = Request::builder()
            .method("DELETE")
            .uri("/qos-limit/ghost")
            .header(HEADER_API_TOKEN, TOKEN)
            .body(Body::empty())
            .expect("request");
        let response = server.router().oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["found"], false);
    }

    #[tokio::test]
    async fn transport_failure_maps_to_generic_server_error() {
        let transport = Arc::new(FailingRouter) as Arc<dyn RouterTransport>;
        let server = ApiServer::new(Arc::new(ApiState::new(transport, TOKEN.to_string())));
        let response = server
            .router()
            .oneshot(get_req("/stream-ipport", Some(TOKEN)))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["title"], "internal server error");
    }

    #[tokio::test]
    async fn malformed_body_is_a_client_error() {
        let server = server_with(Vec::new());
        let request = post_json("/stream-ipport", &json!({"interface": "vwan_cmcc"}));
        let response = server.router().oneshot(request).await.expect("response");
        assert!(response.status().is_client_error());
    }
}
