//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the health, relay and fallback routes
//! - Wire up middleware (request ID, tracing, body limit, CORS)
//! - Bind server to listener and drain on shutdown
//! - Hand each relay request to the core with its own cancellation token

use axum::{
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    middleware::map_response_with_state,
    response::{IntoResponse, Response},
    routing::{any, get},
    Router,
};
use bytes::Bytes;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::Instrument;

use crate::config::RelayConfig;
use crate::http::{health, request, response};
use crate::observability::metrics;
use crate::relay::response::ErrorBody;
use crate::relay::{Relay, RelayBuildError, ReqwestTransport};
use crate::security::{cors_middleware, CorsPolicy};

/// Path prefix under which requests are relayed.
pub const PROXY_MOUNT: &str = "/proxy";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<Relay<ReqwestTransport>>,
    /// Parent of every per-request token; cancelled when draining.
    pub in_flight: CancellationToken,
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
    in_flight: CancellationToken,
}

impl HttpServer {
    /// Create a new HTTP server from validated configuration.
    pub fn new(config: RelayConfig) -> Result<Self, RelayBuildError> {
        let relay = Arc::new(Relay::from_config(&config, PROXY_MOUNT)?);
        let cors = relay.responder().cors().clone();
        let in_flight = CancellationToken::new();

        let state = AppState {
            relay,
            in_flight: in_flight.clone(),
        };

        let router = Self::build_router(&config, state, cors);
        Ok(Self {
            router,
            config,
            in_flight,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &RelayConfig, state: AppState, cors: CorsPolicy) -> Router {
        Router::new()
            .route("/", get(health::liveness).fallback(response::not_found))
            .route("/health", get(health::liveness).fallback(response::not_found))
            .route(PROXY_MOUNT, any(proxy_handler))
            .route("/proxy/", any(proxy_handler))
            .route("/proxy/{*rest}", any(proxy_handler))
            .fallback(response::not_found)
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.security.max_body_size))
            .layer(map_response_with_state(cors, cors_middleware))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for serving or driving directly.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` is cancelled, then drain.
    ///
    /// Upstream calls still in flight at that point end as `Cancelled`.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: CancellationToken,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            "HTTP server starting"
        );

        let in_flight = self.in_flight.clone();
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("Draining in-flight requests");
                in_flight.cancel();
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

/// Relay handler for everything under the mount.
async fn proxy_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let start_time = Instant::now();
    let method_str = method.to_string();

    if method == Method::OPTIONS {
        metrics::record_request(&method_str, StatusCode::NO_CONTENT.as_u16(), start_time);
        return response::preflight();
    }

    let request_id = request::request_id(&headers).to_string();

    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            let status = rejection.status();
            let message = rejection.body_text();
            tracing::warn!(
                request_id = %request_id,
                status = status.as_u16(),
                error = %message,
                "Rejected request body"
            );
            let error = if status == StatusCode::PAYLOAD_TOO_LARGE {
                "Payload too large"
            } else {
                "Bad request"
            };
            metrics::record_request(&method_str, status.as_u16(), start_time);
            return state
                .relay
                .responder()
                .diagnostic(status, &ErrorBody::new(error, &message))
                .into_response();
        }
    };

    let inbound = request::inbound_request(method, &uri, headers, body);
    let cancel = state.in_flight.child_token();
    let span = tracing::info_span!("relay", request_id = %request_id);

    let outbound = state.relay.handle(inbound, &cancel).instrument(span).await;

    metrics::record_request(&method_str, outbound.status.as_u16(), start_time);
    outbound.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http::{header, Request};
    use tower::ServiceExt;

    fn server() -> HttpServer {
        let mut config = RelayConfig::default();
        // Nothing listens here; only local routes are exercised.
        config.upstream.base_url = "http://127.0.0.1:9".to_string();
        HttpServer::new(config).unwrap()
    }

    async fn send(request: Request<Body>) -> Response {
        server().router().oneshot(request).await.unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn assert_cors(response: &Response) {
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert!(headers.contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
        assert!(headers.contains_key(header::ACCESS_CONTROL_ALLOW_HEADERS));
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        for path in ["/", "/health"] {
            let response = send(Request::get(path).body(Body::empty()).unwrap()).await;
            assert_eq!(response.status(), StatusCode::OK);
            assert_cors(&response);

            let json = body_json(response).await;
            assert_eq!(json["status"], "ok");
            assert_eq!(json["message"], "Relay running");
            assert_eq!(json["upstream"], "http://127.0.0.1:9");
            assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));
        }
    }

    #[tokio::test]
    async fn test_health_other_methods_not_found() {
        let response = send(Request::post("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_cors(&response);
    }

    #[tokio::test]
    async fn test_unknown_path_not_found_with_cors() {
        let response = send(Request::get("/other/thing").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_cors(&response);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(bytes, "Not Found");
    }

    #[tokio::test]
    async fn test_preflight_short_circuits() {
        for path in ["/proxy", "/proxy/", "/proxy/any/path?x=1"] {
            let request = Request::builder()
                .method(Method::OPTIONS)
                .uri(path)
                .body(Body::empty())
                .unwrap();
            let response = send(request).await;
            assert_eq!(response.status(), StatusCode::NO_CONTENT);
            assert_cors(&response);

            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
            assert!(bytes.is_empty());
        }
    }

    #[tokio::test]
    async fn test_request_id_assigned() {
        let response = send(Request::get("/health").body(Body::empty()).unwrap()).await;
        assert!(response.headers().contains_key(request::X_REQUEST_ID));
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let mut config = RelayConfig::default();
        config.upstream.base_url = "http://127.0.0.1:9".to_string();
        config.security.max_body_size = 16;
        let router = HttpServer::new(config).unwrap().router();

        let request = Request::post("/proxy/upload")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from(vec![b'x'; 64]))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_cors(&response);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Payload too large");
    }
}
