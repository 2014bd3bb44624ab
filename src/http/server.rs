//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the gateway handler
//! - Wire up middleware (tracing, timeout, body limit)
//! - Assemble the filter chain (trace, logging, forwarder)
//! - Bind server to listener and shut down gracefully

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderName, Request},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::GatewayConfig;
use crate::filters::{FilterChain, FilterUtility, LoggingFilter, TraceFilter};
use crate::http::forward::ProxyForwarder;
use crate::load_balancer::registry::ServiceRegistry;
use crate::routing::Router as RouteTable;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub chain: Arc<FilterChain>,
}

/// HTTP server for the gateway.
pub struct GatewayServer {
    router: Router,
    config: GatewayConfig,
}

impl GatewayServer {
    /// Create a gateway that proxies to the configured services.
    pub fn new(config: GatewayConfig) -> Self {
        let chain = Self::build_chain(&config);
        Self::with_chain(config, chain)
    }

    /// Create a gateway around a prepared filter chain.
    pub fn with_chain(config: GatewayConfig, chain: FilterChain) -> Self {
        tracing::info!(filters = ?chain.names(), "Filter chain assembled");
        let state = AppState {
            chain: Arc::new(chain),
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Standard chain: correlation tracing, access logging, proxy forwarder.
    pub fn build_chain(config: &GatewayConfig) -> FilterChain {
        let routes = Arc::new(RouteTable::from_config(config.routes.clone()));
        let registry = Arc::new(ServiceRegistry::new(config.services.clone()));
        let utility = Self::filter_utility(config);
        let forwarder = ProxyForwarder::new(
            routes,
            registry,
            Duration::from_millis(config.timeouts.upstream_ms),
        )
        .with_correlation_header(utility.header_name().clone());

        FilterChain::new(Arc::new(forwarder))
            .with_filter(TraceFilter::new(utility.clone()))
            .with_filter(LoggingFilter::new(utility))
    }

    fn filter_utility(config: &GatewayConfig) -> FilterUtility {
        match HeaderName::from_bytes(config.correlation.header_name.as_bytes()) {
            Ok(name) => FilterUtility::new(name),
            Err(e) => {
                tracing::warn!(
                    header = %config.correlation.header_name,
                    error = %e,
                    "Invalid correlation header name, using default"
                );
                FilterUtility::default()
            }
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/actuator/health", get(health_handler))
            .route("/", any(gateway_handler))
            .route("/{*path}", any(gateway_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
                    // innermost: the timeout fills its 408 body via `Default`
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// The assembled router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until a shutdown signal arrives.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Gateway server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("Gateway server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Runs every proxied request through the filter chain.
async fn gateway_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let path = request.uri().path().to_string();
    match state.chain.execute(request).await {
        Ok(response) => response,
        Err(e) => e.into_error_response(&path),
    }
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "UP" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{FilterResult, Forwarder};
    use crate::http::error::GatewayError;
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    struct EchoCorrelation;

    #[async_trait]
    impl Forwarder for EchoCorrelation {
        async fn forward(&self, request: Request<Body>) -> FilterResult {
            let id = request
                .headers()
                .get("mybank-correlation-id")
                .cloned()
                .unwrap_or(axum::http::HeaderValue::from_static("missing"));
            Ok(Response::new(Body::from(id.as_bytes().to_vec())))
        }
    }

    struct Unreachable;

    #[async_trait]
    impl Forwarder for Unreachable {
        async fn forward(&self, _request: Request<Body>) -> FilterResult {
            Err(GatewayError::NoInstance {
                service: "accounts".into(),
            })
        }
    }

    fn gateway(forwarder: Arc<dyn Forwarder>) -> Router {
        let chain = FilterChain::new(forwarder).with_filter(TraceFilter::default());
        GatewayServer::with_chain(GatewayConfig::default(), chain).router()
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_handler_forwards_tagged_request() {
        let response = gateway(Arc::new(EchoCorrelation))
            .oneshot(
                Request::builder()
                    .uri("/mybank/accounts/api/fetch")
                    .header("mybank-correlation-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "abc-123");
    }

    #[tokio::test]
    async fn test_handler_maps_errors() {
        let response = gateway(Arc::new(Unreachable))
            .oneshot(Request::builder().uri("/mybank/accounts/x").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["apiPath"], "/mybank/accounts/x");
        assert_eq!(body["errorCode"], "SERVICE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected_before_the_chain() {
        let mut config = GatewayConfig::default();
        config.security.max_body_size = 16;
        let chain = FilterChain::new(Arc::new(EchoCorrelation)).with_filter(TraceFilter::default());
        let router = GatewayServer::with_chain(config, chain).router();

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/mybank/accounts/api/create")
                    .header("content-length", "64")
                    .body(Body::from(vec![b'x'; 64]))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = gateway(Arc::new(Unreachable))
            .oneshot(Request::builder().uri("/actuator/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, r#"{"status":"UP"}"#);
    }
}
