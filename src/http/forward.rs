//! Terminal pipeline stage: proxy the request to a downstream service.
//!
//! # Responsibilities
//! - Resolve the route and the target service
//! - Pick an instance through the service registry
//! - Rewrite the URI and transport headers, keep end-to-end headers
//! - Enforce the upstream deadline
//!
//! # Design Decisions
//! - Request bodies are streamed, never buffered
//! - No retries; every failure maps to one `GatewayError`
//! - The in-flight guard lives until the response head arrives
//! - The correlation header is never stripped as hop-by-hop

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::uri::Scheme;
use axum::http::{header, HeaderName, Request, Response, Uri, Version};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::correlation::CORRELATION_ID_HEADER;
use crate::filters::{FilterResult, Forwarder};
use crate::http::error::GatewayError;
use crate::load_balancer::registry::ServiceRegistry;
use crate::observability::metrics;
use crate::resilience::timeouts::with_timeout;
use crate::routing::Router as RouteTable;
use crate::security::headers;

/// Forwards requests to statically registered service instances.
pub struct ProxyForwarder {
    routes: Arc<RouteTable>,
    registry: Arc<ServiceRegistry>,
    client: Client<HttpConnector, Body>,
    default_timeout: Duration,
    correlation_header: HeaderName,
}

impl ProxyForwarder {
    pub fn new(routes: Arc<RouteTable>, registry: Arc<ServiceRegistry>, default_timeout: Duration) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self {
            routes,
            registry,
            client,
            default_timeout,
            correlation_header: HeaderName::from_static(CORRELATION_ID_HEADER),
        }
    }

    /// Header that hop-by-hop stripping must leave in place.
    pub fn with_correlation_header(mut self, name: HeaderName) -> Self {
        self.correlation_header = name;
        self
    }
}

#[async_trait]
impl Forwarder for ProxyForwarder {
    async fn forward(&self, request: Request<Body>) -> FilterResult {
        let (mut parts, body) = request.into_parts();

        let route = self
            .routes
            .match_request(&parts)
            .ok_or_else(|| GatewayError::NoRoute {
                path: parts.uri.path().to_string(),
            })?;

        let instance = self
            .registry
            .select(&route.service)
            .ok_or_else(|| GatewayError::NoInstance {
                service: route.service.clone(),
            })?;

        let uri = Uri::builder()
            .scheme(Scheme::HTTP)
            .authority(instance.addr.to_string())
            .path_and_query(route.rewrite_path(parts.uri.path(), parts.uri.query()))
            .build()
            .map_err(|e| GatewayError::InvalidUpstreamUri {
                service: route.service.clone(),
                reason: e.to_string(),
            })?;

        let client_ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());
        headers::strip_hop_by_hop(&mut parts.headers, &self.correlation_header);
        headers::add_forwarded(&mut parts.headers, client_ip);
        // the client derives Host from the new authority
        parts.headers.remove(header::HOST);
        parts.uri = uri;
        parts.version = Version::HTTP_11;

        tracing::debug!(
            route = %route.id,
            service = %route.service,
            instance = %instance.addr,
            uri = %parts.uri,
            "Forwarding request"
        );

        let timeout = route.timeout.unwrap_or(self.default_timeout);
        let start = Instant::now();
        let result = with_timeout(
            &route.service,
            timeout,
            self.client.request(Request::from_parts(parts, body)),
        )
        .await;

        match result {
            Ok(response) => {
                metrics::record_upstream(&route.service, "ok", start);
                let (mut parts, body) = response.into_parts();
                headers::strip_hop_by_hop(&mut parts.headers, &self.correlation_header);
                Ok(Response::from_parts(parts, Body::new(body)))
            }
            Err(e) => {
                let outcome = match &e {
                    GatewayError::UpstreamTimeout { .. } => "timeout",
                    _ => "error",
                };
                metrics::record_upstream(&route.service, outcome, start);
                tracing::error!(
                    service = %route.service,
                    instance = %instance.addr,
                    error = %e,
                    "Upstream error"
                );
                Err(e)
            }
        }
    }
}
