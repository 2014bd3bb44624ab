//! Access logging filter.
//!
//! Logs each request with its correlation ID on the way in and the outcome on
//! the way out. Registered after the trace filter, so the ID is always there.

use std::time::Instant;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;

use super::{FilterOrder, FilterResult, FilterUtility, GatewayFilter, Next};
use crate::observability::metrics;

#[derive(Debug, Clone, Default)]
pub struct LoggingFilter {
    utility: FilterUtility,
}

impl LoggingFilter {
    pub fn new(utility: FilterUtility) -> Self {
        Self { utility }
    }
}

#[async_trait]
impl GatewayFilter for LoggingFilter {
    fn name(&self) -> &'static str {
        "access-log"
    }

    fn order(&self) -> FilterOrder {
        FilterOrder::LOGGING
    }

    async fn filter(&self, request: Request<Body>, next: Next<'_>) -> FilterResult {
        let start = Instant::now();
        let method = request.method().clone();
        let path = request.uri().path().to_string();
        let correlation_id = self
            .utility
            .extract_correlation_id(&request)
            .map(|id| id.to_string())
            .unwrap_or_else(|| "none".to_string());

        tracing::debug!(
            correlation_id = %correlation_id,
            method = %method,
            path = %path,
            "Routing request"
        );

        let result = next.run(request).await;

        match &result {
            Ok(response) => {
                tracing::info!(
                    correlation_id = %correlation_id,
                    method = %method,
                    path = %path,
                    status = response.status().as_u16(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Request completed"
                );
                metrics::record_request(method.as_str(), response.status().as_u16(), start);
            }
            Err(e) => {
                tracing::warn!(
                    correlation_id = %correlation_id,
                    method = %method,
                    path = %path,
                    status = e.status_code().as_u16(),
                    error = %e,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Request failed"
                );
                metrics::record_request(method.as_str(), e.status_code().as_u16(), start);
            }
        }

        result
    }
}
