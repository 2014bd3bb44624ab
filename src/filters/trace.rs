//! Request tracing filter.
//!
//! Guarantees that every request leaving the gateway carries exactly one
//! correlation ID.
//!
//! # Behaviour
//! ```text
//! header absent / empty / malformed → generate, attach, log "generated"
//! header present and valid          → keep as is,       log "found"
//! header present more than once     → keep first value only
//! ```
//!
//! # Design Decisions
//! - Runs at `FilterOrder::TRACE`, ahead of anything that reads the header
//! - Re-running on a tagged request is a no-op
//! - Downstream results are returned untouched; no retries, no remapping
//! - The rest of the chain runs inside a span carrying `correlation_id`

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use tracing::Instrument;

use super::{FilterOrder, FilterResult, FilterUtility, GatewayFilter, Next};
use crate::correlation::CorrelationId;

/// Pipeline stage that attaches or reuses the correlation ID.
#[derive(Debug, Clone, Default)]
pub struct TraceFilter {
    utility: FilterUtility,
}

impl TraceFilter {
    pub fn new(utility: FilterUtility) -> Self {
        Self { utility }
    }

    /// Tag `request` with a correlation ID, reusing a valid inbound one.
    ///
    /// Returns the request to forward and the ID it carries.
    pub fn apply<B>(&self, request: Request<B>) -> (Request<B>, CorrelationId) {
        let header = self.utility.header_name();
        match self.utility.extract_correlation_id(&request) {
            Some(id) => {
                tracing::info!(header = %header, correlation_id = %id, "mybank-correlation-id found in request");
                let request = if self.utility.value_count(&request) > 1 {
                    tracing::debug!(header = %header, correlation_id = %id, "Collapsing repeated correlation header");
                    self.utility.with_correlation_id(request, &id)
                } else {
                    request
                };
                (request, id)
            }
            None => {
                let id = CorrelationId::generate();
                let request = self.utility.with_correlation_id(request, &id);
                tracing::info!(header = %header, correlation_id = %id, "mybank-correlation-id generated");
                (request, id)
            }
        }
    }
}

#[async_trait]
impl GatewayFilter for TraceFilter {
    fn name(&self) -> &'static str {
        "request-trace"
    }

    fn order(&self) -> FilterOrder {
        FilterOrder::TRACE
    }

    async fn filter(&self, request: Request<Body>, next: Next<'_>) -> FilterResult {
        let (request, id) = self.apply(request);
        let span = tracing::info_span!("correlation", correlation_id = %id);
        next.run(request).instrument(span).await
    }
}
