//! Gateway filter pipeline.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → FilterChain::execute
//!     → filters sorted by FilterOrder (lowest first)
//!         - trace.rs   (order 1: attach / reuse correlation ID)
//!         - logging.rs (order 2: log + metrics, sees the ID)
//!     → Forwarder (terminal: route, pick instance, proxy)
//!     ← Response or GatewayError, passed back through every filter
//! ```
//!
//! # Design Decisions
//! - Ordering is declared at registration time, not discovered
//! - A filter owns the request it receives; handing it to `Next` moves it on
//! - `Next` is consumed by `run`, so a filter forwards at most once
//! - Filters share no per-request state; all of it travels with the request

pub mod logging;
pub mod trace;
pub mod utility;

pub use logging::LoggingFilter;
pub use trace::TraceFilter;
pub use utility::FilterUtility;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use futures_util::future::BoxFuture;

use crate::http::error::GatewayError;

/// Result of running (part of) the pipeline.
pub type FilterResult = Result<Response<Body>, GatewayError>;

/// Execution priority of a filter. Lower values run first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FilterOrder(pub i32);

impl FilterOrder {
    pub const HIGHEST: FilterOrder = FilterOrder(i32::MIN);
    pub const LOWEST: FilterOrder = FilterOrder(i32::MAX);
    /// Correlation tracing runs before anything that reads the header.
    pub const TRACE: FilterOrder = FilterOrder(1);
    pub const LOGGING: FilterOrder = FilterOrder(2);
}

impl fmt::Display for FilterOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stage of the gateway pipeline.
#[async_trait]
pub trait GatewayFilter: Send + Sync {
    /// Filter name for identification and logging.
    fn name(&self) -> &'static str;

    /// Position in the chain.
    fn order(&self) -> FilterOrder;

    /// Process a request and hand it to the rest of the chain.
    async fn filter(&self, request: Request<Body>, next: Next<'_>) -> FilterResult;
}

/// Terminal stage: sends the request to the downstream service.
#[async_trait]
pub trait Forwarder: Send + Sync {
    async fn forward(&self, request: Request<Body>) -> FilterResult;
}

/// The remainder of a filter chain.
pub struct Next<'a> {
    filters: &'a [Arc<dyn GatewayFilter>],
    forwarder: &'a dyn Forwarder,
}

impl<'a> Next<'a> {
    /// Run the next filter, or forward once every filter has run.
    pub fn run(self, request: Request<Body>) -> BoxFuture<'a, FilterResult> {
        Box::pin(async move {
            match self.filters.split_first() {
                Some((filter, rest)) => {
                    let next = Next {
                        filters: rest,
                        forwarder: self.forwarder,
                    };
                    filter.filter(request, next).await
                }
                None => self.forwarder.forward(request).await,
            }
        })
    }
}

/// Ordered set of filters in front of a forwarder.
pub struct FilterChain {
    filters: Vec<Arc<dyn GatewayFilter>>,
    forwarder: Arc<dyn Forwarder>,
}

impl FilterChain {
    /// Create an empty chain that forwards straight to `forwarder`.
    pub fn new(forwarder: Arc<dyn Forwarder>) -> Self {
        Self {
            filters: Vec::new(),
            forwarder,
        }
    }

    /// Register a filter. Filters with equal order keep registration order.
    pub fn with_filter<F: GatewayFilter + 'static>(mut self, filter: F) -> Self {
        self.add(Arc::new(filter));
        self
    }

    /// Register a shared filter.
    pub fn add(&mut self, filter: Arc<dyn GatewayFilter>) {
        let order = filter.order();
        let index = self.filters.partition_point(|f| f.order() <= order);
        tracing::debug!(filter = filter.name(), %order, position = index, "Filter registered");
        self.filters.insert(index, filter);
    }

    /// Names of all filters in execution order.
    pub fn names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Run a request through every filter and the forwarder.
    pub async fn execute(&self, request: Request<Body>) -> FilterResult {
        let next = Next {
            filters: &self.filters,
            forwarder: self.forwarder.as_ref(),
        };
        next.run(request).await
    }
}
