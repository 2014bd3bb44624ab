//! MyBank edge gateway library.
//!
//! Fronts the bank's downstream services and guarantees every proxied request
//! carries a `mybank-correlation-id` header.

pub mod config;
pub mod correlation;
pub mod filters;
pub mod http;
pub mod lifecycle;
pub mod load_balancer;
pub mod observability;
pub mod resilience;
pub mod routing;
pub mod security;

pub use config::GatewayConfig;
pub use correlation::{CorrelationId, CORRELATION_ID_HEADER};
pub use filters::{FilterChain, FilterOrder, FilterUtility, GatewayFilter, TraceFilter};
pub use http::{GatewayError, GatewayServer};
pub use lifecycle::Shutdown;
