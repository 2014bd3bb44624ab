//! Correlation ID subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request headers
//!     → carrier.rs (uniform access to a header bag)
//!     → id.rs (parse / validate / generate the token)
//!     → filters::trace (decide reuse vs. generate)
//!     → downstream service
//!     → extract.rs (axum extractor reading the forwarded header)
//! ```
//!
//! # Design Decisions
//! - The header name is `mybank-correlation-id` on the wire
//! - Tokens are opaque; UUIDv4 text when the gateway mints one
//! - Malformed inbound values are replaced, never rejected, at the gateway

pub mod carrier;
pub mod extract;
pub mod id;

pub use carrier::HeaderCarrier;
pub use extract::CorrelationIdRejection;
pub use id::{CorrelationId, InvalidCorrelationId};

/// Well-known header carrying the correlation ID between services.
pub const CORRELATION_ID_HEADER: &str = "mybank-correlation-id";
