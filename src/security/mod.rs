//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → tower-http body limit (configured max_body_size, 413 on excess)
//!     → filter chain
//!     → headers.rs (strip hop-by-hop, add X-Forwarded-*) before forwarding
//! ```
//!
//! # Design Decisions
//! - No trust in client transport headers
//! - End-to-end headers (including the correlation ID) pass untouched

pub mod headers;
