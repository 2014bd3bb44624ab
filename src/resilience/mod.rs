//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to downstream service:
//!     → timeouts.rs (enforce per-route upstream deadline)
//!     → On expiry: GatewayError::UpstreamTimeout (504)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every downstream call has a deadline
//! - No retries at the gateway; failures surface to the caller unchanged

pub mod timeouts;
