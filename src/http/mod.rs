//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, tower-http layers)
//!     → filters::FilterChain (trace, logging)
//!     → forward.rs (route, pick instance, proxy)
//!     → error.rs (GatewayError → JSON error response)
//!     → Send to client
//! ```

pub mod error;
pub mod forward;
pub mod server;

pub use error::GatewayError;
pub use forward::ProxyForwarder;
pub use server::GatewayServer;
