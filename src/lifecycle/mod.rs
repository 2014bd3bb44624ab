//! Process lifecycle.
//!
//! ```text
//! SIGINT / SIGTERM
//!     → signals::forward_to
//!     → Shutdown::trigger
//!     → GatewayServer::run stops accepting, drains in-flight requests, returns
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
