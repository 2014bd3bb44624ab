//! Gateway configuration.
//!
//! # Data Flow
//! ```text
//! mybank-gateway.toml (or built-in defaults: accounts, cards, loans)
//!     → loader.rs (read file, deserialize sections)
//!     → validation.rs (addresses, prefixes, route → service references)
//!     → GatewayConfig handed to GatewayServer::new
//! ```
//!
//! # Design Decisions
//! - Read once at startup; a restart picks up changes
//! - Every section has defaults, so an empty file is a working config
//! - Validation reports every problem at once, not just the first

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{GatewayConfig, ListenerConfig, RouteConfig, ServiceConfig};
pub use validation::ValidationError;
