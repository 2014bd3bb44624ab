//! Path-prefix routing to downstream services.
//!
//! # Data Flow
//! ```text
//! GET /mybank/accounts/api/fetchCustomerDetails
//!     → router.rs: most specific matching route (priority, then prefix length)
//!     → matcher.rs: host and prefix checks on segment boundaries
//!     → Route { service: "accounts", rewrite → /api/fetchCustomerDetails }
//! ```
//!
//! # Design Decisions
//! - The table is built at startup and never changes
//! - `/mybank/accounts` does not match `/mybank/accountsX`
//! - No match surfaces as `GatewayError::NoRoute` (404)

pub mod matcher;
pub mod router;

pub use router::{Route, Router};
