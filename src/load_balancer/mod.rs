//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Route matched → service name identified
//!     → registry.rs (instances of the service)
//!     → Apply load balancing algorithm:
//!         - round_robin.rs (rotate through instances)
//!         - least_requests.rs (fewest in-flight requests)
//!     → instance.rs (in-flight guard held while forwarding)
//!     → Return instance or None
//! ```
//!
//! # Design Decisions
//! - Instances are declared statically; no registration protocol
//! - Algorithm selection per service
//! - Lock-free: atomics only

pub mod instance;
pub mod least_requests;
pub mod registry;
pub mod round_robin;

use std::sync::Arc;

use crate::load_balancer::instance::Instance;

/// Trait for load balancing algorithms.
pub trait LoadBalancer: Send + Sync + std::fmt::Debug {
    /// Select the next instance from the list.
    fn next_instance(&self, instances: &[Arc<Instance>]) -> Option<Arc<Instance>>;
}
