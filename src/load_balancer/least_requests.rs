//! Least outstanding requests load balancing strategy.

use std::sync::Arc;

use crate::load_balancer::{instance::Instance, LoadBalancer};

/// Selects the instance with the fewest in-flight requests.
#[derive(Debug, Default)]
pub struct LeastRequests;

impl LeastRequests {
    pub fn new() -> Self {
        Self
    }
}

impl LoadBalancer for LeastRequests {
    fn next_instance(&self, instances: &[Arc<Instance>]) -> Option<Arc<Instance>> {
        // In case of tie, the first one is selected (stability)
        instances.iter().min_by_key(|i| i.in_flight()).cloned()
    }
}
