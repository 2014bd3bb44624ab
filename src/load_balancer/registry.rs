//! Static service registry.
//!
//! # Responsibilities
//! - Hold the instances of every downstream service, keyed by name
//! - Apply the configured balancing strategy per service
//! - Hand out in-flight guards for the selected instance

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::schema::{BalanceStrategy, ServiceConfig};
use crate::load_balancer::{
    instance::{Instance, InstanceGuard},
    least_requests::LeastRequests,
    round_robin::RoundRobin,
    LoadBalancer,
};

struct ServiceGroup {
    instances: Vec<Arc<Instance>>,
    balancer: Box<dyn LoadBalancer>,
}

/// Resolves service names to concrete instances.
pub struct ServiceRegistry {
    services: HashMap<String, ServiceGroup>,
}

impl ServiceRegistry {
    /// Build the registry from configuration. Names are case-insensitive.
    pub fn new(configs: Vec<ServiceConfig>) -> Self {
        let mut services = HashMap::new();

        for config in configs {
            let instances: Vec<Arc<Instance>> = config
                .instances
                .iter()
                .filter_map(|address| match address.parse() {
                    Ok(addr) => Some(Arc::new(Instance::new(addr))),
                    Err(_) => {
                        tracing::warn!(service = %config.name, address = %address, "Invalid instance address");
                        None
                    }
                })
                .collect();

            let balancer: Box<dyn LoadBalancer> = match config.strategy {
                BalanceStrategy::RoundRobin => Box::new(RoundRobin::new()),
                BalanceStrategy::LeastRequests => Box::new(LeastRequests::new()),
            };

            tracing::debug!(
                service = %config.name,
                instances = instances.len(),
                strategy = ?config.strategy,
                "Service registered"
            );
            services.insert(config.name.to_lowercase(), ServiceGroup { instances, balancer });
        }

        Self { services }
    }

    /// Select an instance of `service`.
    pub fn select(&self, service: &str) -> Option<InstanceGuard> {
        let Some(group) = self.services.get(&service.to_lowercase()) else {
            tracing::debug!(service = %service, "Service not registered");
            return None;
        };
        group
            .balancer
            .next_instance(&group.instances)
            .map(|instance| instance.acquire())
    }

    /// Names of all registered services.
    pub fn service_names(&self) -> Vec<&str> {
        self.services.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_is_case_insensitive() {
        let registry = ServiceRegistry::new(vec![ServiceConfig {
            name: "ACCOUNTS".into(),
            instances: vec!["127.0.0.1:8080".into(), "127.0.0.1:8081".into()],
            strategy: BalanceStrategy::RoundRobin,
        }]);

        let first = registry.select("accounts").unwrap();
        let second = registry.select("Accounts").unwrap();
        assert_ne!(first.addr, second.addr);
        assert!(registry.select("cards").is_none());
    }

    #[test]
    fn test_service_without_valid_instances() {
        let registry = ServiceRegistry::new(vec![ServiceConfig {
            name: "loans".into(),
            instances: vec!["nope".into()],
            strategy: BalanceStrategy::LeastRequests,
        }]);
        assert!(registry.select("loans").is_none());
        assert_eq!(registry.service_names(), vec!["loans"]);
    }
}
