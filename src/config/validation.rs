//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (routes reference existing services)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Detect duplicate route ids and service names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use axum::http::HeaderName;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    BindAddress(String),
    #[error("route '{route}': path_prefix '{prefix}' must start with '/'")]
    PathPrefix { route: String, prefix: String },
    #[error("route '{route}' references unknown service '{service}'")]
    UnknownService { route: String, service: String },
    #[error("duplicate route id '{0}'")]
    DuplicateRoute(String),
    #[error("duplicate service '{0}'")]
    DuplicateService(String),
    #[error("service '{0}' has no instances")]
    NoInstances(String),
    #[error("service '{service}': invalid instance address '{address}'")]
    InstanceAddress { service: String, address: String },
    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),
    #[error("invalid correlation header name '{0}'")]
    HeaderName(String),
    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    let mut services = HashSet::new();
    for service in &config.services {
        let name = service.name.to_lowercase();
        if !services.insert(name.clone()) {
            errors.push(ValidationError::DuplicateService(name.clone()));
        }
        if service.instances.is_empty() {
            errors.push(ValidationError::NoInstances(name.clone()));
        }
        for address in &service.instances {
            if address.parse::<SocketAddr>().is_err() {
                errors.push(ValidationError::InstanceAddress {
                    service: name.clone(),
                    address: address.clone(),
                });
            }
        }
    }

    let mut route_ids = HashSet::new();
    for route in &config.routes {
        if !route_ids.insert(route.id.as_str()) {
            errors.push(ValidationError::DuplicateRoute(route.id.clone()));
        }
        if !route.path_prefix.starts_with('/') {
            errors.push(ValidationError::PathPrefix {
                route: route.id.clone(),
                prefix: route.path_prefix.clone(),
            });
        }
        if !services.contains(&route.service.to_lowercase()) {
            errors.push(ValidationError::UnknownService {
                route: route.id.clone(),
                service: route.service.clone(),
            });
        }
        if route.timeout_ms == Some(0) {
            errors.push(ValidationError::ZeroTimeout("routes.timeout_ms"));
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.request_secs"));
    }
    if config.timeouts.upstream_ms == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.upstream_ms"));
    }

    if HeaderName::from_bytes(config.correlation.header_name.as_bytes()).is_err() {
        errors.push(ValidationError::HeaderName(config.correlation.header_name.clone()));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
