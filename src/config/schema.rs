//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::correlation::CORRELATION_ID_HEADER;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Route definitions mapping path prefixes to services.
    pub routes: Vec<RouteConfig>,

    /// Downstream services and their instances.
    pub services: Vec<ServiceConfig>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Correlation header settings.
    pub correlation: CorrelationConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Request limits.
    pub security: SecurityConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        let service = |name: &str, port: u16| ServiceConfig {
            name: name.to_string(),
            instances: vec![format!("127.0.0.1:{port}")],
            strategy: BalanceStrategy::RoundRobin,
        };
        let route = |name: &str| RouteConfig {
            id: name.to_string(),
            host: None,
            path_prefix: format!("/mybank/{name}"),
            service: name.to_string(),
            strip_prefix: true,
            priority: 0,
            timeout_ms: None,
        };

        Self {
            listener: ListenerConfig::default(),
            routes: vec![route("accounts"), route("cards"), route("loans")],
            services: vec![
                service("accounts", 8080),
                service("cards", 9000),
                service("loans", 8090),
            ],
            timeouts: TimeoutConfig::default(),
            correlation: CorrelationConfig::default(),
            observability: ObservabilityConfig::default(),
            security: SecurityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8072").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8072".to_string(),
        }
    }
}

/// Route configuration mapping requests to a downstream service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Route identifier for logging.
    pub id: String,

    /// Host header to match (exact match, case-insensitive).
    #[serde(default)]
    pub host: Option<String>,

    /// Path prefix to match, on segment boundaries.
    pub path_prefix: String,

    /// Service name to forward to.
    pub service: String,

    /// Remove `path_prefix` before forwarding.
    #[serde(default = "default_strip_prefix")]
    pub strip_prefix: bool,

    /// Route priority (higher = checked first).
    #[serde(default)]
    pub priority: u32,

    /// Upstream timeout override in milliseconds.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

fn default_strip_prefix() -> bool {
    true
}

/// A downstream service and its statically known instances.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Service name, matched case-insensitively.
    pub name: String,

    /// Instance addresses (e.g., "127.0.0.1:8080").
    pub instances: Vec<String>,

    /// Instance selection strategy.
    #[serde(default)]
    pub strategy: BalanceStrategy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceStrategy {
    #[default]
    RoundRobin,
    LeastRequests,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total time for a request through the gateway, in seconds.
    pub request_secs: u64,

    /// Default time to wait for a downstream response, in milliseconds.
    pub upstream_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            upstream_ms: 10_000,
        }
    }
}

/// Correlation header configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorrelationConfig {
    /// Header carrying the correlation ID.
    pub header_name: String,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            header_name: CORRELATION_ID_HEADER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_mirror_bank_services() {
        let config = GatewayConfig::default();
        let prefixes: Vec<_> = config.routes.iter().map(|r| r.path_prefix.as_str()).collect();
        assert_eq!(prefixes, vec!["/mybank/accounts", "/mybank/cards", "/mybank/loans"]);
        assert_eq!(config.correlation.header_name, "mybank-correlation-id");
    }

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [listener]
            bind_address = "127.0.0.1:9999"

            [[services]]
            name = "ACCOUNTS"
            instances = ["127.0.0.1:8080", "127.0.0.1:8081"]
            strategy = "least_requests"

            [[routes]]
            id = "accounts"
            path_prefix = "/mybank/accounts"
            service = "accounts"
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:9999");
        assert_eq!(config.services.len(), 1);
        assert_eq!(config.services[0].strategy, BalanceStrategy::LeastRequests);
        assert!(config.routes[0].strip_prefix);
        assert_eq!(config.timeouts.upstream_ms, 10_000);
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
    }
}
