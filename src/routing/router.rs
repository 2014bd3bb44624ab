//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store compiled routes
//! - Look up matching route for request
//! - Rewrite the request path for the downstream service
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan in priority order (acceptable for typical route counts)
//! - Longer prefixes win among equal priorities
//! - Explicit `None` rather than silent default

use std::time::Duration;

use axum::http::request::Parts;

use crate::config::RouteConfig;
use crate::routing::matcher::{HostMatcher, Matcher, PathPrefixMatcher};

/// A compiled route.
#[derive(Debug)]
pub struct Route {
    pub id: String,
    /// Lowercased service name.
    pub service: String,
    pub priority: u32,
    pub timeout: Option<Duration>,
    strip_prefix: bool,
    path: PathPrefixMatcher,
    host: Option<HostMatcher>,
}

impl Route {
    pub fn from_config(config: RouteConfig) -> Self {
        Self {
            id: config.id,
            service: config.service.to_lowercase(),
            priority: config.priority,
            timeout: config.timeout_ms.map(Duration::from_millis),
            strip_prefix: config.strip_prefix,
            path: PathPrefixMatcher::new(config.path_prefix),
            host: config.host.map(HostMatcher::new),
        }
    }

    pub fn matches(&self, req: &Parts) -> bool {
        self.path.matches(req) && self.host.as_ref().map_or(true, |h| h.matches(req))
    }

    /// Path (and query) to request from the downstream service.
    pub fn rewrite_path(&self, path: &str, query: Option<&str>) -> String {
        let path = if self.strip_prefix {
            match self.path.remainder(path) {
                Some("") | None => "/",
                Some(rest) => rest,
            }
        } else {
            path
        };
        match query {
            Some(q) => format!("{path}?{q}"),
            None => path.to_string(),
        }
    }
}

/// Immutable, priority-ordered route table.
#[derive(Debug, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Compile routes from configuration.
    pub fn from_config(configs: Vec<RouteConfig>) -> Self {
        let mut routes: Vec<Route> = configs.into_iter().map(Route::from_config).collect();
        routes.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| b.path.prefix().len().cmp(&a.path.prefix().len()))
        });
        for route in &routes {
            tracing::debug!(route = %route.id, prefix = %route.path.prefix(), service = %route.service, "Route compiled");
        }
        Self { routes }
    }

    /// First route matching the request.
    pub fn match_request(&self, req: &Parts) -> Option<&Route> {
        self.routes.iter().find(|r| r.matches(req))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
