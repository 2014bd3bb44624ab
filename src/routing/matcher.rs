//! Request conditions a route can require.
//!
//! Both matchers look only at the request head (`Parts`), so routing never
//! touches the body.
//!
//! - `HostMatcher`: `Host` header, ignoring case and any `:port`
//! - `PathPrefixMatcher`: path prefix on segment boundaries, case-sensitive.
//!   `/mybank/accounts` matches `/mybank/accounts` and `/mybank/accounts/...`,
//!   never `/mybank/accountsX`

use axum::http::uri::Authority;
use axum::http::{header, request::Parts};

pub trait Matcher: Send + Sync + std::fmt::Debug {
    fn matches(&self, req: &Parts) -> bool;
}

/// Matches the authority the client addressed.
#[derive(Debug, Clone)]
pub struct HostMatcher {
    host: String,
}

impl HostMatcher {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    fn request_authority(req: &Parts) -> Option<Authority> {
        match req.headers.get(header::HOST) {
            Some(value) => Authority::try_from(value.as_bytes()).ok(),
            None => req.uri.authority().cloned(),
        }
    }
}

impl Matcher for HostMatcher {
    fn matches(&self, req: &Parts) -> bool {
        Self::request_authority(req).is_some_and(|a| a.host().eq_ignore_ascii_case(&self.host))
    }
}

/// Matches the request path prefix.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher. A trailing `/` is ignored.
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let trimmed = prefix.trim_end_matches('/');
        Self {
            prefix: trimmed.to_string(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The part of `path` after the prefix, if the prefix matches.
    pub fn remainder<'p>(&self, path: &'p str) -> Option<&'p str> {
        let rest = path.strip_prefix(self.prefix.as_str())?;
        if rest.is_empty() || rest.starts_with('/') || self.prefix.is_empty() {
            Some(rest)
        } else {
            None
        }
    }
}

impl Matcher for PathPrefixMatcher {
    fn matches(&self, req: &Parts) -> bool {
        self.remainder(req.uri.path()).is_some()
    }
}
