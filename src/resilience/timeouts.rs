//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap downstream calls with a deadline
//! - Cancel the call cleanly when the deadline passes
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors
//! - Timed-out requests return 504 Gateway Timeout

use std::future::Future;
use std::time::Duration;

use crate::http::error::{BoxError, GatewayError};

/// Await `call`, failing with `UpstreamTimeout` once `after` has elapsed.
pub async fn with_timeout<F, T, E>(service: &str, after: Duration, call: F) -> Result<T, GatewayError>
where
    F: Future<Output = Result<T, E>>,
    E: Into<BoxError>,
{
    match tokio::time::timeout(after, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(GatewayError::Upstream {
            service: service.to_string(),
            source: e.into(),
        }),
        Err(_) => Err(GatewayError::UpstreamTimeout {
            service: service.to_string(),
            after,
        }),
    }
}
