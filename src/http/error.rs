//! Gateway error type and its mapping to HTTP responses.
//!
//! # Design Decisions
//! - One error type flows through the whole filter chain, so any stage can
//!   return a downstream failure verbatim
//! - Status mapping lives here, not in the filters
//! - Error bodies follow the `{apiPath, errorCode, errorMessage, errorTimestamp}`
//!   shape the banking services use

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Boxed error used for opaque upstream failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors produced while routing and forwarding a request.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("no route matches path '{path}'")]
    NoRoute { path: String },

    #[error("no available instance for service '{service}'")]
    NoInstance { service: String },

    #[error("service '{service}' did not respond within {after:?}")]
    UpstreamTimeout { service: String, after: Duration },

    #[error("request to service '{service}' failed: {source}")]
    Upstream {
        service: String,
        #[source]
        source: BoxError,
    },

    #[error("cannot build upstream uri for service '{service}': {reason}")]
    InvalidUpstreamUri { service: String, reason: String },
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::NoRoute { .. } => StatusCode::NOT_FOUND,
            GatewayError::NoInstance { .. } => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::UpstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::Upstream { .. } | GatewayError::InvalidUpstreamUri { .. } => {
                StatusCode::BAD_GATEWAY
            }
        }
    }

    /// Render the error for the client, tagged with the request path.
    pub fn into_error_response(self, api_path: &str) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            api_path: api_path.to_string(),
            error_code: status
                .canonical_reason()
                .unwrap_or("UNKNOWN")
                .to_uppercase()
                .replace(' ', "_"),
            error_message: self.to_string(),
            error_timestamp: chrono::Utc::now().to_rfc3339(),
        };
        (status, Json(body)).into_response()
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        self.into_error_response("")
    }
}

/// JSON error body returned to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub api_path: String,
    pub error_code: String,
    pub error_message: String,
    pub error_timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err = GatewayError::NoRoute { path: "/x".into() };
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err = GatewayError::UpstreamTimeout {
            service: "accounts".into(),
            after: Duration::from_secs(5),
        };
        assert_eq!(err.status_code(), StatusCode::GATEWAY_TIMEOUT);

        let err = GatewayError::Upstream {
            service: "accounts".into(),
            source: "connection refused".into(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            err.to_string(),
            "request to service 'accounts' failed: connection refused"
        );
    }

    #[test]
    fn test_error_response_shape() {
        let err = GatewayError::NoInstance { service: "loans".into() };
        let response = err.into_error_response("/mybank/loans/api/fetch");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
