//! Axum extractor for services sitting behind the gateway.
//!
//! A downstream handler declares `CorrelationId` as an argument to receive the
//! ID the gateway attached. Requests that bypassed the gateway (no header, or
//! a malformed one) are rejected with `400 Bad Request`.
//!
//! The extractor reads the wire default `mybank-correlation-id`. A gateway
//! started with a different `correlation.header_name` needs its downstream
//! services to read that header themselves, e.g. through
//! `FilterUtility::extract_correlation_id`.

use axum::extract::FromRequestParts;
use axum::http::{request::Parts, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::{CorrelationId, InvalidCorrelationId, CORRELATION_ID_HEADER};

/// Rejection produced by the `CorrelationId` extractor.
#[derive(Debug, thiserror::Error)]
pub enum CorrelationIdRejection {
    #[error("missing required header '{}'", CORRELATION_ID_HEADER)]
    Missing,
    #[error("malformed '{}' header: {}", CORRELATION_ID_HEADER, .0)]
    Malformed(#[from] InvalidCorrelationId),
}

impl IntoResponse for CorrelationIdRejection {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "errorCode": "BAD_REQUEST",
            "errorMessage": self.to_string(),
        });
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = CorrelationIdRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(CORRELATION_ID_HEADER)
            .ok_or(CorrelationIdRejection::Missing)?;
        Ok(CorrelationId::from_header_value(value)?)
    }
}
