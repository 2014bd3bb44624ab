//! Header helpers shared by gateway filters.
//!
//! All operations that change headers take the carrier by value and hand back
//! the changed one. A caller keeping its own clone of the original request
//! never observes the change.

use axum::http::{HeaderName, HeaderValue};

use crate::correlation::{CorrelationId, HeaderCarrier, CORRELATION_ID_HEADER};

/// Stateless helper for reading and writing the correlation header.
#[derive(Debug, Clone)]
pub struct FilterUtility {
    header_name: HeaderName,
}

impl FilterUtility {
    /// Create a utility bound to a custom correlation header.
    pub fn new(header_name: HeaderName) -> Self {
        Self { header_name }
    }

    pub fn header_name(&self) -> &HeaderName {
        &self.header_name
    }

    /// First value of the correlation header, if it holds a valid token.
    ///
    /// Empty and malformed values count as absent.
    pub fn extract_correlation_id<C>(&self, carrier: &C) -> Option<CorrelationId>
    where
        C: HeaderCarrier + ?Sized,
    {
        let value = carrier.headers().get(&self.header_name)?;
        match CorrelationId::from_header_value(value) {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::debug!(header = %self.header_name, error = %e, "Ignoring malformed correlation header");
                None
            }
        }
    }

    /// Number of values the correlation header carries.
    pub fn value_count<C>(&self, carrier: &C) -> usize
    where
        C: HeaderCarrier + ?Sized,
    {
        carrier.headers().get_all(&self.header_name).iter().count()
    }

    /// Return the carrier with `name` set to exactly `value`.
    pub fn with_header<C: HeaderCarrier>(&self, mut carrier: C, name: HeaderName, value: HeaderValue) -> C {
        // insert() drops every previous value for the name
        carrier.headers_mut().insert(name, value);
        carrier
    }

    /// Return the carrier tagged with `id` under the correlation header.
    pub fn with_correlation_id<C: HeaderCarrier>(&self, carrier: C, id: &CorrelationId) -> C {
        self.with_header(carrier, self.header_name.clone(), id.header_value().clone())
    }
}

impl Default for FilterUtility {
    fn default() -> Self {
        Self::new(HeaderName::from_static(CORRELATION_ID_HEADER))
    }
}
