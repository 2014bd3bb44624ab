//! The correlation ID value type.

use std::fmt;
use std::str::FromStr;

use axum::http::HeaderValue;
use uuid::Uuid;

/// Error returned when a string is not a usable correlation token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidCorrelationId {
    #[error("correlation id is empty")]
    Empty,
    #[error("correlation id contains disallowed byte 0x{byte:02x} at offset {offset}")]
    DisallowedByte { byte: u8, offset: usize },
}

/// An opaque token identifying one logical request across service hops.
///
/// Always holds a valid token: non-empty, visible ASCII only, and free of the
/// `,` list delimiter, so it can be written back as a single header value.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CorrelationId {
    text: String,
    header: HeaderValue,
}

impl CorrelationId {
    /// Mint a fresh ID from a random (v4) UUID.
    pub fn generate() -> Self {
        let text = Uuid::new_v4().hyphenated().to_string();
        let header = HeaderValue::from_str(&text).expect("hyphenated uuid is a valid header value");
        Self { text, header }
    }

    /// Parse and validate a token.
    pub fn parse(text: &str) -> Result<Self, InvalidCorrelationId> {
        validate(text.as_bytes())?;
        let header = HeaderValue::from_str(text).expect("visible ASCII is a valid header value");
        Ok(Self {
            text: text.to_string(),
            header,
        })
    }

    /// Read a token out of a raw header value.
    pub fn from_header_value(value: &HeaderValue) -> Result<Self, InvalidCorrelationId> {
        let bytes = value.as_bytes();
        validate(bytes)?;
        Ok(Self {
            text: bytes.iter().copied().map(char::from).collect(),
            header: value.clone(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The token as a header value, ready to be inserted into a header map.
    pub fn header_value(&self) -> &HeaderValue {
        &self.header
    }
}

/// Non-empty, visible ASCII only, no `,`.
fn validate(bytes: &[u8]) -> Result<(), InvalidCorrelationId> {
    if bytes.is_empty() {
        return Err(InvalidCorrelationId::Empty);
    }
    match bytes
        .iter()
        .copied()
        .enumerate()
        .find(|&(_, b)| !b.is_ascii_graphic() || b == b',')
    {
        Some((offset, byte)) => Err(InvalidCorrelationId::DisallowedByte { byte, offset }),
        None => Ok(()),
    }
}

impl FromStr for CorrelationId {
    type Err = InvalidCorrelationId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl fmt::Debug for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CorrelationId").field(&self.text).finish()
    }
}

impl AsRef<str> for CorrelationId {
    fn as_ref(&self) -> &str {
        &self.text
    }
}
