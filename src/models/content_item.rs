//! The decoded body of an inbound content `PUT`.

use serde::de::{Deserialize, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde_json::error::Category;
use std::fmt;
use thiserror::Error;

const PUBLISHING_APP: &str = "publishing_app";

/// The part of a content item the gateway needs before forwarding it.
///
/// Everything else in the body is opaque and is forwarded byte-for-byte.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContentStoreRequest {
    /// Application claiming ownership of the base path. A missing or null
    /// field decodes as empty and is left for the arbiter to reject.
    pub publishing_app: String,
}

impl<'de> Deserialize<'de> for ContentStoreRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RequestVisitor)
    }
}

/// Walks the object in document order. The key matches case-insensitively
/// and a repeated key overwrites the earlier value; `null` leaves it as is.
struct RequestVisitor;

impl<'de> Visitor<'de> for RequestVisitor {
    type Value = ContentStoreRequest;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a content item object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut request = ContentStoreRequest::default();
        while let Some(key) = map.next_key::<String>()? {
            if key.eq_ignore_ascii_case(PUBLISHING_APP) {
                if let Some(app) = map.next_value::<Option<String>>()? {
                    request.publishing_app = app;
                }
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(request)
    }
}

/// Why a request body could not be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The body is not well-formed JSON (includes an empty or truncated body).
    #[error("{0}")]
    Syntax(serde_json::Error),
    /// The body is JSON but does not have the expected shape.
    #[error("{0}")]
    Other(serde_json::Error),
}

impl ContentStoreRequest {
    pub fn from_slice(body: &[u8]) -> Result<Self, DecodeError> {
        serde_json::from_slice(body).map_err(|err| match err.classify() {
            Category::Syntax | Category::Eof => DecodeError::Syntax(err),
            Category::Data | Category::Io => DecodeError::Other(err),
        })
    }
}
