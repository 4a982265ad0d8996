//! Wire-level types exchanged with a transport consumer.
//!
//! Everything here is plain data: a [`Method`] plus a URI plus
//! [`RequestOptions`] goes in, a [`ResponseEnvelope`] comes out. Envelopes
//! are serializable so the connection layer can keep them in a cache store.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::query::Params;

/// HTTP verbs understood by the pipeline.
///
/// The connection layer only dispatches `Get` and `Post`; every other verb
/// is rejected with an unsupported-verb error before reaching a consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Adapted request options handed to a consumer.
///
/// Produced by merging the consumer's two adaptation hooks: the parameter
/// adaptation supplies `body`, the header derivation supplies `headers`.
/// `BTreeMap` keeps the serialized form deterministic, which the connection
/// relies on when deriving cache keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestOptions {
    pub body: Params,
    pub headers: BTreeMap<String, String>,
}

impl RequestOptions {
    pub fn new(body: Params) -> Self {
        Self {
            body,
            headers: BTreeMap::new(),
        }
    }
}

/// Normalized response returned by a consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub status: u16,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub body: Option<Value>,
}

impl ResponseEnvelope {
    /// Envelope with the given status and no body.
    pub fn status(status: u16) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: None,
        }
    }

    /// Envelope with the given status and JSON body.
    pub fn with_body(status: u16, body: Value) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: Some(body),
        }
    }

    /// Whether this response counts as a hit.
    ///
    /// Status 200 is the only success signal; 2xx codes other than 200 are
    /// treated like failures and bypass collection construction.
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn method_as_str() {
        assert_eq!(Method::Get.as_str(), "GET");
        assert_eq!(Method::Post.as_str(), "POST");
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }

    #[test]
    fn only_exact_200_is_success() {
        assert!(ResponseEnvelope::status(200).is_success());
        assert!(!ResponseEnvelope::status(201).is_success());
        assert!(!ResponseEnvelope::status(204).is_success());
        assert!(!ResponseEnvelope::status(404).is_success());
        assert!(!ResponseEnvelope::status(500).is_success());
    }

    #[test]
    fn envelope_round_trips_through_json() {
        let envelope = ResponseEnvelope::with_body(200, json!({"data": [1, 2, 3]}));
        let raw = serde_json::to_string(&envelope).unwrap();
        let back: ResponseEnvelope = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, envelope);
    }
}
