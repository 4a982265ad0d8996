//! The transport consumer seam.
//!
//! A consumer performs one HTTP round-trip and normalizes the result into a
//! [`ResponseEnvelope`]. The pipeline treats it as fully opaque: connection
//! pooling, timeouts, retries, and authentication all belong on this side
//! of the seam. Non-2xx statuses are data, not errors - a consumer only
//! fails with [`TransportError`] when no response could be produced at all.

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::query::Params;
use crate::wire::{Method, RequestOptions, ResponseEnvelope};

/// Network-level failure from a transport consumer.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("request timed out")]
    Timeout,
    #[error("invalid URI: {0}")]
    InvalidUri(String),
    #[error("failed to read response body: {0}")]
    Body(String),
}

/// Sends one request and returns a normalized response envelope.
#[async_trait]
pub trait Consumer: Send + Sync {
    /// Perform the round-trip.
    async fn request(
        &self,
        method: Method,
        uri: &str,
        options: &RequestOptions,
    ) -> Result<ResponseEnvelope, TransportError>;

    /// Adapt compiled wire parameters into this transport's option shape.
    ///
    /// The default places the parameters as the request body, which is what
    /// most JSON APIs expect for both GET-with-body search endpoints and
    /// POST queries. Override per consumer when the transport needs a
    /// different placement.
    fn adapt_parameters(&self, params: &Params) -> RequestOptions {
        RequestOptions::new(params.clone())
    }

    /// Derive transport headers from the same compiled parameters.
    ///
    /// Independent from [`Consumer::adapt_parameters`] so either hook can be
    /// overridden alone. The default adds nothing.
    fn headers(&self, _params: &Params) -> BTreeMap<String, String> {
        BTreeMap::new()
    }
}
