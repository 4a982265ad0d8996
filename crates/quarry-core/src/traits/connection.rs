//! The connection seam.

use async_trait::async_trait;

use crate::error::Result;
use crate::query::Params;
use crate::wire::{Method, ResponseEnvelope};

/// Orchestrates one call against the remote API.
///
/// A connection wraps a consumer with parameter/header adaptation,
/// observational logging, response caching, and optional transformation.
/// It never fails on a non-200 status - that comes back as an envelope for
/// the caller to branch on. The only hard failure besides transport errors
/// is an unsupported verb.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Run a GET call, applying the configured transformer to the result.
    async fn get(
        &self,
        endpoint: &str,
        params: &Params,
        ttl: Option<u64>,
    ) -> Result<ResponseEnvelope>;

    /// Run a POST call, applying the configured transformer to the result.
    async fn post(
        &self,
        endpoint: &str,
        params: &Params,
        ttl: Option<u64>,
    ) -> Result<ResponseEnvelope>;

    /// Run a general call without transformation.
    ///
    /// `ttl` overrides the connection default cache lifetime for this call
    /// only; `None` means "use the connection's default".
    async fn execute(
        &self,
        verb: Method,
        endpoint: &str,
        params: &Params,
        ttl: Option<u64>,
    ) -> Result<ResponseEnvelope>;

    /// The cache lifetime used when no per-call override is given.
    fn default_ttl(&self) -> u64;
}
