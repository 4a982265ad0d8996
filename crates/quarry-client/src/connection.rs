//! Caching, logging, transforming connection around a transport consumer.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use quarry_core::{
    CacheStore, Connection, Consumer, Error, Method, Params, RequestOptions, ResponseEnvelope,
    Result, Transformer,
};

/// Cache namespace for this connection family. Bump to invalidate every
/// entry written by it.
pub const CACHE_NAMESPACE: &str = "version-1.0";

/// Tag selecting a concrete connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    Standard,
}

/// Behavior flags and defaults an [`ApiConnection`] is built with.
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    /// Cache lifetime in seconds when a call carries no override.
    pub default_ttl: u64,
    pub cache_enabled: bool,
    /// Deployment-wide cache generation, part of every cache key.
    pub cache_version: u32,
    /// When on, every dispatch emits one observational log line.
    pub logger: bool,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            default_ttl: 3600,
            cache_enabled: false,
            cache_version: 1,
            logger: false,
        }
    }
}

/// The standard connection: adapts parameters and headers through the
/// consumer's hooks, logs when asked to, consults and populates the cache
/// store, and never treats a non-200 status as an error.
///
/// Failed responses are written and then immediately evicted, so a failure
/// is never served stale while a concurrent reader still sees
/// last-write-wins behavior for successes.
pub struct ApiConnection {
    consumer: Arc<dyn Consumer>,
    cache: Arc<dyn CacheStore>,
    transformer: Option<Arc<dyn Transformer>>,
    settings: ConnectionSettings,
    cache_namespace: &'static str,
}

impl ApiConnection {
    pub fn new(
        consumer: Arc<dyn Consumer>,
        cache: Arc<dyn CacheStore>,
        settings: ConnectionSettings,
    ) -> Self {
        Self {
            consumer,
            cache,
            transformer: None,
            settings,
            cache_namespace: CACHE_NAMESPACE,
        }
    }

    /// Attach a response transformer applied by `get`/`post`.
    pub fn with_transformer(mut self, transformer: Arc<dyn Transformer>) -> Self {
        self.transformer = Some(transformer);
        self
    }

    /// Deterministic cache key over everything that shapes the response.
    fn cache_key(&self, verb: Method, endpoint: &str, options: &RequestOptions) -> Result<String> {
        let key = serde_json::to_string(&(
            verb.as_str(),
            endpoint,
            options,
            self.settings.cache_version,
            self.cache_namespace,
        ))?;
        Ok(key)
    }

    fn apply_transformer(&self, response: ResponseEnvelope) -> ResponseEnvelope {
        match &self.transformer {
            Some(transformer) => transformer.transform(response),
            None => response,
        }
    }
}

#[async_trait]
impl Connection for ApiConnection {
    async fn get(
        &self,
        endpoint: &str,
        params: &Params,
        ttl: Option<u64>,
    ) -> Result<ResponseEnvelope> {
        let response = self.execute(Method::Get, endpoint, params, ttl).await?;
        Ok(self.apply_transformer(response))
    }

    async fn post(
        &self,
        endpoint: &str,
        params: &Params,
        ttl: Option<u64>,
    ) -> Result<ResponseEnvelope> {
        let response = self.execute(Method::Post, endpoint, params, ttl).await?;
        Ok(self.apply_transformer(response))
    }

    async fn execute(
        &self,
        verb: Method,
        endpoint: &str,
        params: &Params,
        ttl: Option<u64>,
    ) -> Result<ResponseEnvelope> {
        if !matches!(verb, Method::Get | Method::Post) {
            return Err(Error::UnsupportedVerb(verb));
        }

        let mut options = self.consumer.adapt_parameters(params);
        options.headers.extend(self.consumer.headers(params));

        let ttl = ttl.unwrap_or(self.settings.default_ttl);

        // Observational only; must never affect control flow.
        if self.settings.logger {
            tracing::info!(
                verb = verb.as_str(),
                ttl,
                endpoint,
                options = ?options,
                "dispatching API call"
            );
        }

        if !self.settings.cache_enabled {
            return Ok(self.consumer.request(verb, endpoint, &options).await?);
        }

        let key = self.cache_key(verb, endpoint, &options)?;
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }

        let response = self.consumer.request(verb, endpoint, &options).await?;
        self.cache
            .put(&key, Duration::from_secs(ttl), response.clone());
        if !response.is_success() {
            // Failures are never served stale.
            self.cache.forget(&key);
        }

        Ok(response)
    }

    fn default_ttl(&self) -> u64 {
        self.settings.default_ttl
    }
}
