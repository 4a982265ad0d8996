//! Explicit wiring for the pipeline.
//!
//! One [`ApiContext`] replaces the ambient configuration and container
//! bindings of service-locator designs: it owns the configuration, the
//! transport consumer, and the cache store, and everything downstream
//! receives them through constructors.

use std::sync::Arc;

use quarry_core::{CacheStore, Consumer, Result};

use crate::cache::MemoryCacheStore;
use crate::config::ClientConfig;
use crate::endpoint::{Endpoint, EndpointDescriptor};

/// Shared wiring: configuration plus the consumer and cache store every
/// endpoint resolved through this context will use.
#[derive(Clone)]
pub struct ApiContext {
    config: ClientConfig,
    consumer: Arc<dyn Consumer>,
    cache: Arc<dyn CacheStore>,
}

impl ApiContext {
    /// Context with an in-memory cache store.
    pub fn new(config: ClientConfig, consumer: Arc<dyn Consumer>) -> Self {
        Self {
            config,
            consumer,
            cache: Arc::new(MemoryCacheStore::new()),
        }
    }

    /// Swap in a different cache store (e.g. one shared across processes).
    pub fn with_cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache = cache;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn consumer(&self) -> Arc<dyn Consumer> {
        self.consumer.clone()
    }

    pub fn cache(&self) -> Arc<dyn CacheStore> {
        self.cache.clone()
    }

    /// Resolve a descriptor into a ready endpoint.
    pub fn endpoint(&self, descriptor: EndpointDescriptor) -> Result<Endpoint> {
        Endpoint::resolve(
            descriptor,
            &self.config,
            self.consumer.clone(),
            self.cache.clone(),
        )
    }
}
