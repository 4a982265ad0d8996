//! Fluent query pipeline over remote HTTP/JSON APIs.
//!
//! Callers describe what they want with the vocabulary of a relational
//! query - filter by id, order, paginate, search - and the pipeline takes
//! care of compiling that intent into wire parameters, resolving the
//! endpoint URI, caching, logging, and reshaping the response into a typed
//! collection.
//!
//! The moving parts, leaf first:
//!
//! - a [`Grammar`](quarry_core::Grammar) compiles accumulated
//!   [`QueryState`](quarry_core::QueryState) into wire parameters
//!   ([`RestGrammar`], [`SearchGrammar`]);
//! - an [`ApiConnection`] wraps the opaque transport consumer with
//!   caching, gated logging, and optional response transformation;
//! - an [`Endpoint`] supplies base URI, grammar, connection, default cache
//!   TTL, and `{token}` path-template substitution per logical resource;
//! - a [`QueryBuilder`] accumulates intent and executes `get`/`post`,
//!   wrapping `body.data` into an
//!   [`ApiCollection`](quarry_core::ApiCollection) on success and handing
//!   back the raw body on anything that is not a plain 200.
//!
//! Wiring is explicit: an [`ApiContext`] owns the configuration, the
//! consumer, and the cache store, and resources declare their endpoints
//! through the [`Resource`] trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use quarry_client::{ApiContext, ClientConfig, QueryOutcome, Resource};
//!
//! let ctx = ApiContext::new(config, consumer);
//! let outcome = Artwork::query(&ctx)?
//!     .search("monet")
//!     .order_by("date", "desc")
//!     .take(20)
//!     .get(None, None)
//!     .await?;
//!
//! match outcome {
//!     QueryOutcome::Collection(artworks) => render(artworks),
//!     QueryOutcome::Raw(body) => handle_failure(body),
//! }
//! ```

pub mod builder;
pub mod cache;
pub mod config;
pub mod connection;
pub mod context;
pub mod endpoint;
pub mod grammar;
pub mod resource;
pub mod transformer;

pub use builder::{Page, PageOutcome, QueryBuilder, QueryOutcome, DEFAULT_ENDPOINT_TYPE};
pub use cache::MemoryCacheStore;
pub use config::{ClientConfig, EndpointDefaults};
pub use connection::{ApiConnection, ConnectionKind, ConnectionSettings};
pub use context::ApiContext;
pub use endpoint::{Endpoint, EndpointDescriptor};
pub use grammar::{GrammarKind, RestGrammar, SearchGrammar};
pub use resource::Resource;
pub use transformer::TransformerKind;

pub use quarry_core::{
    ApiCollection, CacheStore, Connection, Consumer, Error, Grammar, Metadata, Method,
    PaginationData, Params, QueryState, RequestOptions, ResponseEnvelope, Result, Transformer,
    TransportError,
};
