//! Core vocabulary for the quarry API query pipeline.
//!
//! This crate holds everything the pipeline crates agree on: the wire types
//! exchanged with a transport consumer ([`Method`], [`RequestOptions`],
//! [`ResponseEnvelope`]), the accumulated query intent ([`QueryState`]), the
//! capability traits at the seams ([`Consumer`], [`Grammar`], [`Connection`],
//! [`Transformer`], [`CacheStore`]), the result collection returned to
//! callers ([`ApiCollection`]), and the shared error taxonomy.
//!
//! Nothing in this crate performs I/O. The [`Consumer`] trait is the sole
//! seam to a real network stack and is treated as fully opaque; the
//! [`test_support`] module provides scripted consumers so the whole pipeline
//! can be exercised without one.

pub mod collection;
pub mod error;
pub mod merge;
pub mod query;
pub mod test_support;
pub mod traits;
pub mod wire;

pub use collection::{ApiCollection, Metadata, PaginationData};
pub use error::{Error, Result};
pub use merge::{deep_merge, merge_value};
pub use query::{Direction, OrderClause, Params, QueryState};
pub use traits::{
    CacheStore, Connection, Consumer, Grammar, IdentityTransformer, Transformer, TransportError,
};
pub use wire::{Method, RequestOptions, ResponseEnvelope};
