//! Error taxonomy shared across the pipeline.
//!
//! Remote non-success responses are deliberately absent here: a status
//! other than 200 is propagated as data (the raw body or envelope) so
//! callers branch on shape instead of catching errors. Everything in this
//! enum is either fatal misconfiguration, an unsupported operation, or a
//! transport-level failure.

use thiserror::Error;

use crate::traits::TransportError;
use crate::wire::Method;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// No override and no configured default could be resolved during
    /// endpoint construction.
    #[error("missing configuration: no {0} resolvable for this endpoint")]
    MissingConfiguration(&'static str),

    /// A verb the remote API contract does not cover.
    #[error("unsupported verb {0}: only GET and POST reach the remote API")]
    UnsupportedVerb(Method),

    /// `where_in` on anything but the identifier column.
    #[error("where_in is only supported for the id column, got `{column}`")]
    UnsupportedFilter { column: String },

    /// A required argument was not supplied.
    #[error("missing required argument `{0}`")]
    MissingArgument(&'static str),

    /// An endpoint template referenced a substitution key that was not
    /// provided. Failing here beats producing a malformed URI.
    #[error("endpoint template `{template}` references `{{{token}}}` but no such parameter was given")]
    MissingTemplateKey { template: String, token: String },

    /// No path template registered under the requested logical type.
    #[error("no endpoint template registered for type `{0}`")]
    UnknownEndpointType(String),

    /// A successful response whose body cannot be interpreted.
    #[error("malformed response envelope: {0}")]
    MalformedResponse(&'static str),

    /// Configuration input that failed to parse.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Network-level failure reported by the transport consumer.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// JSON (de)serialization failure.
    #[error("serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
