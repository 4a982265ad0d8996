//! Accumulated query intent.
//!
//! [`QueryState`] is the plain-data record a query builder mutates through
//! its fluent methods and a [`crate::Grammar`] compiles into wire
//! parameters. It carries no behavior of its own beyond the ordering
//! vocabulary.

use serde_json::Value;

/// Flat wire-format parameter map produced by a grammar.
pub type Params = serde_json::Map<String, Value>;

/// Sort direction for an ordering clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    /// Parse a direction, case-insensitively.
    ///
    /// Anything that is not "asc" means descending - a typo like "dsc" is
    /// accepted and sorts descending rather than raising.
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("asc") {
            Self::Asc
        } else {
            Self::Desc
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// One ordering entry: field plus direction, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderClause {
    pub field: String,
    pub direction: Direction,
}

/// Everything a query builder has accumulated so far.
///
/// Owned exclusively by one builder instance and mutated only through its
/// fluent methods; grammars read it, never write it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryState {
    /// Ordering clauses, in the order they were added.
    pub orders: Vec<OrderClause>,
    /// Maximum number of records to return.
    pub limit: Option<u64>,
    /// Number of records to skip.
    pub offset: Option<u64>,
    /// Current page number, set only through the page derivation path.
    pub page: Option<u64>,
    /// Identifier filter - the only supported "where" predicate channel.
    pub ids: Vec<Value>,
    /// Extra fields requested on the result set.
    pub include: Vec<String>,
    /// Free-text search filter; unset rather than empty when cleared.
    pub search_text: Option<String>,
    /// Raw query fragments, recursively merged across calls.
    pub raw_query: Params,
    /// Raw aggregation fragments, recursively merged across calls.
    pub aggregations: Params,
    /// Requested projection; `None` means all columns.
    pub columns: Option<Vec<String>>,
    /// Per-call cache lifetime override, in seconds.
    pub ttl: Option<u64>,
}
