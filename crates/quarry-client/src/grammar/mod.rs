//! Concrete parameter grammars.
//!
//! Two compilations of the same query state: [`RestGrammar`] for flat
//! filter-style APIs and [`SearchGrammar`] for search-engine query bodies.
//! Selection happens through [`GrammarKind`], the explicit tag configured
//! on an endpoint or in the client defaults.

mod rest;
mod search;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use quarry_core::{Grammar, OrderClause};

pub use rest::RestGrammar;
pub use search::SearchGrammar;

/// Tag selecting a concrete grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrammarKind {
    Rest,
    Search,
}

impl GrammarKind {
    /// Instantiate the grammar this tag names.
    pub fn create(self) -> Arc<dyn Grammar> {
        match self {
            Self::Rest => Arc::new(RestGrammar),
            Self::Search => Arc::new(SearchGrammar),
        }
    }
}

/// Orderings as a list of single-key direction objects:
/// `[{"date": {"order": "desc"}}, ...]`.
pub(crate) fn sort_clauses(orders: &[OrderClause]) -> Value {
    Value::Array(
        orders
            .iter()
            .map(|clause| {
                let mut entry = serde_json::Map::new();
                entry.insert(
                    clause.field.clone(),
                    json!({"order": clause.direction.as_str()}),
                );
                Value::Object(entry)
            })
            .collect(),
    )
}
