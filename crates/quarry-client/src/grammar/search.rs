//! Search-engine body compilation.

use serde_json::{json, Value};

use quarry_core::{deep_merge, Grammar, Params, QueryState};

use super::sort_clauses;

/// Compiles query state into a search-engine style request body:
/// `size`/`from` for the window, a `query` clause for id or free-text
/// filtering, `_source` for the projection.
///
/// The raw query fragment merges at the top level last, so callers issuing
/// hand-written query bodies can extend or override any compiled clause.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchGrammar;

impl Grammar for SearchGrammar {
    fn compile_parameters(&self, state: &QueryState) -> Params {
        let mut params = Params::new();

        if let Some(limit) = state.limit {
            params.insert("size".into(), limit.into());
        }
        if let Some(offset) = state.offset {
            params.insert("from".into(), offset.into());
        }
        if !state.orders.is_empty() {
            params.insert("sort".into(), sort_clauses(&state.orders));
        }

        // The id filter and the free-text search are mutually exclusive
        // channels; ids win because they are the stricter predicate.
        if !state.ids.is_empty() {
            params.insert(
                "query".into(),
                json!({"terms": {"_id": Value::Array(state.ids.clone())}}),
            );
        } else if let Some(text) = &state.search_text {
            let fields: Vec<Value> = match state.columns.as_deref().filter(|c| !c.is_empty()) {
                Some(columns) => columns.iter().cloned().map(Value::String).collect(),
                None => vec![Value::String("_all".into())],
            };
            params.insert(
                "query".into(),
                json!({"multi_match": {"query": text.clone(), "fields": fields}}),
            );
        }

        if let Some(columns) = state.columns.as_deref().filter(|c| !c.is_empty()) {
            params.insert(
                "_source".into(),
                Value::Array(columns.iter().cloned().map(Value::String).collect()),
            );
        }
        if !state.include.is_empty() {
            params.insert(
                "include".into(),
                Value::Array(state.include.iter().cloned().map(Value::String).collect()),
            );
        }

        if !state.raw_query.is_empty() {
            deep_merge(&mut params, state.raw_query.clone());
        }
        if !state.aggregations.is_empty() {
            let mut aggs = Params::new();
            aggs.insert(
                "aggregations".into(),
                Value::Object(state.aggregations.clone()),
            );
            deep_merge(&mut params, aggs);
        }

        params
    }
}
