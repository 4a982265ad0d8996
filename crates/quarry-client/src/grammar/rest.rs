//! Flat filter-style compilation.

use serde_json::Value;

use quarry_core::{deep_merge, Grammar, Params, QueryState};

use super::sort_clauses;

/// Default grammar: compiles query state into a flat parameter map the way
/// a filter-style JSON API expects it.
///
/// Raw query fragments are merged at the top level after the structured
/// fields, so a caller's raw fragment can extend anything the builder
/// compiled (colliding arrays concatenate rather than overwrite).
#[derive(Debug, Clone, Copy, Default)]
pub struct RestGrammar;

impl Grammar for RestGrammar {
    fn compile_parameters(&self, state: &QueryState) -> Params {
        let mut params = Params::new();

        if !state.ids.is_empty() {
            params.insert("ids".into(), Value::Array(state.ids.clone()));
        }
        if !state.include.is_empty() {
            params.insert(
                "include".into(),
                Value::Array(state.include.iter().cloned().map(Value::String).collect()),
            );
        }
        if let Some(text) = &state.search_text {
            params.insert("q".into(), Value::String(text.clone()));
        }
        if let Some(columns) = state.columns.as_deref().filter(|c| !c.is_empty()) {
            params.insert(
                "fields".into(),
                Value::Array(columns.iter().cloned().map(Value::String).collect()),
            );
        }
        if let Some(limit) = state.limit {
            params.insert("limit".into(), limit.into());
        }
        if let Some(offset) = state.offset {
            params.insert("offset".into(), offset.into());
        }
        if !state.orders.is_empty() {
            params.insert("sort".into(), sort_clauses(&state.orders));
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fragment(value: serde_json::Value) -> Params {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn empty_state_compiles_to_no_parameters() {
        let params = RestGrammar.compile_parameters(&QueryState::default());
        assert!(params.is_empty());
    }

    #[test]
    fn structured_fields_land_under_their_wire_keys() {
        let state = QueryState {
            ids: vec![json!(3), json!(7)],
            include: vec!["artist".into()],
            search_text: Some("monet".into()),
            columns: Some(vec!["id".into(), "title".into()]),
            limit: Some(20),
            offset: Some(40),
            ..QueryState::default()
        };

        let params = RestGrammar.compile_parameters(&state);
        assert_eq!(
            serde_json::Value::Object(params),
            json!({
                "ids": [3, 7],
                "include": ["artist"],
                "q": "monet",
                "fields": ["id", "title"],
                "limit": 20,
                "offset": 40,
            })
        );
    }

    #[test]
    fn empty_columns_mean_all_and_emit_nothing() {
        let state = QueryState {
            columns: Some(vec![]),
            ..QueryState::default()
        };
        let params = RestGrammar.compile_parameters(&state);
        assert!(!params.contains_key("fields"));
    }

    #[test]
    fn raw_query_merges_over_compiled_fields() {
        let state = QueryState {
            limit: Some(10),
            raw_query: fragment(json!({"boost": {"recent": true}, "ids": [9]})),
            ids: vec![json!(1)],
            ..QueryState::default()
        };

        let params = RestGrammar.compile_parameters(&state);
        assert_eq!(
            serde_json::Value::Object(params),
            json!({
                "ids": [1, 9],
                "limit": 10,
                "boost": {"recent": true},
            })
        );
    }

    #[test]
    fn aggregations_nest_under_their_own_key() {
        let state = QueryState {
            aggregations: fragment(json!({"by_artist": {"terms": {"field": "artist_id"}}})),
            ..QueryState::default()
        };

        let params = RestGrammar.compile_parameters(&state);
        assert_eq!(
            serde_json::Value::Object(params),
            json!({"aggregations": {"by_artist": {"terms": {"field": "artist_id"}}}})
        );
    }

    #[test]
    fn compilation_is_deterministic() {
        let state = QueryState {
            limit: Some(5),
            offset: Some(10),
            search_text: Some("degas".into()),
            ..QueryState::default()
        };

        let first = serde_json::to_string(&RestGrammar.compile_parameters(&state)).unwrap();
        let second = serde_json::to_string(&RestGrammar.compile_parameters(&state)).unwrap();
        assert_eq!(first, second);
    }
}
