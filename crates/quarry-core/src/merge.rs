//! Recursive parameter-map merging.
//!
//! Raw query and aggregation fragments augment each other across calls
//! rather than replacing: objects merge key-wise, colliding arrays
//! concatenate, and colliding scalars widen into an array holding both.
//! A shallow merge would drop nested keys that earlier fragments set, so
//! the recursion here is load-bearing.

use serde_json::Value;

use crate::query::Params;

/// Merge `incoming` into `target`, recursively.
pub fn deep_merge(target: &mut Params, incoming: Params) {
    for (key, value) in incoming {
        match target.get_mut(&key) {
            Some(existing) => merge_value(existing, value),
            None => {
                target.insert(key, value);
            }
        }
    }
}

/// Merge a single incoming value into an existing slot.
pub fn merge_value(existing: &mut Value, incoming: Value) {
    match (existing, incoming) {
        (Value::Object(a), Value::Object(b)) => {
            deep_merge(a, b);
        }
        (Value::Array(a), Value::Array(b)) => {
            a.extend(b);
        }
        (Value::Array(a), incoming) => {
            a.push(incoming);
        }
        (slot, Value::Array(incoming)) => {
            let mut items = vec![slot.take()];
            items.extend(incoming);
            *slot = Value::Array(items);
        }
        (slot, incoming) => {
            *slot = Value::Array(vec![slot.take(), incoming]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Params {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn disjoint_keys_are_all_preserved() {
        let mut target = obj(json!({"a": 1}));
        deep_merge(&mut target, obj(json!({"b": 2})));
        assert_eq!(Value::Object(target), json!({"a": 1, "b": 2}));
    }

    #[test]
    fn colliding_arrays_concatenate() {
        let mut target = obj(json!({"tags": ["a", "b"]}));
        deep_merge(&mut target, obj(json!({"tags": ["c"]})));
        assert_eq!(Value::Object(target), json!({"tags": ["a", "b", "c"]}));
    }

    #[test]
    fn nested_objects_merge_recursively() {
        let mut target = obj(json!({"query": {"bool": {"must": [{"term": {"a": 1}}]}}}));
        deep_merge(
            &mut target,
            obj(json!({"query": {"bool": {"must": [{"term": {"b": 2}}]}}})),
        );
        assert_eq!(
            Value::Object(target),
            json!({"query": {"bool": {"must": [{"term": {"a": 1}}, {"term": {"b": 2}}]}}})
        );
    }

    #[test]
    fn colliding_scalars_widen_into_an_array() {
        let mut target = obj(json!({"size": 10}));
        deep_merge(&mut target, obj(json!({"size": 20})));
        assert_eq!(Value::Object(target), json!({"size": [10, 20]}));
    }

    #[test]
    fn scalar_appends_to_existing_array() {
        let mut target = obj(json!({"tags": ["a"]}));
        deep_merge(&mut target, obj(json!({"tags": "b"})));
        assert_eq!(Value::Object(target), json!({"tags": ["a", "b"]}));
    }

    #[test]
    fn incoming_array_absorbs_existing_scalar() {
        let mut target = obj(json!({"tags": "a"}));
        deep_merge(&mut target, obj(json!({"tags": ["b", "c"]})));
        assert_eq!(Value::Object(target), json!({"tags": ["a", "b", "c"]}));
    }
}
