//! Free-form key/value metadata attached to polls, chores, and breaks.

use serde_json::{Map, Value};

/// JSON object metadata.
pub type Metadata = Map<String, Value>;

/// Shallow-merges `patch` into `target`; keys in `patch` win.
pub fn merge_metadata(target: &mut Metadata, patch: Metadata) {
    for (key, value) in patch {
        target.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Metadata {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn merge_overwrites_existing_keys_and_keeps_others() {
        let mut target = object(json!({"a": 1, "b": {"nested": true}}));
        merge_metadata(&mut target, object(json!({"b": 2, "c": "x"})));

        assert_eq!(Value::Object(target), json!({"a": 1, "b": 2, "c": "x"}));
    }

    #[test]
    fn merge_is_shallow() {
        let mut target = object(json!({"b": {"x": 1, "y": 2}}));
        merge_metadata(&mut target, object(json!({"b": {"x": 3}})));

        assert_eq!(Value::Object(target), json!({"b": {"x": 3}}));
    }
}
