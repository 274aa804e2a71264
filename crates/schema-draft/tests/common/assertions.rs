#![allow(dead_code)]

use schema_draft::patch::apply_patch;
use schema_draft::{ApplyPatchOptions, RootNodeStore};
use serde_json::Value;

/// Sorts every `required` list so documents compare independently of the
/// order properties were added in.
pub fn normalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| {
                    let v = match (k.as_str(), v) {
                        ("required", Value::Array(keys)) => {
                            let mut keys: Vec<String> = keys
                                .iter()
                                .filter_map(|k| k.as_str().map(str::to_string))
                                .collect();
                            keys.sort();
                            Value::Array(keys.into_iter().map(Value::String).collect())
                        }
                        _ => normalize(v),
                    };
                    (k.clone(), v)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(normalize).collect()),
        other => other.clone(),
    }
}

/// Replays the store's patch list over its base document.
pub fn replay(store: &RootNodeStore) -> Result<Value, String> {
    apply_patch(
        store.base_schema(),
        &store.get_patches(),
        &ApplyPatchOptions::default(),
    )
    .map_err(|e| e.to_string())
}

pub fn assert_round_trip(store: &RootNodeStore) {
    let replayed = replay(store).unwrap_or_else(|e| {
        panic!(
            "patch failed to apply: {e}\npatches: {:?}",
            store.get_patches()
        )
    });
    assert_eq!(
        normalize(&replayed),
        normalize(&store.draft_schema()),
        "patches: {:?}",
        store.get_patches()
    );
}
