#![allow(dead_code)]

use schema_draft::{NodeId, RootNodeStore};
use serde_json::Value;

/// A store parsed from `schema` and committed.
pub fn committed(schema: &Value) -> RootNodeStore {
    let mut store = RootNodeStore::from_schema(schema).expect("valid schema");
    store.submit_changes();
    store
}

/// Follows draft keys from the root.
pub fn node_at(store: &RootNodeStore, keys: &[&str]) -> NodeId {
    keys.iter().fold(store.root(), |id, key| {
        store
            .child_by_key(id, key)
            .expect("known node")
            .unwrap_or_else(|| panic!("no child {key:?}"))
    })
}
