//! Plain schema documents: parsing into nodes and serializing back.
//!
//! The plain form is what the persistence layer stores and what `add` /
//! `replace` patches carry:
//!
//! ```json
//! {"type": "object", "properties": {...}, "additionalProperties": false, "required": [...]}
//! {"type": "array", "items": {...}}
//! {"type": "string", "default": "", "foreignKey": "users"}
//! ```

use std::collections::HashMap;

use serde_json::{json, Map, Value};

use schema_draft_json_pointer::ITEMS;

use crate::error::SchemaError;
use crate::node::{NodeId, NodeKind, ScalarKind};
use crate::store::RootNodeStore;

impl RootNodeStore {
    /// Parses a plain schema document into a detached, uncommitted subtree
    /// whose root is named `key`. On error nothing is left allocated.
    pub fn create_schema_node(
        &mut self,
        key: impl Into<String>,
        schema: &Value,
    ) -> Result<NodeId, SchemaError> {
        let mark = self.alloc_mark();
        let parsed = self.parse_schema(key.into(), schema);
        if parsed.is_err() {
            self.rollback(mark);
        }
        parsed
    }

    fn parse_schema(&mut self, key: String, schema: &Value) -> Result<NodeId, SchemaError> {
        let obj = schema
            .as_object()
            .ok_or_else(|| invalid(&key, "schema must be an object"))?;
        let type_name = obj
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| invalid(&key, "missing 'type'"))?;

        match type_name {
            "object" => {
                let no_properties = Map::new();
                let properties = match obj.get("properties") {
                    None => &no_properties,
                    Some(Value::Object(map)) => map,
                    Some(_) => return Err(invalid(&key, "'properties' must be an object")),
                };
                let mut children = Vec::with_capacity(properties.len());
                for (child_key, child_schema) in properties {
                    children.push(self.parse_schema(child_key.clone(), child_schema)?);
                }
                let id = self.alloc(NodeKind::Object { children: children.clone() }, key);
                for child in children {
                    self.node_mut(child)?.parent = Some(id);
                }
                Ok(id)
            }
            "array" => {
                let items_schema = obj
                    .get("items")
                    .ok_or_else(|| invalid(&key, "array requires 'items'"))?;
                let items = self.parse_schema(ITEMS.to_string(), items_schema)?;
                let id = self.alloc(NodeKind::Array { items: Some(items) }, key);
                self.node_mut(items)?.parent = Some(id);
                Ok(id)
            }
            other => {
                let kind = ScalarKind::from_type(other)
                    .ok_or_else(|| invalid(&key, &format!("unsupported type {other:?}")))?;
                let default = match obj.get("default") {
                    None => kind.initial_default(),
                    Some(value) if kind.accepts(value) => value.clone(),
                    Some(value) => {
                        return Err(invalid(&key, &format!("bad default {value} for {other}")))
                    }
                };
                let node_kind = match obj.get("foreignKey") {
                    None => NodeKind::Scalar { kind, default },
                    Some(Value::String(target)) if kind == ScalarKind::String => {
                        NodeKind::StringRef { target_table: target.clone(), default }
                    }
                    Some(_) => return Err(invalid(&key, "'foreignKey' must be a string on a string")),
                };
                Ok(self.alloc(node_kind, key))
            }
        }
    }

    /// Serializes a node and everything below it in the draft tree.
    pub fn node_schema(&self, id: NodeId) -> Result<Value, SchemaError> {
        self.node(id)?;
        Ok(self.serialize(id))
    }

    /// The draft document.
    pub fn draft_schema(&self) -> Value {
        self.serialize(self.root())
    }

    /// The committed document, rebuilt from the base positions of live nodes.
    pub fn base_schema(&self) -> Value {
        let mut base_children: HashMap<NodeId, Vec<(String, NodeId)>> = HashMap::new();
        for (id, node) in self.live() {
            if let Some(base) = &node.base {
                base_children
                    .entry(base.parent)
                    .or_default()
                    .push((base.key.clone(), id));
            }
        }
        self.serialize_base(self.root(), &base_children)
    }

    pub(crate) fn serialize(&self, id: NodeId) -> Value {
        let Some(node) = self.slot(id) else {
            return Value::Null;
        };
        match &node.kind {
            NodeKind::Object { children } => {
                let entries = children.iter().filter_map(|&child| {
                    self.slot(child).map(|c| (c.key.clone(), self.serialize(child)))
                });
                object_schema(entries)
            }
            NodeKind::Array { items } => array_schema(items.map(|items| self.serialize(items))),
            kind => scalar_schema(kind),
        }
    }

    /// Serialized content of a scalar, `None` for composites.
    pub(crate) fn scalar_value(&self, id: NodeId) -> Option<Value> {
        let node = self.slot(id)?;
        if node.kind.is_composite() {
            None
        } else {
            Some(scalar_schema(&node.kind))
        }
    }

    fn serialize_base(
        &self,
        id: NodeId,
        base_children: &HashMap<NodeId, Vec<(String, NodeId)>>,
    ) -> Value {
        let Some(node) = self.slot(id) else {
            return Value::Null;
        };
        let mut children = base_children.get(&id).cloned().unwrap_or_default();
        children.sort_by_key(|(_, child)| self.slot(*child).map_or(0, |c| c.base_rank));
        match &node.kind {
            NodeKind::Object { .. } => object_schema(
                children
                    .iter()
                    .map(|(key, child)| (key.clone(), self.serialize_base(*child, base_children))),
            ),
            NodeKind::Array { .. } => array_schema(
                children
                    .first()
                    .map(|(_, child)| self.serialize_base(*child, base_children)),
            ),
            kind => node.base_value.clone().unwrap_or_else(|| scalar_schema(kind)),
        }
    }
}

fn invalid(key: &str, message: &str) -> SchemaError {
    SchemaError::InvalidSchema(format!("{key:?}: {message}"))
}

fn object_schema(entries: impl Iterator<Item = (String, Value)>) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();
    for (key, value) in entries {
        required.push(Value::String(key.clone()));
        properties.insert(key, value);
    }
    json!({
        "type": "object",
        "properties": properties,
        "additionalProperties": false,
        "required": required,
    })
}

fn array_schema(items: Option<Value>) -> Value {
    let mut map = Map::new();
    map.insert("type".into(), json!("array"));
    if let Some(items) = items {
        map.insert("items".into(), items);
    }
    Value::Object(map)
}

fn scalar_schema(kind: &NodeKind) -> Value {
    match kind {
        NodeKind::Scalar { kind, default } => json!({
            "type": kind.as_str(),
            "default": default,
        }),
        NodeKind::StringRef { target_table, default } => json!({
            "type": "string",
            "default": default,
            "foreignKey": target_table,
        }),
        NodeKind::Object { .. } | NodeKind::Array { .. } => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Value {
        json!({
            "type": "object",
            "properties": {
                "title": {"type": "string", "default": "untitled"},
                "count": {"type": "number", "default": 3},
                "owner": {"type": "string", "default": "", "foreignKey": "users"},
                "tags": {"type": "array", "items": {"type": "boolean", "default": false}}
            },
            "additionalProperties": false,
            "required": ["title", "count", "owner", "tags"]
        })
    }

    #[test]
    fn parse_then_serialize_is_identity() {
        let store = RootNodeStore::from_schema(&sample()).unwrap();
        assert_eq!(store.draft_schema(), sample());
    }

    #[test]
    fn parsed_tree_is_linked() {
        let store = RootNodeStore::from_schema(&sample()).unwrap();
        let root = store.root();
        let tags = store.child_by_key(root, "tags").unwrap().unwrap();
        let items = store.children(tags).unwrap()[0];
        assert_eq!(store.node(items).unwrap().parent(), Some(tags));
        assert!(store.is_attached(items));
        assert_eq!(
            store.node_schema(tags).unwrap(),
            json!({"type": "array", "items": {"type": "boolean", "default": false}})
        );
    }

    #[test]
    fn missing_defaults_are_filled_in() {
        let store = RootNodeStore::from_schema(&json!({
            "type": "object",
            "properties": {"n": {"type": "number"}}
        }))
        .unwrap();
        assert_eq!(
            store.draft_schema()["properties"]["n"],
            json!({"type": "number", "default": 0})
        );
    }

    #[test]
    fn rejects_malformed_schemas() {
        for schema in [
            json!("string"),
            json!({"properties": {}}),
            json!({"type": "array"}),
            json!({"type": "date"}),
            json!({"type": "number", "default": "1"}),
            json!({"type": "number", "foreignKey": "users"}),
            json!({"type": "object", "properties": []}),
        ] {
            assert!(
                matches!(RootNodeStore::from_schema(&schema), Err(SchemaError::InvalidSchema(_))),
                "{schema}"
            );
        }
    }

    #[test]
    fn failed_parse_leaves_no_nodes_behind() {
        let mut store = RootNodeStore::new();
        let before = store.len();
        let err = store.create_schema_node(
            "bad",
            &json!({
                "type": "object",
                "properties": {
                    "ok": {"type": "string"},
                    "list": {"type": "array", "items": {"type": "number"}},
                    "broken": {"type": "date"}
                }
            }),
        );
        assert!(matches!(err, Err(SchemaError::InvalidSchema(_))));
        assert_eq!(store.len(), before);

        let next = store.create_schema_node("good", &json!({"type": "string"})).unwrap();
        assert_eq!(next, NodeId(1));
    }

    #[test]
    fn base_schema_ignores_uncommitted_edits() {
        let mut store = RootNodeStore::from_schema(&sample()).unwrap();
        store.submit_changes();
        let root = store.root();
        let title = store.child_by_key(root, "title").unwrap().unwrap();
        store.remove_property(root, title).unwrap();
        let extra = store.create_number("extra");
        store.add_property(root, extra).unwrap();
        let count = store.child_by_key(root, "count").unwrap().unwrap();
        store.set_default(count, json!(10)).unwrap();

        assert_eq!(store.base_schema(), sample());
        assert_ne!(store.draft_schema(), sample());
    }
}
