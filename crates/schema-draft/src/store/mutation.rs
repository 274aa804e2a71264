//! Draft-side mutations.
//!
//! Every mutator validates all of its preconditions before touching the
//! graph, so an `Err` always leaves the store exactly as it was. None of
//! them reads or writes base positions.

use serde_json::Value;
use tracing::debug;

use super::RootNodeStore;
use crate::error::{violation, SchemaError};
use crate::node::{NodeId, NodeKind, ScalarKind};

impl RootNodeStore {
    /// Renames a node. The new key must be free in its draft parent.
    pub fn set_id(&mut self, id: NodeId, key: impl Into<String>) -> Result<(), SchemaError> {
        let key = key.into();
        let node = self.node(id)?;
        if node.key == key {
            return Ok(());
        }
        if let Some(parent) = node.parent {
            if let Some(other) = self.child_by_key(parent, &key)? {
                if other != id {
                    return Err(violation(format!(
                        "key {key:?} is already used by {other} in {parent}"
                    )));
                }
            }
        }
        debug!(node = %id, key = %key, "set_id");
        self.node_mut(id)?.key = key;
        Ok(())
    }

    /// Attaches `child` under `parent`, detaching it from any other parent.
    pub fn add_property(&mut self, parent: NodeId, child: NodeId) -> Result<(), SchemaError> {
        self.check_attachable(parent, child)?;
        let child_node = self.node(child)?;
        if child_node.parent == Some(parent) {
            return Ok(());
        }
        match &self.node(parent)?.kind {
            NodeKind::Object { .. } => {
                if let Some(other) = self.child_by_key(parent, &child_node.key)? {
                    return Err(violation(format!(
                        "key {:?} is already used by {other} in {parent}",
                        child_node.key
                    )));
                }
            }
            NodeKind::Array { items: Some(other) } => {
                return Err(violation(format!("items slot of {parent} holds {other}")));
            }
            _ => {}
        }
        debug!(parent = %parent, child = %child, "add_property");
        self.detach(child)?;
        self.attach(parent, child, None)
    }

    /// Detaches `child` from `parent`.
    pub fn remove_property(&mut self, parent: NodeId, child: NodeId) -> Result<(), SchemaError> {
        self.node(parent)?;
        if self.node(child)?.parent != Some(parent) {
            return Err(violation(format!("{child} is not a child of {parent}")));
        }
        debug!(parent = %parent, child = %child, "remove_property");
        self.detach(child)
    }

    /// Puts `new` in the slot `old` holds under `parent`, taking over its key
    /// and position. The diff reports this as a replace of the slot.
    pub fn replace_property(
        &mut self,
        parent: NodeId,
        old: NodeId,
        new: NodeId,
    ) -> Result<(), SchemaError> {
        self.check_attachable(parent, new)?;
        let old_node = self.node(old)?;
        if old_node.parent != Some(parent) {
            return Err(violation(format!("{old} is not a child of {parent}")));
        }
        if old == new {
            return Err(violation(format!("{old} cannot replace itself")));
        }
        let key = old_node.key.clone();
        let old_is_committed = old_node.is_committed();
        let new_is_committed = self.node(new)?.is_committed();
        debug!(parent = %parent, old = %old, new = %new, "replace_property");

        // A committed newcomer keeps its own slot and shows up as a move.
        // Replacing a never-committed node passes on whatever it replaced.
        let replaces = if new_is_committed {
            None
        } else if old_is_committed {
            Some(old)
        } else {
            self.node_mut(old)?.replaces.take()
        };

        self.detach(new)?;
        let index = self.node(parent)?.kind.children().iter().position(|&c| c == old);
        self.detach(old)?;
        if self.node(parent)?.kind.is_object() {
            self.node_mut(new)?.key = key;
        }
        self.attach(parent, new, index)?;
        self.node_mut(new)?.replaces = replaces;
        Ok(())
    }

    /// Replaces the element schema of an array.
    pub fn replace_items(&mut self, array: NodeId, new_items: NodeId) -> Result<(), SchemaError> {
        match self.node(array)?.kind {
            NodeKind::Array { items: Some(old) } => self.replace_property(array, old, new_items),
            NodeKind::Array { items: None } => {
                Err(violation(format!("{array} has no items to replace")))
            }
            _ => Err(violation(format!("{array} is not an array"))),
        }
    }

    /// Attaches (`Some`) or detaches (`None`) a reference on a string node.
    pub fn set_reference(
        &mut self,
        id: NodeId,
        target_table: Option<String>,
    ) -> Result<(), SchemaError> {
        let node = self.node_mut(id)?;
        let next = match (&node.kind, target_table) {
            (NodeKind::Scalar { kind: ScalarKind::String, default }, Some(target_table))
            | (NodeKind::StringRef { default, .. }, Some(target_table)) => NodeKind::StringRef {
                target_table,
                default: default.clone(),
            },
            (NodeKind::StringRef { default, .. }, None) => NodeKind::Scalar {
                kind: ScalarKind::String,
                default: default.clone(),
            },
            (NodeKind::Scalar { kind: ScalarKind::String, .. }, None) => return Ok(()),
            (kind, _) => {
                return Err(violation(format!(
                    "{id} is a {} and cannot carry a reference",
                    kind.type_name()
                )))
            }
        };
        debug!(node = %id, "set_reference");
        node.kind = next;
        Ok(())
    }

    /// Changes the target of an attached reference.
    pub fn set_reference_value(
        &mut self,
        id: NodeId,
        target: impl Into<String>,
    ) -> Result<(), SchemaError> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::StringRef { target_table, .. } => {
                *target_table = target.into();
                debug!(node = %id, target = %target_table, "set_reference_value");
                Ok(())
            }
            _ => Err(violation(format!("{id} has no reference"))),
        }
    }

    /// Changes the default value of a scalar.
    pub fn set_default(&mut self, id: NodeId, value: Value) -> Result<(), SchemaError> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Scalar { kind, default } if kind.accepts(&value) => *default = value,
            NodeKind::StringRef { default, .. } if value.is_string() => *default = value,
            kind => {
                return Err(violation(format!(
                    "{value} is not a valid default for a {}",
                    kind.type_name()
                )))
            }
        }
        debug!(node = %id, "set_default");
        Ok(())
    }

    // ── Link maintenance ──────────────────────────────────────────────────

    /// Rejects attaching `child` anywhere under `parent` when that would
    /// attach the root or close a cycle.
    fn check_attachable(&self, parent: NodeId, child: NodeId) -> Result<(), SchemaError> {
        let parent_node = self.node(parent)?;
        self.node(child)?;
        if !parent_node.kind.is_composite() {
            return Err(violation(format!(
                "{parent} is a {} and cannot have children",
                parent_node.kind.type_name()
            )));
        }
        if child == self.root {
            return Err(violation("the root cannot be attached"));
        }
        if child == parent || self.ancestors(parent).any(|a| a == child) {
            return Err(violation(format!("{child} is an ancestor of {parent}")));
        }
        Ok(())
    }

    /// Removes `child` from its draft parent's child list, if it has one.
    pub(crate) fn detach(&mut self, child: NodeId) -> Result<(), SchemaError> {
        let Some(parent) = self.node_mut(child)?.parent.take() else {
            return Ok(());
        };
        match &mut self.node_mut(parent)?.kind {
            NodeKind::Object { children } => children.retain(|&c| c != child),
            NodeKind::Array { items } => {
                if *items == Some(child) {
                    *items = None;
                }
            }
            NodeKind::Scalar { .. } | NodeKind::StringRef { .. } => {}
        }
        Ok(())
    }

    /// Links a detached `child` under `parent`, at `index` or at the end.
    pub(crate) fn attach(
        &mut self,
        parent: NodeId,
        child: NodeId,
        index: Option<usize>,
    ) -> Result<(), SchemaError> {
        match &mut self.node_mut(parent)?.kind {
            NodeKind::Object { children } => {
                let at = index.unwrap_or(children.len()).min(children.len());
                children.insert(at, child);
            }
            NodeKind::Array { items } => *items = Some(child),
            kind => {
                return Err(violation(format!(
                    "{parent} is a {} and cannot have children",
                    kind.type_name()
                )))
            }
        }
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }
}
