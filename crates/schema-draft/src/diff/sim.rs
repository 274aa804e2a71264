//! A model of the document as the emitted patches reshape it.
//!
//! The simulation starts out as the base tree and is updated after every
//! emitted operation, so the path of any slot can be read off at the moment
//! an operation referencing it is written.

use std::collections::HashMap;

use schema_draft_json_pointer::{push_step, Path, SchemaStep, ITEMS};

use crate::node::{NodeId, NodeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
    Object,
    Array,
    Leaf,
}

impl Shape {
    pub(crate) fn of(kind: &NodeKind) -> Self {
        match kind {
            NodeKind::Object { .. } => Shape::Object,
            NodeKind::Array { .. } => Shape::Array,
            NodeKind::Scalar { .. } | NodeKind::StringRef { .. } => Shape::Leaf,
        }
    }

    /// The pointer step to a child stored under `key`.
    pub(crate) fn step(self, key: &str) -> SchemaStep {
        match self {
            Shape::Array if key == ITEMS => SchemaStep::Items,
            Shape::Array | Shape::Leaf => SchemaStep::Member(key.to_string()),
            Shape::Object => SchemaStep::Property(key.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
struct Slot {
    parent: Option<NodeId>,
    key: String,
    shape: Shape,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub(crate) struct Simulation {
    slots: HashMap<NodeId, Slot>,
    root: NodeId,
}

impl Simulation {
    pub(crate) fn new(root: NodeId, shape: Shape) -> Self {
        let mut slots = HashMap::new();
        slots.insert(
            root,
            Slot { parent: None, key: String::new(), shape, children: Vec::new() },
        );
        Self { slots, root }
    }

    /// Registers a node without linking it; see [`link`](Self::link).
    pub(crate) fn declare(&mut self, id: NodeId, parent: NodeId, key: String, shape: Shape) {
        self.slots.insert(
            id,
            Slot { parent: Some(parent), key, shape, children: Vec::new() },
        );
    }

    /// Appends a declared node to its parent's children.
    pub(crate) fn link(&mut self, id: NodeId) {
        if let Some(parent) = self.slots.get(&id).and_then(|s| s.parent) {
            if let Some(slot) = self.slots.get_mut(&parent) {
                slot.children.push(id);
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, id: NodeId) -> bool {
        self.slots.contains_key(&id)
    }

    pub(crate) fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots.get(&id).and_then(|s| s.parent)
    }

    pub(crate) fn shape(&self, id: NodeId) -> Shape {
        self.slots.get(&id).map_or(Shape::Leaf, |s| s.shape)
    }

    pub(crate) fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.slots
            .get(&id)
            .map(|s| s.children.clone())
            .unwrap_or_default()
    }

    pub(crate) fn child(&self, parent: NodeId, key: &str) -> Option<NodeId> {
        self.slots.get(&parent)?.children.iter().copied().find(|c| {
            self.slots.get(c).is_some_and(|s| s.key == key)
        })
    }

    /// Current pointer path of a slot.
    pub(crate) fn path(&self, id: NodeId) -> Path {
        let mut chain = Vec::new();
        let mut current = id;
        while current != self.root {
            let Some(slot) = self.slots.get(&current) else { break };
            let Some(parent) = slot.parent else { break };
            chain.push((parent, slot.key.as_str()));
            current = parent;
        }
        let mut path = Path::new();
        for (parent, key) in chain.into_iter().rev() {
            push_step(&mut path, &self.shape(parent).step(key));
        }
        path
    }

    /// Path a child stored under `key` in `parent` would have.
    pub(crate) fn child_path(&self, parent: NodeId, key: &str) -> Path {
        let mut path = self.path(parent);
        push_step(&mut path, &self.shape(parent).step(key));
        path
    }

    /// True if any node strictly below `id` satisfies `pred`.
    pub(crate) fn any_below(&self, id: NodeId, pred: &impl Fn(NodeId) -> bool) -> bool {
        self.slots.get(&id).is_some_and(|slot| {
            slot.children
                .iter()
                .any(|&c| pred(c) || self.any_below(c, pred))
        })
    }

    /// Moves a slot (with its subtree) under `parent` at `key`.
    pub(crate) fn relocate(&mut self, id: NodeId, parent: NodeId, key: String) {
        self.unlink(id);
        if let Some(slot) = self.slots.get_mut(&id) {
            slot.parent = Some(parent);
            slot.key = key;
        }
        self.link(id);
    }

    /// Inserts a fresh leaf-like slot; its content is never looked into.
    pub(crate) fn insert(&mut self, id: NodeId, parent: NodeId, key: String, shape: Shape) {
        self.declare(id, parent, key, shape);
        self.link(id);
    }

    /// Deletes a slot and its whole subtree.
    pub(crate) fn remove(&mut self, id: NodeId) {
        self.unlink(id);
        self.drop_subtree(id);
    }

    /// Drops everything below `id` and gives it a new shape.
    pub(crate) fn replace_content(&mut self, id: NodeId, shape: Shape) {
        for child in self.children(id) {
            self.drop_subtree(child);
        }
        if let Some(slot) = self.slots.get_mut(&id) {
            slot.children.clear();
            slot.shape = shape;
        }
    }

    /// A key derived from `key` that no child of `parent` uses and that
    /// `taken` does not reject.
    pub(crate) fn free_key(&self, parent: NodeId, key: &str, taken: impl Fn(&str) -> bool) -> String {
        (1usize..)
            .map(|n| format!("{key}#{n}"))
            .find(|candidate| {
                self.child(parent, candidate).is_none() && !taken(candidate.as_str())
            })
            .unwrap_or_else(|| format!("{key}#"))
    }

    fn unlink(&mut self, id: NodeId) {
        if let Some(parent) = self.parent(id) {
            if let Some(slot) = self.slots.get_mut(&parent) {
                slot.children.retain(|&c| c != id);
            }
        }
    }

    fn drop_subtree(&mut self, id: NodeId) {
        if let Some(slot) = self.slots.remove(&id) {
            for child in slot.children {
                self.drop_subtree(child);
            }
        }
    }
}
