//! The node arena and its root.
//!
//! [`RootNodeStore`] owns every node ever created for one document, until a
//! commit frees the ones that are no longer reachable. Parent links are plain
//! [`NodeId`]s, so a detached node is simply one no composite lists as a
//! child. Ids come from a counter and are never handed out twice, so an id
//! held across a commit that freed its node stays unknown.

mod commit;
mod mutation;
mod reference;

pub use reference::ReferenceResolver;

use std::collections::BTreeMap;

use serde_json::Value;
use schema_draft_json_pointer::{push_step, Path, SchemaStep, ITEMS};

use crate::error::SchemaError;
use crate::node::{NodeId, NodeKind, ScalarKind, SchemaNode};

#[derive(Debug, Clone)]
pub struct RootNodeStore {
    nodes: BTreeMap<NodeId, SchemaNode>,
    root: NodeId,
    next: usize,
}

impl Default for RootNodeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RootNodeStore {
    /// Creates a store whose root is an empty object.
    pub fn new() -> Self {
        Self::with_root(NodeKind::Object { children: Vec::new() })
    }

    /// Creates a store with a childless root of the given kind.
    pub fn with_root(kind: NodeKind) -> Self {
        let kind = match kind {
            NodeKind::Object { .. } => NodeKind::Object { children: Vec::new() },
            NodeKind::Array { .. } => NodeKind::Array { items: None },
            scalar => scalar,
        };
        let mut store = Self::empty();
        store.root = store.alloc(kind, String::new());
        store
    }

    /// Parses a plain schema document into a fresh, uncommitted tree.
    pub fn from_schema(schema: &Value) -> Result<Self, SchemaError> {
        let mut store = Self::empty();
        store.root = store.create_schema_node("", schema)?;
        Ok(store)
    }

    fn empty() -> Self {
        Self {
            nodes: BTreeMap::new(),
            root: NodeId(0),
            next: 0,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes in the arena, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.slot(id).is_some()
    }

    pub fn node(&self, id: NodeId) -> Result<&SchemaNode, SchemaError> {
        self.slot(id).ok_or(SchemaError::UnknownNode(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut SchemaNode, SchemaError> {
        self.nodes.get_mut(&id).ok_or(SchemaError::UnknownNode(id))
    }

    pub(crate) fn slot(&self, id: NodeId) -> Option<&SchemaNode> {
        self.nodes.get(&id)
    }

    /// Live nodes in allocation order.
    pub(crate) fn live(&self) -> impl Iterator<Item = (NodeId, &SchemaNode)> {
        self.nodes.iter().map(|(&id, node)| (id, node))
    }

    /// Keeps only the nodes `keep` accepts.
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(NodeId) -> bool) {
        self.nodes.retain(|&id, _| keep(id));
    }

    /// Drops every node allocated since `mark` was taken with
    /// [`alloc_mark`](Self::alloc_mark).
    pub(crate) fn rollback(&mut self, mark: usize) {
        self.nodes.retain(|id, _| id.0 < mark);
        self.next = mark;
    }

    pub(crate) fn alloc_mark(&self) -> usize {
        self.next
    }

    // ── Creation ──────────────────────────────────────────────────────────

    pub(crate) fn alloc(&mut self, kind: NodeKind, key: impl Into<String>) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        self.nodes.insert(id, SchemaNode::new(kind, key.into()));
        id
    }

    pub fn create_string(&mut self, key: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::scalar(ScalarKind::String), key)
    }

    pub fn create_number(&mut self, key: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::scalar(ScalarKind::Number), key)
    }

    pub fn create_boolean(&mut self, key: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::scalar(ScalarKind::Boolean), key)
    }

    pub fn create_string_ref(
        &mut self,
        key: impl Into<String>,
        target_table: impl Into<String>,
    ) -> NodeId {
        let kind = NodeKind::StringRef {
            target_table: target_table.into(),
            default: ScalarKind::String.initial_default(),
        };
        self.alloc(kind, key)
    }

    pub fn create_object(&mut self, key: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Object { children: Vec::new() }, key)
    }

    /// Creates an array whose items slot holds `items`, which is detached
    /// from its current parent first.
    pub fn create_array(
        &mut self,
        key: impl Into<String>,
        items: NodeId,
    ) -> Result<NodeId, SchemaError> {
        self.node(items)?;
        let mark = self.alloc_mark();
        let array = self.alloc(NodeKind::Array { items: None }, key);
        if let Err(err) = self.add_property(array, items) {
            self.rollback(mark);
            return Err(err);
        }
        Ok(array)
    }

    // ── Draft tree queries ────────────────────────────────────────────────

    pub fn children(&self, id: NodeId) -> Result<&[NodeId], SchemaError> {
        Ok(self.node(id)?.kind.children())
    }

    /// Finds the draft child of an object stored under `key`.
    pub fn child_by_key(&self, parent: NodeId, key: &str) -> Result<Option<NodeId>, SchemaError> {
        let node = self.node(parent)?;
        match &node.kind {
            NodeKind::Object { children } => Ok(children
                .iter()
                .copied()
                .find(|&child| self.slot(child).is_some_and(|c| c.key == key))),
            NodeKind::Array { items } if key == ITEMS => Ok(*items),
            _ => Ok(None),
        }
    }

    /// The key a node occupies in its draft parent.
    pub fn draft_key(&self, id: NodeId) -> Result<&str, SchemaError> {
        let node = self.node(id)?;
        match node.parent.and_then(|p| self.slot(p)) {
            Some(parent) if parent.kind.is_array() => Ok(ITEMS),
            _ => Ok(&node.key),
        }
    }

    /// Draft ancestors of `id`, nearest first.
    pub(crate) fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.slot(id).and_then(|n| n.parent), move |&p| {
            self.slot(p).and_then(|n| n.parent)
        })
    }

    /// True when `id` is reachable from the root through draft links.
    pub fn is_attached(&self, id: NodeId) -> bool {
        id == self.root || self.ancestors(id).last() == Some(self.root)
    }

    /// Pointer path of a node in the draft document, `None` when detached.
    pub fn draft_path(&self, id: NodeId) -> Result<Option<Path>, SchemaError> {
        self.node(id)?;
        if !self.is_attached(id) {
            return Ok(None);
        }
        let mut chain: Vec<NodeId> = vec![id];
        chain.extend(self.ancestors(id));
        chain.reverse();
        let mut path = Path::new();
        for pair in chain.windows(2) {
            push_step(&mut path, &self.step(pair[0], pair[1])?);
        }
        Ok(Some(path))
    }

    /// The pointer step from `parent` to its draft child `child`.
    pub(crate) fn step(&self, parent: NodeId, child: NodeId) -> Result<SchemaStep, SchemaError> {
        match &self.node(parent)?.kind {
            NodeKind::Array { .. } => Ok(SchemaStep::Items),
            _ => Ok(SchemaStep::Property(self.node(child)?.key.clone())),
        }
    }

    /// Draft-reachable nodes in pre-order, root first.
    pub fn draft_nodes(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.slot(id) else { continue };
            out.push(id);
            stack.extend(node.kind.children().iter().rev().copied());
        }
        out
    }
}
