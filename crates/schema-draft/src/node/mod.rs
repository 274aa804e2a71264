//! Schema node types.
//!
//! # Node kinds
//!
//! | Variant     | Plain schema                                   | Children         |
//! |-------------|------------------------------------------------|------------------|
//! | `Scalar`    | `{type: string/number/boolean, default}`       | none             |
//! | `StringRef` | `{type: "string", default, foreignKey}`        | none             |
//! | `Object`    | `{type: "object", properties, required, ...}`  | ordered by key   |
//! | `Array`     | `{type: "array", items}`                       | one `items` slot |
//!
//! Nodes live in the arena of a [`RootNodeStore`](crate::RootNodeStore) and
//! are identified by [`NodeId`]. Identity, not content, is what the diff
//! engine uses to tell a moved node from a replaced one.

use std::fmt;

use serde_json::Value;

/// Arena index of a node. Two ids are the same node iff they are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A parent/key pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    pub parent: NodeId,
    pub key: String,
}

// ── ScalarKind ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    String,
    Number,
    Boolean,
}

impl ScalarKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Number => "number",
            ScalarKind::Boolean => "boolean",
        }
    }

    pub fn from_type(name: &str) -> Option<Self> {
        match name {
            "string" => Some(ScalarKind::String),
            "number" => Some(ScalarKind::Number),
            "boolean" => Some(ScalarKind::Boolean),
            _ => None,
        }
    }

    /// Default value of a freshly created scalar of this kind.
    pub fn initial_default(&self) -> Value {
        match self {
            ScalarKind::String => Value::String(String::new()),
            ScalarKind::Number => Value::from(0),
            ScalarKind::Boolean => Value::Bool(false),
        }
    }

    /// True if `value` may be used as a default for this kind.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ScalarKind::String => value.is_string(),
            ScalarKind::Number => value.is_number(),
            ScalarKind::Boolean => value.is_boolean(),
        }
    }
}

// ── NodeKind ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Scalar { kind: ScalarKind, default: Value },
    /// A string that points at another table.
    StringRef { target_table: String, default: Value },
    Object { children: Vec<NodeId> },
    Array { items: Option<NodeId> },
}

impl NodeKind {
    pub fn scalar(kind: ScalarKind) -> Self {
        NodeKind::Scalar { kind, default: kind.initial_default() }
    }

    /// The `type` member this node serializes with.
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Scalar { kind, .. } => kind.as_str(),
            NodeKind::StringRef { .. } => ScalarKind::String.as_str(),
            NodeKind::Object { .. } => "object",
            NodeKind::Array { .. } => "array",
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, NodeKind::Object { .. } | NodeKind::Array { .. })
    }

    pub fn is_object(&self) -> bool {
        matches!(self, NodeKind::Object { .. })
    }

    pub fn is_array(&self) -> bool {
        matches!(self, NodeKind::Array { .. })
    }

    /// Draft children in order. Empty for scalars.
    pub fn children(&self) -> &[NodeId] {
        match self {
            NodeKind::Object { children } => children,
            NodeKind::Array { items } => items.as_slice(),
            NodeKind::Scalar { .. } | NodeKind::StringRef { .. } => &[],
        }
    }
}

// ── SchemaNode ────────────────────────────────────────────────────────────

/// One node of the schema graph.
///
/// The draft position is `parent` plus `key`; the base position is `base`.
/// A node whose `parent` is `None` is either the root or detached.
#[derive(Debug, Clone)]
pub struct SchemaNode {
    pub(crate) kind: NodeKind,
    pub(crate) key: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) base: Option<Position>,
    /// Pre-order index in the last committed tree; orders base siblings.
    pub(crate) base_rank: usize,
    /// Serialized scalar content as of the last commit.
    pub(crate) base_value: Option<Value>,
    /// Committed node whose slot this node took over through a replace.
    pub(crate) replaces: Option<NodeId>,
}

impl SchemaNode {
    pub(crate) fn new(kind: NodeKind, key: String) -> Self {
        Self {
            kind,
            key,
            parent: None,
            base: None,
            base_rank: 0,
            base_value: None,
            replaces: None,
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// The node's own name. Under an array the effective key is `items`.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current draft parent.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Position in the last committed tree.
    pub fn base(&self) -> Option<&Position> {
        self.base.as_ref()
    }

    pub fn is_committed(&self) -> bool {
        self.base.is_some()
    }

    pub fn replaces(&self) -> Option<NodeId> {
        self.replaces
    }
}
