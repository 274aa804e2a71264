//! Errors raised by the node store.

use thiserror::Error;

use crate::node::NodeId;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchemaError {
    /// A mutation referenced a node that is not where the caller assumed.
    /// The graph is left untouched when this is returned.
    #[error("INVARIANT_VIOLATION: {0}")]
    InvariantViolation(String),
    /// The id was never allocated by this store, or was freed by a commit.
    #[error("UNKNOWN_NODE: {0}")]
    UnknownNode(NodeId),
    #[error("INVALID_SCHEMA: {0}")]
    InvalidSchema(String),
    #[error("UNRESOLVED_REFERENCE: {0}")]
    UnresolvedReference(String),
}

pub(crate) fn violation(message: impl Into<String>) -> SchemaError {
    SchemaError::InvariantViolation(message.into())
}
