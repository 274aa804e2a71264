//! Checking reference targets against the tables the application knows.

use std::collections::HashSet;

use super::RootNodeStore;
use crate::error::SchemaError;
use crate::node::NodeKind;

/// Answers whether a table a reference points at exists.
pub trait ReferenceResolver {
    fn has_table(&self, table: &str) -> bool;
}

impl ReferenceResolver for HashSet<String> {
    fn has_table(&self, table: &str) -> bool {
        self.contains(table)
    }
}

impl RootNodeStore {
    /// Fails on the first reference in the draft tree, in pre-order, whose
    /// target table `resolver` does not know.
    pub fn check_references(&self, resolver: &impl ReferenceResolver) -> Result<(), SchemaError> {
        for id in self.draft_nodes() {
            if let Some(NodeKind::StringRef { target_table, .. }) = self.slot(id).map(|n| &n.kind) {
                if !resolver.has_table(target_table) {
                    return Err(SchemaError::UnresolvedReference(target_table.clone()));
                }
            }
        }
        Ok(())
    }
}
