//! Commit: the draft becomes the new base.

use std::collections::HashSet;

use tracing::debug;

use super::RootNodeStore;
use crate::node::{NodeId, Position};

impl RootNodeStore {
    /// Copies every reachable node's draft position into its base position,
    /// snapshots scalar content, and frees every node the draft tree no
    /// longer reaches. Afterwards [`get_patches`](Self::get_patches) is empty.
    pub fn submit_changes(&mut self) {
        let reachable = self.draft_nodes();
        for (rank, &id) in reachable.iter().enumerate() {
            let base = match self.slot(id).and_then(|n| n.parent) {
                Some(parent) => self.draft_key(id).ok().map(|key| Position {
                    parent,
                    key: key.to_string(),
                }),
                None => None,
            };
            let base_value = self.scalar_value(id);
            if let Ok(node) = self.node_mut(id) {
                node.base = base;
                node.base_rank = rank;
                node.base_value = base_value;
                node.replaces = None;
            }
        }

        let keep: HashSet<NodeId> = reachable.iter().copied().collect();
        let before = self.len();
        self.retain(|id| keep.contains(&id));
        let freed = before - self.len();
        debug!(live = reachable.len(), freed, "submit_changes");
    }
}
