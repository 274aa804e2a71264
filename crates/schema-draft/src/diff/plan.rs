//! Classification of nodes before any patch is written.

use std::collections::{HashMap, HashSet};

use crate::node::{NodeId, Position};
use crate::store::RootNodeStore;

/// What a draft-reachable node contributes to the patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Role {
    /// Committed, and so are all its draft ancestors. May move; its scalar
    /// content may be replaced; composites are walked.
    Kept,
    /// Uncommitted node sitting in the very base slot of the committed node
    /// it replaced. A replacement that was renamed or moved since is `Added`.
    Replacement,
    /// Uncommitted subtree root. Written out whole with one `add`.
    Added,
    /// Anything below an `Added` or `Replacement` node.
    Covered,
}

#[derive(Debug)]
pub(crate) struct Plan {
    roles: HashMap<NodeId, Role>,
    depths: HashMap<NodeId, usize>,
    /// Draft pre-order.
    order: Vec<NodeId>,
    /// Replaced committed node -> the node holding its slot now.
    taken_over: HashMap<NodeId, NodeId>,
}

impl Plan {
    pub(crate) fn build(store: &RootNodeStore) -> Self {
        let order = store.draft_nodes();
        let reachable: HashSet<NodeId> = order.iter().copied().collect();
        let root = store.root();

        let mut roles = HashMap::with_capacity(order.len());
        let mut depths = HashMap::with_capacity(order.len());
        let mut taken_over = HashMap::new();

        for &id in &order {
            let Some(node) = store.slot(id) else { continue };
            let parent = match node.parent {
                Some(parent) if id != root => parent,
                _ => {
                    roles.insert(id, Role::Kept);
                    depths.insert(id, 0);
                    continue;
                }
            };
            let parent_role = roles.get(&parent).copied().unwrap_or(Role::Covered);
            let role = match parent_role {
                Role::Added | Role::Replacement | Role::Covered => Role::Covered,
                Role::Kept if node.is_committed() => Role::Kept,
                Role::Kept => match node.replaces {
                    Some(replaced)
                        if !reachable.contains(&replaced)
                            && !taken_over.contains_key(&replaced)
                            && holds_base_slot(store, replaced, parent, id) =>
                    {
                        taken_over.insert(replaced, id);
                        Role::Replacement
                    }
                    _ => Role::Added,
                },
            };
            roles.insert(id, role);
            depths.insert(id, depths.get(&parent).map_or(1, |d| d + 1));
        }

        Self { roles, depths, order, taken_over }
    }

    pub(crate) fn role(&self, id: NodeId) -> Option<Role> {
        self.roles.get(&id).copied()
    }

    /// True for nodes that end up in a slot of their own in the draft
    /// document: kept nodes and replacements.
    pub(crate) fn survives(&self, id: NodeId) -> bool {
        matches!(self.role(id), Some(Role::Kept | Role::Replacement))
    }

    /// The identity a base slot is tracked under: replaced nodes are tracked
    /// as the node that took them over.
    pub(crate) fn slot_id(&self, id: NodeId) -> NodeId {
        self.taken_over.get(&id).copied().unwrap_or(id)
    }

    /// Base position of a surviving node, with parents mapped through
    /// [`slot_id`](Self::slot_id).
    pub(crate) fn base_slot(&self, store: &RootNodeStore, id: NodeId) -> Option<Position> {
        let source = match self.role(id)? {
            Role::Kept => id,
            Role::Replacement => store.slot(id)?.replaces?,
            Role::Added | Role::Covered => return None,
        };
        let base = store.slot(source)?.base.as_ref()?;
        Some(Position {
            parent: self.slot_id(base.parent),
            key: base.key.clone(),
        })
    }

    /// Surviving nodes whose draft slot differs from their base slot,
    /// shallowest first, then in draft order.
    pub(crate) fn moved(&self, store: &RootNodeStore) -> Vec<(NodeId, Position)> {
        let mut moved: Vec<(NodeId, Position)> = self
            .order
            .iter()
            .copied()
            .filter(|&id| id != store.root() && self.survives(id))
            .filter_map(|id| {
                let parent = store.slot(id)?.parent?;
                let key = store.draft_key(id).ok()?.to_string();
                let draft = Position { parent, key };
                (self.base_slot(store, id)? != draft).then_some((id, draft))
            })
            .collect();
        moved.sort_by_key(|(id, _)| self.depths.get(id).copied().unwrap_or_default());
        moved
    }
}

/// True when `id` sits under `parent` at the key `replaced` was committed at.
fn holds_base_slot(store: &RootNodeStore, replaced: NodeId, parent: NodeId, id: NodeId) -> bool {
    let Some(base) = store.slot(replaced).and_then(|r| r.base.as_ref()) else {
        return false;
    };
    base.parent == parent && store.draft_key(id).is_ok_and(|key| key == base.key)
}
