//! Deriving the patch list that turns the base document into the draft.
//!
//! The list is meant to be replayed in order. It is written against a
//! [`Simulation`] of the document, so every path in it is valid at the
//! moment its operation runs:
//!
//! 1. moves, shallowest node first, bring every surviving node to its draft
//!    slot (a node squatting on a wanted slot is parked under a free key, or
//!    removed when nothing in it survives);
//! 2. a walk over kept composites removes what is left of dead nodes, then
//!    adds new subtrees, replaces slots whose node was swapped out and
//!    replaces scalars whose content changed.

mod plan;
mod sim;

use tracing::{debug, trace};

use self::plan::{Plan, Role};
use self::sim::{Shape, Simulation};
use crate::node::NodeId;
use crate::patch::SchemaPatch;
use crate::store::RootNodeStore;

impl RootNodeStore {
    /// Patches that turn [`base_schema`](Self::base_schema) into
    /// [`draft_schema`](Self::draft_schema). Empty right after
    /// [`submit_changes`](Self::submit_changes).
    ///
    /// Moves come before content patches. Adds and replaces are written at
    /// draft paths, and a later move out of an ancestor's base slot would
    /// invalidate them, so writing moves last would not replay in order.
    pub fn get_patches(&self) -> Vec<SchemaPatch> {
        let plan = Plan::build(self);
        let sim = base_simulation(self, &plan);
        let mut differ = Differ {
            store: self,
            plan,
            sim,
            ops: Vec::new(),
        };
        differ.emit_moves();
        differ.visit(self.root());
        differ.emit_root_content();
        debug!(ops = differ.ops.len(), "get_patches");
        differ.ops
    }
}

/// The base tree, with replaced nodes tracked under the node that took
/// their slot.
fn base_simulation(store: &RootNodeStore, plan: &Plan) -> Simulation {
    let root = store.root();
    let root_shape = store.slot(root).map_or(Shape::Object, |n| Shape::of(&n.kind));
    let mut sim = Simulation::new(root, root_shape);

    let committed: Vec<NodeId> = store
        .live()
        .filter(|(id, node)| *id != root && node.base.is_some())
        .map(|(id, _)| id)
        .collect();
    for &id in &committed {
        let Some(node) = store.slot(id) else { continue };
        let Some(base) = &node.base else { continue };
        sim.declare(
            plan.slot_id(id),
            plan.slot_id(base.parent),
            base.key.clone(),
            Shape::of(&node.kind),
        );
    }
    for &id in &committed {
        sim.link(plan.slot_id(id));
    }
    sim
}

struct Differ<'a> {
    store: &'a RootNodeStore,
    plan: Plan,
    sim: Simulation,
    ops: Vec<SchemaPatch>,
}

impl Differ<'_> {
    fn push(&mut self, op: SchemaPatch) {
        trace!(op = op.op_name(), path = %op.pointer(), "emit");
        self.ops.push(op);
    }

    fn emit_moves(&mut self) {
        for (id, target) in self.plan.moved(self.store) {
            match self.sim.child(target.parent, &target.key) {
                Some(occupant) if occupant == id => continue,
                Some(occupant) => self.clear_slot(occupant, target.parent, &target.key),
                None => {}
            }
            let from = self.sim.path(id);
            let path = self.sim.child_path(target.parent, &target.key);
            self.sim.relocate(id, target.parent, target.key);
            self.push(SchemaPatch::Move { from, path });
        }
    }

    /// Frees `key` in `parent` for an incoming node.
    fn clear_slot(&mut self, occupant: NodeId, parent: NodeId, key: &str) {
        let plan = &self.plan;
        let keep = plan.survives(occupant) || self.sim.any_below(occupant, &|n| plan.survives(n));
        if !keep {
            let path = self.sim.path(occupant);
            self.sim.remove(occupant);
            self.push(SchemaPatch::Remove { path });
            return;
        }
        let store = self.store;
        let parked = self.sim.free_key(parent, key, |candidate| {
            matches!(store.child_by_key(parent, candidate), Ok(Some(_)))
        });
        let from = self.sim.path(occupant);
        let path = self.sim.child_path(parent, &parked);
        self.sim.relocate(occupant, parent, parked);
        self.push(SchemaPatch::Move { from, path });
    }

    /// Brings the children of a kept composite in line with the draft.
    fn visit(&mut self, id: NodeId) {
        for child in self.sim.children(id) {
            if !self.plan.survives(child) {
                let path = self.sim.path(child);
                self.sim.remove(child);
                self.push(SchemaPatch::Remove { path });
            }
        }

        let store = self.store;
        let Ok(children) = store.children(id) else { return };
        for &child in children {
            let Some(node) = store.slot(child) else { continue };
            match self.plan.role(child) {
                Some(Role::Added) => {
                    let Ok(key) = store.draft_key(child) else { continue };
                    let key = key.to_string();
                    let path = self.sim.child_path(id, &key);
                    let value = store.serialize(child);
                    self.sim.insert(child, id, key, Shape::of(&node.kind));
                    self.push(SchemaPatch::Add { path, value });
                }
                Some(Role::Replacement) => {
                    let path = self.sim.path(child);
                    let value = store.serialize(child);
                    self.sim.replace_content(child, Shape::of(&node.kind));
                    self.push(SchemaPatch::Replace { path, value });
                }
                Some(Role::Kept) if node.kind.is_composite() => self.visit(child),
                Some(Role::Kept) => self.emit_content(child),
                Some(Role::Covered) | None => {}
            }
        }
    }

    fn emit_root_content(&mut self) {
        let root = self.store.root();
        if self.store.slot(root).is_some_and(|n| !n.kind.is_composite()) {
            self.emit_content(root);
        }
    }

    /// Replaces a kept scalar whose content differs from its snapshot.
    fn emit_content(&mut self, id: NodeId) {
        let store = self.store;
        let Some(node) = store.slot(id) else { return };
        let Some(base_value) = &node.base_value else { return };
        let Some(value) = store.scalar_value(id) else { return };
        if *base_value != value {
            let path = self.sim.path(id);
            self.push(SchemaPatch::Replace { path, value });
        }
    }
}
