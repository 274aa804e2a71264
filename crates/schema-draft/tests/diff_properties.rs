mod common;

use common::assertions::{normalize, replay};
use proptest::prelude::*;
use schema_draft::{NodeId, RootNodeStore};
use serde_json::json;

const KEYS: &[&str] = &["a", "b", "c", "a#1", "items"];
const TABLES: &[&str] = &["users", "teams"];

#[derive(Debug, Clone)]
enum Action {
    AddScalar { parent: usize, key: usize, kind: u8 },
    AddObject { parent: usize, key: usize },
    AddArray { parent: usize, key: usize, items: usize },
    Remove { node: usize },
    Rename { node: usize, key: usize },
    Reparent { node: usize, parent: usize },
    Replace { node: usize, newcomer: Option<usize>, kind: u8 },
    ReplaceItems { array: usize, newcomer: Option<usize>, kind: u8 },
    SetDefault { node: usize, value: i64 },
    SetReference { node: usize, table: Option<usize> },
    Commit,
}

fn action() -> impl Strategy<Value = Action> {
    let pick = 0usize..64;
    prop_oneof![
        3 => (pick.clone(), 0..KEYS.len(), 0u8..3)
            .prop_map(|(parent, key, kind)| Action::AddScalar { parent, key, kind }),
        2 => (pick.clone(), 0..KEYS.len())
            .prop_map(|(parent, key)| Action::AddObject { parent, key }),
        1 => (pick.clone(), 0..KEYS.len(), pick.clone())
            .prop_map(|(parent, key, items)| Action::AddArray { parent, key, items }),
        2 => pick.clone().prop_map(|node| Action::Remove { node }),
        3 => (pick.clone(), 0..KEYS.len()).prop_map(|(node, key)| Action::Rename { node, key }),
        3 => (pick.clone(), pick.clone())
            .prop_map(|(node, parent)| Action::Reparent { node, parent }),
        2 => (pick.clone(), proptest::option::of(pick.clone()), 0u8..4)
            .prop_map(|(node, newcomer, kind)| Action::Replace { node, newcomer, kind }),
        1 => (pick.clone(), proptest::option::of(pick.clone()), 0u8..4)
            .prop_map(|(array, newcomer, kind)| Action::ReplaceItems { array, newcomer, kind }),
        1 => (pick.clone(), -3i64..3).prop_map(|(node, value)| Action::SetDefault { node, value }),
        1 => (pick.clone(), proptest::option::of(0..TABLES.len()))
            .prop_map(|(node, table)| Action::SetReference { node, table }),
        1 => Just(Action::Commit),
    ]
}

struct Harness {
    store: RootNodeStore,
    ids: Vec<NodeId>,
}

impl Harness {
    fn new() -> Self {
        let store = RootNodeStore::new();
        let ids = vec![store.root()];
        Self { store, ids }
    }

    /// A committed tree with nested objects and arrays to start from.
    fn seeded() -> Self {
        let mut store = RootNodeStore::from_schema(&json!({
            "type": "object",
            "properties": {
                "a": {"type": "string", "default": "x"},
                "b": {
                    "type": "object",
                    "properties": {
                        "c": {"type": "number", "default": 1},
                        "items": {"type": "boolean", "default": true}
                    }
                },
                "c": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "a": {"type": "string", "default": "", "foreignKey": "users"},
                            "a#1": {"type": "array", "items": {"type": "number"}}
                        }
                    }
                }
            }
        }))
        .expect("valid seed schema");
        store.submit_changes();
        let ids = store.draft_nodes();
        Self { store, ids }
    }

    fn start(seeded: bool) -> Self {
        if seeded {
            Self::seeded()
        } else {
            Self::new()
        }
    }

    fn pick(&self, n: usize) -> NodeId {
        self.ids[n % self.ids.len()]
    }

    /// An existing node when `newcomer` names one, a fresh scalar otherwise.
    fn newcomer(&mut self, newcomer: Option<usize>, kind: u8) -> NodeId {
        match newcomer {
            Some(n) => self.pick(n),
            None => self.create("replacement", kind),
        }
    }

    fn create(&mut self, key: &str, kind: u8) -> NodeId {
        let id = match kind {
            0 => self.store.create_string(key),
            1 => self.store.create_number(key),
            2 => self.store.create_boolean(key),
            _ => self.store.create_string_ref(key, TABLES[0]),
        };
        self.ids.push(id);
        id
    }

    /// Applies one action; rejected mutations are part of the game.
    fn run(&mut self, action: &Action) {
        let _ = match *action {
            Action::AddScalar { parent, key, kind } => {
                let parent = self.pick(parent);
                let child = self.create(KEYS[key], kind);
                self.store.add_property(parent, child)
            }
            Action::AddObject { parent, key } => {
                let parent = self.pick(parent);
                let child = self.store.create_object(KEYS[key]);
                self.ids.push(child);
                self.store.add_property(parent, child)
            }
            Action::AddArray { parent, key, items } => {
                let parent = self.pick(parent);
                let items = self.pick(items);
                match self.store.create_array(KEYS[key], items) {
                    Ok(array) => {
                        self.ids.push(array);
                        self.store.add_property(parent, array)
                    }
                    Err(err) => Err(err),
                }
            }
            Action::Remove { node } => {
                let node = self.pick(node);
                match self.store.node(node).map(|n| n.parent()) {
                    Ok(Some(parent)) => self.store.remove_property(parent, node),
                    _ => Ok(()),
                }
            }
            Action::Rename { node, key } => {
                let node = self.pick(node);
                self.store.set_id(node, KEYS[key])
            }
            Action::Reparent { node, parent } => {
                let node = self.pick(node);
                let parent = self.pick(parent);
                self.store.add_property(parent, node)
            }
            Action::Replace { node, newcomer, kind } => {
                let old = self.pick(node);
                match self.store.node(old).map(|n| n.parent()) {
                    Ok(Some(parent)) => {
                        let new = self.newcomer(newcomer, kind);
                        self.store.replace_property(parent, old, new)
                    }
                    _ => Ok(()),
                }
            }
            Action::ReplaceItems { array, newcomer, kind } => {
                let array = self.pick(array);
                let items = self.newcomer(newcomer, kind);
                self.store.replace_items(array, items)
            }
            Action::SetDefault { node, value } => {
                let node = self.pick(node);
                self.store
                    .set_default(node, json!(value))
                    .or_else(|_| self.store.set_default(node, json!(value > 0)))
            }
            Action::SetReference { node, table } => {
                let node = self.pick(node);
                self.store
                    .set_reference(node, table.map(|t| TABLES[t].to_string()))
            }
            Action::Commit => {
                self.store.submit_changes();
                Ok(())
            }
        };
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn patches_replay_base_into_draft(
        seeded in any::<bool>(),
        actions in prop::collection::vec(action(), 1..40),
    ) {
        let mut harness = Harness::start(seeded);
        for action in &actions {
            harness.run(action);
        }
        let store = &harness.store;

        let replayed = replay(store);
        prop_assert!(replayed.is_ok(), "{:?}\n{:?}", replayed, store.get_patches());
        prop_assert_eq!(
            normalize(&replayed.unwrap()),
            normalize(&store.draft_schema()),
            "patches: {:?}",
            store.get_patches()
        );
    }

    #[test]
    fn patches_are_stable_and_cleared_by_commit(
        seeded in any::<bool>(),
        actions in prop::collection::vec(action(), 1..40),
    ) {
        let mut harness = Harness::start(seeded);
        for action in &actions {
            harness.run(action);
        }

        let first = harness.store.get_patches();
        prop_assert_eq!(&harness.store.get_patches(), &first);

        let draft = harness.store.draft_schema();
        harness.store.submit_changes();
        prop_assert!(harness.store.get_patches().is_empty());
        prop_assert_eq!(harness.store.base_schema(), draft);
    }
}
