//! Content nodes and the in-memory node store.
//!
//! The store is the storage stand-in behind the [`Session`] seam: nodes
//! keyed by path with a uuid side-index. It backs tests, fixtures and the
//! CLI; a real deployment plugs its own driver in behind the same trait.
//!
//! [`Session`]: crate::repository::Session

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde_json::Value;
use uuid::Uuid;

use crate::core::ContentPath;

/// One stored content node: a path plus raw physical properties.
#[derive(Debug, Clone)]
pub struct Node {
    pub uuid: Uuid,
    pub path: ContentPath,
    pub properties: FxHashMap<String, Value>,
}

impl Node {
    pub fn new(path: ContentPath) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            path,
            properties: FxHashMap::default(),
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    pub fn string_property(&self, name: &str) -> Option<&str> {
        self.property(name).and_then(Value::as_str)
    }

    pub fn bool_property(&self, name: &str) -> Option<bool> {
        self.property(name).and_then(Value::as_bool)
    }

    pub fn int_property(&self, name: &str) -> Option<i64> {
        self.property(name).and_then(Value::as_i64)
    }
}

/// Thread-safe in-memory node store.
///
/// Paths are unique; inserting a node at an existing path replaces it.
#[derive(Debug, Default)]
pub struct NodeStore {
    by_path: RwLock<FxHashMap<ContentPath, Node>>,
    by_uuid: RwLock<FxHashMap<Uuid, ContentPath>>,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, node: Node) {
        self.by_uuid.write().insert(node.uuid, node.path.clone());
        if let Some(previous) = self.by_path.write().insert(node.path.clone(), node) {
            // Replaced node: drop its stale uuid index entry
            self.by_uuid.write().remove(&previous.uuid);
        }
    }

    pub fn remove(&self, path: &ContentPath) -> Option<Node> {
        let node = self.by_path.write().remove(path)?;
        self.by_uuid.write().remove(&node.uuid);
        Some(node)
    }

    pub fn get_by_path(&self, path: &ContentPath) -> Option<Node> {
        self.by_path.read().get(path).cloned()
    }

    pub fn get_by_uuid(&self, uuid: &Uuid) -> Option<Node> {
        let by_uuid = self.by_uuid.read();
        let path = by_uuid.get(uuid)?;
        self.by_path.read().get(path).cloned()
    }

    /// All nodes in path order (parents before descendants).
    pub fn all(&self) -> Vec<Node> {
        let by_path = self.by_path.read();
        let mut nodes: Vec<Node> = by_path.values().cloned().collect();
        nodes.sort_by(|a, b| a.path.cmp(&b.path));
        nodes
    }

    pub fn len(&self) -> usize {
        self.by_path.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.read().is_empty()
    }
}
