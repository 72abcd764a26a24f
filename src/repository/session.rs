//! Sessions - request-scoped access to a workspace's node store.
//!
//! The session manager hands out one shared store per workspace (`default`
//! holds drafts, `live` holds published content). A checked-out session is
//! request-scoped: callers must not share one instance across concurrent
//! requests. Locking beyond the store's own read/write locks is not
//! provided here.

use std::cmp::Ordering as CmpOrdering;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde_json::Value;
use uuid::Uuid;

use crate::core::ContentPath;
use crate::repository::node::{Node, NodeStore};
use crate::repository::qom::{ContentQuery, OrderBy, PathConstraint};

/// Which content workspace a session operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Workspace {
    /// Draft content, as edited.
    Default,
    /// Published content, as served.
    Live,
}

impl Workspace {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Self::Default),
            "live" => Some(Self::Live),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Live => "live",
        }
    }
}

/// The query seam the repository programs against.
pub trait Session: Send + Sync {
    fn node_by_uuid(&self, uuid: &Uuid) -> Option<Node>;
    fn node_by_path(&self, path: &ContentPath) -> Option<Node>;
    fn execute(&self, query: &ContentQuery) -> Vec<Node>;
}

/// Hands out shared per-workspace sessions.
#[derive(Debug, Default)]
pub struct SessionManager {
    stores: RwLock<FxHashMap<Workspace, Arc<NodeStore>>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check out the session for a workspace.
    ///
    /// All sessions of one workspace share the same store; two workspaces
    /// never do.
    pub fn session(&self, workspace: Workspace) -> StoreSession {
        if let Some(store) = self.stores.read().get(&workspace) {
            return StoreSession {
                store: Arc::clone(store),
            };
        }

        let mut stores = self.stores.write();
        let store = stores
            .entry(workspace)
            .or_insert_with(|| Arc::new(NodeStore::new()));
        StoreSession {
            store: Arc::clone(store),
        }
    }

    /// Root content path of a webspace's tree (`/cmf/<key>/contents`).
    pub fn content_root(&self, webspace_key: &str) -> ContentPath {
        ContentPath::new("/cmf").join(webspace_key).join("contents")
    }
}

/// A session backed by the in-memory node store.
#[derive(Debug, Clone)]
pub struct StoreSession {
    store: Arc<NodeStore>,
}

impl StoreSession {
    /// Direct store access, for seeding fixtures and demos.
    pub fn store(&self) -> &NodeStore {
        &self.store
    }
}

impl Session for StoreSession {
    fn node_by_uuid(&self, uuid: &Uuid) -> Option<Node> {
        self.store.get_by_uuid(uuid)
    }

    fn node_by_path(&self, path: &ContentPath) -> Option<Node> {
        self.store.get_by_path(path)
    }

    fn execute(&self, query: &ContentQuery) -> Vec<Node> {
        let mut rows: Vec<Node> = match &query.uuid {
            Some(uuid) => self.store.get_by_uuid(uuid).into_iter().collect(),
            None => self.store.all(),
        };

        rows.retain(|node| path_matches(&query.path, &node.path));
        rows.retain(|node| {
            query
                .comparisons
                .iter()
                .all(|(name, value)| node.property(name) == Some(value))
        });

        if !query.order_by.is_empty() {
            rows.sort_by(|a, b| {
                for order in &query.order_by {
                    let ordering = match order {
                        OrderBy::Path => a.path.cmp(&b.path),
                        OrderBy::Property(name) => {
                            compare_values(a.property(name), b.property(name))
                        }
                    };
                    if ordering != CmpOrdering::Equal {
                        return ordering;
                    }
                }
                CmpOrdering::Equal
            });
        }

        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        rows
    }
}

fn path_matches(constraint: &PathConstraint, path: &ContentPath) -> bool {
    match constraint {
        PathConstraint::Any => true,
        PathConstraint::Equals(expected) => path == expected,
        PathConstraint::ChildOf(parent) => path.is_child_of(parent),
        PathConstraint::SelfOrDescendantOf(base) => path == base || path.is_descendant_of(base),
    }
}

/// Value ordering for `order by property`: nulls first, then bools,
/// numbers, strings; anything else compares equal.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> CmpOrdering {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(_) => 4,
        }
    }

    match (a, b) {
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(CmpOrdering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        _ => rank(a).cmp(&rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::qom::QueryBuilder;

    fn seeded_manager() -> SessionManager {
        let manager = SessionManager::new();
        let session = manager.session(Workspace::Default);
        let store = session.store();
        store.insert(
            Node::new(ContentPath::new("/cmf/blog/contents"))
                .with_property("i18n:en-title", "Home"),
        );
        store.insert(
            Node::new(ContentPath::new("/cmf/blog/contents/posts"))
                .with_property("i18n:en-title", "Posts")
                .with_property("i18n:en-state", 2),
        );
        store.insert(
            Node::new(ContentPath::new("/cmf/blog/contents/about"))
                .with_property("i18n:en-title", "About")
                .with_property("i18n:en-state", 1),
        );
        manager
    }

    #[test]
    fn test_workspace_parse() {
        assert_eq!(Workspace::parse("default"), Some(Workspace::Default));
        assert_eq!(Workspace::parse("live"), Some(Workspace::Live));
        assert_eq!(Workspace::parse("preview"), None);
        assert_eq!(Workspace::Live.as_str(), "live");
    }

    #[test]
    fn test_same_workspace_shares_store() {
        let manager = seeded_manager();
        let second = manager.session(Workspace::Default);
        assert_eq!(second.store().len(), 3);
    }

    #[test]
    fn test_workspaces_are_isolated() {
        let manager = seeded_manager();
        let live = manager.session(Workspace::Live);
        assert!(live.store().is_empty());
    }

    #[test]
    fn test_content_root() {
        let manager = SessionManager::new();
        assert_eq!(manager.content_root("blog"), "/cmf/blog/contents");
    }

    #[test]
    fn test_query_by_uuid_with_limit() {
        let manager = seeded_manager();
        let session = manager.session(Workspace::Default);
        let uuid = session
            .node_by_path(&ContentPath::new("/cmf/blog/contents/posts"))
            .unwrap()
            .uuid;

        let query = QueryBuilder::new().where_uuid(uuid).limit(1).build();
        let rows = session.execute(&query);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].path, "/cmf/blog/contents/posts");
    }

    #[test]
    fn test_query_children_in_path_order() {
        let manager = seeded_manager();
        let session = manager.session(Workspace::Default);

        let query = QueryBuilder::new()
            .where_child_of(ContentPath::new("/cmf/blog/contents"))
            .order_by_path()
            .build();
        let paths: Vec<_> = session.execute(&query).into_iter().map(|n| n.path).collect();
        assert_eq!(
            paths,
            vec!["/cmf/blog/contents/about", "/cmf/blog/contents/posts"]
        );
    }

    #[test]
    fn test_query_self_or_descendants() {
        let manager = seeded_manager();
        let session = manager.session(Workspace::Default);

        let query = QueryBuilder::new()
            .where_self_or_descendant_of(ContentPath::new("/cmf/blog/contents"))
            .order_by_path()
            .build();
        assert_eq!(session.execute(&query).len(), 3);
    }

    #[test]
    fn test_query_property_comparison() {
        let manager = seeded_manager();
        let session = manager.session(Workspace::Default);

        let query = QueryBuilder::new()
            .where_property_eq("i18n:en-state", Value::from(2))
            .build();
        let rows = session.execute(&query);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].path, "/cmf/blog/contents/posts");
    }

    #[test]
    fn test_order_by_property() {
        let manager = seeded_manager();
        let session = manager.session(Workspace::Default);

        let query = QueryBuilder::new()
            .where_child_of(ContentPath::new("/cmf/blog/contents"))
            .order_by_property("i18n:en-state")
            .build();
        let states: Vec<_> = session
            .execute(&query)
            .into_iter()
            .map(|n| n.int_property("i18n:en-state"))
            .collect();
        assert_eq!(states, vec![Some(1), Some(2)]);
    }
}
