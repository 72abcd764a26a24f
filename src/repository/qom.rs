//! Query object model - structured content queries.
//!
//! Queries are built programmatically from typed parts (selector columns,
//! path restriction, property comparisons, orderings, limit) instead of a
//! query string, and executed by a [`Session`](crate::repository::Session).

use serde_json::Value;
use uuid::Uuid;

use crate::core::ContentPath;

/// Restriction on where in the tree rows may come from.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PathConstraint {
    #[default]
    Any,
    /// The node at exactly this path.
    Equals(ContentPath),
    /// Direct children of this path.
    ChildOf(ContentPath),
    /// The node itself plus everything below it.
    SelfOrDescendantOf(ContentPath),
}

/// Sort key for result rows.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderBy {
    /// Depth-first path order; parents always precede their descendants.
    Path,
    /// A physical property name, ascending.
    Property(String),
}

/// A fully built content query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentQuery {
    /// Physical property names selected for the caller. Locale-aware:
    /// the builder receives already-encoded names.
    pub columns: Vec<String>,
    pub uuid: Option<Uuid>,
    pub path: PathConstraint,
    /// Property equality comparisons, all of which must hold.
    pub comparisons: Vec<(String, Value)>,
    pub order_by: Vec<OrderBy>,
    pub limit: Option<usize>,
}

/// Fluent builder over [`ContentQuery`].
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    query: ContentQuery,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a physical property as a result column.
    pub fn select_property(mut self, name: impl Into<String>) -> Self {
        self.query.columns.push(name.into());
        self
    }

    pub fn where_uuid(mut self, uuid: Uuid) -> Self {
        self.query.uuid = Some(uuid);
        self
    }

    pub fn where_path(mut self, path: ContentPath) -> Self {
        self.query.path = PathConstraint::Equals(path);
        self
    }

    pub fn where_child_of(mut self, path: ContentPath) -> Self {
        self.query.path = PathConstraint::ChildOf(path);
        self
    }

    pub fn where_self_or_descendant_of(mut self, path: ContentPath) -> Self {
        self.query.path = PathConstraint::SelfOrDescendantOf(path);
        self
    }

    pub fn where_property_eq(mut self, name: impl Into<String>, value: Value) -> Self {
        self.query.comparisons.push((name.into(), value));
        self
    }

    pub fn order_by_path(mut self) -> Self {
        self.query.order_by.push(OrderBy::Path);
        self
    }

    pub fn order_by_property(mut self, name: impl Into<String>) -> Self {
        self.query.order_by.push(OrderBy::Property(name.into()));
        self
    }

    /// Cap the number of rows before execution.
    pub fn limit(mut self, limit: usize) -> Self {
        self.query.limit = Some(limit);
        self
    }

    pub fn build(self) -> ContentQuery {
        self.query
    }
}
