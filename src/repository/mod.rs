//! Content repository - locale-aware query building and row mapping.
//!
//! # Module Structure
//!
//! ```text
//! repository/
//! ├── node.rs       # Node + in-memory NodeStore
//! ├── session.rs    # Session seam, per-workspace SessionManager
//! ├── qom.rs        # ContentQuery + QueryBuilder
//! ├── encoder.rs    # (field, locale) -> physical property name
//! ├── structure.rs  # template metadata registry
//! ├── mapping.rs    # Mapping/MappingBuilder
//! ├── content.rs    # Content view object
//! └── mod.rs        # ContentRepository (this file)
//! ```
//!
//! The repository translates a lookup request (uuid or tree filter, plus
//! webspace, locale and a column mapping) into a query-object-model query,
//! executes it against the workspace session and maps every row into a
//! [`Content`] view. Missing template metadata degrades to a flag on the
//! row; unresolvable webspaces, portals and uuids fail with typed errors.

pub mod content;
pub mod encoder;
mod error;
mod mapping;
mod node;
pub mod qom;
mod session;
mod structure;

pub use content::{Content, RedirectType, WorkflowState};
pub use error::RepositoryError;
pub use mapping::{Mapping, MappingBuilder};
pub use node::{Node, NodeStore};
pub use qom::{ContentQuery, OrderBy, PathConstraint, QueryBuilder};
pub use session::{Session, SessionManager, StoreSession, Workspace};
pub use structure::{FieldMetadata, StructureMetadata, StructureMetadataRegistry};

use std::sync::Arc;

use serde_json::Map;
use uuid::Uuid;

use crate::config::WebspaceCollection;
use crate::config::webspace::Webspace;
use crate::core::{ContentPath, Locale};
use crate::tree::{ListToTreeConverter, MissingParentPolicy, TreeNode};

use content::{
    NODE_TYPE_PROPERTY, SHADOW_BASE_PROPERTY, SHADOW_ON_PROPERTY, STATE_PROPERTY,
    TEMPLATE_PROPERTY, URL_PROPERTY,
};

/// Locale-aware content lookups against one workspace.
///
/// A session is checked out from the manager per call, mirroring the
/// request-scoped lifetime of the underlying store session.
pub struct ContentRepository {
    manager: Arc<SessionManager>,
    workspace: Workspace,
    collection: Arc<WebspaceCollection>,
    structures: Arc<StructureMetadataRegistry>,
}

impl ContentRepository {
    pub fn new(
        manager: Arc<SessionManager>,
        workspace: Workspace,
        collection: Arc<WebspaceCollection>,
        structures: Arc<StructureMetadataRegistry>,
    ) -> Self {
        Self {
            manager,
            workspace,
            collection,
            structures,
        }
    }

    /// Find one content item by uuid.
    ///
    /// The limit is pushed into the query before execution; a uuid that
    /// matches nothing is `ItemNotFound`, an unconfigured webspace is a
    /// `Webspace` error - neither is silently defaulted.
    pub fn find(
        &self,
        uuid: &Uuid,
        locale: &Locale,
        webspace_key: &str,
        mapping: &Mapping,
    ) -> Result<Content, RepositoryError> {
        let webspace = self.collection.webspace(webspace_key)?;
        let session = self.manager.session(self.workspace);

        let query = self
            .build_query(locale, mapping)?
            .where_uuid(*uuid)
            .limit(1)
            .build();

        let node = session
            .execute(&query)
            .into_iter()
            .next()
            .ok_or(RepositoryError::ItemNotFound { uuid: *uuid })?;

        self.map_row(node, locale, webspace, mapping)
    }

    /// Find one content item by webspace-relative path (`/` is the root).
    pub fn find_by_path(
        &self,
        path: &ContentPath,
        locale: &Locale,
        webspace_key: &str,
        mapping: &Mapping,
    ) -> Result<Content, RepositoryError> {
        let webspace = self.collection.webspace(webspace_key)?;
        let session = self.manager.session(self.workspace);

        let root = self.manager.content_root(webspace_key);
        let absolute = join_relative(&root, path);

        let node = session
            .node_by_path(&absolute)
            .ok_or(RepositoryError::PathNotFound { path: path.clone() })?;

        self.map_row(node, locale, webspace, mapping)
    }

    /// All direct children of a node, in path order.
    pub fn find_by_parent(
        &self,
        parent: &Uuid,
        locale: &Locale,
        webspace_key: &str,
        mapping: &Mapping,
    ) -> Result<Vec<Content>, RepositoryError> {
        let webspace = self.collection.webspace(webspace_key)?;
        let session = self.manager.session(self.workspace);

        let parent_node = session
            .node_by_uuid(parent)
            .ok_or(RepositoryError::ItemNotFound { uuid: *parent })?;

        let query = self
            .build_query(locale, mapping)?
            .where_child_of(parent_node.path)
            .order_by_path()
            .build();

        session
            .execute(&query)
            .into_iter()
            .map(|node| self.map_row(node, locale, webspace, mapping))
            .collect()
    }

    /// The whole content tree of a webspace, root first, in path order.
    pub fn find_all(
        &self,
        locale: &Locale,
        webspace_key: &str,
        mapping: &Mapping,
    ) -> Result<Vec<Content>, RepositoryError> {
        let webspace = self.collection.webspace(webspace_key)?;
        self.find_all_in(locale, webspace, mapping)
    }

    /// The whole content tree of the webspace owning a portal.
    pub fn find_all_by_portal(
        &self,
        locale: &Locale,
        portal_key: &str,
        mapping: &Mapping,
    ) -> Result<Vec<Content>, RepositoryError> {
        let (webspace, _portal) = self.collection.portal(portal_key)?;
        self.find_all_in(locale, webspace, mapping)
    }

    fn find_all_in(
        &self,
        locale: &Locale,
        webspace: &Webspace,
        mapping: &Mapping,
    ) -> Result<Vec<Content>, RepositoryError> {
        let session = self.manager.session(self.workspace);
        let root = self.manager.content_root(&webspace.key);

        let query = self
            .build_query(locale, mapping)?
            .where_self_or_descendant_of(root)
            .order_by_path()
            .build();

        session
            .execute(&query)
            .into_iter()
            .map(|node| self.map_row(node, locale, webspace, mapping))
            .collect()
    }

    /// Assemble flat rows into trees.
    ///
    /// Rows whose ancestry is incomplete are dropped with their subtree;
    /// `find_all` always includes the root row, so complete results lose
    /// nothing.
    pub fn to_tree(&self, contents: Vec<Content>) -> Vec<TreeNode<Content>> {
        ListToTreeConverter::new(MissingParentPolicy::Drop).convert(contents)
    }

    // ========================================================================
    // query building
    // ========================================================================

    /// Start a query with locale-aware column selection: every requested
    /// logical field plus the system fields, encoded for `locale`.
    fn build_query(
        &self,
        locale: &Locale,
        mapping: &Mapping,
    ) -> Result<QueryBuilder, RepositoryError> {
        let mut builder = QueryBuilder::new();

        for field in [
            TEMPLATE_PROPERTY,
            STATE_PROPERTY,
            SHADOW_ON_PROPERTY,
            SHADOW_BASE_PROPERTY,
            NODE_TYPE_PROPERTY,
        ] {
            builder = builder.select_property(encoder::localized(field, locale)?);
        }

        if mapping.should_resolve_url() {
            builder = builder.select_property(encoder::localized(URL_PROPERTY, locale)?);
        }

        for field in mapping.properties() {
            builder = builder.select_property(encoder::localized(field, locale)?);
        }

        Ok(builder)
    }

    // ========================================================================
    // row mapping
    // ========================================================================

    fn map_row(
        &self,
        node: Node,
        locale: &Locale,
        webspace: &Webspace,
        mapping: &Mapping,
    ) -> Result<Content, RepositoryError> {
        let root = self.manager.content_root(&webspace.key);
        let path = relative_path(&node.path, &root);

        // Shadow: the requested locale may delegate its content to another
        // locale via per-locale shadow keys
        let mut effective = locale.clone();
        let mut shadow_base = None;
        if mapping.should_hydrate_shadow()
            && node.bool_property(&encoder::localized(SHADOW_ON_PROPERTY, locale)?) == Some(true)
            && let Some(base) = node.string_property(&encoder::localized(SHADOW_BASE_PROPERTY, locale)?)
            && let Ok(base_locale) = Locale::parse(base)
        {
            shadow_base = Some(base_locale.clone());
            effective = base_locale;
        }

        // Ghost: no content in the effective locale, hydrate from the first
        // webspace locale that has some
        let mut ghost_locale = None;
        if mapping.should_hydrate_ghost()
            && node
                .property(&encoder::localized(TEMPLATE_PROPERTY, &effective)?)
                .is_none()
        {
            for localization in &webspace.localizations {
                let candidate = &localization.locale;
                if node
                    .property(&encoder::localized(TEMPLATE_PROPERTY, candidate)?)
                    .is_some()
                {
                    ghost_locale = Some(candidate.clone());
                    effective = candidate.clone();
                    break;
                }
            }
        }

        let template = node
            .string_property(&encoder::localized(TEMPLATE_PROPERTY, &effective)?)
            .map(String::from);

        // A template that no longer resolves is flagged, never an error:
        // content authored against a removed template must stay viewable
        let broken_template = template
            .as_deref()
            .is_some_and(|name| !self.structures.contains(name));

        let workflow_state = WorkflowState::from_value(
            node.property(&encoder::localized(STATE_PROPERTY, &effective)?),
        );
        let redirect_type = RedirectType::from_value(
            node.property(&encoder::localized(NODE_TYPE_PROPERTY, &effective)?),
        );

        let mut content = Content::new(
            node.uuid,
            path,
            webspace.key.clone(),
            locale.clone(),
            template,
            broken_template,
            workflow_state,
            redirect_type,
        );
        content.shadow_base = shadow_base;
        content.ghost_locale = ghost_locale;

        if mapping.should_resolve_url() {
            content.url = node
                .string_property(&encoder::localized(URL_PROPERTY, &effective)?)
                .map(String::from);
        }

        let mut data = Map::new();
        for field in mapping.properties() {
            let value = node
                .property(&encoder::localized(field, &effective)?)
                .or_else(|| node.property(field))
                .cloned();
            if let Some(value) = value {
                data.insert(field.clone(), value);
            }
        }
        content.data = data;

        Ok(content)
    }
}

/// Webspace-relative view of a repository path (`root` itself becomes `/`).
fn relative_path(path: &ContentPath, root: &ContentPath) -> ContentPath {
    if path == root {
        ContentPath::root()
    } else if path.is_descendant_of(root) {
        ContentPath::new(&path.as_str()[root.as_str().len()..])
    } else {
        path.clone()
    }
}

/// Absolute repository path of a webspace-relative one.
fn join_relative(root: &ContentPath, relative: &ContentPath) -> ContentPath {
    if relative.is_root() {
        root.clone()
    } else {
        ContentPath::new(&format!("{root}{relative}"))
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::ConfigDiagnostics;
    use crate::config::webspace::{WebspaceLocalization, test_webspace};

    fn en_us() -> Locale {
        Locale::parse("en_us").unwrap()
    }

    fn de() -> Locale {
        Locale::parse("de").unwrap()
    }

    /// blog webspace (en_us + de), article template, three content nodes.
    fn fixture() -> ContentRepository {
        let mut webspace = test_webspace();
        webspace.localizations.push(WebspaceLocalization {
            locale: de(),
            default: false,
        });

        let mut diag = ConfigDiagnostics::new();
        let collection = Arc::new(WebspaceCollection::build(vec![webspace], &mut diag));
        assert!(!diag.has_errors(), "fixture webspace invalid: {diag}");

        let structures = Arc::new(StructureMetadataRegistry::new().with(StructureMetadata::new(
            "article",
            vec![FieldMetadata::localized("title")],
        )));

        let manager = Arc::new(SessionManager::new());
        let store_session = manager.session(Workspace::Default);
        let store = store_session.store();

        store.insert(
            Node::new(ContentPath::new("/cmf/blog/contents"))
                .with_property("i18n:en_us-template", "article")
                .with_property("i18n:en_us-state", 2)
                .with_property("i18n:en_us-title", "Home"),
        );
        store.insert(
            Node::new(ContentPath::new("/cmf/blog/contents/about"))
                .with_property("i18n:en_us-template", "article")
                .with_property("i18n:en_us-state", 1)
                .with_property("i18n:en_us-title", "About")
                .with_property("i18n:en_us-url", "/about"),
        );
        store.insert(
            Node::new(ContentPath::new("/cmf/blog/contents/posts"))
                .with_property("i18n:en_us-template", "article")
                .with_property("i18n:en_us-state", 2)
                .with_property("i18n:en_us-title", "Posts"),
        );

        ContentRepository::new(manager, Workspace::Default, collection, structures)
    }

    fn title_mapping() -> Mapping {
        Mapping::builder().add_properties(["title"]).build()
    }

    fn uuid_at(repository: &ContentRepository, path: &str) -> Uuid {
        repository
            .manager
            .session(Workspace::Default)
            .node_by_path(&ContentPath::new(path))
            .unwrap()
            .uuid
    }

    #[test]
    fn test_find_maps_row() {
        let repository = fixture();
        let uuid = uuid_at(&repository, "/cmf/blog/contents/about");

        let content = repository
            .find(&uuid, &en_us(), "blog", &title_mapping())
            .unwrap();

        assert_eq!(content.uuid, uuid);
        assert_eq!(content.path, "/about");
        assert_eq!(content.webspace_key, "blog");
        assert_eq!(content.template.as_deref(), Some("article"));
        assert!(!content.is_broken_template());
        assert_eq!(content.workflow_state, WorkflowState::Test);
        assert_eq!(content.data["title"], "About");
    }

    #[test]
    fn test_find_broken_template_is_flagged_not_error() {
        let repository = fixture();
        let session = repository.manager.session(Workspace::Default);
        session.store().insert(
            Node::new(ContentPath::new("/cmf/blog/contents/legacy"))
                .with_property("i18n:en_us-template", "removed_template")
                .with_property("i18n:en_us-title", "Legacy"),
        );
        let uuid = uuid_at(&repository, "/cmf/blog/contents/legacy");

        let content = repository
            .find(&uuid, &en_us(), "blog", &title_mapping())
            .unwrap();

        assert!(content.is_broken_template());
        assert_eq!(content.template.as_deref(), Some("removed_template"));
        assert_eq!(content.data["title"], "Legacy");
    }

    #[test]
    fn test_find_unknown_uuid() {
        let repository = fixture();
        let missing = Uuid::new_v4();
        let err = repository
            .find(&missing, &en_us(), "blog", &title_mapping())
            .unwrap_err();
        assert!(matches!(err, RepositoryError::ItemNotFound { uuid } if uuid == missing));
    }

    #[test]
    fn test_find_unknown_webspace_is_descriptive() {
        let repository = fixture();
        let uuid = uuid_at(&repository, "/cmf/blog/contents");
        let err = repository
            .find(&uuid, &en_us(), "shop", &title_mapping())
            .unwrap_err();
        assert!(err.to_string().contains("shop"));
        assert!(matches!(err, RepositoryError::Webspace(_)));
    }

    #[test]
    fn test_invalid_mapping_field_rejected() {
        let repository = fixture();
        let uuid = uuid_at(&repository, "/cmf/blog/contents");
        let mapping = Mapping::builder().add_properties(["bad field"]).build();
        let err = repository
            .find(&uuid, &en_us(), "blog", &mapping)
            .unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidFieldName { .. }));
    }

    #[test]
    fn test_find_by_path() {
        let repository = fixture();
        let content = repository
            .find_by_path(&ContentPath::new("/about"), &en_us(), "blog", &title_mapping())
            .unwrap();
        assert_eq!(content.data["title"], "About");

        let root = repository
            .find_by_path(&ContentPath::root(), &en_us(), "blog", &title_mapping())
            .unwrap();
        assert_eq!(root.path, "/");
        assert_eq!(root.data["title"], "Home");

        let err = repository
            .find_by_path(&ContentPath::new("/missing"), &en_us(), "blog", &title_mapping())
            .unwrap_err();
        assert!(matches!(err, RepositoryError::PathNotFound { .. }));
    }

    #[test]
    fn test_find_by_parent_in_path_order() {
        let repository = fixture();
        let root_uuid = uuid_at(&repository, "/cmf/blog/contents");

        let children = repository
            .find_by_parent(&root_uuid, &en_us(), "blog", &title_mapping())
            .unwrap();
        let paths: Vec<_> = children.iter().map(|c| c.path.as_str().to_string()).collect();
        assert_eq!(paths, vec!["/about", "/posts"]);
    }

    #[test]
    fn test_find_all_and_to_tree() {
        let repository = fixture();
        let rows = repository
            .find_all(&en_us(), "blog", &title_mapping())
            .unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].path, "/");

        let tree = repository.to_tree(rows);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].record.path, "/");
        assert_eq!(tree[0].children.len(), 2);
    }

    #[test]
    fn test_find_all_by_portal_resolves_webspace() {
        let repository = fixture();
        let rows = repository
            .find_all_by_portal(&en_us(), "blog_portal", &title_mapping())
            .unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].webspace_key, "blog");

        let err = repository
            .find_all_by_portal(&en_us(), "shop_portal", &title_mapping())
            .unwrap_err();
        assert!(err.to_string().contains("shop_portal"));
    }

    #[test]
    fn test_url_resolution_opt_in() {
        let repository = fixture();
        let uuid = uuid_at(&repository, "/cmf/blog/contents/about");

        let without = repository
            .find(&uuid, &en_us(), "blog", &title_mapping())
            .unwrap();
        assert!(without.url.is_none());

        let mapping = Mapping::builder()
            .add_properties(["title"])
            .set_resolve_url(true)
            .build();
        let with = repository.find(&uuid, &en_us(), "blog", &mapping).unwrap();
        assert_eq!(with.url.as_deref(), Some("/about"));
    }

    #[test]
    fn test_shadow_hydration() {
        let repository = fixture();
        let session = repository.manager.session(Workspace::Default);
        session.store().insert(
            Node::new(ContentPath::new("/cmf/blog/contents/shadowed"))
                .with_property("i18n:en_us-template", "article")
                .with_property("i18n:en_us-title", "Original")
                .with_property("i18n:de-shadow-on", true)
                .with_property("i18n:de-shadow-base", "en_us"),
        );
        let uuid = uuid_at(&repository, "/cmf/blog/contents/shadowed");

        let mapping = Mapping::builder()
            .add_properties(["title"])
            .set_hydrate_shadow(true)
            .build();
        let content = repository.find(&uuid, &de(), "blog", &mapping).unwrap();

        assert!(content.is_shadow());
        assert_eq!(content.shadow_base.as_ref().unwrap().to_string(), "en_us");
        assert_eq!(content.locale, de());
        // Content fields come from the shadow base locale
        assert_eq!(content.data["title"], "Original");

        // Without hydration the de locale has nothing
        let bare = repository
            .find(&uuid, &de(), "blog", &title_mapping())
            .unwrap();
        assert!(!bare.is_shadow());
        assert!(bare.data.get("title").is_none());
    }

    #[test]
    fn test_ghost_hydration() {
        let repository = fixture();
        let uuid = uuid_at(&repository, "/cmf/blog/contents/posts");

        let mapping = Mapping::builder()
            .add_properties(["title"])
            .set_hydrate_ghost(true)
            .build();
        let content = repository.find(&uuid, &de(), "blog", &mapping).unwrap();

        assert!(content.is_ghost());
        assert_eq!(content.ghost_locale.as_ref().unwrap().to_string(), "en_us");
        assert_eq!(content.data["title"], "Posts");

        // Without hydration the row is empty for de
        let bare = repository
            .find(&uuid, &de(), "blog", &title_mapping())
            .unwrap();
        assert!(!bare.is_ghost());
        assert!(bare.template.is_none());
    }

    #[test]
    fn test_relative_path_helpers() {
        let root = ContentPath::new("/cmf/blog/contents");
        assert_eq!(relative_path(&root, &root), "/");
        assert_eq!(
            relative_path(&ContentPath::new("/cmf/blog/contents/a/b"), &root),
            "/a/b"
        );
        // Paths outside the root stay untouched
        assert_eq!(
            relative_path(&ContentPath::new("/cmf/shop/contents/a"), &root),
            "/cmf/shop/contents/a"
        );

        assert_eq!(join_relative(&root, &ContentPath::root()), root);
        assert_eq!(
            join_relative(&root, &ContentPath::new("/a/b")),
            "/cmf/blog/contents/a/b"
        );
    }
}
