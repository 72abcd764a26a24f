//! Content view objects - mapped query rows.

use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::core::{ContentPath, Locale};
use crate::tree::HasPath;

/// Physical property name (per locale) of the template reference.
pub const TEMPLATE_PROPERTY: &str = "template";
/// Physical property name (per locale) of the workflow state.
pub const STATE_PROPERTY: &str = "state";
/// Per-locale flag: this locale shadows another one.
pub const SHADOW_ON_PROPERTY: &str = "shadow-on";
/// Per-locale locale key the shadow reads from.
pub const SHADOW_BASE_PROPERTY: &str = "shadow-base";
/// Per-locale node type (content/internal redirect/external redirect).
pub const NODE_TYPE_PROPERTY: &str = "nodeType";
/// Per-locale resource locator.
pub const URL_PROPERTY: &str = "url";

/// Publication state of a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowState {
    /// Draft, not yet published.
    Test,
    Published,
}

impl WorkflowState {
    /// Stored as an integer: `2` is published, everything else is a draft.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_i64) {
            Some(2) => Self::Published,
            _ => Self::Test,
        }
    }
}

/// How a node resolves when requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RedirectType {
    /// Regular content node.
    None,
    /// Redirects to another content node.
    Internal,
    /// Redirects to an external URL.
    External,
}

impl RedirectType {
    /// Stored as an integer: `2` internal, `4` external, default content.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_i64) {
            Some(2) => Self::Internal,
            Some(4) => Self::External,
            _ => Self::None,
        }
    }
}

/// A mapped content row.
///
/// `path` is webspace-relative: the webspace content root maps to `/`.
/// That keeps multi-tenant trees uniform and lets flat result lists be
/// reassembled into trees regardless of which webspace they came from.
#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub uuid: Uuid,
    pub path: ContentPath,
    pub webspace_key: String,
    /// The locale the caller asked for.
    pub locale: Locale,
    /// Template name as stored, even when its metadata no longer exists.
    pub template: Option<String>,
    broken_template: bool,
    pub workflow_state: WorkflowState,
    pub redirect_type: RedirectType,
    /// Set when the requested locale has no content and another locale's
    /// content was hydrated instead.
    pub ghost_locale: Option<Locale>,
    /// Set when the requested locale shadows another locale.
    pub shadow_base: Option<Locale>,
    /// Resolved resource locator, when the mapping asked for it.
    pub url: Option<String>,
    /// Mapped field values keyed by logical field name.
    pub data: Map<String, Value>,
}

impl Content {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        uuid: Uuid,
        path: ContentPath,
        webspace_key: String,
        locale: Locale,
        template: Option<String>,
        broken_template: bool,
        workflow_state: WorkflowState,
        redirect_type: RedirectType,
    ) -> Self {
        Self {
            uuid,
            path,
            webspace_key,
            locale,
            template,
            broken_template,
            workflow_state,
            redirect_type,
            ghost_locale: None,
            shadow_base: None,
            url: None,
            data: Map::new(),
        }
    }

    /// The stored template name has no matching structure metadata.
    ///
    /// Such content stays retrievable so it can be corrected; only this
    /// flag tells it apart from healthy rows.
    pub fn is_broken_template(&self) -> bool {
        self.broken_template
    }

    pub fn is_ghost(&self) -> bool {
        self.ghost_locale.is_some()
    }

    pub fn is_shadow(&self) -> bool {
        self.shadow_base.is_some()
    }
}

impl HasPath for Content {
    fn path(&self) -> &ContentPath {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workflow_state_from_value() {
        assert_eq!(
            WorkflowState::from_value(Some(&Value::from(2))),
            WorkflowState::Published
        );
        assert_eq!(
            WorkflowState::from_value(Some(&Value::from(1))),
            WorkflowState::Test
        );
        assert_eq!(WorkflowState::from_value(None), WorkflowState::Test);
        // Junk values degrade to draft, never fail
        assert_eq!(
            WorkflowState::from_value(Some(&Value::from("published"))),
            WorkflowState::Test
        );
    }

    #[test]
    fn test_redirect_type_from_value() {
        assert_eq!(
            RedirectType::from_value(Some(&Value::from(1))),
            RedirectType::None
        );
        assert_eq!(
            RedirectType::from_value(Some(&Value::from(2))),
            RedirectType::Internal
        );
        assert_eq!(
            RedirectType::from_value(Some(&Value::from(4))),
            RedirectType::External
        );
        assert_eq!(RedirectType::from_value(None), RedirectType::None);
    }

    #[test]
    fn test_serialization_includes_flags() {
        let content = Content::new(
            Uuid::nil(),
            ContentPath::new("/about"),
            "blog".into(),
            Locale::parse("en").unwrap(),
            Some("article".into()),
            true,
            WorkflowState::Published,
            RedirectType::None,
        );

        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["path"], "/about");
        assert_eq!(json["template"], "article");
        assert_eq!(json["broken_template"], true);
        assert_eq!(json["workflow_state"], "published");
        assert_eq!(json["redirect_type"], "none");
    }
}
