//! Repository error types.

use thiserror::Error;
use uuid::Uuid;

use crate::config::collection::WebspaceError;
use crate::core::ContentPath;

/// Errors raised by content repository operations.
///
/// Unresolvable lookup inputs (webspace, uuid, path) fail loudly with the
/// offending key; degraded data (missing template metadata) never lands
/// here - it is flagged on the returned content instead.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Webspace(#[from] WebspaceError),

    #[error("content item `{uuid}` not found")]
    ItemNotFound { uuid: Uuid },

    #[error("no content node at path `{path}`")]
    PathNotFound { path: ContentPath },

    #[error("invalid field name `{name}`, expected [a-zA-Z0-9_-]+")]
    InvalidFieldName { name: String },
}
