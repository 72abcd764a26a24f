//! Canopy - content repository and webspace routing core.
//!
//! The library has four pillars:
//!
//! - [`config`]: the webspace/portal/environment object graph, loaded from
//!   per-webspace XML files and validated once at boot.
//! - [`url`]: placeholder substitution over environment URL patterns,
//!   URL providers and boot-time portal-information expansion with
//!   longest-prefix request matching.
//! - [`tree`]: reassembly of flat, path-keyed query rows into trees.
//! - [`repository`]: locale-aware query building and row mapping against
//!   a per-workspace content session.
//!
//! Everything is synchronous and request-scoped; sessions must not be
//! shared across concurrent requests.

pub mod cli;
pub mod config;
pub mod core;
pub mod logger;
pub mod repository;
pub mod tree;
pub mod url;
pub mod utils;

pub use config::{AppConfig, WebspaceCollection, WebspaceError};
pub use core::{ContentPath, Locale};
pub use repository::{Content, ContentRepository, Mapping, RepositoryError};
pub use tree::{ListToTreeConverter, MissingParentPolicy, TreeNode};
pub use url::Replacer;
