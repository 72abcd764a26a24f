//! Webspace collection - keyed lookup over all loaded webspaces.

use std::path::Path;

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::config::types::{ConfigDiagnostics, ConfigError, FieldPath};
use crate::config::webspace::{Portal, Webspace, WebspaceLocalization};
use crate::config::xml::load_webspace_file;
use crate::core::Locale;

/// Lookup failures against the loaded webspace configuration.
///
/// These are distinct from data-integrity problems: a caller asking for a
/// key that was never configured gets told exactly which key was wrong.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WebspaceError {
    #[error("unknown webspace `{key}`")]
    UnknownWebspace { key: String },

    #[error("unknown portal `{key}`")]
    UnknownPortal { key: String },

    #[error("unknown environment `{environment}` in portal `{portal}`")]
    UnknownEnvironment { portal: String, environment: String },

    #[error("webspace `{webspace}` does not publish locale `{locale}`")]
    UnknownLocalization { webspace: String, locale: Locale },
}

/// All webspaces known to the system, built once at boot.
///
/// Iteration order is deterministic (webspaces sorted by key, portals in
/// declaration order).
#[derive(Debug, Default)]
pub struct WebspaceCollection {
    webspaces: Vec<Webspace>,
    /// webspace key -> index into `webspaces`
    index: FxHashMap<String, usize>,
    /// portal key -> (webspace index, portal index); portal keys are global
    portal_index: FxHashMap<String, (usize, usize)>,
}

impl WebspaceCollection {
    /// Build the collection, checking cross-webspace invariants.
    pub fn build(mut webspaces: Vec<Webspace>, diag: &mut ConfigDiagnostics) -> Self {
        webspaces.sort_by(|a, b| a.key.cmp(&b.key));

        let mut index = FxHashMap::default();
        let mut portal_index = FxHashMap::default();

        for (webspace_idx, webspace) in webspaces.iter().enumerate() {
            if index.insert(webspace.key.clone(), webspace_idx).is_some() {
                diag.error(
                    FieldPath::new(format!("webspace `{}`", webspace.key)),
                    "duplicate webspace key across definition files",
                );
            }

            for (portal_idx, portal) in webspace.portals.iter().enumerate() {
                if portal_index
                    .insert(portal.key.clone(), (webspace_idx, portal_idx))
                    .is_some()
                {
                    diag.error(
                        FieldPath::new(format!("portal `{}`", portal.key)),
                        "portal keys must be unique across all webspaces",
                    );
                }
            }
        }

        Self {
            webspaces,
            index,
            portal_index,
        }
    }

    pub fn webspace(&self, key: &str) -> Result<&Webspace, WebspaceError> {
        self.index
            .get(key)
            .map(|&i| &self.webspaces[i])
            .ok_or_else(|| WebspaceError::UnknownWebspace {
                key: key.to_string(),
            })
    }

    /// Look up a portal and the webspace owning it.
    pub fn portal(&self, key: &str) -> Result<(&Webspace, &Portal), WebspaceError> {
        self.portal_index
            .get(key)
            .map(|&(w, p)| {
                let webspace = &self.webspaces[w];
                (webspace, &webspace.portals[p])
            })
            .ok_or_else(|| WebspaceError::UnknownPortal {
                key: key.to_string(),
            })
    }

    /// The declared localization entry for a webspace locale.
    pub fn localization(
        &self,
        webspace_key: &str,
        locale: &Locale,
    ) -> Result<&WebspaceLocalization, WebspaceError> {
        let webspace = self.webspace(webspace_key)?;
        webspace
            .localizations
            .iter()
            .find(|l| l.locale == *locale)
            .ok_or_else(|| WebspaceError::UnknownLocalization {
                webspace: webspace_key.to_string(),
                locale: locale.clone(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Webspace> {
        self.webspaces.iter()
    }

    pub fn len(&self) -> usize {
        self.webspaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.webspaces.is_empty()
    }
}

/// Load every `*.xml` definition under `dir` into a collection.
///
/// Files are parsed in parallel; all semantic problems across all files are
/// collected into one diagnostics report. Only an unreadable directory is a
/// hard error.
pub fn load_webspace_collection(
    dir: &Path,
) -> Result<(WebspaceCollection, ConfigDiagnostics), ConfigError> {
    if !dir.is_dir() {
        return Err(ConfigError::Io(
            dir.to_path_buf(),
            std::io::Error::new(std::io::ErrorKind::NotFound, "webspace directory not found"),
        ));
    }

    let mut files: Vec<_> = jwalk::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "xml"))
        .collect();
    files.sort();

    crate::debug!("webspace"; "found {} definition files in {}", files.len(), dir.display());

    let results: Vec<(Option<Webspace>, ConfigDiagnostics)> = files
        .par_iter()
        .map(|path| {
            let mut diag = ConfigDiagnostics::new();
            match load_webspace_file(path, &mut diag) {
                Ok(webspace) => (Some(webspace), diag),
                Err(err) => {
                    // Unparsable file: keep loading the rest, report together
                    diag.error(
                        FieldPath::new(path.display().to_string()),
                        err.to_string(),
                    );
                    (None, diag)
                }
            }
        })
        .collect();

    let mut diag = ConfigDiagnostics::new();
    let mut webspaces = Vec::new();
    for (webspace, file_diag) in results {
        diag.merge(file_diag);
        webspaces.extend(webspace);
    }

    let collection = WebspaceCollection::build(webspaces, &mut diag);
    Ok((collection, diag))
}

// ============================================================================
// tests
// ============================================================================
