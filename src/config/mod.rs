//! Application configuration management for `canopy.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   ├── field      # FieldPath
//! │   └── handle     # Global config handle
//! ├── webspace.rs    # Webspace/Portal/Environment object graph
//! ├── xml.rs         # Webspace XML definition parsing
//! ├── collection.rs  # WebspaceCollection + directory loader
//! └── mod.rs         # AppConfig (this file)
//! ```
//!
//! `canopy.toml` configures where webspace definitions live and which
//! environment/workspace the CLI operates on; the webspace XML files
//! configure the actual tenants.

pub mod collection;
pub mod types;
pub mod webspace;
pub mod xml;

pub use collection::{WebspaceCollection, WebspaceError, load_webspace_collection};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath, cfg, init_config};
pub use webspace::{
    Environment, Portal, Segment, UrlDefinition, Webspace, WebspaceLocalization,
};

use crate::log;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// `[webspace]` section: where definitions live, which environment applies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebspaceSectionConfig {
    /// Directory containing per-webspace XML files (relative to root).
    pub directory: PathBuf,
    /// Environment resolved by default (`prod`, `stage`, `dev`, ...).
    pub environment: String,
}

impl Default for WebspaceSectionConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("webspaces"),
            environment: "prod".into(),
        }
    }
}

/// `[repository]` section: content repository session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositorySectionConfig {
    /// Workspace handed out by the session manager (`default` or `live`).
    pub workspace: String,
}

impl Default for RepositorySectionConfig {
    fn default() -> Self {
        Self {
            workspace: "default".into(),
        }
    }
}

/// Root configuration structure representing canopy.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Webspace settings
    #[serde(default)]
    pub webspace: WebspaceSectionConfig,

    /// Repository settings
    #[serde(default)]
    pub repository: RepositorySectionConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            root: PathBuf::new(),
            webspace: WebspaceSectionConfig::default(),
            repository: RepositorySectionConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration, searching upward from cwd for the config file.
    ///
    /// The project root is the config file's parent directory; the webspace
    /// directory is resolved against it.
    pub fn load(config_name: &Path) -> Result<Self> {
        let config_path = find_config_file(config_name).with_context(|| {
            format!(
                "config file '{}' not found in this or any parent directory",
                config_name.display()
            )
        })?;

        let mut config = Self::from_path(&config_path)?;
        config.config_path = config_path;
        config.finalize();
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Resolve root and normalize paths after loading.
    fn finalize(&mut self) {
        self.root = self
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        if self.webspace.directory.is_relative() {
            self.webspace.directory = self.root.join(&self.webspace.directory);
        }
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        if self.webspace.environment.is_empty() {
            diag.error(
                FieldPath::new("webspace.environment"),
                "environment must not be empty",
            );
        }

        if !self.webspace.directory.is_dir() {
            diag.error_with_hint(
                FieldPath::new("webspace.directory"),
                format!("`{}` is not a directory", self.webspace.directory.display()),
                "create it and add one XML definition per webspace",
            );
        }

        match self.repository.workspace.as_str() {
            "default" | "live" => {}
            other => diag.error_with_hint(
                FieldPath::new("repository.workspace"),
                format!("unknown workspace `{other}`"),
                "expected `default` or `live`",
            ),
        }

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Load the webspace collection configured by this config.
    pub fn load_webspaces(&self) -> Result<(WebspaceCollection, ConfigDiagnostics)> {
        Ok(load_webspace_collection(&self.webspace.directory)?)
    }
}

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`
/// Returns the absolute path to the config file if found
fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() && config_name.exists() {
        return Some(config_name.to_path_buf());
    }

    let cwd = std::env::current_dir().ok()?;
    let mut current = cwd.as_path();
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.webspace.directory, PathBuf::from("webspaces"));
        assert_eq!(config.webspace.environment, "prod");
        assert_eq!(config.repository.workspace, "default");
    }

    #[test]
    fn test_from_str() {
        let config = AppConfig::from_str(
            r#"
            [webspace]
            directory = "sites"
            environment = "stage"

            [repository]
            workspace = "live"
            "#,
        )
        .unwrap();
        assert_eq!(config.webspace.directory, PathBuf::from("sites"));
        assert_eq!(config.webspace.environment, "stage");
        assert_eq!(config.repository.workspace, "live");
    }

    #[test]
    fn test_from_str_invalid_toml() {
        assert!(AppConfig::from_str("[webspace\ndirectory = \"x\"").is_err());
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[webspace]\nenvironment = \"prod\"\n[unknown_section]\nfield = 1";
        let (_, ignored) = AppConfig::parse_with_ignored(content).unwrap();
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_validate_rejects_bad_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.webspace.directory = dir.path().to_path_buf();
        config.repository.workspace = "preview".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_missing_directory() {
        let mut config = AppConfig::default();
        config.webspace.directory = PathBuf::from("/nonexistent/webspaces");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_resolves_relative_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sites")).unwrap();
        fs::write(
            dir.path().join("canopy.toml"),
            "[webspace]\ndirectory = \"sites\"\n",
        )
        .unwrap();

        let config = AppConfig::load(&dir.path().join("canopy.toml")).unwrap();
        assert_eq!(config.root, dir.path());
        assert_eq!(config.webspace.directory, dir.path().join("sites"));
    }
}
