//! Shared helpers for CLI commands.

use anyhow::{Result, bail};

use crate::config::{AppConfig, WebspaceCollection};

/// Load the webspace collection, failing loudly on any diagnostic error.
pub fn load_collection(config: &AppConfig) -> Result<WebspaceCollection> {
    let (collection, diag) = config.load_webspaces()?;

    diag.print_warnings();
    if diag.has_errors() {
        eprintln!("{diag}");
        bail!("webspace configuration is invalid");
    }

    Ok(collection)
}
