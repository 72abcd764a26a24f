//! Validate command implementation.

use anyhow::{Result, bail};

use crate::config::AppConfig;
use crate::log;
use crate::utils::plural_count;

/// Load every webspace definition and report all diagnostics at once.
pub fn run_validate(config: &AppConfig) -> Result<()> {
    let (collection, diag) = config.load_webspaces()?;

    diag.print_warnings();

    if diag.has_errors() {
        eprintln!("{diag}");
        bail!(
            "validation failed with {}",
            plural_count(diag.len(), "error")
        );
    }

    for webspace in collection.iter() {
        log!(
            "validate";
            "{} ({}): {}, {}",
            webspace.key,
            webspace.name,
            plural_count(webspace.portals.len(), "portal"),
            plural_count(webspace.localizations.len(), "localization")
        );
    }
    log!("validate"; "{} ok", plural_count(collection.len(), "webspace"));
    Ok(())
}
