//! Urls command implementation.
//!
//! Lists the configured URL patterns of a webspace environment plus the
//! concrete portal-information table they expand into.

use anyhow::Result;
use serde_json::json;

use super::common::load_collection;
use crate::config::AppConfig;
use crate::log;
use crate::url::{UrlProvider, WebspaceUrlProvider, build_portal_information};
use crate::utils::plural_count;

pub fn run_urls(
    config: &AppConfig,
    webspace_key: &str,
    environment: Option<&str>,
    json: bool,
) -> Result<()> {
    let collection = load_collection(config)?;
    let environment = environment.unwrap_or(config.webspace.environment.as_str());

    let webspace = collection.webspace(webspace_key)?;
    let patterns = WebspaceUrlProvider.urls(webspace, environment);

    let entries: Vec<_> = build_portal_information(&collection, environment)
        .into_iter()
        .filter(|e| e.webspace_key == webspace_key)
        .collect();

    if json {
        let output = json!({
            "webspace": webspace_key,
            "environment": environment,
            "patterns": patterns,
            "portal_information": entries,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    log!(
        "urls";
        "{} pattern(s) for `{}` in `{}`",
        patterns.len(),
        webspace_key,
        environment
    );
    for pattern in &patterns {
        let mut notes = Vec::new();
        if let Some(language) = &pattern.language {
            notes.push(format!("language={language}"));
        }
        if let Some(redirect) = &pattern.redirect {
            notes.push(format!("redirect={redirect}"));
        }
        if pattern.main {
            notes.push("main".to_string());
        }
        if notes.is_empty() {
            println!("- {}", pattern.pattern);
        } else {
            println!("- {} ({})", pattern.pattern, notes.join(", "));
        }
    }

    log!("urls"; "{} resolved", plural_count(entries.len(), "url"));
    for entry in &entries {
        let locale = entry
            .locale
            .as_ref()
            .map(|l| l.to_string())
            .unwrap_or_else(|| "-".to_string());
        match &entry.segment_key {
            Some(segment) => {
                println!("- {} -> {} [{}] segment={}", entry.url, entry.portal_key, locale, segment)
            }
            None => println!("- {} -> {} [{}]", entry.url, entry.portal_key, locale),
        }
    }

    Ok(())
}
