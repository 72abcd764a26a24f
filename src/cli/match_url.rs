//! Match command implementation.
//!
//! Resolves a request URL against the portal-information table the same
//! way request routing would.

use anyhow::{Result, bail};

use super::common::load_collection;
use crate::config::AppConfig;
use crate::log;
use crate::url::{RequestMatcher, build_portal_information};

pub fn run_match(
    config: &AppConfig,
    request_url: &str,
    environment: Option<&str>,
    json: bool,
) -> Result<()> {
    let collection = load_collection(config)?;
    let environment = environment.unwrap_or(config.webspace.environment.as_str());

    let matcher = RequestMatcher::new(build_portal_information(&collection, environment));

    let Some(info) = matcher.match_url(request_url) else {
        bail!("no portal matches `{request_url}` in environment `{environment}`");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(info)?);
        return Ok(());
    }

    log!("match"; "{} -> {}/{}", info.url, info.webspace_key, info.portal_key);
    if let Some(locale) = &info.locale {
        println!("locale: {locale}");
    }
    if let Some(segment) = &info.segment_key {
        println!("segment: {segment}");
    }
    if let Some(redirect) = &info.redirect {
        println!("redirect: {redirect}");
    }
    Ok(())
}
