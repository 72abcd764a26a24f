//! Portal information - concrete URL table built from environment patterns.
//!
//! At boot every environment URL pattern is expanded against the portal's
//! localizations and the webspace's segments into a flat url -> (portal,
//! locale, segment) table. Request routing is then a longest-prefix lookup
//! in that table; no pattern matching happens per request.

use std::borrow::Cow;

use percent_encoding::percent_decode_str;
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::config::collection::WebspaceCollection;
use crate::config::webspace::{Portal, UrlDefinition, Webspace};
use crate::core::Locale;
use crate::url::Replacer;

/// One concrete URL an environment answers on.
#[derive(Debug, Clone, Serialize)]
pub struct PortalInformation {
    /// Concrete URL (`host[:port][/path]`, no scheme, cleaned).
    pub url: String,
    pub webspace_key: String,
    pub portal_key: String,
    /// Locale served under this URL. `None` for pure redirect entries,
    /// which forward before any locale is resolved.
    pub locale: Option<Locale>,
    pub segment_key: Option<String>,
    pub redirect: Option<String>,
    /// Marks the canonical URL of its environment.
    pub main: bool,
}

/// Expand all URL patterns of `environment` into portal information.
///
/// Deterministic: webspaces in collection order, portals and URLs in
/// declaration order, localizations and segments in declaration order.
/// When two patterns expand to the same URL the first one wins.
pub fn build_portal_information(
    collection: &WebspaceCollection,
    environment: &str,
) -> Vec<PortalInformation> {
    let mut seen = FxHashSet::default();
    let mut entries = Vec::new();

    for webspace in collection.iter() {
        for portal in &webspace.portals {
            let Some(env) = portal.environment(environment) else {
                continue;
            };
            for url in &env.urls {
                expand_url(webspace, portal, url, &mut seen, &mut entries);
            }
        }
    }

    entries
}

fn expand_url(
    webspace: &Webspace,
    portal: &Portal,
    url: &UrlDefinition,
    seen: &mut FxHashSet<String>,
    entries: &mut Vec<PortalInformation>,
) {
    let locales = expansion_locales(webspace, portal, url);
    let segments = expansion_segments(webspace, url);

    for locale in &locales {
        for segment in &segments {
            let mut replacer = Replacer::new(url.pattern.clone());
            if let Some(locale) = locale {
                replacer = replacer
                    .replace_language(locale.language())
                    .replace_country(locale.country().unwrap_or(""))
                    .replace_localization(&locale.to_string());
            }
            if let Some(segment) = segment {
                replacer = replacer.replace_segment(segment);
            }
            let resolved = replacer.cleanup().into_inner();

            if resolved.is_empty() || !seen.insert(resolved.clone()) {
                continue;
            }

            entries.push(PortalInformation {
                url: resolved,
                webspace_key: webspace.key.clone(),
                portal_key: portal.key.clone(),
                locale: locale.clone(),
                segment_key: segment.clone(),
                redirect: url.redirect.clone(),
                main: url.main,
            });
        }
    }
}

/// Locales a URL definition expands over.
///
/// An explicit `language` attribute pins the locale; a redirect without
/// one has no locale at all; otherwise the portal's localizations apply
/// (falling back to the webspace's when the portal declares none).
fn expansion_locales(
    webspace: &Webspace,
    portal: &Portal,
    url: &UrlDefinition,
) -> Vec<Option<Locale>> {
    if let Some(language) = &url.language {
        let raw = match &url.country {
            Some(country) => format!("{language}_{country}"),
            None => language.clone(),
        };
        // Invalid attributes were already reported at load time
        return match Locale::parse(&raw) {
            Ok(locale) => vec![Some(locale)],
            Err(_) => vec![],
        };
    }

    if url.is_redirect() && !url.has_placeholders() {
        return vec![None];
    }

    let locales: Vec<_> = if portal.localizations.is_empty() {
        webspace
            .localizations
            .iter()
            .map(|l| Some(l.locale.clone()))
            .collect()
    } else {
        portal.localizations.iter().map(|l| Some(l.clone())).collect()
    };

    if locales.is_empty() { vec![None] } else { locales }
}

/// Segments a URL definition expands over.
fn expansion_segments(webspace: &Webspace, url: &UrlDefinition) -> Vec<Option<String>> {
    if let Some(segment) = &url.segment {
        return vec![Some(segment.clone())];
    }

    if url.pattern.contains(crate::url::SEGMENT_REPLACER) && !webspace.segments.is_empty() {
        return webspace
            .segments
            .iter()
            .map(|s| Some(s.key.clone()))
            .collect();
    }

    vec![None]
}

// ============================================================================
// Request matching
// ============================================================================

/// Longest-prefix matcher over a portal information table.
pub struct RequestMatcher {
    /// Sorted longest URL first so the most specific entry wins.
    entries: Vec<PortalInformation>,
}

impl RequestMatcher {
    pub fn new(mut entries: Vec<PortalInformation>) -> Self {
        entries.sort_by(|a, b| b.url.len().cmp(&a.url.len()).then(a.url.cmp(&b.url)));
        Self { entries }
    }

    pub fn entries(&self) -> &[PortalInformation] {
        &self.entries
    }

    /// Match a request URL (with or without scheme) against the table.
    ///
    /// The request is percent-decoded and reduced to `host[:port]/path`
    /// before matching; query string and fragment are ignored.
    pub fn match_url(&self, request: &str) -> Option<&PortalInformation> {
        let normalized = normalize_request(request)?;
        self.entries
            .iter()
            .find(|entry| prefix_matches(&normalized, &entry.url))
    }
}

/// Prefix match on whole path-segment boundaries.
fn prefix_matches(request: &str, entry: &str) -> bool {
    request == entry
        || (request.starts_with(entry) && request.as_bytes().get(entry.len()) == Some(&b'/'))
}

/// Reduce a request URL to decoded `host[:port]/path` form.
fn normalize_request(request: &str) -> Option<String> {
    let with_scheme: Cow<'_, str> = if request.contains("://") {
        Cow::Borrowed(request)
    } else {
        Cow::Owned(format!("http://{request}"))
    };

    let parsed = url::Url::parse(&with_scheme).ok()?;
    let host = parsed.host_str()?;
    let port = parsed.port().map(|p| format!(":{p}")).unwrap_or_default();

    let path = percent_decode_str(parsed.path())
        .decode_utf8()
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| parsed.path().to_string());

    Some(format!("{host}{port}{path}").trim_end_matches('/').to_string())
}

// ============================================================================
// tests
// ============================================================================
