//! Webspace configuration object graph.
//!
//! A webspace is a top-level content tenant (a "site"). It owns portals,
//! each portal owns environments (`prod`, `stage`, `dev`, ...), and each
//! environment owns a list of URL patterns. The whole graph is built once
//! from XML definition files at boot and is read-only afterwards.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::config::types::{ConfigDiagnostics, FieldPath};
use crate::core::Locale;
use crate::url::PLACEHOLDERS;

/// Keys for webspaces, portals and segments: lowercase, digits, `_`, `-`.
static KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9_-]*$").expect("key pattern is valid"));

// ============================================================================
// Graph types
// ============================================================================

/// A localization a webspace publishes content in.
#[derive(Debug, Clone, Serialize)]
pub struct WebspaceLocalization {
    pub locale: Locale,
    /// The localization used when none is requested explicitly.
    pub default: bool,
}

/// A content segment (audience split such as `winter`/`summer`).
#[derive(Debug, Clone, Serialize)]
pub struct Segment {
    pub key: String,
    /// Human readable title (element text).
    pub title: Option<String>,
    pub default: bool,
}

/// A URL pattern declared for an environment.
///
/// The pattern may contain the placeholders `{language}`, `{country}`,
/// `{localization}` and `{segment}`. A pattern without placeholders must
/// pin its locale via the `language`/`country` attributes or be a
/// redirect, so that request matching stays unambiguous.
#[derive(Debug, Clone, Serialize)]
pub struct UrlDefinition {
    pub pattern: String,
    pub language: Option<String>,
    pub country: Option<String>,
    pub segment: Option<String>,
    /// Redirect target URL; a redirect entry never resolves content itself.
    pub redirect: Option<String>,
    /// Marks the canonical URL of the environment.
    pub main: bool,
}

impl UrlDefinition {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            language: None,
            country: None,
            segment: None,
            redirect: None,
            main: false,
        }
    }

    pub fn is_redirect(&self) -> bool {
        self.redirect.is_some()
    }

    /// Whether the pattern contains any recognized placeholder token.
    pub fn has_placeholders(&self) -> bool {
        PLACEHOLDERS.iter().any(|p| self.pattern.contains(p))
    }
}

/// A deployment stage within a portal, owning URL patterns.
#[derive(Debug, Clone, Serialize)]
pub struct Environment {
    /// Environment name (`prod`, `stage`, `dev`, ...).
    pub kind: String,
    pub urls: Vec<UrlDefinition>,
}

impl Environment {
    /// The canonical URL of this environment, if one is marked `main`.
    pub fn main_url(&self) -> Option<&UrlDefinition> {
        self.urls.iter().find(|u| u.main)
    }
}

/// A named grouping of URL environments and locales within a webspace.
#[derive(Debug, Clone, Serialize)]
pub struct Portal {
    pub key: String,
    pub name: String,
    /// Locales this portal serves. Inherits the webspace localizations
    /// when the portal declares none of its own.
    pub localizations: Vec<Locale>,
    /// Environments in declaration order, looked up by name.
    pub environments: Vec<Environment>,
}

impl Portal {
    pub fn environment(&self, kind: &str) -> Option<&Environment> {
        self.environments.iter().find(|e| e.kind == kind)
    }
}

/// A top-level content tenant.
#[derive(Debug, Clone, Serialize)]
pub struct Webspace {
    pub key: String,
    pub name: String,
    pub localizations: Vec<WebspaceLocalization>,
    pub segments: Vec<Segment>,
    pub portals: Vec<Portal>,
}

impl Webspace {
    /// The default localization. Falls back to the first declared one when
    /// none is flagged (validation warns about that case).
    pub fn default_localization(&self) -> Option<&WebspaceLocalization> {
        self.localizations
            .iter()
            .find(|l| l.default)
            .or_else(|| self.localizations.first())
    }

    pub fn default_segment(&self) -> Option<&Segment> {
        self.segments
            .iter()
            .find(|s| s.default)
            .or_else(|| self.segments.first())
    }

    pub fn portal(&self, key: &str) -> Option<&Portal> {
        self.portals.iter().find(|p| p.key == key)
    }

    /// Whether the webspace publishes the given locale in any portal.
    pub fn has_localization(&self, locale: &Locale) -> bool {
        self.localizations.iter().any(|l| l.locale == *locale)
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Validate a webspace graph, collecting diagnostics.
///
/// `origin` names the definition file the webspace came from so that
/// diagnostics point at a concrete file.
pub fn validate_webspace(webspace: &Webspace, origin: &str, diag: &mut ConfigDiagnostics) {
    let base = FieldPath::new(origin.to_string());

    validate_key(&webspace.key, &base.child("key"), diag);

    if webspace.name.is_empty() {
        diag.error(base.child("name"), "missing or empty <name> element");
    }

    validate_localizations(webspace, &base, diag);
    validate_segments(webspace, &base, diag);

    for (portal_index, portal) in webspace.portals.iter().enumerate() {
        validate_portal(webspace, portal, &base.indexed("portals", portal_index), diag);
    }
}

fn validate_key(key: &str, field: &FieldPath, diag: &mut ConfigDiagnostics) {
    if key.is_empty() {
        diag.error(field.clone(), "missing or empty <key> element");
    } else if !KEY_RE.is_match(key) {
        diag.error_with_hint(
            field.clone(),
            format!("invalid key `{key}`"),
            "keys must match [a-z0-9][a-z0-9_-]*",
        );
    }
}

fn validate_localizations(webspace: &Webspace, base: &FieldPath, diag: &mut ConfigDiagnostics) {
    let field = base.child("localizations");

    if webspace.localizations.is_empty() {
        diag.error(field.clone(), "webspace declares no localizations");
        return;
    }

    let defaults = webspace.localizations.iter().filter(|l| l.default).count();
    if defaults > 1 {
        diag.error(field.clone(), "more than one default localization");
    } else if defaults == 0 {
        diag.warn(field.clone(), "no default localization, using the first");
    }

    for (i, a) in webspace.localizations.iter().enumerate() {
        if webspace.localizations[..i].iter().any(|b| b.locale == a.locale) {
            diag.error(
                field.clone(),
                format!("duplicate localization `{}`", a.locale),
            );
        }
    }
}

fn validate_segments(webspace: &Webspace, base: &FieldPath, diag: &mut ConfigDiagnostics) {
    let field = base.child("segments");

    let defaults = webspace.segments.iter().filter(|s| s.default).count();
    if defaults > 1 {
        diag.error(field.clone(), "more than one default segment");
    } else if defaults == 0 && !webspace.segments.is_empty() {
        diag.warn(field.clone(), "no default segment, using the first");
    }

    for (i, segment) in webspace.segments.iter().enumerate() {
        validate_key(&segment.key, &field.indexed("segment", i).child("key"), diag);
        if webspace.segments[..i].iter().any(|s| s.key == segment.key) {
            diag.error(field.clone(), format!("duplicate segment `{}`", segment.key));
        }
    }
}

fn validate_portal(
    webspace: &Webspace,
    portal: &Portal,
    base: &FieldPath,
    diag: &mut ConfigDiagnostics,
) {
    validate_key(&portal.key, &base.child("key"), diag);

    if portal.name.is_empty() {
        diag.error(base.child("name"), "missing or empty <name> element");
    }

    for locale in &portal.localizations {
        if !webspace.has_localization(locale) {
            diag.error(
                base.child("localizations"),
                format!("portal locale `{locale}` is not declared by the webspace"),
            );
        }
    }

    if portal.environments.is_empty() {
        diag.error(
            base.child("environments"),
            "portal declares no environments",
        );
        return;
    }

    for (i, a) in portal.environments.iter().enumerate() {
        if portal.environments[..i].iter().any(|b| b.kind == a.kind) {
            diag.error(
                base.child("environments"),
                format!("duplicate environment `{}`", a.kind),
            );
        }
    }

    for (env_index, environment) in portal.environments.iter().enumerate() {
        validate_environment(
            webspace,
            environment,
            &base.indexed("environments", env_index),
            diag,
        );
    }
}

fn validate_environment(
    webspace: &Webspace,
    environment: &Environment,
    base: &FieldPath,
    diag: &mut ConfigDiagnostics,
) {
    if environment.kind.is_empty() {
        diag.error(base.clone(), "environment is missing its type attribute");
    }

    if environment.urls.is_empty() {
        diag.warn(base.clone(), "environment declares no urls");
    }

    let mains = environment.urls.iter().filter(|u| u.main).count();
    if mains > 1 {
        diag.error(base.clone(), "more than one main url");
    }

    for (url_index, url) in environment.urls.iter().enumerate() {
        validate_url(webspace, url, &base.indexed("url", url_index), diag);
    }
}

/// URL pattern rules, checked once at load time. A malformed pattern must
/// fail when the configuration is compiled, never at request time.
fn validate_url(
    webspace: &Webspace,
    url: &UrlDefinition,
    field: &FieldPath,
    diag: &mut ConfigDiagnostics,
) {
    if url.pattern.is_empty() {
        diag.error(field.clone(), "empty url pattern");
        return;
    }

    let has_language = url.pattern.contains("{language}");
    let has_country = url.pattern.contains("{country}");
    let has_localization = url.pattern.contains("{localization}");

    // {country} is meaningless without a language part
    if has_country && !has_language && !has_localization {
        diag.error_with_hint(
            field.clone(),
            format!("`{}` uses {{country}} without {{language}}", url.pattern),
            "add {language} or use {localization}",
        );
    }

    // A fixed URL must pin its locale or redirect elsewhere
    if !url.has_placeholders() && url.language.is_none() && !url.is_redirect() {
        diag.error_with_hint(
            field.clone(),
            format!("`{}` has no placeholders and no language attribute", url.pattern),
            "set language=\"..\" (and optionally country) or declare a redirect",
        );
    }

    if url.country.is_some() && url.language.is_none() {
        diag.error(
            field.clone(),
            "country attribute requires a language attribute",
        );
    }

    if let Some(language) = &url.language
        && Locale::parse(language).is_err()
    {
        diag.error(field.clone(), format!("invalid language `{language}`"));
    }

    if let Some(segment) = &url.segment
        && !webspace.segments.iter().any(|s| s.key == *segment)
    {
        diag.error(
            field.clone(),
            format!("unknown segment `{segment}` referenced by url"),
        );
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::webspace::*`)
// ============================================================================

/// A single-portal webspace with one prod URL, for tests across the crate.
#[cfg(test)]
pub(crate) fn test_webspace() -> Webspace {
    Webspace {
        key: "blog".into(),
        name: "Blog".into(),
        localizations: vec![WebspaceLocalization {
            locale: Locale::parse("en_us").unwrap(),
            default: true,
        }],
        segments: vec![],
        portals: vec![Portal {
            key: "blog_portal".into(),
            name: "Blog Portal".into(),
            localizations: vec![Locale::parse("en_us").unwrap()],
            environments: vec![Environment {
                kind: "prod".into(),
                urls: vec![UrlDefinition {
                    pattern: "blog.example.com".into(),
                    language: Some("en".into()),
                    country: Some("us".into()),
                    segment: None,
                    redirect: None,
                    main: true,
                }],
            }],
        }],
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_webspace() -> Webspace {
        test_webspace()
    }

    fn validate(webspace: &Webspace) -> ConfigDiagnostics {
        let mut diag = ConfigDiagnostics::new();
        validate_webspace(webspace, "blog.xml", &mut diag);
        diag
    }

    #[test]
    fn test_valid_webspace_passes() {
        let diag = validate(&minimal_webspace());
        assert!(!diag.has_errors(), "unexpected errors: {diag}");
    }

    #[test]
    fn test_invalid_key_rejected() {
        let mut webspace = minimal_webspace();
        webspace.key = "Blog Site".into();
        let diag = validate(&webspace);
        assert!(diag.has_errors());
        assert!(diag.errors()[0].message.contains("invalid key"));
    }

    #[test]
    fn test_no_localizations_rejected() {
        let mut webspace = minimal_webspace();
        webspace.localizations.clear();
        assert!(validate(&webspace).has_errors());
    }

    #[test]
    fn test_multiple_default_localizations_rejected() {
        let mut webspace = minimal_webspace();
        webspace.localizations.push(WebspaceLocalization {
            locale: Locale::parse("de").unwrap(),
            default: true,
        });
        assert!(validate(&webspace).has_errors());
    }

    #[test]
    fn test_country_without_language_rejected() {
        let mut webspace = minimal_webspace();
        webspace.portals[0].environments[0].urls[0] =
            UrlDefinition::new("{country}.example.com");
        let diag = validate(&webspace);
        assert!(diag.has_errors());
        assert!(diag.errors()[0].message.contains("{country}"));
    }

    #[test]
    fn test_fixed_url_without_language_rejected() {
        let mut webspace = minimal_webspace();
        webspace.portals[0].environments[0].urls[0] = UrlDefinition::new("example.com");
        assert!(validate(&webspace).has_errors());
    }

    #[test]
    fn test_fixed_redirect_url_allowed() {
        let mut webspace = minimal_webspace();
        let mut url = UrlDefinition::new("www.example.com");
        url.redirect = Some("example.com".into());
        webspace.portals[0].environments[0].urls.push(url);
        assert!(!validate(&webspace).has_errors());
    }

    #[test]
    fn test_unknown_segment_rejected() {
        let mut webspace = minimal_webspace();
        webspace.portals[0].environments[0].urls[0].segment = Some("winter".into());
        let diag = validate(&webspace);
        assert!(diag.has_errors());
        assert!(diag.errors()[0].message.contains("winter"));
    }

    #[test]
    fn test_multiple_main_urls_rejected() {
        let mut webspace = minimal_webspace();
        let mut url = UrlDefinition::new("{language}.example.com");
        url.main = true;
        webspace.portals[0].environments[0].urls.push(url);
        assert!(validate(&webspace).has_errors());
    }

    #[test]
    fn test_portal_locale_must_be_declared() {
        let mut webspace = minimal_webspace();
        webspace.portals[0]
            .localizations
            .push(Locale::parse("fr").unwrap());
        let diag = validate(&webspace);
        assert!(diag.has_errors());
        assert!(diag.errors()[0].message.contains("fr"));
    }

    #[test]
    fn test_no_default_segment_warns() {
        let mut webspace = minimal_webspace();
        webspace.segments.push(Segment {
            key: "winter".into(),
            title: None,
            default: false,
        });
        let diag = validate(&webspace);
        assert!(!diag.has_errors());
        assert_eq!(diag.warnings().len(), 1);
    }

    #[test]
    fn test_default_accessors() {
        let mut webspace = minimal_webspace();
        webspace.segments = vec![
            Segment {
                key: "summer".into(),
                title: None,
                default: false,
            },
            Segment {
                key: "winter".into(),
                title: None,
                default: true,
            },
        ];

        assert_eq!(
            webspace.default_localization().unwrap().locale.to_string(),
            "en_us"
        );
        assert_eq!(webspace.default_segment().unwrap().key, "winter");
    }

    #[test]
    fn test_environment_lookup_and_main_url() {
        let webspace = minimal_webspace();
        let portal = &webspace.portals[0];
        assert!(portal.environment("prod").is_some());
        assert!(portal.environment("dev").is_none());
        assert_eq!(
            portal.environment("prod").unwrap().main_url().unwrap().pattern,
            "blog.example.com"
        );
    }
}
