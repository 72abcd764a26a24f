//! URL pattern placeholder substitution.
//!
//! Environment URL patterns may contain `{language}`, `{country}`,
//! `{localization}` and `{segment}` tokens. The [`Replacer`] substitutes
//! them one by one and `cleanup()` removes whatever is left, so a pattern
//! like `{language}.example.com/{segment}` resolves to `en.example.com`
//! when no segment applies.

/// `{language}` token.
pub const LANGUAGE_REPLACER: &str = "{language}";
/// `{country}` token.
pub const COUNTRY_REPLACER: &str = "{country}";
/// `{localization}` token.
pub const LOCALIZATION_REPLACER: &str = "{localization}";
/// `{segment}` token.
pub const SEGMENT_REPLACER: &str = "{segment}";

/// All recognized placeholder tokens.
pub const PLACEHOLDERS: [&str; 4] = [
    LANGUAGE_REPLACER,
    COUNTRY_REPLACER,
    LOCALIZATION_REPLACER,
    SEGMENT_REPLACER,
];

/// Fluent placeholder substitution over one URL pattern.
///
/// Substitution of an absent token is a no-op; there are no error paths.
///
/// # Example
///
/// ```
/// use canopy::url::Replacer;
///
/// let url = Replacer::new("/{language}/{country}")
///     .replace_language("en")
///     .replace_country("us")
///     .get()
///     .to_string();
/// assert_eq!(url, "/en/us");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacer {
    url: String,
}

impl Replacer {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    fn replace(mut self, token: &str, value: &str) -> Self {
        self.url = self.url.replace(token, value);
        self
    }

    pub fn replace_language(self, language: &str) -> Self {
        self.replace(LANGUAGE_REPLACER, language)
    }

    pub fn replace_country(self, country: &str) -> Self {
        self.replace(COUNTRY_REPLACER, country)
    }

    pub fn replace_localization(self, localization: &str) -> Self {
        self.replace(LOCALIZATION_REPLACER, localization)
    }

    pub fn replace_segment(self, segment: &str) -> Self {
        self.replace(SEGMENT_REPLACER, segment)
    }

    pub fn has_language_replacer(&self) -> bool {
        self.url.contains(LANGUAGE_REPLACER)
    }

    pub fn has_country_replacer(&self) -> bool {
        self.url.contains(COUNTRY_REPLACER)
    }

    pub fn has_localization_replacer(&self) -> bool {
        self.url.contains(LOCALIZATION_REPLACER)
    }

    pub fn has_segment_replacer(&self) -> bool {
        self.url.contains(SEGMENT_REPLACER)
    }

    /// Append the `{localization}` token as a new trailing path segment.
    pub fn append_localization_replacer(mut self) -> Self {
        let trimmed = self.url.trim_end_matches('/');
        self.url = format!("{trimmed}/{LOCALIZATION_REPLACER}");
        self
    }

    /// Remove all remaining placeholder tokens and normalize the result:
    /// no leading dots, no trailing slashes, no duplicate slashes.
    /// Calling it twice yields the same string as calling it once.
    pub fn cleanup(mut self) -> Self {
        for token in PLACEHOLDERS {
            self.url = self.url.replace(token, "");
        }

        while self.url.contains("//") {
            self.url = self.url.replace("//", "/");
        }

        self.url = self
            .url
            .trim_start_matches('.')
            .trim_end_matches('/')
            .to_string();

        self
    }

    /// The current URL string.
    pub fn get(&self) -> &str {
        &self.url
    }

    pub fn into_inner(self) -> String {
        self.url
    }
}

impl std::fmt::Display for Replacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_language_and_country() {
        let url = Replacer::new("/{language}/{country}")
            .replace_language("en")
            .replace_country("us");
        assert_eq!(url.get(), "/en/us");
    }

    #[test]
    fn test_token_consumed_after_substitution() {
        let url = Replacer::new("{language}.example.com");
        assert!(url.has_language_replacer());
        let url = url.replace_language("en");
        assert!(!url.has_language_replacer());
        assert_eq!(url.get(), "en.example.com");
    }

    #[test]
    fn test_absent_token_is_noop() {
        let url = Replacer::new("example.com").replace_language("en");
        assert_eq!(url.get(), "example.com");
    }

    #[test]
    fn test_predicates() {
        let url = Replacer::new("{language}.example.com/{segment}/{localization}");
        assert!(url.has_language_replacer());
        assert!(!url.has_country_replacer());
        assert!(url.has_localization_replacer());
        assert!(url.has_segment_replacer());
    }

    #[test]
    fn test_cleanup_removes_tokens() {
        let url = Replacer::new("{language}.example.com/{segment}").cleanup();
        assert_eq!(url.get(), "example.com");
    }

    #[test]
    fn test_cleanup_strips_leading_dots_and_trailing_slashes() {
        let url = Replacer::new("{language}.example.com/path/").cleanup();
        assert_eq!(url.get(), "example.com/path");
    }

    #[test]
    fn test_cleanup_collapses_duplicate_slashes() {
        let url = Replacer::new("example.com/{segment}/de").cleanup();
        assert_eq!(url.get(), "example.com/de");
    }

    #[test]
    fn test_cleanup_idempotent() {
        let once = Replacer::new(".{language}.example.com//{segment}/").cleanup();
        let twice = once.clone().cleanup();
        assert_eq!(once.get(), twice.get());
    }

    #[test]
    fn test_append_localization_replacer() {
        let url = Replacer::new("example.com/")
            .append_localization_replacer()
            .replace_localization("de_at");
        assert_eq!(url.get(), "example.com/de_at");
    }

    #[test]
    fn test_chained_resolution() {
        let url = Replacer::new("{language}.example.com/{segment}")
            .replace_language("de")
            .replace_segment("winter")
            .cleanup();
        assert_eq!(url.get(), "de.example.com/winter");
    }
}
