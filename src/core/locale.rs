//! Locale type - language with optional country.
//!
//! Stored lowercase; accepts `en`, `en_us` and `en-us` on input and always
//! renders `en_us` on output, matching the localization keys used in
//! webspace configuration and localized property names.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static LOCALE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<language>[a-z]{2,3})(?:[_-](?P<country>[a-z]{2,3}))?$")
        .expect("locale pattern is valid")
});

/// Error raised when a locale string cannot be parsed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid locale `{input}`, expected `xx` or `xx_yy`")]
pub struct LocaleParseError {
    pub input: String,
}

/// A language/country pair (`en`, `en_us`, `de_at`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locale {
    language: String,
    country: Option<String>,
}

impl Locale {
    /// Parse from `xx`, `xx_yy` or `xx-yy` (case-insensitive).
    pub fn parse(input: &str) -> Result<Self, LocaleParseError> {
        let lowered = input.trim().to_ascii_lowercase();
        let captures = LOCALE_RE.captures(&lowered).ok_or_else(|| LocaleParseError {
            input: input.to_string(),
        })?;

        Ok(Self {
            language: captures["language"].to_string(),
            country: captures.name("country").map(|m| m.as_str().to_string()),
        })
    }

    #[inline]
    pub fn language(&self) -> &str {
        &self.language
    }

    #[inline]
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn has_country(&self) -> bool {
        self.country.is_some()
    }

    /// The language-only parent of a country locale (`en_us` -> `en`).
    /// Returns `None` for locales that already have no country.
    pub fn without_country(&self) -> Option<Self> {
        self.country.as_ref().map(|_| Self {
            language: self.language.clone(),
            country: None,
        })
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.country {
            Some(country) => write!(f, "{}_{}", self.language, country),
            None => write!(f, "{}", self.language),
        }
    }
}

impl FromStr for Locale {
    type Err = LocaleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Locale {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Locale {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language_only() {
        let locale = Locale::parse("en").unwrap();
        assert_eq!(locale.language(), "en");
        assert_eq!(locale.country(), None);
        assert_eq!(locale.to_string(), "en");
    }

    #[test]
    fn test_parse_with_country() {
        let locale = Locale::parse("en_us").unwrap();
        assert_eq!(locale.language(), "en");
        assert_eq!(locale.country(), Some("us"));
        assert_eq!(locale.to_string(), "en_us");
    }

    #[test]
    fn test_parse_dash_separator() {
        assert_eq!(Locale::parse("de-at").unwrap().to_string(), "de_at");
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(Locale::parse("EN_US").unwrap().to_string(), "en_us");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Locale::parse("").is_err());
        assert!(Locale::parse("e").is_err());
        assert!(Locale::parse("english").is_err());
        assert!(Locale::parse("en_us_extra").is_err());
        assert!(Locale::parse("12_34").is_err());
    }

    #[test]
    fn test_error_carries_input() {
        let err = Locale::parse("bogus!").unwrap_err();
        assert_eq!(err.input, "bogus!");
        assert!(err.to_string().contains("bogus!"));
    }

    #[test]
    fn test_without_country() {
        let locale = Locale::parse("de_at").unwrap();
        assert_eq!(locale.without_country().unwrap().to_string(), "de");
        assert_eq!(Locale::parse("de").unwrap().without_country(), None);
    }

    #[test]
    fn test_serde_round_trip() {
        let locale = Locale::parse("fr_ca").unwrap();
        let json = serde_json::to_string(&locale).unwrap();
        assert_eq!(json, r#""fr_ca""#);
        let parsed: Locale = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, locale);
    }

    #[test]
    fn test_deserialize_invalid_fails() {
        let result: Result<Locale, _> = serde_json::from_str(r#""not a locale""#);
        assert!(result.is_err());
    }
}
