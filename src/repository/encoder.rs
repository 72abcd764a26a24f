//! Property name encoding.
//!
//! The same logical field maps to a different physical property per
//! locale. The key format is fixed and documented:
//!
//! - general (non-localized): `<field>`
//! - localized:               `i18n:<locale>-<field>`
//!
//! Field names are restricted to `[a-zA-Z0-9_-]+`; anything else is a
//! programming error and rejected up front, never silently encoded.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::Locale;
use crate::repository::RepositoryError;

static FIELD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("field pattern is valid"));

fn check(field: &str) -> Result<(), RepositoryError> {
    if FIELD_RE.is_match(field) {
        Ok(())
    } else {
        Err(RepositoryError::InvalidFieldName {
            name: field.to_string(),
        })
    }
}

/// Physical name of a non-localized property.
pub fn general(field: &str) -> Result<String, RepositoryError> {
    check(field)?;
    Ok(field.to_string())
}

/// Physical name of a localized property: `i18n:<locale>-<field>`.
pub fn localized(field: &str, locale: &Locale) -> Result<String, RepositoryError> {
    check(field)?;
    Ok(format!("i18n:{locale}-{field}"))
}
