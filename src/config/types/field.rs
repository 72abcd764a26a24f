//! Type-safe config field path.

use owo_colors::OwoColorize;
use std::fmt;

/// A config field path used in diagnostics.
///
/// Webspace definitions are loaded from per-file XML, so field paths are
/// built at runtime (`blog.xml: portals[0].environments.prod.url[1]`)
/// rather than derived from struct fields.
///
/// # Example
///
/// ```ignore
/// diag.error(FieldPath::new("blog.xml: key"), "missing <key> element");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath(String);

impl FieldPath {
    #[inline]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append a sub-path (`a` + `b` -> `a.b`).
    pub fn child(&self, sub: impl AsRef<str>) -> Self {
        Self(format!("{}.{}", self.0, sub.as_ref()))
    }

    /// Append an indexed sub-path (`a` + (`b`, 1) -> `a.b[1]`).
    pub fn indexed(&self, sub: impl AsRef<str>, index: usize) -> Self {
        Self(format!("{}.{}[{}]", self.0, sub.as_ref(), index))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_args!("`{}`", self.0).bright_blue())
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FieldPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
