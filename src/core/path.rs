//! Content path type for type-safe repository tree addressing.
//!
//! - Internal representation: always normalized (leading `/`, no trailing `/`)
//! - Cheap to clone and hash; used as a map key throughout the repository

use std::borrow::Borrow;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Normalized content path (internal representation)
///
/// Invariants:
/// - Always starts with `/`
/// - Never ends with `/` except the root path itself
/// - No duplicate `/` and no empty segments
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentPath(Arc<str>);

impl ContentPath {
    /// Create a normalized path. Collapses duplicate slashes, adds the
    /// leading slash and strips the trailing one.
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();

        // Handle root path specially
        if trimmed.is_empty() || trimmed.chars().all(|c| c == '/') {
            return Self(Arc::from("/"));
        }

        let mut normalized = String::with_capacity(trimmed.len() + 1);
        for segment in trimmed.split('/').filter(|s| !s.is_empty()) {
            normalized.push('/');
            normalized.push_str(segment);
        }

        Self(Arc::from(normalized))
    }

    /// The repository root (`/`).
    pub fn root() -> Self {
        Self(Arc::from("/"))
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.0.as_ref() == "/"
    }

    /// Get the normalized path as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segments, in order.
    ///
    /// `/cmf/blog/contents` -> `["cmf", "blog", "contents"]`, `/` -> `[]`
    pub fn segments(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Number of segments. The root has depth 0.
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// Last segment, if any.
    pub fn name(&self) -> Option<&str> {
        self.segments().next_back()
    }

    /// Parent path (all segments but the last).
    ///
    /// `/a/b/c` -> `/a/b`, `/a` -> `/`, `/` -> `None`
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind('/') {
            Some(0) => Some(Self::root()),
            Some(idx) => Some(Self(Arc::from(&self.0[..idx]))),
            None => Some(Self::root()),
        }
    }

    /// Append a single segment.
    pub fn join(&self, segment: &str) -> Self {
        let segment = segment.trim_matches('/');
        if segment.is_empty() {
            return self.clone();
        }
        if self.is_root() {
            Self::new(segment)
        } else {
            Self(Arc::from(format!("{}/{}", self.0, segment)))
        }
    }

    /// Whether `self` is a direct child of `other`.
    pub fn is_child_of(&self, other: &Self) -> bool {
        self.parent().is_some_and(|p| p == *other)
    }

    /// Whether `self` is a strict descendant of `other`.
    pub fn is_descendant_of(&self, other: &Self) -> bool {
        if self == other {
            return false;
        }
        if other.is_root() {
            return true;
        }
        self.0.starts_with(other.0.as_ref())
            && self.0.as_bytes().get(other.0.len()) == Some(&b'/')
    }

    /// Extract the webspace key from a multi-tenant content path.
    ///
    /// Content trees are rooted at `/cmf/<webspace>/...`; any other shape
    /// has no webspace key.
    pub fn webspace_key(&self) -> Option<&str> {
        let segments: SmallVec<[&str; 4]> = self.segments().take(2).collect();
        match segments.as_slice() {
            ["cmf", key, ..] => Some(key),
            _ => None,
        }
    }
}

impl std::fmt::Display for ContentPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for ContentPath {
    fn default() -> Self {
        Self::root()
    }
}

impl AsRef<str> for ContentPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ContentPath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ContentPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ContentPath {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl PartialEq<str> for ContentPath {
    fn eq(&self, other: &str) -> bool {
        self.0.as_ref() == other
    }
}

impl PartialEq<&str> for ContentPath {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_ref() == *other
    }
}

impl Serialize for ContentPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ContentPath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes() {
        assert_eq!(ContentPath::new("/a/b/").as_str(), "/a/b");
        assert_eq!(ContentPath::new("a/b").as_str(), "/a/b");
        assert_eq!(ContentPath::new("//a///b//").as_str(), "/a/b");
        assert_eq!(ContentPath::new("  /a ").as_str(), "/a");
    }

    #[test]
    fn test_root() {
        assert_eq!(ContentPath::new("").as_str(), "/");
        assert_eq!(ContentPath::new("/").as_str(), "/");
        assert_eq!(ContentPath::new("///").as_str(), "/");
        assert!(ContentPath::root().is_root());
        assert!(!ContentPath::new("/a").is_root());
    }

    #[test]
    fn test_parent() {
        assert_eq!(
            ContentPath::new("/a/b/c").parent(),
            Some(ContentPath::new("/a/b"))
        );
        assert_eq!(ContentPath::new("/a").parent(), Some(ContentPath::root()));
        assert_eq!(ContentPath::root().parent(), None);
    }

    #[test]
    fn test_segments_and_depth() {
        let path = ContentPath::new("/cmf/blog/contents");
        let segments: Vec<_> = path.segments().collect();
        assert_eq!(segments, vec!["cmf", "blog", "contents"]);
        assert_eq!(path.depth(), 3);
        assert_eq!(ContentPath::root().depth(), 0);
    }

    #[test]
    fn test_name() {
        assert_eq!(ContentPath::new("/a/b").name(), Some("b"));
        assert_eq!(ContentPath::root().name(), None);
    }

    #[test]
    fn test_join() {
        assert_eq!(ContentPath::root().join("a").as_str(), "/a");
        assert_eq!(ContentPath::new("/a").join("b").as_str(), "/a/b");
        assert_eq!(ContentPath::new("/a").join("/b/").as_str(), "/a/b");
        assert_eq!(ContentPath::new("/a").join("").as_str(), "/a");
    }

    #[test]
    fn test_is_child_of() {
        let parent = ContentPath::new("/a/b");
        assert!(ContentPath::new("/a/b/c").is_child_of(&parent));
        assert!(!ContentPath::new("/a/b/c/d").is_child_of(&parent));
        assert!(ContentPath::new("/a").is_child_of(&ContentPath::root()));
    }

    #[test]
    fn test_is_descendant_of() {
        let base = ContentPath::new("/a/b");
        assert!(ContentPath::new("/a/b/c").is_descendant_of(&base));
        assert!(ContentPath::new("/a/b/c/d").is_descendant_of(&base));
        assert!(!ContentPath::new("/a/bc").is_descendant_of(&base));
        assert!(!base.is_descendant_of(&base));
        assert!(ContentPath::new("/x").is_descendant_of(&ContentPath::root()));
    }

    #[test]
    fn test_webspace_key() {
        assert_eq!(
            ContentPath::new("/cmf/blog/contents/posts").webspace_key(),
            Some("blog")
        );
        assert_eq!(ContentPath::new("/cmf/blog").webspace_key(), Some("blog"));
        assert_eq!(ContentPath::new("/other/blog").webspace_key(), None);
        assert_eq!(ContentPath::root().webspace_key(), None);
    }

    #[test]
    fn test_serialize_deserialize() {
        let path = ContentPath::new("/cmf/blog/contents");
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, r#""/cmf/blog/contents""#);

        let parsed: ContentPath = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, path);
    }

    #[test]
    fn test_hash_as_map_key() {
        use rustc_hash::FxHashMap;

        let mut map = FxHashMap::default();
        map.insert(ContentPath::new("/a/b"), 1);
        // Borrow<str> allows &str lookups
        assert_eq!(map.get("/a/b"), Some(&1));
    }
}
