//! Pluralization utilities.

/// Return "s" suffix for plural counts
///
/// # Examples
///
/// - `plural_s(0)` -> `"s"` (0 webspaces)
/// - `plural_s(1)` -> `""` (1 webspace)
/// - `plural_s(5)` -> `"s"` (5 webspaces)
#[inline]
pub fn plural_s(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Format count with noun, handling pluralization
///
/// # Examples
///
/// - `plural_count(0, "portal")` -> `"0 portals"`
/// - `plural_count(1, "portal")` -> `"1 portal"`
/// - `plural_count(5, "portal")` -> `"5 portals"`
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, plural_s(count))
}
