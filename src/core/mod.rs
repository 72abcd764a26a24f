//! Core types - pure abstractions shared across the codebase.

mod locale;
mod path;

pub use locale::{Locale, LocaleParseError};
pub use path::ContentPath;
