//! URL resolution - placeholder substitution, providers, portal matching.

mod portal;
mod provider;
mod replacer;

pub use portal::{PortalInformation, RequestMatcher, build_portal_information};
pub use provider::{UrlChainProvider, UrlProvider, WebspaceUrlProvider};
pub use replacer::{
    COUNTRY_REPLACER, LANGUAGE_REPLACER, LOCALIZATION_REPLACER, PLACEHOLDERS, Replacer,
    SEGMENT_REPLACER,
};
