//! URL providers - aggregate the URLs configured for an environment.

use crate::config::webspace::{UrlDefinition, Webspace};

/// Source of configured URLs for a webspace/environment pair.
pub trait UrlProvider {
    /// All URL definitions declared for `environment` across the webspace.
    ///
    /// Returns an empty list when nothing is configured; an unknown
    /// environment name is simply not configured anywhere.
    fn urls(&self, webspace: &Webspace, environment: &str) -> Vec<UrlDefinition>;
}

/// Collects URLs from the webspace's portals, in portal declaration order.
#[derive(Debug, Default)]
pub struct WebspaceUrlProvider;

impl UrlProvider for WebspaceUrlProvider {
    fn urls(&self, webspace: &Webspace, environment: &str) -> Vec<UrlDefinition> {
        let mut urls = Vec::new();
        for portal in &webspace.portals {
            if let Some(env) = portal.environment(environment) {
                urls.extend(env.urls.iter().cloned());
            }
        }
        urls
    }
}

/// Chains multiple providers, preserving each provider's return order.
/// No deduplication: a URL declared twice is returned twice.
#[derive(Default)]
pub struct UrlChainProvider {
    providers: Vec<Box<dyn UrlProvider + Send + Sync>>,
}

impl UrlChainProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, provider: Box<dyn UrlProvider + Send + Sync>) {
        self.providers.push(provider);
    }

    pub fn with(mut self, provider: Box<dyn UrlProvider + Send + Sync>) -> Self {
        self.push(provider);
        self
    }
}

impl UrlProvider for UrlChainProvider {
    fn urls(&self, webspace: &Webspace, environment: &str) -> Vec<UrlDefinition> {
        self.providers
            .iter()
            .flat_map(|p| p.urls(webspace, environment))
            .collect()
    }
}
