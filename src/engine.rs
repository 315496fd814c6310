//! The lookup coordinator.
//!
//! An [`Engine`] is a plain value owning its configuration, its memoized
//! provider instances, and an optional response cache. Nothing is process
//! global: two engines never share providers, cache entries, or settings,
//! and tests can build as many as they like side by side.
//!
//! Lookup flow: classify the input, short-circuit blank queries to an empty
//! result set, pick the provider (IP-shaped queries always go to the IP
//! provider, everything else to the configured street provider), then run
//! the search through the cache when one is configured.

use crate::cache::{CacheStore, ResponseCache};
use crate::config::Config;
use crate::error::Error;
use crate::providers::{Provider, ProviderId};
use crate::query::{Query, QueryInput};
use crate::registry::Registry;
use crate::result::Location;
use std::sync::Arc;

pub struct Engine {
    config: Config,
    registry: Registry,
    cache: Option<ResponseCache>,
}

impl Engine {
    /// An engine without a response cache: every search hits the provider.
    pub fn new(config: Config) -> Self {
        Self { config, registry: Registry::new(), cache: None }
    }

    /// An engine that caches provider responses in `store`, keyed under
    /// the configured cache prefix.
    pub fn with_cache<S: CacheStore + 'static>(config: Config, store: S) -> Self {
        let cache = ResponseCache::new(Box::new(store), config.cache_prefix.clone());
        Self { config, registry: Registry::new(), cache: Some(cache) }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Which provider serves `query`: IP-shaped queries are pinned to the
    /// IP provider regardless of the configured override.
    pub fn provider_for(&self, query: &Query) -> ProviderId {
        match query {
            Query::Ip(_) => ProviderId::IP[0],
            _ => self.config.provider.unwrap_or(ProviderId::STREET[0]),
        }
    }

    /// Full result sets for a query. Accepts free text, a `(lat, lon)`
    /// pair, or a pre-built [`Query`]; blank text returns `Ok(empty)`
    /// without resolving a provider or touching the cache.
    pub fn search(&self, input: impl Into<QueryInput>) -> Result<Vec<Location>, Error> {
        let query = match input.into().into_query() {
            Some(query) => query,
            None => return Ok(Vec::new()),
        };
        let provider = self.registry.get_or_create(self.provider_for(&query), &self.config);
        match &self.cache {
            Some(cache) => cache.fetch_or_compute(&query, || provider.search(&query)),
            None => provider.search(&query),
        }
    }

    /// The `(lat, lon)` of the best match, or `None` when nothing matched.
    pub fn coordinates(&self, input: impl Into<QueryInput>) -> Result<Option<(f64, f64)>, Error> {
        Ok(self.search(input)?.first().map(Location::coordinates))
    }

    /// The display address of the best match, or `None` when nothing
    /// matched. Feed it coordinates for reverse geocoding.
    pub fn address(&self, input: impl Into<QueryInput>) -> Result<Option<String>, Error> {
        Ok(self.search(input)?.into_iter().next().map(|found| found.address))
    }

    /// Put a specific provider instance into the registry slot its `id()`
    /// names. Tests use this to stand in for remote services.
    pub fn install_provider(&self, provider: Arc<dyn Provider>) {
        self.registry.install(provider);
    }

    /// Drop memoized provider instances; the next search rebuilds them
    /// from the current configuration.
    pub fn reset_providers(&self) {
        self.registry.reset();
    }
}
