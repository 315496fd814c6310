//! Memoized provider instances.
//!
//! Adapters are built on first request and reused for every later lookup,
//! so per-instance state (HTTP agents, parsed configuration) is paid for
//! once. The map is locked for the whole get-or-create step, which keeps
//! construction at-most-once even under concurrent first requests.

use crate::config::Config;
use crate::providers::{self, Provider, ProviderId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct Registry {
    providers: Mutex<HashMap<ProviderId, Arc<dyn Provider>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared instance for `id`, building it on first request.
    pub fn get_or_create(&self, id: ProviderId, config: &Config) -> Arc<dyn Provider> {
        let mut map = self.providers.lock().unwrap();
        map.entry(id)
            .or_insert_with(|| providers::spawn(id, config))
            .clone()
    }

    /// Replace (or pre-seed) the instance for the provider's own id.
    /// Later `get_or_create` calls return this instance instead of
    /// building the real adapter.
    pub fn install(&self, provider: Arc<dyn Provider>) {
        let mut map = self.providers.lock().unwrap();
        map.insert(provider.id(), provider);
    }

    /// Drop every memoized instance; the next request rebuilds.
    pub fn reset(&self) {
        self.providers.lock().unwrap().clear();
    }

    /// How many providers have been instantiated so far.
    pub fn len(&self) -> usize {
        self.providers.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
