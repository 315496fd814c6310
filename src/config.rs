//! Engine configuration.
//!
//! Plain data, built once and handed to [`crate::Engine::new`]. The cache
//! store handle is passed to the engine constructor separately so `Config`
//! stays cheap to clone between the CLI, the server, and tests.

use crate::providers::ProviderId;
use std::time::Duration;

/// Configuration for a lookup engine.
#[derive(Debug, Clone)]
pub struct Config {
    /// Street-provider override. When unset, the first entry of
    /// [`ProviderId::STREET`] is used. IP queries always route to the IP
    /// default regardless of this setting.
    pub provider: Option<ProviderId>,
    /// One API key, handed to whichever provider runs. Keyless providers
    /// ignore it.
    pub api_key: Option<String>,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
    /// Response language hint for providers that honor one.
    pub language: String,
    /// Call provider endpoints over https instead of http.
    pub use_https: bool,
    /// Namespacing string prepended to every cache key, so multiple cache
    /// users can share one physical store without collisions.
    pub cache_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: None,
            api_key: None,
            timeout: Duration::from_secs(3),
            language: "en".into(),
            use_https: false,
            cache_prefix: "waypost:".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.provider, None);
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.language, "en");
        assert!(!config.use_https);
        assert_eq!(config.cache_prefix, "waypost:");
    }
}
