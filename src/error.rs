//! Error taxonomy for the lookup engine.
//!
//! Empty results are never an error: providers answer `Ok(vec![])` for
//! "nothing found" and reserve these variants for real failures, so callers
//! can always tell a miss from a broken lookup.

use crate::providers::ProviderId;
use std::fmt;

/// Everything the engine can fail with.
#[derive(Debug)]
pub enum Error {
    /// A requested provider name is not a member of the valid set.
    /// Carries the offending name; `Display` lists every valid name.
    Configuration(String),
    /// The cache store failed to read or write, or a stored entry would not
    /// decode. Distinct from provider failures: callers may retry the
    /// provider directly, bypassing the cache.
    Cache(String),
    /// Transport-level failure talking to a provider (connect, timeout,
    /// non-success HTTP status).
    Network(String),
    /// The provider answered, but with a payload we could not use: either
    /// unparsable, or carrying an API-level error status.
    InvalidResponse(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(name) => {
                let valid: Vec<&str> = ProviderId::ALL.iter().map(|p| p.as_str()).collect();
                write!(
                    f,
                    "Please specify a valid geocoding provider ('{}' is not one of: {}).",
                    name,
                    valid.join(", ")
                )
            }
            Self::Cache(msg) => write!(f, "Cache error: {}", msg),
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::InvalidResponse(msg) => write!(f, "Invalid provider response: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_lists_all_providers() {
        let err = Error::Configuration("googlez".into());
        let msg = err.to_string();
        assert!(msg.contains("'googlez'"));
        for id in ProviderId::ALL {
            assert!(msg.contains(id.as_str()), "missing {} in: {}", id, msg);
        }
    }

    #[test]
    fn test_cache_error_distinct_from_network() {
        let cache = Error::Cache("store down".into()).to_string();
        let network = Error::Network("store down".into()).to_string();
        assert_ne!(cache, network);
        assert!(cache.starts_with("Cache error"));
    }
}
