//! Remote geocoding providers.
//!
//! Street providers (default first): google, yahoo, bing, geocoder_ca,
//! yandex. IP providers: freegeoip. Each adapter owns its wire format and
//! maps it into the shared [`Location`] record; the engine only ever sees
//! the [`Provider`] trait.

mod bing;
mod freegeoip;
mod geocoder_ca;
mod google;
mod yahoo;
mod yandex;

pub use bing::Bing;
pub use freegeoip::FreeGeoIp;
pub use geocoder_ca::GeocoderCa;
pub use google::Google;
pub use yahoo::Yahoo;
pub use yandex::Yandex;

use crate::config::Config;
use crate::error::Error;
use crate::query::Query;
use crate::result::Location;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

pub(crate) const USER_AGENT: &str = concat!("waypost/", env!("CARGO_PKG_VERSION"));

/// A remote geocoding service client.
///
/// `search` returns an empty vector when nothing is found; errors are
/// reserved for transport, auth, quota, and parse failures, so callers can
/// always tell "no results" from "lookup failed". Implementations must be
/// safe for concurrent `&self` use: one instance per provider is shared
/// process-wide for the lifetime of the registry.
pub trait Provider: Send + Sync {
    /// The registry slot this instance serves.
    fn id(&self) -> ProviderId;

    /// Geocode a classified query.
    fn search(&self, query: &Query) -> Result<Vec<Location>, Error>;
}

// ─── Provider names ─────────────────────────────────────────────

/// The fixed set of valid providers, partitioned by capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    Google,
    Yahoo,
    Bing,
    GeocoderCa,
    Yandex,
    FreeGeoIp,
}

impl ProviderId {
    /// Every valid provider (street first, then IP).
    pub const ALL: [ProviderId; 6] = [
        ProviderId::Google,
        ProviderId::Yahoo,
        ProviderId::Bing,
        ProviderId::GeocoderCa,
        ProviderId::Yandex,
        ProviderId::FreeGeoIp,
    ];

    /// Street-address providers, default ordering: the first entry is the
    /// default when no override is configured.
    pub const STREET: [ProviderId; 5] = [
        ProviderId::Google,
        ProviderId::Yahoo,
        ProviderId::Bing,
        ProviderId::GeocoderCa,
        ProviderId::Yandex,
    ];

    /// IP-address providers, default first.
    pub const IP: [ProviderId; 1] = [ProviderId::FreeGeoIp];

    pub fn as_str(self) -> &'static str {
        match self {
            ProviderId::Google => "google",
            ProviderId::Yahoo => "yahoo",
            ProviderId::Bing => "bing",
            ProviderId::GeocoderCa => "geocoder_ca",
            ProviderId::Yandex => "yandex",
            ProviderId::FreeGeoIp => "freegeoip",
        }
    }

    /// "street" or "ip", for display surfaces.
    pub fn kind(self) -> &'static str {
        if ProviderId::STREET.contains(&self) {
            "street"
        } else {
            "ip"
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = Error;

    /// Name validation happens here, at the string boundary: an unknown
    /// name yields [`Error::Configuration`] carrying the offending name,
    /// and never reaches the registry.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        ProviderId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == normalized)
            .ok_or_else(|| Error::Configuration(s.to_string()))
    }
}

/// Construct the adapter for a provider id. Infallible: provider-specific
/// problems (bad keys, unreachable hosts) surface on first use, not here.
pub(crate) fn spawn(id: ProviderId, config: &Config) -> Arc<dyn Provider> {
    match id {
        ProviderId::Google => Arc::new(Google::new(config)),
        ProviderId::Yahoo => Arc::new(Yahoo::new(config)),
        ProviderId::Bing => Arc::new(Bing::new(config)),
        ProviderId::GeocoderCa => Arc::new(GeocoderCa::new(config)),
        ProviderId::Yandex => Arc::new(Yandex::new(config)),
        ProviderId::FreeGeoIp => Arc::new(FreeGeoIp::new(config)),
    }
}

// ─── Shared plumbing ────────────────────────────────────────────

pub(crate) fn scheme(use_https: bool) -> &'static str {
    if use_https {
        "https"
    } else {
        "http"
    }
}

/// Fetch a URL and deserialize the JSON body. Transport failures map to
/// [`Error::Network`], unparsable bodies to [`Error::InvalidResponse`].
pub(crate) fn fetch_json<T: serde::de::DeserializeOwned>(
    url: &str,
    timeout: Duration,
) -> Result<T, Error> {
    let response = ureq::get(url)
        .set("User-Agent", USER_AGENT)
        .timeout(timeout)
        .call()
        .map_err(|e| Error::Network(e.to_string()))?;
    response
        .into_json()
        .map_err(|e| Error::InvalidResponse(e.to_string()))
}

/// Percent-encode a query parameter value (minimal, no extra dep).
pub(crate) fn urlencode(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            ' ' => "%20".to_string(),
            '&' => "%26".to_string(),
            '=' => "%3D".to_string(),
            '+' => "%2B".to_string(),
            ',' => "%2C".to_string(),
            _ if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' || c == '~' => {
                c.to_string()
            }
            _ => c.to_string().bytes().map(|b| format!("%{:02X}", b)).collect(),
        })
        .collect()
}

/// Join the non-empty parts with ", " (display-address assembly).
pub(crate) fn join_nonempty(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Empty string to `None`, anything else to `Some`.
pub(crate) fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partitions_cover_all() {
        assert_eq!(ProviderId::STREET.len() + ProviderId::IP.len(), ProviderId::ALL.len());
        for id in ProviderId::ALL {
            assert!(
                ProviderId::STREET.contains(&id) != ProviderId::IP.contains(&id),
                "{} must belong to exactly one partition",
                id
            );
        }
    }

    #[test]
    fn test_default_ordering() {
        assert_eq!(ProviderId::STREET[0], ProviderId::Google);
        assert_eq!(ProviderId::IP[0], ProviderId::FreeGeoIp);
    }

    #[test]
    fn test_parse_valid_names() {
        for id in ProviderId::ALL {
            assert_eq!(id.as_str().parse::<ProviderId>().unwrap(), id);
        }
        // Forgiving about case and padding.
        assert_eq!(" GeoCoder_CA ".parse::<ProviderId>().unwrap(), ProviderId::GeocoderCa);
    }

    #[test]
    fn test_parse_invalid_name() {
        let err = "googlez".parse::<ProviderId>().unwrap_err();
        match err {
            Error::Configuration(name) => assert_eq!(name, "googlez"),
            other => panic!("expected Configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_urlencode() {
        assert_eq!(urlencode("285 Bedford Ave"), "285%20Bedford%20Ave");
        assert_eq!(urlencode("a&b=c+d"), "a%26b%3Dc%2Bd");
        assert_eq!(urlencode("8.8.8.8"), "8.8.8.8");
        assert_eq!(urlencode("Tromsø"), "Troms%C3%B8");
    }

    #[test]
    fn test_join_nonempty() {
        assert_eq!(join_nonempty(&["a", "", " b ", ""]), "a, b");
        assert_eq!(join_nonempty(&["", ""]), "");
    }
}
