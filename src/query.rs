//! Query classification: blank input, IP-shaped text, street addresses,
//! and coordinate pairs.
//!
//! Classification is a pure function of the input shape. It never touches
//! the network or the configuration, and the IP check is deliberately
//! lenient: four dot-delimited groups of 1-3 digits count as an IP query
//! even when the octets are out of range.

use std::fmt;

/// A classified geocoding query.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Text shaped like an IPv4 address. Syntactic check only:
    /// `999.999.999.999` lands here, ` 1.2.3.4` (leading space) does not.
    Ip(String),
    /// A latitude/longitude pair, resolved by reverse geocoding.
    Coordinates { lat: f64, lon: f64 },
    /// Any other non-blank text.
    Address(String),
}

impl Query {
    /// Classify raw text. Blank or whitespace-only input returns `None`,
    /// which callers treat as "no query": short-circuit to an empty result
    /// set without resolving a provider or touching the cache.
    pub fn classify(input: &str) -> Option<Query> {
        if input.trim().is_empty() {
            return None;
        }
        if looks_like_ip(input) {
            return Some(Query::Ip(input.to_string()));
        }
        Some(Query::Address(input.to_string()))
    }

    /// Canonical token for cache keys. Deterministic for a given query;
    /// the cache wrapper prepends the configured prefix.
    pub fn cache_token(&self) -> String {
        match self {
            Query::Ip(text) => format!("ip:{}", text),
            Query::Address(text) => format!("addr:{}", text.trim().to_lowercase()),
            Query::Coordinates { lat, lon } => format!("coord:{},{}", lat, lon),
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Ip(text) | Query::Address(text) => write!(f, "{}", text),
            Query::Coordinates { lat, lon } => write!(f, "{},{}", lat, lon),
        }
    }
}

/// Four dot-delimited groups of 1-3 digits, nothing else. No range check,
/// no trimming: callers rely on malformed-looking-but-pattern-matching
/// strings like `999.999.999.999` being accepted.
fn looks_like_ip(text: &str) -> bool {
    let mut groups = 0;
    for part in text.split('.') {
        if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        groups += 1;
    }
    groups == 4
}

/// Accepted input shapes for [`crate::Engine::search`]: free text (which is
/// classified), a coordinate pair, or an already-built [`Query`].
#[derive(Debug, Clone)]
pub struct QueryInput(Option<Query>);

impl QueryInput {
    /// The classified query, or `None` for blank input.
    pub fn into_query(self) -> Option<Query> {
        self.0
    }
}

impl From<&str> for QueryInput {
    fn from(text: &str) -> Self {
        QueryInput(Query::classify(text))
    }
}

impl From<String> for QueryInput {
    fn from(text: String) -> Self {
        QueryInput(Query::classify(&text))
    }
}

impl From<(f64, f64)> for QueryInput {
    fn from((lat, lon): (f64, f64)) -> Self {
        QueryInput(Some(Query::Coordinates { lat, lon }))
    }
}

impl From<[f64; 2]> for QueryInput {
    fn from([lat, lon]: [f64; 2]) -> Self {
        QueryInput(Some(Query::Coordinates { lat, lon }))
    }
}

impl From<Query> for QueryInput {
    fn from(query: Query) -> Self {
        QueryInput(Some(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_is_no_query() {
        assert_eq!(Query::classify(""), None);
        assert_eq!(Query::classify("  "), None);
        assert_eq!(Query::classify("\t\n"), None);
    }

    #[test]
    fn test_ip_shape() {
        assert_eq!(
            Query::classify("74.200.247.59"),
            Some(Query::Ip("74.200.247.59".into()))
        );
        assert_eq!(Query::classify("8.8.8.8"), Some(Query::Ip("8.8.8.8".into())));
    }

    #[test]
    fn test_ip_shape_is_lenient() {
        // Out-of-range octets still classify as an IP query.
        assert_eq!(
            Query::classify("999.999.999.999"),
            Some(Query::Ip("999.999.999.999".into()))
        );
        assert_eq!(
            Query::classify("256.256.256.256"),
            Some(Query::Ip("256.256.256.256".into()))
        );
    }

    #[test]
    fn test_ip_shape_rejects_near_misses() {
        // Three groups, five groups, four-digit groups, trailing dot,
        // embedded whitespace: all street addresses, not IPs.
        for text in ["1.2.3", "1.2.3.4.5", "1234.1.1.1", "1.2.3.4.", " 1.2.3.4", "1.2.3.4 "] {
            assert_eq!(
                Query::classify(text),
                Some(Query::Address(text.into())),
                "{:?} should classify as an address",
                text
            );
        }
    }

    #[test]
    fn test_address_fallback() {
        assert_eq!(
            Query::classify("Eiffel Tower"),
            Some(Query::Address("Eiffel Tower".into()))
        );
    }

    #[test]
    fn test_coordinate_inputs() {
        let from_pair: QueryInput = (40.7128, -74.0060).into();
        let from_array: QueryInput = [40.7128, -74.0060].into();
        let expected = Query::Coordinates { lat: 40.7128, lon: -74.0060 };
        assert_eq!(from_pair.into_query(), Some(expected.clone()));
        assert_eq!(from_array.into_query(), Some(expected));
    }

    #[test]
    fn test_cache_token_is_deterministic() {
        let a = Query::Address("Madison Square Garden".into()).cache_token();
        let b = Query::Address("madison square garden  ".into()).cache_token();
        assert_eq!(a, b);
        assert_eq!(a, "addr:madison square garden");

        assert_eq!(Query::Ip("8.8.8.8".into()).cache_token(), "ip:8.8.8.8");
        assert_eq!(
            Query::Coordinates { lat: 40.7128, lon: -74.006 }.cache_token(),
            "coord:40.7128,-74.006"
        );
    }

    #[test]
    fn test_query_display() {
        assert_eq!(Query::Ip("8.8.8.8".into()).to_string(), "8.8.8.8");
        assert_eq!(
            Query::Coordinates { lat: 1.5, lon: -2.25 }.to_string(),
            "1.5,-2.25"
        );
    }
}
