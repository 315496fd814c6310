//! The normalized result record shared by every provider.

use serde::{Deserialize, Serialize};

/// One normalized geocoding result.
///
/// Providers map their own wire formats into this shape; the engine returns
/// these untouched. `city`, `country`, and `country_code` are optional
/// because not every remote API reports them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
    /// Full display address as the provider formats it.
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// ISO 3166-1 alpha-2 where the provider supplies one (e.g. "US").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

impl Location {
    /// The (lat, lon) pair.
    pub fn coordinates(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_preserves_results() {
        let results = vec![
            Location {
                lat: 48.8584,
                lon: 2.2945,
                address: "Tour Eiffel, Paris, France".into(),
                city: Some("Paris".into()),
                country: Some("France".into()),
                country_code: Some("FR".into()),
            },
            Location {
                lat: 45.5,
                lon: -73.6,
                address: "Montreal, QC".into(),
                city: Some("Montreal".into()),
                country: None,
                country_code: None,
            },
        ];
        let raw = serde_json::to_string(&results).unwrap();
        let back: Vec<Location> = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, results);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        // Entries written by older builds may lack the optional fields.
        let back: Location =
            serde_json::from_str(r#"{"lat":1.0,"lon":2.0,"address":"somewhere"}"#).unwrap();
        assert_eq!(back.city, None);
        assert_eq!(back.country_code, None);
        assert_eq!(back.coordinates(), (1.0, 2.0));
    }
}
