//! Geocoder.ca (Canada and US street geocoding).
//!
//! The service returns a single candidate per request, either at the top
//! level or under a `standard` member depending on direction. Failed
//! lookups carry an `error` member instead of an HTTP error; those are
//! treated as "no match", not as a fault.

use super::{fetch_json, join_nonempty, non_empty, scheme, urlencode, Provider, ProviderId};
use crate::config::Config;
use crate::error::Error;
use crate::query::Query;
use crate::result::Location;
use serde::Deserialize;
use std::time::Duration;

pub struct GeocoderCa {
    api_key: Option<String>,
    timeout: Duration,
    use_https: bool,
}

impl GeocoderCa {
    pub fn new(config: &Config) -> Self {
        Self {
            api_key: config.api_key.clone(),
            timeout: config.timeout,
            use_https: config.use_https,
        }
    }

    fn request_url(&self, query: &Query) -> String {
        let mut url = match query {
            Query::Coordinates { lat, lon } => format!(
                "{}://geocoder.ca/?latt={}&longt={}&reverse=1&json=1",
                scheme(self.use_https),
                lat,
                lon,
            ),
            other => format!(
                "{}://geocoder.ca/?locate={}&json=1",
                scheme(self.use_https),
                urlencode(&other.to_string()),
            ),
        };
        if let Some(ref key) = self.api_key {
            url.push_str("&auth=");
            url.push_str(&urlencode(key));
        }
        url
    }

    fn parse(doc: CaResponse) -> Result<Vec<Location>, Error> {
        if doc.error.is_some() {
            return Ok(Vec::new());
        }
        Ok(vec![normalize(doc)])
    }
}

impl Provider for GeocoderCa {
    fn id(&self) -> ProviderId {
        ProviderId::GeocoderCa
    }

    fn search(&self, query: &Query) -> Result<Vec<Location>, Error> {
        let doc = fetch_json(&self.request_url(query), self.timeout)?;
        Self::parse(doc)
    }
}

fn normalize(doc: CaResponse) -> Location {
    let standard = doc.standard.unwrap_or_default();
    let city = non_empty(standard.city).or_else(|| non_empty(doc.city));
    let prov = non_empty(standard.prov).or_else(|| non_empty(doc.prov));
    let number = non_empty(standard.stnumber).or_else(|| non_empty(doc.stnumber));
    let street = non_empty(standard.staddress).or_else(|| non_empty(doc.staddress));
    let line1 = match (number, street) {
        (Some(n), Some(s)) => Some(format!("{} {}", n, s)),
        (None, Some(s)) => Some(s),
        _ => None,
    };
    let address = join_nonempty(&[
        line1.as_deref().unwrap_or(""),
        city.as_deref().unwrap_or(""),
        prov.as_deref().unwrap_or(""),
    ]);
    Location {
        lat: doc.latt.parse().unwrap_or(0.0),
        lon: doc.longt.parse().unwrap_or(0.0),
        address,
        city,
        country: None,
        country_code: None,
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct CaResponse {
    latt: String,
    longt: String,
    standard: Option<CaStandard>,
    city: String,
    prov: String,
    stnumber: String,
    staddress: String,
    error: Option<serde_json::Value>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct CaStandard {
    city: String,
    prov: String,
    stnumber: String,
    staddress: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const OTTAWA: &str = r#"{
        "latt": "45.421530",
        "longt": "-75.697193",
        "standard": {
            "stnumber": "80",
            "staddress": "Wellington St",
            "city": "Ottawa",
            "prov": "ON"
        }
    }"#;

    #[test]
    fn test_parse_forward() {
        let doc: CaResponse = serde_json::from_str(OTTAWA).unwrap();
        let results = GeocoderCa::parse(doc).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].lat, 45.421530);
        assert_eq!(results[0].address, "80 Wellington St, Ottawa, ON");
        assert_eq!(results[0].city.as_deref(), Some("Ottawa"));
        assert_eq!(results[0].country, None);
    }

    #[test]
    fn test_parse_reverse_top_level_fields() {
        let doc: CaResponse = serde_json::from_str(
            r#"{ "latt": "45.42", "longt": "-75.69", "city": "Ottawa", "prov": "ON" }"#,
        )
        .unwrap();
        let results = GeocoderCa::parse(doc).unwrap();
        assert_eq!(results[0].address, "Ottawa, ON");
    }

    #[test]
    fn test_error_member_means_no_match() {
        let doc: CaResponse = serde_json::from_str(
            r#"{ "latt": "", "longt": "", "error": { "code": "008", "description": "Your request did not produce any results." } }"#,
        )
        .unwrap();
        assert!(GeocoderCa::parse(doc).unwrap().is_empty());
    }

    #[test]
    fn test_reverse_url() {
        let ca = GeocoderCa::new(&Config::default());
        let url = ca.request_url(&Query::Coordinates { lat: 45.42, lon: -75.69 });
        assert!(url.contains("latt=45.42"));
        assert!(url.contains("longt=-75.69"));
        assert!(url.contains("reverse=1"));
        assert!(url.contains("json=1"));
    }

    #[test]
    fn test_forward_url_includes_auth_key() {
        let config = Config { api_key: Some("ca-key".into()), ..Config::default() };
        let ca = GeocoderCa::new(&config);
        let url = ca.request_url(&Query::Address("80 Wellington St, Ottawa".into()));
        assert!(url.contains("locate=80%20Wellington%20St"));
        assert!(url.contains("&auth=ca-key"));
    }
}
