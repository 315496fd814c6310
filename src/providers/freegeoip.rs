//! FreeGeoIP (IP geolocation, JSON).
//!
//! The only IP-capable provider. It takes an IP or hostname in the path and
//! answers HTTP 404 for addresses missing from its database, so this adapter
//! bypasses the shared fetch helper to turn 404 into "no results" instead of
//! a transport error. Coordinate queries cannot be served and return empty.

use super::{join_nonempty, non_empty, scheme, urlencode, Provider, ProviderId, USER_AGENT};
use crate::config::Config;
use crate::error::Error;
use crate::query::Query;
use crate::result::Location;
use serde::Deserialize;
use std::time::Duration;

pub struct FreeGeoIp {
    timeout: Duration,
    use_https: bool,
}

impl FreeGeoIp {
    pub fn new(config: &Config) -> Self {
        Self {
            timeout: config.timeout,
            use_https: config.use_https,
        }
    }

    fn request_url(&self, subject: &str) -> String {
        format!(
            "{}://freegeoip.net/json/{}",
            scheme(self.use_https),
            urlencode(subject),
        )
    }

    fn parse(doc: FreeGeoIpResponse) -> Vec<Location> {
        let address = join_nonempty(&[&doc.city, &doc.region_name, &doc.country_name]);
        vec![Location {
            lat: doc.latitude,
            lon: doc.longitude,
            address,
            city: non_empty(doc.city),
            country: non_empty(doc.country_name),
            country_code: non_empty(doc.country_code),
        }]
    }
}

impl Provider for FreeGeoIp {
    fn id(&self) -> ProviderId {
        ProviderId::FreeGeoIp
    }

    fn search(&self, query: &Query) -> Result<Vec<Location>, Error> {
        let subject = match query {
            Query::Ip(text) | Query::Address(text) => text,
            Query::Coordinates { .. } => return Ok(Vec::new()),
        };
        let response = ureq::get(&self.request_url(subject))
            .set("User-Agent", USER_AGENT)
            .timeout(self.timeout)
            .call();
        match response {
            Ok(body) => {
                let doc: FreeGeoIpResponse = body
                    .into_json()
                    .map_err(|e| Error::InvalidResponse(e.to_string()))?;
                Ok(Self::parse(doc))
            }
            // Unknown address: the service 404s rather than returning an
            // empty document.
            Err(ureq::Error::Status(404, _)) => Ok(Vec::new()),
            Err(e) => Err(Error::Network(e.to_string())),
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct FreeGeoIpResponse {
    latitude: f64,
    longitude: f64,
    city: String,
    region_name: String,
    country_name: String,
    country_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOGLE_DNS: &str = r#"{
        "ip": "8.8.8.8",
        "country_code": "US",
        "country_name": "United States",
        "region_code": "CA",
        "region_name": "California",
        "city": "Mountain View",
        "latitude": 37.386,
        "longitude": -122.0838
    }"#;

    #[test]
    fn test_parse_flat_document() {
        let doc: FreeGeoIpResponse = serde_json::from_str(GOOGLE_DNS).unwrap();
        let results = FreeGeoIp::parse(doc);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].lat, 37.386);
        assert_eq!(results[0].lon, -122.0838);
        assert_eq!(results[0].address, "Mountain View, California, United States");
        assert_eq!(results[0].country_code.as_deref(), Some("US"));
    }

    #[test]
    fn test_parse_sparse_document_leaves_options_empty() {
        let doc: FreeGeoIpResponse =
            serde_json::from_str(r#"{ "latitude": 1.0, "longitude": 2.0 }"#).unwrap();
        let results = FreeGeoIp::parse(doc);
        assert_eq!(results[0].address, "");
        assert_eq!(results[0].city, None);
        assert_eq!(results[0].country, None);
    }

    #[test]
    fn test_url_puts_subject_in_path() {
        let provider = FreeGeoIp::new(&Config::default());
        assert_eq!(
            provider.request_url("74.200.247.59"),
            "http://freegeoip.net/json/74.200.247.59"
        );
    }

    #[test]
    fn test_coordinates_are_not_served() {
        let provider = FreeGeoIp::new(&Config::default());
        let results = provider.search(&Query::Coordinates { lat: 1.0, lon: 2.0 }).unwrap();
        assert!(results.is_empty());
    }
}
