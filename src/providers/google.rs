//! Google Maps Geocoding API (v3, JSON).
//!
//! Forward lookups send `address=`, reverse lookups `latlng=`. The payload
//! carries a `status` field: "OK" and "ZERO_RESULTS" are the only healthy
//! values, everything else (REQUEST_DENIED, OVER_QUERY_LIMIT, ...) is a
//! failure and must not be mistaken for an empty result set.

use super::{fetch_json, non_empty, scheme, urlencode, Provider, ProviderId};
use crate::config::Config;
use crate::error::Error;
use crate::query::Query;
use crate::result::Location;
use serde::Deserialize;
use std::time::Duration;

pub struct Google {
    api_key: Option<String>,
    language: String,
    timeout: Duration,
    use_https: bool,
}

impl Google {
    pub fn new(config: &Config) -> Self {
        Self {
            api_key: config.api_key.clone(),
            language: config.language.clone(),
            timeout: config.timeout,
            use_https: config.use_https,
        }
    }

    fn request_url(&self, query: &Query) -> String {
        let subject = match query {
            Query::Coordinates { lat, lon } => format!("latlng={},{}", lat, lon),
            other => format!("address={}", urlencode(&other.to_string())),
        };
        let mut url = format!(
            "{}://maps.googleapis.com/maps/api/geocode/json?sensor=false&language={}&{}",
            scheme(self.use_https),
            urlencode(&self.language),
            subject,
        );
        if let Some(ref key) = self.api_key {
            url.push_str("&key=");
            url.push_str(&urlencode(key));
        }
        url
    }

    fn parse(doc: GoogleResponse) -> Result<Vec<Location>, Error> {
        match doc.status.as_str() {
            "OK" => Ok(doc.results.into_iter().map(normalize).collect()),
            "ZERO_RESULTS" => Ok(Vec::new()),
            other => Err(Error::InvalidResponse(format!("google: status {}", other))),
        }
    }
}

impl Provider for Google {
    fn id(&self) -> ProviderId {
        ProviderId::Google
    }

    fn search(&self, query: &Query) -> Result<Vec<Location>, Error> {
        let doc = fetch_json(&self.request_url(query), self.timeout)?;
        Self::parse(doc)
    }
}

fn normalize(result: GoogleResult) -> Location {
    let city = component(&result, "locality").map(|c| c.long_name.clone());
    let country = component(&result, "country").map(|c| c.long_name.clone());
    let country_code = component(&result, "country").map(|c| c.short_name.clone());
    Location {
        lat: result.geometry.location.lat,
        lon: result.geometry.location.lng,
        address: result.formatted_address,
        city: city.and_then(non_empty),
        country: country.and_then(non_empty),
        country_code: country_code.and_then(non_empty),
    }
}

fn component<'a>(result: &'a GoogleResult, kind: &str) -> Option<&'a GoogleComponent> {
    result
        .address_components
        .iter()
        .find(|c| c.types.iter().any(|t| t == kind))
}

#[derive(Deserialize)]
struct GoogleResponse {
    status: String,
    #[serde(default)]
    results: Vec<GoogleResult>,
}

#[derive(Deserialize)]
struct GoogleResult {
    formatted_address: String,
    geometry: GoogleGeometry,
    #[serde(default)]
    address_components: Vec<GoogleComponent>,
}

#[derive(Deserialize)]
struct GoogleGeometry {
    location: GooglePoint,
}

#[derive(Deserialize)]
struct GooglePoint {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct GoogleComponent {
    long_name: String,
    short_name: String,
    types: Vec<String>,
}
