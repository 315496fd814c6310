//! Bing Maps REST Locations API.
//!
//! Forward lookups hit `/Locations?query=`, reverse lookups put the point in
//! the path (`/Locations/{lat},{lon}`). Coordinates come back as a two-element
//! `[lat, lon]` array, and `incl=ciso2` asks for two-letter country codes.

use super::{fetch_json, non_empty, scheme, urlencode, Provider, ProviderId};
use crate::config::Config;
use crate::error::Error;
use crate::query::Query;
use crate::result::Location;
use serde::Deserialize;
use std::time::Duration;

pub struct Bing {
    api_key: Option<String>,
    culture: String,
    timeout: Duration,
    use_https: bool,
}

impl Bing {
    pub fn new(config: &Config) -> Self {
        Self {
            api_key: config.api_key.clone(),
            culture: config.language.clone(),
            timeout: config.timeout,
            use_https: config.use_https,
        }
    }

    fn request_url(&self, query: &Query) -> String {
        let mut url = match query {
            Query::Coordinates { lat, lon } => format!(
                "{}://dev.virtualearth.net/REST/v1/Locations/{},{}?incl=ciso2",
                scheme(self.use_https),
                lat,
                lon,
            ),
            other => format!(
                "{}://dev.virtualearth.net/REST/v1/Locations?query={}&incl=ciso2",
                scheme(self.use_https),
                urlencode(&other.to_string()),
            ),
        };
        url.push_str("&culture=");
        url.push_str(&urlencode(&self.culture));
        if let Some(ref key) = self.api_key {
            url.push_str("&key=");
            url.push_str(&urlencode(key));
        }
        url
    }

    fn parse(doc: BingResponse) -> Result<Vec<Location>, Error> {
        if doc.status_code != 200 {
            return Err(Error::InvalidResponse(format!(
                "bing: status {}",
                doc.status_code
            )));
        }
        Ok(doc
            .resource_sets
            .into_iter()
            .flat_map(|set| set.resources)
            .map(normalize)
            .collect())
    }
}

impl Provider for Bing {
    fn id(&self) -> ProviderId {
        ProviderId::Bing
    }

    fn search(&self, query: &Query) -> Result<Vec<Location>, Error> {
        let doc = fetch_json(&self.request_url(query), self.timeout)?;
        Self::parse(doc)
    }
}

fn normalize(resource: BingResource) -> Location {
    let address = if resource.address.formatted_address.is_empty() {
        resource.name
    } else {
        resource.address.formatted_address
    };
    Location {
        lat: resource.point.coordinates.first().copied().unwrap_or(0.0),
        lon: resource.point.coordinates.get(1).copied().unwrap_or(0.0),
        address,
        city: non_empty(resource.address.locality),
        country: non_empty(resource.address.country_region),
        country_code: non_empty(resource.address.country_region_iso2),
    }
}

#[derive(Deserialize)]
struct BingResponse {
    #[serde(rename = "statusCode")]
    status_code: u16,
    #[serde(rename = "resourceSets", default)]
    resource_sets: Vec<BingResourceSet>,
}

#[derive(Deserialize)]
struct BingResourceSet {
    #[serde(default)]
    resources: Vec<BingResource>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct BingResource {
    name: String,
    point: BingPoint,
    address: BingAddress,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct BingPoint {
    coordinates: Vec<f64>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct BingAddress {
    #[serde(rename = "formattedAddress")]
    formatted_address: String,
    locality: String,
    #[serde(rename = "countryRegion")]
    country_region: String,
    #[serde(rename = "countryRegionIso2")]
    country_region_iso2: String,
}
