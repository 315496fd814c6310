//! Yahoo PlaceFinder (JSON via `flags=J`).
//!
//! Reverse lookups reuse the forward endpoint with `gflags=R` and a
//! "lat,lon" location string. The ResultSet carries a numeric `Error`
//! member where zero means success.

use super::{fetch_json, join_nonempty, non_empty, scheme, urlencode, Provider, ProviderId};
use crate::config::Config;
use crate::error::Error;
use crate::query::Query;
use crate::result::Location;
use serde::Deserialize;
use std::time::Duration;

pub struct Yahoo {
    app_id: Option<String>,
    locale: String,
    timeout: Duration,
    use_https: bool,
}

impl Yahoo {
    pub fn new(config: &Config) -> Self {
        Self {
            app_id: config.api_key.clone(),
            locale: config.language.clone(),
            timeout: config.timeout,
            use_https: config.use_https,
        }
    }

    fn request_url(&self, query: &Query) -> String {
        let mut url = format!(
            "{}://where.yahooapis.com/geocode?location={}&flags=J",
            scheme(self.use_https),
            urlencode(&query.to_string()),
        );
        if matches!(query, Query::Coordinates { .. }) {
            url.push_str("&gflags=R");
        }
        url.push_str("&locale=");
        url.push_str(&urlencode(&self.locale));
        if let Some(ref id) = self.app_id {
            url.push_str("&appid=");
            url.push_str(&urlencode(id));
        }
        url
    }

    fn parse(doc: YahooResponse) -> Result<Vec<Location>, Error> {
        let set = doc.result_set;
        if set.error != 0 {
            return Err(Error::InvalidResponse(format!("yahoo: error {}", set.error)));
        }
        Ok(set.results.into_iter().map(normalize).collect())
    }
}

impl Provider for Yahoo {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn search(&self, query: &Query) -> Result<Vec<Location>, Error> {
        let doc = fetch_json(&self.request_url(query), self.timeout)?;
        Self::parse(doc)
    }
}

fn normalize(result: YahooResult) -> Location {
    let address = join_nonempty(&[&result.line1, &result.line2, &result.line3, &result.line4]);
    Location {
        lat: result.latitude.parse().unwrap_or(0.0),
        lon: result.longitude.parse().unwrap_or(0.0),
        address,
        city: non_empty(result.city),
        country: non_empty(result.country),
        country_code: non_empty(result.countrycode),
    }
}

#[derive(Deserialize)]
struct YahooResponse {
    #[serde(rename = "ResultSet")]
    result_set: YahooResultSet,
}

#[derive(Deserialize)]
struct YahooResultSet {
    #[serde(rename = "Error", default)]
    error: i64,
    #[serde(rename = "Results", default)]
    results: Vec<YahooResult>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct YahooResult {
    latitude: String,
    longitude: String,
    line1: String,
    line2: String,
    line3: String,
    line4: String,
    city: String,
    country: String,
    countrycode: String,
}
