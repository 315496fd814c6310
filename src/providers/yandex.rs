//! Yandex Geocoder (1.x, JSON).
//!
//! Yandex puts longitude first: reverse lookups send `geocode={lon},{lat}`
//! and the `pos` member of each hit reads "lon lat". AddressDetails nests
//! differently per feature kind, so the country/locality extraction walks
//! it as loose JSON instead of a rigid struct.

use super::{fetch_json, non_empty, scheme, urlencode, Provider, ProviderId};
use crate::config::Config;
use crate::error::Error;
use crate::query::Query;
use crate::result::Location;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

pub struct Yandex {
    api_key: Option<String>,
    lang: String,
    timeout: Duration,
    use_https: bool,
}

impl Yandex {
    pub fn new(config: &Config) -> Self {
        Self {
            api_key: config.api_key.clone(),
            lang: config.language.clone(),
            timeout: config.timeout,
            use_https: config.use_https,
        }
    }

    fn request_url(&self, query: &Query) -> String {
        let geocode = match query {
            Query::Coordinates { lat, lon } => format!("{},{}", lon, lat),
            other => other.to_string(),
        };
        let mut url = format!(
            "{}://geocode-maps.yandex.ru/1.x/?format=json&geocode={}&lang={}",
            scheme(self.use_https),
            urlencode(&geocode),
            urlencode(&self.lang),
        );
        if let Some(ref key) = self.api_key {
            url.push_str("&key=");
            url.push_str(&urlencode(key));
        }
        url
    }

    fn parse(doc: YandexResponse) -> Result<Vec<Location>, Error> {
        Ok(doc
            .response
            .collection
            .members
            .into_iter()
            .map(|member| normalize(member.geo_object))
            .collect())
    }
}

impl Provider for Yandex {
    fn id(&self) -> ProviderId {
        ProviderId::Yandex
    }

    fn search(&self, query: &Query) -> Result<Vec<Location>, Error> {
        let doc = fetch_json(&self.request_url(query), self.timeout)?;
        Self::parse(doc)
    }
}

fn normalize(object: GeoObject) -> Location {
    let mut pos = object.point.pos.split_whitespace();
    let lon = pos.next().and_then(|v| v.parse().ok()).unwrap_or(0.0);
    let lat = pos.next().and_then(|v| v.parse().ok()).unwrap_or(0.0);
    let meta = object.meta_data_property.geocoder_meta_data;
    let details = meta.address_details;
    Location {
        lat,
        lon,
        address: meta.text,
        city: locality(&details).and_then(non_empty),
        country: string_at(&details, "/Country/CountryName").and_then(non_empty),
        country_code: string_at(&details, "/Country/CountryNameCode").and_then(non_empty),
    }
}

fn locality(details: &Value) -> Option<String> {
    for path in [
        "/Country/AdministrativeArea/Locality/LocalityName",
        "/Country/AdministrativeArea/SubAdministrativeArea/Locality/LocalityName",
        "/Country/Locality/LocalityName",
    ] {
        if let Some(name) = string_at(details, path) {
            return Some(name);
        }
    }
    None
}

fn string_at(details: &Value, path: &str) -> Option<String> {
    details.pointer(path).and_then(Value::as_str).map(str::to_string)
}

#[derive(Deserialize)]
struct YandexResponse {
    response: YandexPayload,
}

#[derive(Deserialize)]
struct YandexPayload {
    #[serde(rename = "GeoObjectCollection")]
    collection: GeoObjectCollection,
}

#[derive(Deserialize)]
struct GeoObjectCollection {
    #[serde(rename = "featureMember", default)]
    members: Vec<FeatureMember>,
}

#[derive(Deserialize)]
struct FeatureMember {
    #[serde(rename = "GeoObject")]
    geo_object: GeoObject,
}

#[derive(Deserialize)]
struct GeoObject {
    #[serde(rename = "metaDataProperty")]
    meta_data_property: MetaDataProperty,
    #[serde(rename = "Point", default)]
    point: YandexPoint,
}

#[derive(Deserialize)]
struct MetaDataProperty {
    #[serde(rename = "GeocoderMetaData")]
    geocoder_meta_data: GeocoderMetaData,
}

#[derive(Deserialize)]
struct GeocoderMetaData {
    #[serde(default)]
    text: String,
    #[serde(rename = "AddressDetails", default)]
    address_details: Value,
}

#[derive(Deserialize, Default)]
struct YandexPoint {
    #[serde(default)]
    pos: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const KREMLIN: &str = r#"{
        "response": {
            "GeoObjectCollection": {
                "featureMember": [{
                    "GeoObject": {
                        "metaDataProperty": {
                            "GeocoderMetaData": {
                                "text": "Russia, Moscow, Kremlin",
                                "AddressDetails": {
                                    "Country": {
                                        "CountryNameCode": "RU",
                                        "CountryName": "Russia",
                                        "AdministrativeArea": {
                                            "Locality": { "LocalityName": "Moscow" }
                                        }
                                    }
                                }
                            }
                        },
                        "Point": { "pos": "37.617778 55.751944" }
                    }
                }]
            }
        }
    }"#;

    #[test]
    fn test_parse_swaps_pos_order() {
        let doc: YandexResponse = serde_json::from_str(KREMLIN).unwrap();
        let results = Yandex::parse(doc).unwrap();
        assert_eq!(results.len(), 1);
        // pos is "lon lat"; the normalized result must be lat-first.
        assert_eq!(results[0].lat, 55.751944);
        assert_eq!(results[0].lon, 37.617778);
        assert_eq!(results[0].address, "Russia, Moscow, Kremlin");
        assert_eq!(results[0].city.as_deref(), Some("Moscow"));
        assert_eq!(results[0].country.as_deref(), Some("Russia"));
        assert_eq!(results[0].country_code.as_deref(), Some("RU"));
    }

    #[test]
    fn test_parse_empty_collection() {
        let doc: YandexResponse = serde_json::from_str(
            r#"{ "response": { "GeoObjectCollection": { "featureMember": [] } } }"#,
        )
        .unwrap();
        assert!(Yandex::parse(doc).unwrap().is_empty());
    }

    #[test]
    fn test_reverse_url_sends_lon_first() {
        let yandex = Yandex::new(&Config::default());
        let url = yandex.request_url(&Query::Coordinates { lat: 55.751944, lon: 37.617778 });
        assert!(url.contains("geocode=37.617778%2C55.751944"));
    }

    #[test]
    fn test_forward_url() {
        let yandex = Yandex::new(&Config::default());
        let url = yandex.request_url(&Query::Address("Kremlin, Moscow".into()));
        assert!(url.starts_with("http://geocode-maps.yandex.ru/1.x/?format=json"));
        assert!(url.contains("geocode=Kremlin%2C%20Moscow"));
        assert!(url.contains("lang=en"));
        assert!(!url.contains("key="));
    }
}
