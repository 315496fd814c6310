use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::error::Error;
use crate::providers::ProviderId;
use crate::result::Location;

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

pub(super) struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

/// Map lookup failures onto HTTP status codes: configuration problems are
/// the caller's fault, store faults are ours, provider faults are upstream.
fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::Configuration(_) => StatusCode::BAD_REQUEST,
        Error::Cache(_) => StatusCode::INTERNAL_SERVER_ERROR,
        Error::Network(_) | Error::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
    }
}

fn lookup_error(err: Error) -> Response {
    api_error(status_for(&err), err.to_string()).into_response()
}

// ─── GET /api/search ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Location>>, Response> {
    let start = Instant::now();
    let query = params.query.as_deref().unwrap_or("");

    // Blank queries are answered, not rejected: an empty result set.
    let results = state.engine.search(query).map_err(lookup_error)?;

    let elapsed = start.elapsed();
    eprintln!("[{}] GET /api/search?query={} -> {} results ({:.1}ms)",
        Utc::now().format("%H:%M:%S"),
        query,
        results.len(),
        elapsed.as_secs_f64() * 1000.0,
    );

    Ok(Json(results))
}

// ─── GET /api/coordinates ────────────────────────────────────────

#[derive(Serialize)]
pub struct CoordinatesResponse {
    pub query: String,
    pub lat: f64,
    pub lon: f64,
}

pub async fn coordinates(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<CoordinatesResponse>, Response> {
    let start = Instant::now();

    let query = params.query.as_deref().unwrap_or("").trim();
    if query.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Missing 'query' parameter").into_response());
    }

    let point = state.engine.coordinates(query).map_err(lookup_error)?;
    let (lat, lon) = point.ok_or_else(|| {
        api_error(StatusCode::NOT_FOUND, format!("No results for '{}'", query)).into_response()
    })?;

    let elapsed = start.elapsed();
    eprintln!("[{}] GET /api/coordinates?query={} -> {},{} ({:.1}ms)",
        Utc::now().format("%H:%M:%S"),
        query, lat, lon,
        elapsed.as_secs_f64() * 1000.0,
    );

    Ok(Json(CoordinatesResponse { query: query.to_string(), lat, lon }))
}

// ─── GET /api/address ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct PointParams {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Serialize)]
pub struct AddressResponse {
    pub lat: f64,
    pub lon: f64,
    pub address: String,
}

pub async fn address(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PointParams>,
) -> Result<Json<AddressResponse>, Response> {
    let start = Instant::now();

    let (lat, lon) = match (params.lat, params.lon) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => {
            return Err(api_error(StatusCode::BAD_REQUEST,
                "Provide 'lat' and 'lon' parameters").into_response());
        }
    };
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(api_error(StatusCode::BAD_REQUEST,
            "Invalid coordinates. Lat: -90..90, Lon: -180..180").into_response());
    }

    let found = state.engine.address((lat, lon)).map_err(lookup_error)?;
    let address = found.ok_or_else(|| {
        api_error(StatusCode::NOT_FOUND, format!("No address at {},{}", lat, lon)).into_response()
    })?;

    let elapsed = start.elapsed();
    eprintln!("[{}] GET /api/address?lat={}&lon={} -> {} ({:.1}ms)",
        Utc::now().format("%H:%M:%S"),
        lat, lon, address,
        elapsed.as_secs_f64() * 1000.0,
    );

    Ok(Json(AddressResponse { lat, lon, address }))
}

// ─── GET /api/providers ──────────────────────────────────────────

#[derive(Serialize)]
pub struct ProviderInfo {
    pub name: String,
    pub kind: String,
    pub default: bool,
}

pub async fn providers(State(state): State<Arc<AppState>>) -> Json<Vec<ProviderInfo>> {
    let street_default = state
        .engine
        .config()
        .provider
        .unwrap_or(ProviderId::STREET[0]);

    let list = ProviderId::ALL
        .iter()
        .map(|&id| ProviderInfo {
            name: id.to_string(),
            kind: id.kind().to_string(),
            default: id == street_default || id == ProviderId::IP[0],
        })
        .collect();

    Json(list)
}
