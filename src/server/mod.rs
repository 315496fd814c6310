//! JSON API over the lookup engine.
//!
//! GET /api/search       full result sets for a query
//! GET /api/coordinates  best-match point for a query
//! GET /api/address      reverse geocode a point
//! GET /api/providers    the provider roster

mod handlers;
mod state;

use axum::routing::get;
use axum::Router;
use state::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::engine::Engine;

pub fn build_router(engine: Engine) -> Router {
    let state = Arc::new(AppState { engine });

    Router::new()
        .route("/api/search", get(handlers::search))
        .route("/api/coordinates", get(handlers::coordinates))
        .route("/api/address", get(handlers::address))
        .route("/api/providers", get(handlers::providers))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(host: &str, port: u16, engine: Engine) {
    let app = build_router(engine);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            eprintln!("Error: Cannot bind to {}: {}", addr, e);
            std::process::exit(1);
        });

    eprintln!("  Waypost server listening on http://{}", addr);
    eprintln!("  Press Ctrl+C to stop.");

    axum::serve(listener, app)
        .await
        .unwrap_or_else(|e| {
            eprintln!("Server error: {}", e);
            std::process::exit(1);
        });
}
