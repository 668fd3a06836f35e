//! HTTP adapter - the JSON API the browser drives the application through.

pub mod app;

pub use app::{app_routes, AppHandlers, AppSnapshotResponse, ErrorResponse};

use axum::{routing::get, Router};
use axum::http::{header, HeaderValue, Method};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;

/// Builds the full router: `/api` routes, `/health`, request tracing,
/// CORS and the request timeout.
pub fn create_router(handlers: AppHandlers, server: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(app::health))
        .nest("/api", app_routes(handlers))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&server.cors_origins_list()))
                .layer(TimeoutLayer::new(server.request_timeout())),
        )
}

/// Allows exactly the listed origins. An empty or wholly unparseable list
/// allows no cross-origin requests.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        tracing::info!("No CORS origins configured; cross-origin requests are refused");
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE])
}
