//! API router.
//!
//! Routes are nested under `/api/`. [`app`] wraps them with CORS for the
//! configured front-end origin and HTTP request tracing.

use axum::http::{header, HeaderValue, Method};
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::types::AppState;

/// Build the `/api` router over `state`.
pub fn api_router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route(
            "/patients",
            get(endpoints::patients::list).post(endpoints::patients::create),
        )
        .route(
            "/patients/:id",
            get(endpoints::patients::detail).delete(endpoints::patients::remove),
        )
        .route("/patients/:id/visits", post(endpoints::visits::create))
        .route(
            "/patients/:id/visits/:visit_id",
            delete(endpoints::visits::remove),
        )
        .route("/export/patients", get(endpoints::patients::export));

    Router::new().nest("/api", routes).with_state(state)
}

/// Full application: API routes plus CORS and tracing layers.
pub fn app(state: AppState, cors_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    api_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
