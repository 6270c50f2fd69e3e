pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowCredentials, AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::matching::handlers;
use crate::state::AppState;

/// CORS policy: one front-end origin, any method, any header, with credentials.
/// Methods and headers are mirrored because wildcards are not allowed alongside credentials.
/// Requests from any other origin get neither `allow-origin` nor `allow-credentials`.
pub fn cors_layer(origin: HeaderValue) -> CorsLayer {
    let credentials_origin = origin.clone();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(AllowCredentials::predicate(move |request_origin, _| {
            *request_origin == credentials_origin
        }))
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(state.config.frontend_origin.clone());

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/match", post(handlers::handle_match))
        // Resumes and job descriptions carry no size cap.
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .with_state(state)
}
