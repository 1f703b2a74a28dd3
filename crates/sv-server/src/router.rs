use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::state::AppState;

fn cors_layer(state: &AppState) -> CorsLayer {
    let origin = match &state.cors_origin {
        Some(origin) => AllowOrigin::exact(origin.clone()),
        None => AllowOrigin::any(),
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_headers([header::CONTENT_TYPE])
        .allow_methods([Method::OPTIONS, Method::POST, Method::GET])
}

/// Build the axum router with all SheetVault endpoints.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state);
    let body_limit = DefaultBodyLimit::max(state.max_body_bytes);
    Router::new()
        .route(
            "/character-sheets",
            post(handler::save_handler).get(handler::load_handler),
        )
        .route("/character-sheets/names", get(handler::list_handler))
        .route(
            "/camps",
            post(handler::create_camp_handler).get(handler::get_camp_handler),
        )
        .route("/health", get(handler::health_handler))
        .route("/info", get(handler::info_handler))
        .layer(body_limit)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
