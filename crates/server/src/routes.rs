pub mod auth;
pub mod farms;
pub mod users;

use axum::{middleware, routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::openapi::ApiDoc;
use auth::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the application router: public health and docs, guarded resources.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let resources = Router::new()
        .route("/users", get(users::list).post(users::create))
        .route("/users/:id", get(users::get).patch(users::update).delete(users::delete))
        .route("/farms", get(farms::list).post(farms::create))
        .route("/farms/:id", get(farms::get).patch(farms::update).delete(farms::delete));

    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(resources)
        .layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer_token))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
