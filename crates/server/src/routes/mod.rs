pub mod campuses;
pub mod health;
pub mod rooms;
pub mod session;

use crate::{auth::require_auth, doc::ApiDoc, state::AppState};
use axum::{
    Json, Router, middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use utoipa::OpenApi;

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/rooms/search", post(rooms::search_rooms))
        .route("/rooms/{room_id}/book", post(rooms::book_room))
        .route("/campuses", get(campuses::list_campuses))
        .route("/session/query", get(session::saved_query))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(health::health))
        .route("/api-docs/openapi.json", get(openapi))
        .merge(protected)
        .layer(ServiceBuilder::new().layer(CompressionLayer::new()))
        .with_state(state)
}
