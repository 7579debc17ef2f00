use std::sync::Arc;

use axum::{http::Method, Router};
use shopkeep_db::{repositories::ItemRepository, DbPool};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::health;
use crate::inventory::{self, InventoryState};

/// Full HTTP surface: liveness, health, and item CRUD behind request tracing and
/// open CORS.
pub fn build_router(
    db_pool: DbPool,
    items: Arc<dyn ItemRepository>,
    expose_error_details: bool,
) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers(Any);

    Router::new()
        .merge(health::router(db_pool))
        .merge(inventory::router(InventoryState::new(items, expose_error_details)))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
