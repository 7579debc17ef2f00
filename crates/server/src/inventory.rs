//! Item CRUD routes.
//!
//! - `GET    /product`      list every record in insertion order
//! - `POST   /product`      create a record, 201 with the stored record
//! - `PUT    /product/{id}` apply the present fields, 404 when absent
//! - `DELETE /product/{id}` remove and return the record, 404 when absent

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde_json::Value;
use shopkeep_core::{DomainError, Item, ItemId, ItemPatch, NewItem};
use shopkeep_db::repositories::ItemRepository;
use tracing::info;

use crate::error::{ApiError, FailureCause, Operation};

#[derive(Clone)]
pub struct InventoryState {
    items: Arc<dyn ItemRepository>,
    expose_error_details: bool,
}

impl InventoryState {
    pub fn new(items: Arc<dyn ItemRepository>, expose_error_details: bool) -> Self {
        Self { items, expose_error_details }
    }

    fn fail(&self, operation: Operation, cause: impl Into<FailureCause>) -> ApiError {
        ApiError::failed(operation, cause.into(), self.expose_error_details)
    }
}

pub fn router(state: InventoryState) -> Router {
    Router::new()
        .route("/product", get(list_items).post(create_item))
        .route("/product/{id}", put(update_item).delete(delete_item))
        .with_state(state)
}

async fn list_items(State(state): State<InventoryState>) -> Result<Json<Vec<Item>>, ApiError> {
    let items = state.items.list().await.map_err(|e| state.fail(Operation::List, e))?;
    Ok(Json(items))
}

async fn create_item(
    State(state): State<InventoryState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let new_item = parse_body(&body)
        .and_then(|value| NewItem::from_json(&value).map_err(DomainError::from))
        .map_err(|e| state.fail(Operation::Create, e))?;

    let item = state.items.create(new_item).await.map_err(|e| state.fail(Operation::Create, e))?;

    info!(event_name = "inventory.item.created", item_id = %item.id, "item created");
    Ok((StatusCode::CREATED, Json(item)))
}

async fn update_item(
    State(state): State<InventoryState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<Item>, ApiError> {
    let id = ItemId::parse(&raw_id).map_err(|e| state.fail(Operation::Update, e))?;
    let patch = parse_body(&body)
        .and_then(|value| ItemPatch::from_json(&value).map_err(DomainError::from))
        .map_err(|e| state.fail(Operation::Update, e))?;

    let updated =
        state.items.update(&id, patch).await.map_err(|e| state.fail(Operation::Update, e))?;
    let item = updated.ok_or_else(ApiError::not_found)?;

    info!(event_name = "inventory.item.updated", item_id = %item.id, "item updated");
    Ok(Json(item))
}

async fn delete_item(
    State(state): State<InventoryState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Item>, ApiError> {
    let id = ItemId::parse(&raw_id).map_err(|e| state.fail(Operation::Delete, e))?;

    let deleted = state.items.delete(&id).await.map_err(|e| state.fail(Operation::Delete, e))?;
    let item = deleted.ok_or_else(ApiError::not_found)?;

    info!(event_name = "inventory.item.deleted", item_id = %item.id, "item deleted");
    Ok(Json(item))
}

/// An empty body reads as `{}`.
fn parse_body(body: &[u8]) -> Result<Value, DomainError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    serde_json::from_slice(body).map_err(|e| DomainError::MalformedBody(e.to_string()))
}
