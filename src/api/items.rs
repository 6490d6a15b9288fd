//! Item catalogue endpoints

use axum::{extract::State, http::StatusCode};
use tracing::{debug, info};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, Path};
use crate::domain::item::{Item, NewItem};

const ITEM_NOT_FOUND: &str = "Item not found";

/// Catalogue the item store starts with
pub fn default_items() -> Vec<Item> {
    vec![
        Item::new(1, "Laptop", Some("High-performance laptop".to_string())),
        Item::new(2, "Mouse", Some("Wireless optical mouse".to_string())),
        Item::new(3, "Keyboard", Some("Mechanical keyboard".to_string())),
    ]
}

/// GET /items
pub async fn list_items(State(state): State<AppState>) -> Result<Json<Vec<Item>>, ApiError> {
    let items = state.item_repository.list().await?;
    debug!(count = items.len(), "Listing items");

    Ok(Json(items))
}

/// GET /items/{id}
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Item>, ApiError> {
    let item = state
        .item_repository
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found(ITEM_NOT_FOUND))?;

    Ok(Json(item))
}

/// POST /items
pub async fn create_item(
    State(state): State<AppState>,
    Json(request): Json<NewItem>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let item = state.item_repository.create(request).await?;
    info!(item_id = item.id, name = %item.name, "Item created");

    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /items/{id}
pub async fn replace_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<NewItem>,
) -> Result<Json<Item>, ApiError> {
    let item = state
        .item_repository
        .replace(id, request)
        .await?
        .ok_or_else(|| ApiError::not_found(ITEM_NOT_FOUND))?;
    info!(item_id = id, "Item replaced");

    Ok(Json(item))
}

/// DELETE /items/{id}
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !state.item_repository.delete(id).await? {
        return Err(ApiError::not_found(ITEM_NOT_FOUND));
    }
    info!(item_id = id, "Item deleted");

    Ok(StatusCode::NO_CONTENT)
}
