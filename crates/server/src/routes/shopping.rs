//! Shopping list route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chef_em_casa_core::api::ShoppingItemsRequest;
use chef_em_casa_core::{ShoppingItem, UserId};
use tracing::instrument;

use crate::db::ShoppingRepository;
use crate::error::Result;
use crate::state::AppState;

/// A user's shopping list.
///
/// # Route
///
/// `GET /api/shopping-lists/{user_id}`
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<ShoppingItem>>> {
    let items = ShoppingRepository::new(state.store())
        .list(&UserId::new(user_id))
        .await?;
    Ok(Json(items))
}

/// Append items to a user's shopping list.
///
/// # Route
///
/// `POST /api/shopping-lists/{user_id}`
#[instrument(skip(state, body), fields(count = body.items.len()))]
pub async fn append(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(body): Json<ShoppingItemsRequest>,
) -> Result<StatusCode> {
    ShoppingRepository::new(state.store())
        .append(UserId::new(user_id), body.items)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
