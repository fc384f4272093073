//! Chef advice route handler.

use axum::{Json, extract::State};
use chef_em_casa_core::api::{ChefAdviceRequest, ChefAdviceResponse};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Ask the chef a question about a recipe.
///
/// # Route
///
/// `POST /api/chef/advice`
#[instrument(skip(state, body), fields(recipe = %body.recipe_title))]
pub async fn advice(
    State(state): State<AppState>,
    Json(body): Json<ChefAdviceRequest>,
) -> Result<Json<ChefAdviceResponse>> {
    if body.question.trim().is_empty() {
        return Err(AppError::BadRequest("question is required".to_string()));
    }

    let answer = state
        .chef()
        .advise(&body.recipe_title, &body.question)
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "Chef advice failed"))?;
    Ok(Json(ChefAdviceResponse { answer }))
}
