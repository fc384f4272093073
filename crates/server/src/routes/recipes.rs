//! Recipe route handlers.

use axum::{Json, extract::State, http::StatusCode};
use chef_em_casa_core::Recipe;
use chef_em_casa_core::api::NewRecipeRequest;
use tracing::instrument;

use crate::db::RecipeRepository;
use crate::error::{Result, add_breadcrumb};
use crate::state::AppState;

/// List all recipes.
///
/// # Route
///
/// `GET /api/recipes`
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Recipe>>> {
    let recipes = RecipeRepository::new(state.store()).list().await?;
    Ok(Json(recipes))
}

/// Publish a recipe draft.
///
/// # Route
///
/// `POST /api/recipes`
#[instrument(skip(state, body), fields(title = %body.draft.title))]
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<NewRecipeRequest>,
) -> Result<(StatusCode, Json<Recipe>)> {
    let recipe = RecipeRepository::new(state.store())
        .create(body.draft, body.author_id)
        .await?;

    tracing::info!(recipe_id = %recipe.id, "Recipe published");
    add_breadcrumb("recipes", "Recipe published", Some(&[("recipe_id", recipe.id.as_str())]));
    Ok((StatusCode::CREATED, Json(recipe)))
}
