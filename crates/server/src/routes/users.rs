//! User and favorites route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chef_em_casa_core::api::{FavoritesResponse, NewUserRequest, VerifyRequest};
use chef_em_casa_core::{Email, RecipeId, User, UserId};
use tracing::instrument;

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Create a user, or return the one already registered under the email.
///
/// # Route
///
/// `POST /api/users`
#[instrument(skip(state, body), fields(email = %body.email, provider = %body.provider))]
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<NewUserRequest>,
) -> Result<(StatusCode, Json<User>)> {
    let email = accepted(body.email)?;
    let user = UserRepository::new(state.store())
        .create_or_get(&body.name, email, body.provider)
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Get a user by exact email.
///
/// # Route
///
/// `GET /api/users/{email}`
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(email): Path<String>) -> Result<Json<User>> {
    let email =
        Email::parse(&email).map_err(|e| AppError::BadRequest(format!("invalid email: {e}")))?;
    UserRepository::new(state.store())
        .get_by_email(&email)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("user {email}")))
}

/// Mark a user's email as verified.
///
/// # Route
///
/// `POST /api/users/verify`
#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn verify(
    State(state): State<AppState>,
    Json(body): Json<VerifyRequest>,
) -> Result<Json<User>> {
    let email = accepted(body.email)?;
    let user = UserRepository::new(state.store()).verify(&email).await?;
    Ok(Json(user))
}

/// Toggle a recipe in a user's favorites.
///
/// # Route
///
/// `POST /api/favorites/{user_id}/{recipe_id}`
#[instrument(skip(state))]
pub async fn toggle_favorite(
    State(state): State<AppState>,
    Path((user_id, recipe_id)): Path<(String, String)>,
) -> Result<Json<FavoritesResponse>> {
    let favorites = UserRepository::new(state.store())
        .toggle_favorite(&UserId::new(user_id), RecipeId::new(recipe_id))
        .await?;
    Ok(Json(FavoritesResponse { favorites }))
}

/// Body emails deserialize verbatim; new input still has to pass `Email::parse`.
fn accepted(email: Email) -> Result<Email> {
    Email::parse(email.as_str()).map_err(|e| AppError::BadRequest(format!("invalid email: {e}")))
}
