//! Google sign-in route handlers.
//!
//! - Login: redirects to Google's authorization page with a one-time `state`
//! - Callback: checks the `state`, exchanges the code and returns the user

use axum::{
    Json,
    extract::{Query, State},
    response::Redirect,
};
use chef_em_casa_core::{Provider, User};
use rand::Rng;
use rand::distr::Alphanumeric;
use serde::Deserialize;
use tracing::instrument;

use crate::db::UserRepository;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::services::IdentityError;
use crate::state::AppState;

const STATE_LENGTH: usize = 32;

/// Query parameters from the Google OAuth callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code to exchange for tokens.
    pub code: Option<String>,
    /// State parameter for CSRF protection.
    pub state: Option<String>,
    /// Error code if authorization failed.
    pub error: Option<String>,
}

/// Generate a random alphanumeric string.
fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(STATE_LENGTH)
        .map(char::from)
        .collect()
}

fn not_configured() -> AppError {
    AppError::NotFound("Google sign-in is not configured".to_string())
}

/// Start Google sign-in.
///
/// # Route
///
/// `GET /auth/google/login`
#[instrument(skip(state))]
pub async fn login(State(state): State<AppState>) -> Result<Redirect> {
    let google = state.google().ok_or_else(not_configured)?;

    let oauth_state = generate_state();
    state.remember_login_state(oauth_state.clone()).await;

    let url = google.authorization_url(&state.config().google_redirect_uri(), &oauth_state);
    Ok(Redirect::to(&url))
}

/// Finish Google sign-in and return the (possibly new) user.
///
/// # Route
///
/// `GET /auth/google/callback`
#[instrument(skip(state, query))]
pub async fn callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Json<User>> {
    let google = state.google().ok_or_else(not_configured)?;

    if let Some(error) = query.error {
        tracing::warn!(%error, "Google sign-in denied");
        return Err(IdentityError::OAuth(format!("authorization denied: {error}")).into());
    }

    let Some(code) = query.code else {
        tracing::warn!("Google callback missing code");
        return Err(AppError::BadRequest("missing code".to_string()));
    };

    let Some(returned_state) = query.state else {
        tracing::warn!("Google callback missing state");
        return Err(AppError::BadRequest("missing state".to_string()));
    };

    if !state.take_login_state(&returned_state).await {
        tracing::warn!("Google callback state mismatch");
        return Err(AppError::BadRequest("invalid or expired state".to_string()));
    }

    let profile = google
        .sign_in(&code, &state.config().google_redirect_uri())
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "Google sign-in failed"))?;

    let user = UserRepository::new(state.store())
        .create_or_get(&profile.name, profile.email, Provider::Google)
        .await?;

    tracing::info!(user_id = %user.id, "Google sign-in succeeded");
    add_breadcrumb("auth", "Google sign-in", Some(&[("user_id", user.id.as_str())]));
    Ok(Json(user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_state() {
        let a = generate_state();
        assert_eq!(a.len(), STATE_LENGTH);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, generate_state());
    }
}
