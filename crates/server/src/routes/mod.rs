//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                                - Health check
//!
//! # Recipes
//! GET  /api/recipes                           - All recipes, newest first
//! POST /api/recipes                           - Publish a draft (201)
//!
//! # Users
//! POST /api/users                             - Create or get by email (201)
//! GET  /api/users/{email}                     - Get by exact email
//! POST /api/users/verify                      - Mark email verified
//! POST /api/favorites/{user_id}/{recipe_id}   - Toggle a favorite
//!
//! # Shopping lists
//! GET  /api/shopping-lists/{user_id}          - List items
//! POST /api/shopping-lists/{user_id}          - Append items (204)
//!
//! # Chef
//! POST /api/chef/advice                       - Ask the chef
//!
//! # Google sign-in
//! GET  /auth/google/login                     - Redirect to Google
//! GET  /auth/google/callback                  - Exchange code, return user
//! ```

pub mod chef;
pub mod google_auth;
pub mod recipes;
pub mod shopping;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(recipes::index).post(recipes::create))
        .route("/users", post(users::create))
        .route("/users/verify", post(users::verify))
        .route("/users/{email}", get(users::show))
        .route(
            "/favorites/{user_id}/{recipe_id}",
            post(users::toggle_favorite),
        )
        .route(
            "/shopping-lists/{user_id}",
            get(shopping::index).post(shopping::append),
        )
        .route("/chef/advice", post(chef::advice))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/google/login", get(google_auth::login))
        .route("/google/callback", get(google_auth::callback))
}

/// Create all routes for the server.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api", api_routes())
        .nest("/auth", auth_routes())
}
