//! Persistence backends.
//!
//! Both implementations honor the same contract:
//!
//! | Operation | Failure |
//! |---|---|
//! | [`Backend::list_recipes`] | none |
//! | [`Backend::create_recipe`] | `Validation` |
//! | [`Backend::create_or_get_user`] | none |
//! | [`Backend::user_by_email`] | `NotFound` |
//! | [`Backend::verify_user`] | `NotFound` |
//! | [`Backend::toggle_favorite`] | `NotFound` |
//! | [`Backend::append_shopping_items`] | none |
//! | [`Backend::shopping_list`] | empty when none |
//!
//! Storage and transport problems surface as the remaining variants of
//! [`BackendError`]; they are never swallowed.

mod local;
mod remote;

use std::collections::BTreeSet;

use async_trait::async_trait;
use chef_em_casa_core::{
    DocumentError, Email, Provider, Recipe, RecipeDraft, RecipeId, ShoppingItem, User, UserId,
    ValidationError,
};
use thiserror::Error;

use crate::storage::StorageError;

pub use local::{CORRUPT_KEY, DOCUMENT_KEY, LocalBackend};
pub use remote::RemoteBackend;

/// Errors from a [`Backend`].
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
}

impl From<ValidationError> for BackendError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<DocumentError> for BackendError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::Validation(e) => e.into(),
            DocumentError::UserNotFound(key) => Self::NotFound(format!("user {key}")),
        }
    }
}

impl BackendError {
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Durable storage for recipes, users and shopping lists.
#[async_trait]
pub trait Backend: Send + Sync {
    /// All recipes, newest user submissions first.
    async fn list_recipes(&self) -> Result<Vec<Recipe>, BackendError>;

    /// Publish a draft under a fresh id.
    async fn create_recipe(
        &self,
        draft: RecipeDraft,
        author_id: Option<UserId>,
    ) -> Result<Recipe, BackendError>;

    /// Return the user for `email`, creating it if absent.
    async fn create_or_get_user(
        &self,
        name: &str,
        email: &Email,
        provider: Provider,
    ) -> Result<User, BackendError>;

    /// Exact, case-sensitive lookup.
    async fn user_by_email(&self, email: &Email) -> Result<User, BackendError>;

    async fn verify_user(&self, email: &Email) -> Result<User, BackendError>;

    /// Flip a favorite and return the resulting set.
    async fn toggle_favorite(
        &self,
        user_id: &UserId,
        recipe_id: &RecipeId,
    ) -> Result<BTreeSet<RecipeId>, BackendError>;

    async fn append_shopping_items(
        &self,
        user_id: &UserId,
        items: Vec<ShoppingItem>,
    ) -> Result<(), BackendError>;

    async fn shopping_list(&self, user_id: &UserId) -> Result<Vec<ShoppingItem>, BackendError>;
}
