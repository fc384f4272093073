//! Error type for client-side operations.

use chef_em_casa_core::{EmailError, RecipeId};
use thiserror::Error;

use crate::backend::BackendError;
use crate::chef::ChefError;
use crate::storage::StorageError;

/// Errors surfaced by the session manager and the [`App`](crate::App).
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("session encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Chef(#[from] ChefError),

    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The operation needs a signed-in user.
    #[error("not signed in")]
    NotSignedIn,

    /// The selected id is not in the catalog.
    #[error("recipe not found: {0}")]
    RecipeNotFound(RecipeId),

    /// The operation needs an open recipe.
    #[error("no recipe is open")]
    NoRecipeOpen,

    /// The recipe catalog has not been loaded yet.
    #[error("recipes not loaded")]
    NotLoaded,
}

impl ClientError {
    /// Whether the error means "no such user/recipe".
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Backend(BackendError::NotFound(_))
                | Self::RecipeNotFound(_)
                | Self::NoRecipeOpen
        )
    }

    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Backend(BackendError::Validation(_)))
    }
}
