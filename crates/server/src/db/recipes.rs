//! Recipe repository.

use chef_em_casa_core::{Recipe, RecipeDraft, RecipeId, UserId};
use chrono::Utc;

use super::{FileStore, RepositoryError};

/// Repository for recipe operations.
pub struct RecipeRepository<'a> {
    store: &'a FileStore,
}

impl<'a> RecipeRepository<'a> {
    /// Create a new recipe repository.
    #[must_use]
    pub const fn new(store: &'a FileStore) -> Self {
        Self { store }
    }

    /// All recipes, newest submissions first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` if the data file cannot be read.
    pub async fn list(&self) -> Result<Vec<Recipe>, RepositoryError> {
        self.store.read(|doc| doc.recipes().to_vec()).await
    }

    /// Get a recipe by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` if the data file cannot be read.
    pub async fn get(&self, id: &RecipeId) -> Result<Option<Recipe>, RepositoryError> {
        self.store.read(|doc| doc.recipe(id).cloned()).await
    }

    /// Publish a draft under a fresh id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if the draft is incomplete.
    pub async fn create(
        &self,
        draft: RecipeDraft,
        author_id: Option<UserId>,
    ) -> Result<Recipe, RepositoryError> {
        // Reject early so an invalid draft never takes the write lock.
        draft.validate()?;
        self.store
            .update(|doc| Ok(doc.create_recipe(draft, author_id, Utc::now())?))
            .await
    }
}
