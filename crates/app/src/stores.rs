//! Recipe and user stores reading and writing through a [`Backend`].

use std::collections::BTreeSet;
use std::sync::Arc;

use chef_em_casa_core::{
    Catalog, Email, Provider, Recipe, RecipeDraft, RecipeId, User, UserId,
};
use tracing::debug;

use crate::backend::{Backend, BackendError};

/// The canonical recipe list, with an in-memory snapshot once loaded.
///
/// There is no update or delete: recipes are append-only.
pub struct RecipeStore {
    backend: Arc<dyn Backend>,
    snapshot: Option<Vec<Recipe>>,
}

impl RecipeStore {
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            snapshot: None,
        }
    }

    /// Fetch the full list and replace the snapshot.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the previous snapshot is kept.
    pub async fn load(&mut self) -> Result<&[Recipe], BackendError> {
        let recipes = self.backend.list_recipes().await?;
        debug!(count = recipes.len(), "Loaded recipes");
        let snapshot = self.snapshot.insert(recipes);
        Ok(snapshot.as_slice())
    }

    /// The snapshot, `None` until the first successful [`load`](Self::load).
    #[must_use]
    pub fn list(&self) -> Option<&[Recipe]> {
        self.snapshot.as_deref()
    }

    /// The snapshot as seen by fragment reconciliation.
    #[must_use]
    pub fn catalog(&self) -> Catalog<'_> {
        self.snapshot
            .as_deref()
            .map_or(Catalog::Loading, Catalog::Loaded)
    }

    #[must_use]
    pub fn get(&self, id: &RecipeId) -> Option<&Recipe> {
        self.list()?.iter().find(|r| &r.id == id)
    }

    /// Create a recipe and prepend it to the snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Validation`] for an incomplete draft, or any
    /// storage/transport error.
    pub async fn create(
        &mut self,
        draft: RecipeDraft,
        author_id: Option<UserId>,
    ) -> Result<Recipe, BackendError> {
        draft.validate()?;
        let recipe = self.backend.create_recipe(draft, author_id).await?;
        if let Some(snapshot) = self.snapshot.as_mut() {
            snapshot.insert(0, recipe.clone());
        }
        Ok(recipe)
    }
}

/// User records.
#[derive(Clone)]
pub struct UserStore {
    backend: Arc<dyn Backend>,
}

impl UserStore {
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Sign up, or return the existing user for this email.
    ///
    /// # Errors
    ///
    /// Returns any storage/transport error.
    pub async fn create_or_get(
        &self,
        name: &str,
        email: &Email,
        provider: Provider,
    ) -> Result<User, BackendError> {
        self.backend.create_or_get_user(name, email, provider).await
    }

    /// Look a user up by exact email. There is no credential check.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] if no user has this email.
    pub async fn login(&self, email: &Email) -> Result<User, BackendError> {
        self.backend.user_by_email(email).await
    }

    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] if no user has this email.
    pub async fn verify(&self, email: &Email) -> Result<User, BackendError> {
        self.backend.verify_user(email).await
    }

    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] for an unknown user.
    pub async fn toggle_favorite(
        &self,
        user_id: &UserId,
        recipe_id: &RecipeId,
    ) -> Result<BTreeSet<RecipeId>, BackendError> {
        self.backend.toggle_favorite(user_id, recipe_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::LocalBackend;
    use crate::storage::MemoryStorage;

    fn backend() -> Arc<dyn Backend> {
        Arc::new(LocalBackend::new(Arc::new(MemoryStorage::new())))
    }

    #[tokio::test]
    async fn test_catalog_loading_until_loaded() {
        let mut store = RecipeStore::new(backend());
        assert!(matches!(store.catalog(), Catalog::Loading));
        assert!(store.get(&RecipeId::new("1")).is_none());

        store.load().await.unwrap();
        assert!(matches!(store.catalog(), Catalog::Loaded(r) if r.len() == 2));
        assert!(store.get(&RecipeId::new("1")).is_some());
    }

    #[tokio::test]
    async fn test_create_prepends_to_snapshot() {
        let backend = backend();
        let mut store = RecipeStore::new(Arc::clone(&backend));
        store.load().await.unwrap();

        let created = store
            .create(RecipeDraft::new("Bolo de Cenoura", "img"), None)
            .await
            .unwrap();
        assert_eq!(store.list().unwrap().first().map(|r| &r.id), Some(&created.id));

        let persisted = backend.list_recipes().await.unwrap();
        assert_eq!(persisted.first().map(|r| &r.id), Some(&created.id));
    }

    #[tokio::test]
    async fn test_create_validates_before_backend() {
        let mut store = RecipeStore::new(backend());
        let err = store
            .create(RecipeDraft::new("Bolo", " "), None)
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Validation(_)));
    }

    #[tokio::test]
    async fn test_login_is_exact_match() {
        let users = UserStore::new(backend());
        let email = Email::parse("a@b.com").unwrap();
        users
            .create_or_get("A", &email, Provider::Email)
            .await
            .unwrap();

        assert_eq!(users.login(&email).await.unwrap().email, email);
        let upper = Email::parse("A@b.com").unwrap();
        assert!(users.login(&upper).await.unwrap_err().is_not_found());
    }
}
