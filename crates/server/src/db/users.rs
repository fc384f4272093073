//! User repository.
//!
//! Email lookups are exact: `a@b.com` and `A@b.com` are different users.

use std::collections::BTreeSet;

use chef_em_casa_core::{Email, Provider, RecipeId, User, UserId};

use super::{FileStore, RepositoryError};

/// Repository for user operations.
pub struct UserRepository<'a> {
    store: &'a FileStore,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(store: &'a FileStore) -> Self {
        Self { store }
    }

    /// Return the user registered under `email`, creating one if absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` if the data file cannot be read or written.
    pub async fn create_or_get(
        &self,
        name: &str,
        email: Email,
        provider: Provider,
    ) -> Result<User, RepositoryError> {
        self.store
            .update(|doc| Ok(doc.create_or_get_user(name, email, provider)))
            .await
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` if the data file cannot be read.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        self.store
            .read(|doc| {
                let found = doc.user_by_email(email).cloned();
                if found.is_none() && doc.user_with_case_variant(email).is_some() {
                    tracing::debug!(%email, "Lookup missed a user whose email differs only by case");
                }
                found
            })
            .await
    }

    /// Mark the user's email as verified.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user has this email.
    pub async fn verify(&self, email: &Email) -> Result<User, RepositoryError> {
        self.store.update(|doc| Ok(doc.verify_user(email)?)).await
    }

    /// Flip a recipe in the user's favorites and return the new set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown user id.
    pub async fn toggle_favorite(
        &self,
        user_id: &UserId,
        recipe_id: RecipeId,
    ) -> Result<BTreeSet<RecipeId>, RepositoryError> {
        self.store
            .update(|doc| Ok(doc.toggle_favorite(user_id, recipe_id)?))
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn store() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("db.json")).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_create_or_get_is_idempotent() {
        let (_dir, store) = store().await;
        let repo = UserRepository::new(&store);
        let email = Email::parse("a@b.com").unwrap();

        let first = repo
            .create_or_get("Ana", email.clone(), Provider::Email)
            .await
            .unwrap();
        let second = repo
            .create_or_get("Outro", email.clone(), Provider::Google)
            .await
            .unwrap();
        assert_eq!(first, second);
        assert!(!first.is_verified);

        let upper = Email::parse("A@b.com").unwrap();
        assert!(repo.get_by_email(&upper).await.unwrap().is_none());
        assert_eq!(repo.get_by_email(&email).await.unwrap(), Some(first));
    }

    #[tokio::test]
    async fn test_verify_and_toggle() {
        let (_dir, store) = store().await;
        let repo = UserRepository::new(&store);
        let email = Email::parse("c@d.com").unwrap();
        let user = repo
            .create_or_get("Caio", email.clone(), Provider::Email)
            .await
            .unwrap();

        assert!(repo.verify(&email).await.unwrap().is_verified);

        let on = repo
            .toggle_favorite(&user.id, RecipeId::new("1"))
            .await
            .unwrap();
        assert!(on.contains(&RecipeId::new("1")));
        let off = repo
            .toggle_favorite(&user.id, RecipeId::new("1"))
            .await
            .unwrap();
        assert!(off.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_user_not_found() {
        let (_dir, store) = store().await;
        let repo = UserRepository::new(&store);

        let err = repo
            .verify(&Email::parse("x@y.com").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));

        let err = repo
            .toggle_favorite(&UserId::new("ghost"), RecipeId::new("1"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }
}
