//! Backend over a key-value store, for fully static deployments.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use chef_em_casa_core::{
    Document, Email, LoadStatus, Provider, Recipe, RecipeDraft, RecipeId, ShoppingItem, User,
    UserId,
};
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{Backend, BackendError};
use crate::storage::KeyValueStore;

/// Storage key holding the whole document.
pub const DOCUMENT_KEY: &str = "chefemcasa_db_v2";

/// Where an unreadable document is copied before it is replaced.
pub const CORRUPT_KEY: &str = "chefemcasa_db_v2.corrupt";

/// Keeps the whole [`Document`] under [`DOCUMENT_KEY`].
///
/// Every operation reads the whole document, mutates it, and writes the
/// whole document back. Storage calls are synchronous and small, like
/// `localStorage`; the async lock only orders whole cycles.
#[derive(Clone)]
pub struct LocalBackend {
    inner: Arc<LocalBackendInner>,
}

struct LocalBackendInner {
    storage: Arc<dyn KeyValueStore>,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl LocalBackend {
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            inner: Arc::new(LocalBackendInner {
                storage,
                write_lock: Mutex::new(()),
            }),
        }
    }

    /// Load the document, seeding or re-seeding it as needed.
    ///
    /// An unreadable value is copied to [`CORRUPT_KEY`] before the starter
    /// catalog replaces it.
    fn load(&self) -> Result<Document, BackendError> {
        let raw = self.inner.storage.get(DOCUMENT_KEY)?;
        let loaded = Document::load_or_seed(raw.as_deref());
        match &loaded.status {
            LoadStatus::Existing => {}
            LoadStatus::Seeded => debug!("Seeding local document with starter catalog"),
            LoadStatus::Reseeded { reason } => {
                if let Some(raw) = &raw {
                    self.inner.storage.set(CORRUPT_KEY, raw)?;
                }
                warn!(
                    error = %reason,
                    backup = CORRUPT_KEY,
                    "Stored document is malformed, re-seeding"
                );
            }
        }
        if loaded.needs_write() {
            self.save(&loaded.document)?;
        }
        Ok(loaded.document)
    }

    fn save(&self, document: &Document) -> Result<(), BackendError> {
        let raw = document.to_json()?;
        self.inner.storage.set(DOCUMENT_KEY, &raw)?;
        Ok(())
    }

    async fn read<T>(&self, f: impl FnOnce(&Document) -> T) -> Result<T, BackendError> {
        let _guard = self.inner.write_lock.lock().await;
        let document = self.load()?;
        Ok(f(&document))
    }

    async fn update<T>(
        &self,
        f: impl FnOnce(&mut Document) -> Result<T, BackendError>,
    ) -> Result<T, BackendError> {
        let _guard = self.inner.write_lock.lock().await;
        let mut document = self.load()?;
        let value = f(&mut document)?;
        self.save(&document)?;
        Ok(value)
    }
}

#[async_trait]
impl Backend for LocalBackend {
    async fn list_recipes(&self) -> Result<Vec<Recipe>, BackendError> {
        self.read(|doc| doc.recipes().to_vec()).await
    }

    async fn create_recipe(
        &self,
        draft: RecipeDraft,
        author_id: Option<UserId>,
    ) -> Result<Recipe, BackendError> {
        let recipe = self
            .update(|doc| Ok(doc.create_recipe(draft, author_id, Utc::now())?))
            .await?;
        debug!(recipe_id = %recipe.id, "Created recipe");
        Ok(recipe)
    }

    async fn create_or_get_user(
        &self,
        name: &str,
        email: &Email,
        provider: Provider,
    ) -> Result<User, BackendError> {
        self.update(|doc| Ok(doc.create_or_get_user(name, email.clone(), provider)))
            .await
    }

    async fn user_by_email(&self, email: &Email) -> Result<User, BackendError> {
        self.read(|doc| {
            if doc.user_by_email(email).is_none() && doc.user_with_case_variant(email).is_some() {
                debug!(email = %email, "Lookup missed a user registered with different case");
            }
            doc.user_by_email(email).cloned()
        })
        .await?
        .ok_or_else(|| BackendError::NotFound(format!("user {email}")))
    }

    async fn verify_user(&self, email: &Email) -> Result<User, BackendError> {
        self.update(|doc| Ok(doc.verify_user(email)?)).await
    }

    async fn toggle_favorite(
        &self,
        user_id: &UserId,
        recipe_id: &RecipeId,
    ) -> Result<BTreeSet<RecipeId>, BackendError> {
        self.update(|doc| Ok(doc.toggle_favorite(user_id, recipe_id.clone())?))
            .await
    }

    async fn append_shopping_items(
        &self,
        user_id: &UserId,
        items: Vec<ShoppingItem>,
    ) -> Result<(), BackendError> {
        self.update(|doc| {
            doc.append_shopping_items(user_id.clone(), items);
            Ok(())
        })
        .await
    }

    async fn shopping_list(&self, user_id: &UserId) -> Result<Vec<ShoppingItem>, BackendError> {
        self.read(|doc| doc.shopping_list(user_id)).await
    }
}
