//! Shopping list repository.

use chef_em_casa_core::{ShoppingItem, UserId};

use super::{FileStore, RepositoryError};

/// Repository for per-user shopping lists.
pub struct ShoppingRepository<'a> {
    store: &'a FileStore,
}

impl<'a> ShoppingRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a FileStore) -> Self {
        Self { store }
    }

    /// The user's list, empty if they never added anything.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` if the data file cannot be read.
    pub async fn list(&self, user_id: &UserId) -> Result<Vec<ShoppingItem>, RepositoryError> {
        self.store.read(|doc| doc.shopping_list(user_id)).await
    }

    /// Append items, stored unchecked.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` if the data file cannot be written.
    pub async fn append(
        &self,
        user_id: UserId,
        items: Vec<ShoppingItem>,
    ) -> Result<(), RepositoryError> {
        if items.is_empty() {
            return Ok(());
        }
        self.store
            .update(|doc| {
                doc.append_shopping_items(user_id, items);
                Ok(())
            })
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_append_accumulates_unchecked() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("db.json")).await.unwrap();
        let repo = ShoppingRepository::new(&store);
        let user = UserId::new("u1");

        assert!(repo.list(&user).await.unwrap().is_empty());

        let item = ShoppingItem {
            name: "Ovos".to_string(),
            amount: "2 unidades".to_string(),
            checked: true,
        };
        repo.append(user.clone(), vec![item.clone()]).await.unwrap();
        repo.append(user.clone(), vec![item]).await.unwrap();

        let list = repo.list(&user).await.unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.iter().all(|i| !i.checked));
    }
}
