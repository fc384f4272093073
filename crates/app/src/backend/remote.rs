//! Backend talking to the ChefEmCasa HTTP server.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use chef_em_casa_core::api::{
    FavoritesResponse, NewRecipeRequest, NewUserRequest, ShoppingItemsRequest, VerifyRequest,
};
use chef_em_casa_core::{
    Email, Provider, Recipe, RecipeDraft, RecipeId, ShoppingItem, User, UserId,
};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::{Backend, BackendError};

/// Remote backend over the server's JSON API.
#[derive(Clone)]
pub struct RemoteBackend {
    inner: Arc<RemoteBackendInner>,
}

struct RemoteBackendInner {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteBackend {
    /// Create a backend for the server at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Validation`] if `base_url` is not an absolute
    /// URL.
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a backend reusing an existing HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Validation`] if `base_url` is not an absolute
    /// URL.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, BackendError> {
        Url::parse(base_url)
            .map_err(|e| BackendError::Validation(format!("invalid base URL: {e}")))?;
        Ok(Self {
            inner: Arc::new(RemoteBackendInner {
                client,
                base_url: base_url.trim_end_matches('/').to_owned(),
            }),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Turn a non-success status into the contract's error variants.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                BackendError::Validation(message)
            }
            StatusCode::NOT_FOUND => BackendError::NotFound(message),
            _ => BackendError::Server {
                status: status.as_u16(),
                message,
            },
        })
    }

    async fn json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
        let body = Self::check(response).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl Backend for RemoteBackend {
    #[instrument(skip(self))]
    async fn list_recipes(&self) -> Result<Vec<Recipe>, BackendError> {
        let response = self
            .inner
            .client
            .get(self.url("/api/recipes"))
            .send()
            .await?;
        Self::json(response).await
    }

    #[instrument(skip(self, draft))]
    async fn create_recipe(
        &self,
        draft: RecipeDraft,
        author_id: Option<UserId>,
    ) -> Result<Recipe, BackendError> {
        // Same check the server runs, without the round trip.
        draft.validate()?;
        let body = NewRecipeRequest { draft, author_id };
        let response = self
            .inner
            .client
            .post(self.url("/api/recipes"))
            .json(&body)
            .send()
            .await?;
        Self::json(response).await
    }

    #[instrument(skip(self, name, email), fields(email = %email))]
    async fn create_or_get_user(
        &self,
        name: &str,
        email: &Email,
        provider: Provider,
    ) -> Result<User, BackendError> {
        let body = NewUserRequest {
            name: name.to_owned(),
            email: email.clone(),
            provider,
        };
        let response = self
            .inner
            .client
            .post(self.url("/api/users"))
            .json(&body)
            .send()
            .await?;
        Self::json(response).await
    }

    #[instrument(skip(self, email), fields(email = %email))]
    async fn user_by_email(&self, email: &Email) -> Result<User, BackendError> {
        let path = format!("/api/users/{}", urlencoding::encode(email.as_str()));
        let response = self.inner.client.get(self.url(&path)).send().await?;
        Self::json(response).await
    }

    #[instrument(skip(self, email), fields(email = %email))]
    async fn verify_user(&self, email: &Email) -> Result<User, BackendError> {
        let body = VerifyRequest {
            email: email.clone(),
        };
        let response = self
            .inner
            .client
            .post(self.url("/api/users/verify"))
            .json(&body)
            .send()
            .await?;
        Self::json(response).await
    }

    #[instrument(skip(self))]
    async fn toggle_favorite(
        &self,
        user_id: &UserId,
        recipe_id: &RecipeId,
    ) -> Result<BTreeSet<RecipeId>, BackendError> {
        let path = format!(
            "/api/favorites/{}/{}",
            urlencoding::encode(user_id.as_str()),
            urlencoding::encode(recipe_id.as_str())
        );
        let response = self.inner.client.post(self.url(&path)).send().await?;
        let body: FavoritesResponse = Self::json(response).await?;
        Ok(body.favorites)
    }

    #[instrument(skip(self, items), fields(count = items.len()))]
    async fn append_shopping_items(
        &self,
        user_id: &UserId,
        items: Vec<ShoppingItem>,
    ) -> Result<(), BackendError> {
        let path = format!(
            "/api/shopping-lists/{}",
            urlencoding::encode(user_id.as_str())
        );
        let response = self
            .inner
            .client
            .post(self.url(&path))
            .json(&ShoppingItemsRequest { items })
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn shopping_list(&self, user_id: &UserId) -> Result<Vec<ShoppingItem>, BackendError> {
        let path = format!(
            "/api/shopping-lists/{}",
            urlencoding::encode(user_id.as_str())
        );
        let response = self.inner.client.get(self.url(&path)).send().await?;
        Self::json(response).await
    }
}
