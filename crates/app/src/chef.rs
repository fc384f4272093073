//! Chef advisors answering cooking questions about a recipe.

use std::sync::Arc;

use async_trait::async_trait;
use chef_em_casa_core::api::{ChefAdviceRequest, ChefAdviceResponse};
use chef_em_casa_core::chef::{FRIENDLY_FALLBACK, scripted_advice};
use thiserror::Error;
use tracing::instrument;

/// Errors from a [`ChefAdvisor`]. All of them are retryable.
#[derive(Debug, Error)]
pub enum ChefError {
    #[error("chef request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("chef service returned status {status}")]
    Status { status: u16 },

    #[error("malformed chef answer: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ChefError {
    /// What to show the user instead of an answer.
    #[must_use]
    pub const fn friendly_message(&self) -> &'static str {
        FRIENDLY_FALLBACK
    }
}

/// Something that can answer a question about a recipe.
#[async_trait]
pub trait ChefAdvisor: Send + Sync {
    /// # Errors
    ///
    /// Returns a [`ChefError`] if no answer could be produced.
    async fn advise(&self, recipe_title: &str, question: &str) -> Result<String, ChefError>;
}

/// Asks the server's `/api/chef/advice` endpoint.
#[derive(Clone)]
pub struct RemoteChef {
    inner: Arc<RemoteChefInner>,
}

struct RemoteChefInner {
    client: reqwest::Client,
    endpoint: String,
}

impl RemoteChef {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            inner: Arc::new(RemoteChefInner {
                client: reqwest::Client::new(),
                endpoint: format!("{}/api/chef/advice", base_url.trim_end_matches('/')),
            }),
        }
    }
}

#[async_trait]
impl ChefAdvisor for RemoteChef {
    #[instrument(skip(self, question))]
    async fn advise(&self, recipe_title: &str, question: &str) -> Result<String, ChefError> {
        let body = ChefAdviceRequest {
            recipe_title: recipe_title.to_owned(),
            question: question.to_owned(),
        };
        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChefError::Status {
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        let answer: ChefAdviceResponse = serde_json::from_str(&text)?;
        Ok(answer.answer)
    }
}

/// Offline advisor with deterministic keyword-based tips.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptedChef;

#[async_trait]
impl ChefAdvisor for ScriptedChef {
    async fn advise(&self, recipe_title: &str, question: &str) -> Result<String, ChefError> {
        Ok(scripted_advice(recipe_title, question))
    }
}
