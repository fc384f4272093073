//! Chef advice service.
//!
//! Answers "how do I..." questions about a recipe. With `CHEF_AI_API_KEY`
//! set, questions go to the language model; otherwise the keyword-based
//! scripted tips answer offline. Answers are cached for an hour per
//! (recipe title, question) pair.

pub mod client;
pub mod error;

use std::sync::Arc;
use std::time::Duration;

use chef_em_casa_core::chef::{SYSTEM_PROMPT, scripted_advice, user_prompt};
use moka::future::Cache;
use tracing::{debug, instrument};

use crate::config::ChefConfig;

pub use client::ModelClient;
pub use error::ChefError;

/// Answers cooking questions, from the model or the scripted tips.
#[derive(Clone)]
pub struct ChefService {
    inner: Arc<ChefServiceInner>,
}

struct ChefServiceInner {
    model: Option<ModelClient>,
    cache: Cache<(String, String), String>,
}

impl ChefService {
    /// Build the service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the model client cannot be created.
    pub fn new(config: &ChefConfig) -> Result<Self, ChefError> {
        let model = config
            .api_key
            .as_ref()
            .map(|key| ModelClient::new(key, &config.model, &config.endpoint))
            .transpose()?;
        Ok(Self::with_model(model))
    }

    /// A service that always answers with the scripted tips.
    #[must_use]
    pub fn scripted() -> Self {
        Self::with_model(None)
    }

    fn with_model(model: Option<ModelClient>) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(3600)) // 1 hour
            .build();

        Self {
            inner: Arc::new(ChefServiceInner { model, cache }),
        }
    }

    /// Whether answers come from the language model.
    #[must_use]
    pub fn uses_model(&self) -> bool {
        self.inner.model.is_some()
    }

    /// Answer `question` about the recipe titled `recipe_title`.
    ///
    /// # Errors
    ///
    /// Returns the model error when the language model is configured and
    /// fails. Failures are not cached.
    #[instrument(skip(self, question))]
    pub async fn advise(&self, recipe_title: &str, question: &str) -> Result<String, ChefError> {
        let key = (recipe_title.trim().to_string(), question.trim().to_string());
        if let Some(answer) = self.inner.cache.get(&key).await {
            debug!("Cache hit for chef advice");
            return Ok(answer);
        }

        let answer = match &self.inner.model {
            Some(model) => {
                model
                    .complete(SYSTEM_PROMPT, &user_prompt(&key.0, &key.1))
                    .await?
            }
            None => scripted_advice(&key.0, &key.1),
        };

        self.inner.cache.insert(key, answer.clone()).await;
        Ok(answer)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    #[tokio::test]
    async fn test_scripted_when_no_key() {
        let chef = ChefService::new(&ChefConfig::default()).unwrap();
        assert!(!chef.uses_model());

        let answer = chef.advise("Bolo", "Posso congelar?").await.unwrap();
        assert_eq!(answer, scripted_advice("Bolo", "Posso congelar?"));
    }

    #[tokio::test]
    async fn test_model_failure_is_not_cached() {
        let config = ChefConfig {
            api_key: Some(SecretString::from("sk-Zq81vT0pLmW4xR7nYc2B")),
            endpoint: "http://127.0.0.1:9/v1/messages".to_string(),
            ..ChefConfig::default()
        };
        let chef = ChefService::new(&config).unwrap();
        assert!(chef.uses_model());

        assert!(matches!(
            chef.advise("Bolo", "Forno?").await,
            Err(ChefError::Http(_))
        ));
        assert!(chef.inner.cache.get(&("Bolo".to_string(), "Forno?".to_string())).await.is_none());
    }
}
