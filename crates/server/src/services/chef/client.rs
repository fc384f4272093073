//! Messages API client used for chef advice.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::error::{ApiErrorResponse, ChefError};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 512;

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
    #[serde(other)]
    Other,
}

/// Client for a messages-style language model API.
#[derive(Clone)]
pub struct ModelClient {
    inner: Arc<ModelClientInner>,
}

struct ModelClientInner {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl ModelClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns `ChefError::InvalidKey` if the key contains characters that
    /// cannot go in a header, or `ChefError::Http` if the client cannot be
    /// built.
    pub fn new(api_key: &SecretString, model: &str, endpoint: &str) -> Result<Self, ChefError> {
        let mut key = HeaderValue::from_str(api_key.expose_secret())
            .map_err(|e| ChefError::InvalidKey(e.to_string()))?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("x-api-key", key);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(ModelClientInner {
                client,
                endpoint: endpoint.to_string(),
                model: model.to_string(),
            }),
        })
    }

    /// Send one user message and return the text of the reply.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API answers with an error,
    /// or the reply holds no text.
    #[instrument(skip(self, system, prompt), fields(model = %self.inner.model))]
    pub async fn complete(&self, system: &str, prompt: &str) -> Result<String, ChefError> {
        let request = MessagesRequest {
            model: &self.inner.model,
            max_tokens: MAX_TOKENS,
            system,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(handle_error_status(status, response).await);
        }

        let body = response.text().await?;
        let parsed: MessagesResponse = serde_json::from_str(&body)
            .map_err(|e| ChefError::Parse(format!("Failed to parse response: {e}")))?;

        let text: String = parsed
            .content
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("\n");

        let text = text.trim();
        if text.is_empty() {
            return Err(ChefError::EmptyAnswer);
        }
        Ok(text.to_string())
    }
}

/// Handle an error status code.
async fn handle_error_status(
    status: reqwest::StatusCode,
    response: reqwest::Response,
) -> ChefError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);
        return ChefError::RateLimited(retry_after);
    }

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return ChefError::Unauthorized("Invalid API key".to_string());
    }

    match response.text().await {
        Ok(body) => match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(api_error) => ChefError::Api {
                error_type: api_error.error.error_type,
                message: api_error.error.message,
            },
            Err(_) => ChefError::Api {
                error_type: "unknown".to_string(),
                message: body,
            },
        },
        Err(e) => ChefError::Http(e),
    }
}
