//! Failures while asking the language model for cooking advice.
//!
//! None of these reach the cook verbatim: the HTTP layer answers with the
//! friendly "chef is busy" message and logs the detail.

use thiserror::Error;

/// Why the model could not answer a cooking question.
#[derive(Debug, Error)]
pub enum ChefError {
    /// The model endpoint could not be reached.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// `CHEF_AI_API_KEY` holds bytes that are not valid in a header.
    #[error("invalid API key: {0}")]
    InvalidKey(String),

    /// The model refused the request (bad prompt, overloaded, ...).
    #[error("API error ({error_type}): {message}")]
    Api { error_type: String, message: String },

    /// Too many questions; seconds until the model accepts more.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The configured key was rejected.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The reply was not a messages response.
    #[error("parse error: {0}")]
    Parse(String),

    /// The model replied without any tip text.
    #[error("empty answer")]
    EmptyAnswer,
}

/// Error body returned by the messages endpoint.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    #[serde(rename = "type")]
    pub error_type: String,
    pub error: ApiError,
}

#[derive(Debug, serde::Deserialize)]
pub struct ApiError {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
}
