//! Google sign-in (OAuth 2.0 authorization code flow).
//!
//! Only the profile is used: the server never keeps Google tokens. A
//! successful sign-in becomes `createOrGet(name, email, google)`.

use std::sync::Arc;

use chef_em_casa_core::{Email, EmailError};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use crate::config::GoogleConfig;

/// Errors from the Google sign-in exchange.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OAuth error: {0}")]
    OAuth(String),

    #[error("Google account has no usable email: {0}")]
    InvalidEmail(#[from] EmailError),
}

/// Google endpoints; overridable for tests.
#[derive(Debug, Clone)]
pub struct GoogleEndpoints {
    pub authorize: String,
    pub token: String,
    pub userinfo: String,
}

impl Default for GoogleEndpoints {
    fn default() -> Self {
        Self {
            authorize: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token: "https://oauth2.googleapis.com/token".to_string(),
            userinfo: "https://openidconnect.googleapis.com/v1/userinfo".to_string(),
        }
    }
}

/// The parts of the Google profile a user record needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleProfile {
    pub name: String,
    pub email: Email,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// Client for Google's OAuth endpoints.
#[derive(Clone)]
pub struct GoogleClient {
    inner: Arc<GoogleClientInner>,
}

struct GoogleClientInner {
    client: reqwest::Client,
    client_id: String,
    client_secret: SecretString,
    endpoints: GoogleEndpoints,
}

impl GoogleClient {
    #[must_use]
    pub fn new(config: &GoogleConfig) -> Self {
        Self::with_endpoints(config, GoogleEndpoints::default())
    }

    #[must_use]
    pub fn with_endpoints(config: &GoogleConfig, endpoints: GoogleEndpoints) -> Self {
        Self {
            inner: Arc::new(GoogleClientInner {
                client: reqwest::Client::new(),
                client_id: config.client_id.clone(),
                client_secret: config.client_secret.clone(),
                endpoints,
            }),
        }
    }

    /// Generate the authorization URL to redirect the user to.
    #[must_use]
    pub fn authorization_url(&self, redirect_uri: &str, state: &str) -> String {
        format!(
            "{}?\
            client_id={}&\
            response_type=code&\
            redirect_uri={}&\
            scope=openid%20email%20profile&\
            state={}",
            self.inner.endpoints.authorize,
            urlencoding::encode(&self.inner.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(state)
        )
    }

    /// Exchange an authorization code and fetch the user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if either request fails or the profile has no valid
    /// email.
    #[instrument(skip(self, code))]
    pub async fn sign_in(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<GoogleProfile, IdentityError> {
        let access_token = self.exchange_code(code, redirect_uri).await?;
        self.fetch_profile(&access_token).await
    }

    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<String, IdentityError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", &self.inner.client_id),
            ("client_secret", self.inner.client_secret.expose_secret()),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ];

        let response = self
            .inner
            .client
            .post(&self.inner.endpoints.token)
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(IdentityError::OAuth(format!(
                "Token exchange failed: {text}"
            )));
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<GoogleProfile, IdentityError> {
        let response = self
            .inner
            .client
            .get(&self.inner.endpoints.userinfo)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(IdentityError::OAuth(format!(
                "Profile request failed with status {}",
                response.status()
            )));
        }

        let info: UserInfo = response.json().await?;
        let email = Email::parse(info.email.as_deref().unwrap_or_default())?;
        let name = info
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| email.as_str().split('@').next().unwrap_or_default().to_string());

        Ok(GoogleProfile { name, email })
    }
}
