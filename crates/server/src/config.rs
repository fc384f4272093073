//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CHEF_HOST` - Bind address (default: 127.0.0.1)
//! - `CHEF_PORT` - Listen port (default: 3001)
//! - `CHEF_DATA_FILE` - Path of the JSON document (default: database.json)
//! - `CHEF_BASE_URL` - Public URL, used for OAuth redirects (default: <http://localhost:3001>)
//! - `GOOGLE_CLIENT_ID` / `GOOGLE_CLIENT_SECRET` - Enable Google sign-in (both or neither)
//! - `CHEF_AI_API_KEY` - Enable language-model chef advice
//! - `CHEF_AI_MODEL` - Model name (default: claude-sonnet-4-20250514)
//! - `CHEF_AI_ENDPOINT` - Messages API endpoint
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

const DEFAULT_AI_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_AI_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// JSON document holding users, recipes and shopping lists
    pub data_file: PathBuf,
    /// Public base URL, without a trailing slash
    pub base_url: String,
    /// Google sign-in, if configured
    pub google: Option<GoogleConfig>,
    /// Chef advice model settings
    pub chef: ChefConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Google OAuth client credentials.
///
/// Implements `Debug` manually to redact the secret.
#[derive(Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: SecretString,
}

impl std::fmt::Debug for GoogleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Chef advice settings. Without an API key the scripted tips are used.
#[derive(Clone)]
pub struct ChefConfig {
    pub api_key: Option<SecretString>,
    pub model: String,
    pub endpoint: String,
}

impl std::fmt::Debug for ChefConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChefConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl Default for ChefConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_AI_MODEL.to_string(),
            endpoint: DEFAULT_AI_ENDPOINT.to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is invalid or a secret fails
    /// validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// See [`ServerConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let host = env
            .or_default("CHEF_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("CHEF_HOST".to_string(), e.to_string()))?;
        let port = env
            .or_default("CHEF_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("CHEF_PORT".to_string(), e.to_string()))?;
        let data_file = PathBuf::from(env.or_default("CHEF_DATA_FILE", "database.json"));
        let base_url = parse_base_url(&env.or_default("CHEF_BASE_URL", "http://localhost:3001"))?;

        let google = match (
            env.optional("GOOGLE_CLIENT_ID"),
            env.optional("GOOGLE_CLIENT_SECRET"),
        ) {
            (Some(client_id), Some(secret)) => Some(GoogleConfig {
                client_id,
                client_secret: validated_secret(secret, "GOOGLE_CLIENT_SECRET")?,
            }),
            (None, None) => None,
            (Some(_), None) => {
                return Err(ConfigError::MissingEnvVar("GOOGLE_CLIENT_SECRET".to_string()));
            }
            (None, Some(_)) => {
                return Err(ConfigError::MissingEnvVar("GOOGLE_CLIENT_ID".to_string()));
            }
        };

        let chef = ChefConfig {
            api_key: env
                .optional("CHEF_AI_API_KEY")
                .map(|key| validated_secret(key, "CHEF_AI_API_KEY"))
                .transpose()?,
            model: env.or_default("CHEF_AI_MODEL", DEFAULT_AI_MODEL),
            endpoint: env.or_default("CHEF_AI_ENDPOINT", DEFAULT_AI_ENDPOINT),
        };

        Ok(Self {
            host,
            port,
            data_file,
            base_url,
            google,
            chef,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Defaults with the given data file: loopback, no Google, scripted chef.
    #[must_use]
    pub fn local(data_file: impl Into<PathBuf>) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3001,
            data_file: data_file.into(),
            base_url: "http://localhost:3001".to_string(),
            google: None,
            chef: ChefConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Where Google sends the user back to.
    #[must_use]
    pub fn google_redirect_uri(&self) -> String {
        format!("{}/auth/google/callback", self.base_url)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get an optional variable. Empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar("CHEF_BASE_URL".to_string(), e.to_string()))?;
    Ok(raw.trim_end_matches('/').to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the real credential."
            ),
        ));
    }

    Ok(())
}

fn validated_secret(value: String, key: &str) -> Result<SecretString, ConfigError> {
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    const STRONG: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6";

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3001");
        assert_eq!(config.data_file, PathBuf::from("database.json"));
        assert_eq!(config.base_url, "http://localhost:3001");
        assert!(config.google.is_none());
        assert!(config.chef.api_key.is_none());
        assert_eq!(config.chef.model, DEFAULT_AI_MODEL);
    }

    #[test]
    fn test_invalid_port() {
        let err = ServerConfig::from_lookup(lookup(&[("CHEF_PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(var, _) if var == "CHEF_PORT"));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config =
            ServerConfig::from_lookup(lookup(&[("CHEF_BASE_URL", "https://chef.test/")])).unwrap();
        assert_eq!(config.google_redirect_uri(), "https://chef.test/auth/google/callback");

        let err = ServerConfig::from_lookup(lookup(&[("CHEF_BASE_URL", "chef.test")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_google_needs_both_halves() {
        let err =
            ServerConfig::from_lookup(lookup(&[("GOOGLE_CLIENT_ID", "client")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(var) if var == "GOOGLE_CLIENT_SECRET"));

        let config = ServerConfig::from_lookup(lookup(&[
            ("GOOGLE_CLIENT_ID", "client"),
            ("GOOGLE_CLIENT_SECRET", STRONG),
        ]))
        .unwrap();
        let google = config.google.unwrap();
        assert_eq!(google.client_secret.expose_secret(), STRONG);
    }

    #[test]
    fn test_placeholder_api_key_rejected() {
        let err = ServerConfig::from_lookup(lookup(&[("CHEF_AI_API_KEY", "your-api-key-here")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_shannon_entropy() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("ab") - 1.0).abs() < 0.01);
        assert!(shannon_entropy("aB3$xY9!mK2@nL5#") > 3.3);
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
        assert!(validate_secret_strength(STRONG, "TEST_VAR").is_ok());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("GOOGLE_CLIENT_ID", "client_id_value"),
            ("GOOGLE_CLIENT_SECRET", STRONG),
            ("CHEF_AI_API_KEY", "sk-Zq81vT0pLmW4xR7nYc2B"),
        ]))
        .unwrap();

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("client_id_value"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains(STRONG));
        assert!(!debug_output.contains("sk-Zq81vT0pLmW4xR7nYc2B"));
    }
}
