use crate::openmotics_api::types::OpenMoticsError;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Default cloud API root (version included)
pub const CLOUD_BASE_URL: &str = "https://cloud.openmotics.com/api/v1.1";

/// Token endpoint path relative to the API root
pub const OAUTH2_TOKEN_PATH: &str = "/authentication/oauth2/token";

/// Scopes requested by the client-credentials grant
pub const CLOUD_SCOPE: &str = "control view configure";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(8);
const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_millis(500);
const DEFAULT_RETRY_MAX_DELAY: Duration = Duration::from_secs(10);

/// Client configuration
///
/// Build it with [`ClientConfig::new`] and the `with_*` setters, from
/// `OPENMOTICS_*` environment variables with [`ClientConfig::from_env`], or
/// from the `[openmotics]` table of a TOML file with
/// [`ClientConfig::from_file`].
///
/// Credentials are either a `client_id`/`client_secret` pair (OAuth2 client
/// credentials, refreshed automatically) or a pre-issued bearer `token`.
pub struct ClientConfig {
    pub base_url: String,
    pub token_url: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<SecretString>,
    pub token: Option<SecretString>,
    pub scope: String,
    pub installation_id: Option<i64>,
    pub request_timeout: Duration,
    pub max_attempts: u32,
    pub retry_base_delay: Duration,
    pub retry_max_delay: Duration,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[REDACTED]"))
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("scope", &self.scope)
            .field("installation_id", &self.installation_id)
            .field("request_timeout", &self.request_timeout)
            .field("max_attempts", &self.max_attempts)
            .field("retry_base_delay", &self.retry_base_delay)
            .field("retry_max_delay", &self.retry_max_delay)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: CLOUD_BASE_URL.to_string(),
            token_url: None,
            client_id: None,
            client_secret: None,
            token: None,
            scope: CLOUD_SCOPE.to_string(),
            installation_id: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_base_delay: DEFAULT_RETRY_BASE_DELAY,
            retry_max_delay: DEFAULT_RETRY_MAX_DELAY,
        }
    }
}

/// On-disk shape of the `[openmotics]` table
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    base_url: Option<String>,
    token_url: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    token: Option<String>,
    scope: Option<String>,
    installation_id: Option<i64>,
    request_timeout_secs: Option<u64>,
    max_attempts: Option<u32>,
    retry_base_delay_ms: Option<u64>,
    retry_max_delay_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    openmotics: RawConfig,
}

impl ClientConfig {
    /// Create a configuration pointing at the public cloud with no credentials
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the API root (e.g. a mock server in tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the token endpoint; defaults to `{base_url}/authentication/oauth2/token`
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = Some(token_url.into());
        self
    }

    /// Use the OAuth2 client-credentials grant
    pub fn with_client_credentials(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.client_id = Some(client_id.into());
        self.client_secret = Some(SecretString::from(client_secret.into()));
        self
    }

    /// Use a pre-issued bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn with_installation_id(mut self, installation_id: i64) -> Self {
        self.installation_id = Some(installation_id);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Configure the retry policy for transient failures
    ///
    /// `max_attempts` counts the first request, so `1` disables retries.
    pub fn with_retry(mut self, max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        self.max_attempts = max_attempts;
        self.retry_base_delay = base_delay;
        self.retry_max_delay = max_delay;
        self
    }

    /// Effective token endpoint URL
    pub fn token_url(&self) -> String {
        match &self.token_url {
            Some(url) => url.clone(),
            None => format!("{}{}", self.base_url, OAUTH2_TOKEN_PATH),
        }
    }

    /// Load configuration from `OPENMOTICS_*` environment variables
    ///
    /// Unset variables keep their defaults. Recognised variables:
    /// `OPENMOTICS_BASE_URL`, `OPENMOTICS_TOKEN_URL`, `OPENMOTICS_CLIENT_ID`,
    /// `OPENMOTICS_CLIENT_SECRET`, `OPENMOTICS_TOKEN`, `OPENMOTICS_SCOPE`,
    /// `OPENMOTICS_INSTALLATION_ID` and `OPENMOTICS_REQUEST_TIMEOUT` (seconds).
    pub fn from_env() -> Result<Self, OpenMoticsError> {
        let raw = RawConfig {
            base_url: env_var("OPENMOTICS_BASE_URL"),
            token_url: env_var("OPENMOTICS_TOKEN_URL"),
            client_id: env_var("OPENMOTICS_CLIENT_ID"),
            client_secret: env_var("OPENMOTICS_CLIENT_SECRET"),
            token: env_var("OPENMOTICS_TOKEN"),
            scope: env_var("OPENMOTICS_SCOPE"),
            installation_id: env_parse("OPENMOTICS_INSTALLATION_ID")?,
            request_timeout_secs: env_parse("OPENMOTICS_REQUEST_TIMEOUT")?,
            ..RawConfig::default()
        };

        tracing::debug!(
            "Loaded OpenMotics configuration from environment (client_id set: {}, token set: {})",
            raw.client_id.is_some(),
            raw.token.is_some()
        );

        Self::from_raw(raw)
    }

    /// Parse the `[openmotics]` table of a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, OpenMoticsError> {
        let file: ConfigFile = toml::from_str(content)
            .map_err(|e| OpenMoticsError::Config(format!("Invalid TOML configuration: {}", e)))?;
        Self::from_raw(file.openmotics)
    }

    /// Read and parse a TOML configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, OpenMoticsError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            OpenMoticsError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        tracing::debug!("Loaded OpenMotics configuration from {}", path.display());
        Self::from_toml_str(&content)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, OpenMoticsError> {
        let mut config = Self::default();

        if let Some(base_url) = raw.base_url {
            config = config.with_base_url(base_url);
        }
        config.token_url = raw.token_url;
        config.client_id = raw.client_id;
        config.client_secret = raw.client_secret.map(SecretString::from);
        config.token = raw.token.map(SecretString::from);
        if let Some(scope) = raw.scope {
            config.scope = scope;
        }
        config.installation_id = raw.installation_id;
        if let Some(secs) = raw.request_timeout_secs {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(attempts) = raw.max_attempts {
            config.max_attempts = attempts;
        }
        if let Some(ms) = raw.retry_base_delay_ms {
            config.retry_base_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = raw.retry_max_delay_ms {
            config.retry_max_delay = Duration::from_millis(ms);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check invariants the client relies on
    pub fn validate(&self) -> Result<(), OpenMoticsError> {
        url::Url::parse(&self.base_url).map_err(|e| {
            OpenMoticsError::Config(format!("Invalid base URL '{}': {}", self.base_url, e))
        })?;

        if let Some(token_url) = &self.token_url {
            url::Url::parse(token_url).map_err(|e| {
                OpenMoticsError::Config(format!("Invalid token URL '{}': {}", token_url, e))
            })?;
        }

        if self.max_attempts == 0 {
            return Err(OpenMoticsError::Config(
                "max_attempts must be at least 1".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(OpenMoticsError::Config(
                "request_timeout must be greater than zero".to_string(),
            ));
        }

        if self.retry_base_delay > self.retry_max_delay {
            return Err(OpenMoticsError::Config(format!(
                "retry_base_delay ({:?}) cannot be greater than retry_max_delay ({:?})",
                self.retry_base_delay, self.retry_max_delay
            )));
        }

        match (&self.client_id, &self.client_secret) {
            (Some(_), None) => Err(OpenMoticsError::Config(
                "client_id is set but client_secret is missing".to_string(),
            )),
            (None, Some(_)) => Err(OpenMoticsError::Config(
                "client_secret is set but client_id is missing".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Whether the client-credentials grant is configured
    pub fn has_client_credentials(&self) -> bool {
        self.client_id.is_some()
            && self
                .client_secret
                .as_ref()
                .is_some_and(|s| !s.expose_secret().is_empty())
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T>(name: &str) -> Result<Option<T>, OpenMoticsError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match env_var(name) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| OpenMoticsError::Config(format!("Invalid {}: {}", name, e))),
        None => Ok(None),
    }
}
