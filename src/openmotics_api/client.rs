use crate::openmotics_api::auth::{ClientCredentials, StaticToken, TokenProvider};
use crate::openmotics_api::config::ClientConfig;
use crate::openmotics_api::groupactions::GroupActions;
use crate::openmotics_api::inputs::Inputs;
use crate::openmotics_api::installations::Installations;
use crate::openmotics_api::lights::Lights;
use crate::openmotics_api::outputs::Outputs;
use crate::openmotics_api::resources::ResourceResponse;
use crate::openmotics_api::sensors::Sensors;
use crate::openmotics_api::shutters::Shutters;
use crate::openmotics_api::thermostats::Thermostats;
use crate::openmotics_api::types::{ApiError, OpenMoticsError};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Query parameters for a request
pub type Query<'a> = [(&'a str, String)];

/// Exponential backoff for transient failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Delay to wait after the given (1-based) failed attempt
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

/// HTTP client for the OpenMotics cloud API
///
/// Every request carries a bearer token from the configured
/// [`TokenProvider`]. Transient failures (network errors, timeouts and 5xx
/// responses) are retried with exponential backoff; a 401/403 response makes
/// the client drop its token and retry once with a fresh one.
///
/// Resource-specific operations live on the accessors returned by
/// [`OpenMoticsClient::installations`], [`OpenMoticsClient::outputs`] and
/// friends.
#[derive(Clone)]
pub struct OpenMoticsClient {
    /// API root including the version, e.g. `https://cloud.openmotics.com/api/v1.1`
    base_url: String,
    /// HTTP client for making requests
    client: reqwest::Client,
    tokens: Arc<dyn TokenProvider>,
    installation_id: Option<i64>,
    retry: RetryPolicy,
}

impl fmt::Debug for OpenMoticsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenMoticsClient")
            .field("base_url", &self.base_url)
            .field("installation_id", &self.installation_id)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl OpenMoticsClient {
    /// Create a new OpenMotics client from a configuration
    ///
    /// With a `client_id`/`client_secret` pair the client uses the OAuth2
    /// client-credentials grant and refreshes tokens itself. Otherwise it
    /// uses the configured bearer token; without one, every request fails
    /// with [`OpenMoticsError::Authentication`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// use openmotics_sdk::{ClientConfig, OpenMoticsClient};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = ClientConfig::new().with_client_credentials("my-client-id", "my-secret");
    /// let mut client = OpenMoticsClient::new(config)?;
    ///
    /// let installations = client.installations().get_all(None).await?;
    /// client.set_installation_id(installations[0].id);
    ///
    /// for output in client.outputs().get_all(None).await? {
    ///     println!("{} is {}", output, if output.is_on() { "on" } else { "off" });
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: ClientConfig) -> Result<Self, OpenMoticsError> {
        config.validate()?;
        let http = build_http_client(&config)?;

        let tokens: Arc<dyn TokenProvider> = match (&config.client_id, &config.client_secret) {
            (Some(client_id), Some(client_secret)) if config.has_client_credentials() => {
                tracing::debug!("Using OAuth2 client credentials for client_id={}", client_id);
                Arc::new(ClientCredentials::new(
                    http.clone(),
                    config.token_url(),
                    client_id.clone(),
                    SecretString::from(client_secret.expose_secret().to_string()),
                    config.scope.clone(),
                ))
            }
            _ => match &config.token {
                Some(token) => Arc::new(StaticToken::new(token.expose_secret())),
                None => {
                    tracing::warn!("No OpenMotics credentials configured; requests will fail");
                    Arc::new(StaticToken::empty())
                }
            },
        };

        Ok(Self::from_parts(config, http, tokens))
    }

    /// Create a client for the public cloud using a pre-issued bearer token
    pub fn with_token(token: impl Into<String>) -> Result<Self, OpenMoticsError> {
        Self::new(ClientConfig::new().with_token(token))
    }

    /// Create a client for the public cloud using the client-credentials grant
    pub fn with_client_credentials(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, OpenMoticsError> {
        Self::new(ClientConfig::new().with_client_credentials(client_id, client_secret))
    }

    /// Create a client with a custom token provider
    ///
    /// Credentials in `config` are ignored.
    pub fn with_token_provider(
        config: ClientConfig,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self, OpenMoticsError> {
        config.validate()?;
        let http = build_http_client(&config)?;
        Ok(Self::from_parts(config, http, tokens))
    }

    fn from_parts(config: ClientConfig, client: reqwest::Client, tokens: Arc<dyn TokenProvider>) -> Self {
        tracing::debug!("Creating OpenMoticsClient with base URL: {}", config.base_url);

        Self {
            base_url: config.base_url,
            client,
            tokens,
            installation_id: config.installation_id,
            retry: RetryPolicy {
                max_attempts: config.max_attempts,
                base_delay: config.retry_base_delay,
                max_delay: config.retry_max_delay,
            },
        }
    }

    /// Get the base URL for this client
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Installation that installation-scoped accessors operate on
    pub fn installation_id(&self) -> Option<i64> {
        self.installation_id
    }

    /// Select the installation used by installation-scoped accessors
    pub fn set_installation_id(&mut self, installation_id: i64) {
        tracing::debug!("Selecting installation {}", installation_id);
        self.installation_id = Some(installation_id);
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    pub fn installations(&self) -> Installations<'_> {
        Installations::new(self)
    }

    pub fn inputs(&self) -> Inputs<'_> {
        Inputs::new(self)
    }

    pub fn outputs(&self) -> Outputs<'_> {
        Outputs::new(self)
    }

    pub fn lights(&self) -> Lights<'_> {
        Lights::new(self)
    }

    pub fn sensors(&self) -> Sensors<'_> {
        Sensors::new(self)
    }

    pub fn groupactions(&self) -> GroupActions<'_> {
        GroupActions::new(self)
    }

    pub fn shutters(&self) -> Shutters<'_> {
        Shutters::new(self)
    }

    pub fn thermostats(&self) -> Thermostats<'_> {
        Thermostats::new(self)
    }

    /// Path prefix for the selected installation
    pub(crate) fn installation_path(&self, suffix: &str) -> Result<String, OpenMoticsError> {
        let installation_id = self.installation_id.ok_or_else(|| {
            OpenMoticsError::Config(
                "no installation selected; call set_installation_id first".to_string(),
            )
        })?;
        Ok(format!("/base/installations/{}{}", installation_id, suffix))
    }

    /// List a collection of the selected installation, e.g. `/outputs`
    pub(crate) async fn list_resources<T: DeserializeOwned>(
        &self,
        collection: &str,
        filter: Option<&str>,
    ) -> Result<Vec<T>, OpenMoticsError> {
        let path = self.installation_path(collection)?;
        tracing::debug!("Listing {}", path);

        let response: ResourceResponse<Vec<T>> = self.get(&path, &filter_query(filter)).await?;
        Ok(response.data)
    }

    /// Get one item of a collection of the selected installation
    pub(crate) async fn get_resource<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: i64,
    ) -> Result<T, OpenMoticsError> {
        let path = self.installation_path(&format!("{}/{}", collection, id))?;
        tracing::debug!("Getting {}", path);

        let response: ResourceResponse<T> = self.get(&path, &[]).await?;
        Ok(response.data)
    }

    /// POST `{collection}/{id}/{action}` for the selected installation
    pub(crate) async fn resource_action(
        &self,
        collection: &str,
        id: i64,
        action: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value, OpenMoticsError> {
        let path = self.installation_path(&format!("{}/{}/{}", collection, id, action))?;
        tracing::info!("Executing {} on {}", action, path);

        self.post_value(&path, body).await
    }

    /// Perform a GET request and deserialize the JSON body
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query<'_>,
    ) -> Result<T, OpenMoticsError> {
        let value = self.get_value(path, query).await?;
        decode(path, value)
    }

    /// Perform a POST request with an optional JSON body and deserialize the response
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<T, OpenMoticsError> {
        let value = self.post_value(path, body).await?;
        decode(path, value)
    }

    /// Perform a GET request and return the raw body
    ///
    /// JSON bodies are parsed; any other content type is returned as
    /// [`serde_json::Value::String`], and an empty body as `Null`.
    pub async fn get_value(
        &self,
        path: &str,
        query: &Query<'_>,
    ) -> Result<serde_json::Value, OpenMoticsError> {
        self.request(Method::GET, path, query, None).await
    }

    /// Perform a POST request and return the raw body
    pub async fn post_value(
        &self,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value, OpenMoticsError> {
        self.request(Method::POST, path, &[], body).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &Query<'_>,
        body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value, OpenMoticsError> {
        let url = self.url(path);
        let mut attempt = 1;
        let mut token_refreshed = false;

        loop {
            let token = match self.tokens.access_token().await {
                Ok(token) => token,
                Err(OpenMoticsError::Api(err))
                    if err.is_retryable() && attempt < self.retry.max_attempts =>
                {
                    let delay = self.retry.delay_for(attempt);
                    tracing::warn!(
                        "Access token request failed (attempt {}/{}): {}; retrying in {:?}",
                        attempt,
                        self.retry.max_attempts,
                        err,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    continue;
                }
                Err(err) => return Err(err),
            };

            match self.send_once(&method, &url, query, body, &token).await {
                Ok(value) => return Ok(value),
                Err(ApiError::Unauthorized { status, message }) => {
                    if !token_refreshed && self.tokens.invalidate().await {
                        tracing::warn!(
                            "{} {} rejected the access token (HTTP {}), retrying with a fresh token",
                            method,
                            url,
                            status
                        );
                        token_refreshed = true;
                        continue;
                    }

                    tracing::error!("{} {} unauthorized: HTTP {} - {}", method, url, status, message);
                    return Err(OpenMoticsError::Authentication(format!(
                        "access token is invalid or expired (HTTP {}): {}",
                        status, message
                    )));
                }
                Err(err) if err.is_retryable() && attempt < self.retry.max_attempts => {
                    let delay = self.retry.delay_for(attempt);
                    tracing::warn!(
                        "{} {} failed (attempt {}/{}): {}; retrying in {:?}",
                        method,
                        url,
                        attempt,
                        self.retry.max_attempts,
                        err,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    tracing::error!("{} {} failed: {}", method, url, err);
                    return Err(OpenMoticsError::Api(err));
                }
            }
        }
    }

    async fn send_once(
        &self,
        method: &Method,
        url: &str,
        query: &Query<'_>,
        body: Option<&serde_json::Value>,
        token: &SecretString,
    ) -> Result<serde_json::Value, ApiError> {
        tracing::debug!("Sending {} request to: {}", method, url);

        let mut request = self
            .client
            .request(method.clone(), url)
            .bearer_auth(token.expose_secret())
            .header(ACCEPT, "application/json");

        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(ApiError::from)?;

        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));

        let text = response.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            ApiError::from(e)
        })?;

        tracing::debug!("Request with status={}, body={}", status, text);

        if !status.is_success() {
            return Err(ApiError::from_status(status.as_u16(), text));
        }

        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }

        if is_json {
            serde_json::from_str(&text)
                .map_err(|e| ApiError::Parse(format!("Failed to parse response JSON: {}", e)))
        } else {
            Ok(serde_json::Value::String(text))
        }
    }
}

fn build_http_client(config: &ClientConfig) -> Result<reqwest::Client, OpenMoticsError> {
    reqwest::Client::builder()
        .timeout(config.request_timeout)
        .user_agent(concat!("openmotics-sdk/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| OpenMoticsError::Config(format!("Failed to build HTTP client: {}", e)))
}

fn decode<T: DeserializeOwned>(path: &str, value: serde_json::Value) -> Result<T, OpenMoticsError> {
    serde_json::from_value(value).map_err(|e| {
        tracing::error!("Failed to parse response from {}: {}", path, e);
        OpenMoticsError::Api(ApiError::Parse(format!("Failed to parse response: {}", e)))
    })
}

/// `filter` query parameter shared by the list endpoints
pub(crate) fn filter_query(filter: Option<&str>) -> Vec<(&'static str, String)> {
    filter
        .map(|f| vec![("filter", f.to_string())])
        .unwrap_or_default()
}
