use crate::openmotics_api::types::{ApiError, OpenMoticsError, TokenResponse};
use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use std::future::Future;
use std::pin::Pin;
use tokio::sync::Mutex;

/// Tokens this close to expiry are treated as already expired
const CLOCK_OUT_OF_SYNC_MAX_SEC: i64 = 20;

/// Source of bearer tokens for API requests
///
/// This trait abstracts token acquisition so the transport does not care
/// whether the token was handed in by the caller or obtained through an
/// OAuth2 grant.
pub trait TokenProvider: Send + Sync {
    /// Return a bearer token that is valid right now
    fn access_token(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<SecretString, OpenMoticsError>> + Send + '_>>;

    /// Drop the current token after the API rejected it
    ///
    /// Returns `true` when the next [`TokenProvider::access_token`] call will
    /// obtain a different token, i.e. when retrying the request makes sense.
    fn invalidate(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>>;
}

/// OAuth2 bearer token with its absolute expiry
#[derive(Debug)]
pub struct AccessToken {
    access_token: SecretString,
    token_type: String,
    expires_at: Option<DateTime<Utc>>,
    scope: Option<String>,
}

impl AccessToken {
    /// Build a token from a token endpoint response received at `issued_at`
    ///
    /// A negative `expires_in` yields an already expired token. A lifetime
    /// too large to represent is treated as having no expiry.
    pub fn from_response(response: TokenResponse, issued_at: DateTime<Utc>) -> Self {
        let expires_at = response.expires_in.and_then(|secs| {
            Duration::try_seconds(secs.max(0))
                .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
        });

        Self {
            access_token: SecretString::from(response.access_token),
            token_type: response.token_type,
            expires_at,
            scope: response.scope,
        }
    }

    /// Check if the token has expired, allowing for clock skew
    ///
    /// Tokens without an `expires_in` never expire on their own; they are
    /// replaced when the API rejects them.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at - Duration::seconds(CLOCK_OUT_OF_SYNC_MAX_SEC) <= now,
            None => false,
        }
    }

    /// Check if the token can still be used
    pub fn is_valid(&self) -> bool {
        !self.is_expired()
    }

    /// Absolute expiry, if the token endpoint reported a lifetime
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Token type reported by the token endpoint, normally `Bearer`
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Scopes granted to the token
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// The bearer token itself
    pub fn secret(&self) -> &SecretString {
        &self.access_token
    }
}

/// A bearer token supplied by the caller
///
/// The token is never refreshed. An empty or missing token makes every
/// request fail with [`OpenMoticsError::Authentication`] before anything is
/// sent.
#[derive(Debug)]
pub struct StaticToken {
    token: Option<SecretString>,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into().trim().to_string();
        Self {
            token: if token.is_empty() {
                None
            } else {
                Some(SecretString::from(token))
            },
        }
    }

    /// A provider without any token
    pub fn empty() -> Self {
        Self { token: None }
    }
}

impl TokenProvider for StaticToken {
    fn access_token(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<SecretString, OpenMoticsError>> + Send + '_>> {
        Box::pin(async move {
            match &self.token {
                Some(token) => Ok(SecretString::from(token.expose_secret().to_string())),
                None => Err(OpenMoticsError::Authentication(
                    "no access token configured".to_string(),
                )),
            }
        })
    }

    fn invalidate(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        Box::pin(async { false })
    }
}

/// OAuth2 client-credentials grant against the OpenMotics token endpoint
///
/// The client id and secret are posted in the form body
/// (`client_secret_post`). The token is cached until it is about to expire
/// or the API rejects it.
pub struct ClientCredentials {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: SecretString,
    scope: String,
    cached: Mutex<Option<AccessToken>>,
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

impl ClientCredentials {
    /// Create a new client-credentials token provider
    ///
    /// # Arguments
    ///
    /// * `http` - HTTP client used for the token endpoint
    /// * `token_url` - Full URL of the OAuth2 token endpoint
    /// * `client_id` - OAuth2 client id
    /// * `client_secret` - OAuth2 client secret
    /// * `scope` - Space separated scopes to request
    pub fn new(
        http: reqwest::Client,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: SecretString,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            http,
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret,
            scope: scope.into(),
            cached: Mutex::new(None),
        }
    }

    /// Request a fresh token from the token endpoint and cache it
    pub async fn fetch_token(&self) -> Result<SecretString, OpenMoticsError> {
        let mut cached = self.cached.lock().await;
        let token = self.request_token().await?;
        let secret = SecretString::from(token.secret().expose_secret().to_string());
        *cached = Some(token);
        Ok(secret)
    }

    /// Expiry of the cached token, if one is cached
    pub async fn token_expires_at(&self) -> Option<DateTime<Utc>> {
        self.cached
            .lock()
            .await
            .as_ref()
            .and_then(AccessToken::expires_at)
    }

    async fn request_token(&self) -> Result<AccessToken, OpenMoticsError> {
        tracing::info!(
            "Requesting OpenMotics access token: client_id={}",
            self.client_id
        );
        tracing::debug!("Sending token request to: {}", self.token_url);

        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose_secret()),
            ("scope", self.scope.as_str()),
        ];

        let response = self
            .http
            .post(&self.token_url)
            .header("Accept", "application/json")
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send token request: {}", e);
                ApiError::from(e)
            })?;

        let status = response.status();
        tracing::debug!("Received token response with status: {}", status);

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            tracing::error!(
                "Token request failed: HTTP {} - {}",
                status.as_u16(),
                error_body
            );

            return Err(match ApiError::from_status(status.as_u16(), error_body) {
                ApiError::Unauthorized { status, message } => OpenMoticsError::Authentication(
                    format!("token endpoint rejected client credentials (HTTP {}): {}", status, message),
                ),
                other => OpenMoticsError::Api(other),
            });
        }

        let issued_at = Utc::now();
        let token_response: TokenResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse token response: {}", e);
            ApiError::Parse(format!("Failed to parse token response JSON: {}", e))
        })?;

        if token_response.access_token.trim().is_empty() {
            return Err(OpenMoticsError::Authentication(
                "token endpoint returned an empty access token".to_string(),
            ));
        }

        let token = AccessToken::from_response(token_response, issued_at);

        tracing::info!(
            "Access token obtained: expires_at={:?}",
            token.expires_at()
        );
        tracing::debug!(
            "Access token length: {}",
            token.secret().expose_secret().len()
        );

        Ok(token)
    }
}

impl TokenProvider for ClientCredentials {
    fn access_token(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<SecretString, OpenMoticsError>> + Send + '_>> {
        Box::pin(async move {
            // Held across the refresh so concurrent callers share one token request
            let mut cached = self.cached.lock().await;

            if let Some(token) = cached.as_ref().filter(|t| t.is_valid()) {
                return Ok(SecretString::from(token.secret().expose_secret().to_string()));
            }

            if cached.is_some() {
                tracing::debug!("Cached access token expired, refreshing");
            }

            let token = self.request_token().await?;
            let secret = SecretString::from(token.secret().expose_secret().to_string());
            *cached = Some(token);
            Ok(secret)
        })
    }

    fn invalidate(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        Box::pin(async move {
            tracing::debug!("Invalidating cached access token");
            *self.cached.lock().await = None;
            true
        })
    }
}
