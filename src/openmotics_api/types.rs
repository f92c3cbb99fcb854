use serde::{Deserialize, Serialize};
use std::fmt;

/// OpenMotics client error type
///
/// Represents all possible errors that can occur when interacting with
/// the OpenMotics cloud API.
#[derive(Debug)]
pub enum OpenMoticsError {
    /// No usable credentials, or the API rejected them (HTTP 401/403)
    Authentication(String),
    /// API request failed (network, HTTP, or response parsing error)
    Api(ApiError),
    /// Configuration error
    Config(String),
    /// An argument was outside the range the API accepts
    InvalidArgument(String),
}

impl OpenMoticsError {
    /// Whether this error came from the API rejecting the bearer token
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            OpenMoticsError::Authentication(_) | OpenMoticsError::Api(ApiError::Unauthorized { .. })
        )
    }
}

impl fmt::Display for OpenMoticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpenMoticsError::Authentication(msg) => write!(f, "Authentication failed: {}", msg),
            OpenMoticsError::Api(err) => write!(f, "API error: {}", err),
            OpenMoticsError::Config(msg) => write!(f, "Configuration error: {}", msg),
            OpenMoticsError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for OpenMoticsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OpenMoticsError::Api(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ApiError> for OpenMoticsError {
    fn from(err: ApiError) -> Self {
        OpenMoticsError::Api(err)
    }
}

impl From<reqwest::Error> for OpenMoticsError {
    fn from(err: reqwest::Error) -> Self {
        OpenMoticsError::Api(ApiError::from(err))
    }
}

/// API-specific errors, classified by what the caller can do about them
#[derive(Debug)]
pub enum ApiError {
    /// Network error (connection refused, DNS, reset, ...)
    Network(String),
    /// The request did not complete within the configured timeout
    Timeout,
    /// HTTP 401 or 403
    Unauthorized { status: u16, message: String },
    /// HTTP 429
    TooManyRequests(String),
    /// Any other 4xx response
    BadRequest { status: u16, message: String },
    /// Any 5xx response
    Server { status: u16, message: String },
    /// Any other non-2xx response
    Http { status: u16, message: String },
    /// Failed to parse response
    Parse(String),
    /// Request building failed
    Request(String),
}

impl ApiError {
    /// Classify a non-success HTTP status together with its response body
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => ApiError::Unauthorized { status, message },
            429 => ApiError::TooManyRequests(message),
            400..=499 => ApiError::BadRequest { status, message },
            500..=599 => ApiError::Server { status, message },
            _ => ApiError::Http { status, message },
        }
    }

    /// HTTP status code, if the error came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { status, .. }
            | ApiError::BadRequest { status, .. }
            | ApiError::Server { status, .. }
            | ApiError::Http { status, .. } => Some(*status),
            ApiError::TooManyRequests(_) => Some(429),
            _ => None,
        }
    }

    /// Transient failures worth another attempt with backoff
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApiError::Network(_) | ApiError::Timeout | ApiError::Server { .. }
        )
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "Network error: {}", msg),
            ApiError::Timeout => write!(f, "Timeout occurred while connecting to OpenMotics API"),
            ApiError::Unauthorized { status, message } => {
                write!(f, "HTTP {} unauthorized: {}", status, message)
            }
            ApiError::TooManyRequests(msg) => {
                write!(f, "HTTP 429 too many requests: {}", msg)
            }
            ApiError::BadRequest { status, message } => {
                write!(f, "HTTP {} client error: {}", status, message)
            }
            ApiError::Server { status, message } => {
                write!(f, "HTTP {} server error: {}", status, message)
            }
            ApiError::Http { status, message } => {
                write!(f, "HTTP {} error: {}", status, message)
            }
            ApiError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ApiError::Request(msg) => write!(f, "Request error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::Network(format!("Connection failed: {}", err))
        } else if let Some(status) = err.status() {
            ApiError::from_status(status.as_u16(), err.to_string())
        } else if err.is_builder() {
            ApiError::Request(err.to_string())
        } else if err.is_decode() {
            ApiError::Parse(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Response body of the OAuth2 token endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub scope: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}
