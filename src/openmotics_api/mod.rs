/// OpenMotics cloud API integration module
///
/// ## Request Flow
///
/// 1. The client asks its token provider for a bearer token (fetching one
///    through the OAuth2 client-credentials grant when needed)
/// 2. The request is sent with the token in the `Authorization` header
/// 3. Network errors, timeouts and 5xx responses are retried with backoff
/// 4. A 401/403 drops the token and the request is retried once
/// 5. The `{"data": ...}` envelope is unwrapped into typed resources
pub mod auth;
pub mod client;
pub mod config;
pub mod groupactions;
pub mod inputs;
pub mod installations;
pub mod lights;
pub mod outputs;
pub mod resources;
pub mod sensors;
pub mod shutters;
pub mod thermostats;
pub mod types;

pub use auth::{AccessToken, ClientCredentials, StaticToken, TokenProvider};
pub use client::{OpenMoticsClient, RetryPolicy};
pub use config::ClientConfig;
pub use resources::*;
pub use types::{ApiError, OpenMoticsError, TokenResponse};
