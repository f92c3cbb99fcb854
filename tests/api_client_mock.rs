//! API Client Mock Tests
//!
//! These tests exercise OpenMoticsClient against a wiremock server: token
//! acquisition, authenticated requests, retry behaviour and the resource
//! accessors.
//!
//! Each test follows this pattern:
//! 1. Start a mock HTTP server
//! 2. Configure expected request/response
//! 3. Create OpenMoticsClient pointing to mock server
//! 4. Make API call
//! 5. Assert response is correct

use openmotics_sdk::{
    ApiError, ClientConfig, ClientCredentials, OpenMoticsClient, OpenMoticsError, StaticToken,
};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::{
    matchers::{body_json, body_string_contains, header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

const TOKEN_PATH: &str = "/authentication/oauth2/token";

fn base_config(mock_server: &MockServer) -> ClientConfig {
    ClientConfig::new()
        .with_base_url(mock_server.uri())
        .with_retry(3, Duration::from_millis(10), Duration::from_millis(50))
}

fn token_client(mock_server: &MockServer) -> OpenMoticsClient {
    let config = base_config(mock_server)
        .with_token("test_token")
        .with_installation_id(21);
    OpenMoticsClient::new(config).unwrap()
}

fn credentials_client(mock_server: &MockServer) -> OpenMoticsClient {
    let config = base_config(mock_server)
        .with_client_credentials("my-client", "my-secret")
        .with_installation_id(21);
    OpenMoticsClient::new(config).unwrap()
}

fn token_body(token: &str, expires_in: i64) -> serde_json::Value {
    json!({
        "access_token": token,
        "token_type": "Bearer",
        "expires_in": expires_in,
        "scope": "control view configure"
    })
}

fn installations_body() -> serde_json::Value {
    json!({
        "data": [
            {
                "id": 21,
                "name": "Home",
                "description": "",
                "gateway_model": "openmotics",
                "_acl": {
                    "configure": {"allowed": true},
                    "view": {"allowed": true},
                    "control": {"allowed": true}
                },
                "_version": 1.0,
                "platform": "CLASSIC",
                "network": {"local_ip_address": "172.16.1.25"}
            }
        ]
    })
}

// ============================================================================
// Token Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_client_credentials_token_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=my-client"))
        .and(body_string_contains("client_secret=my-secret"))
        .and(body_string_contains("scope=control+view+configure"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("access_abc", 3600)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/base/installations"))
        .and(header("Authorization", "Bearer access_abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(installations_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = credentials_client(&mock_server);

    let installations = client.installations().get_all(None).await.unwrap();
    assert_eq!(installations.len(), 1);
    assert_eq!(installations[0].id, 21);
    assert_eq!(installations[0].name.as_deref(), Some("Home"));
}

#[tokio::test]
async fn test_token_is_reused_while_valid() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("access_abc", 3600)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/base/installations"))
        .and(header("Authorization", "Bearer access_abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(installations_body()))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = credentials_client(&mock_server);

    client.installations().get_all(None).await.unwrap();
    client.installations().get_all(None).await.unwrap();
}

#[tokio::test]
async fn test_token_close_to_expiry_is_refreshed() {
    let mock_server = MockServer::start().await;

    // 10 seconds is inside the clock-skew margin, so every call refreshes
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("short_lived", 10)))
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/base/installations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(installations_body()))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = credentials_client(&mock_server);

    client.installations().get_all(None).await.unwrap();
    client.installations().get_all(None).await.unwrap();
}

#[tokio::test]
async fn test_token_endpoint_transient_failure_is_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("after_retry", 3600)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/base/installations"))
        .and(header("Authorization", "Bearer after_retry"))
        .respond_with(ResponseTemplate::new(200).set_body_json(installations_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = credentials_client(&mock_server);

    let installations = client.installations().get_all(None).await.unwrap();
    assert_eq!(installations.len(), 1);
}

#[tokio::test]
async fn test_token_endpoint_server_errors_give_up_after_max_attempts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(502))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = credentials_client(&mock_server);

    let error = client.installations().get_all(None).await.unwrap_err();
    assert!(matches!(
        error,
        OpenMoticsError::Api(ApiError::Server { status: 502, .. })
    ));
}

#[tokio::test]
async fn test_token_endpoint_400_is_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_client"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = credentials_client(&mock_server);

    let error = client.installations().get_all(None).await.unwrap_err();
    assert!(matches!(
        error,
        OpenMoticsError::Api(ApiError::BadRequest { status: 400, .. })
    ));
    assert!(error.to_string().contains("invalid_client"));
}

#[tokio::test]
async fn test_token_endpoint_401_is_authentication_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = credentials_client(&mock_server);

    let error = client.installations().get_all(None).await.unwrap_err();
    assert!(matches!(error, OpenMoticsError::Authentication(_)));
    assert!(error.to_string().contains("401"));
}

#[tokio::test]
async fn test_token_endpoint_malformed_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not valid json"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = credentials_client(&mock_server);

    let error = client.installations().get_all(None).await.unwrap_err();
    assert!(matches!(error, OpenMoticsError::Api(ApiError::Parse(_))));
}

#[tokio::test]
async fn test_missing_token_is_authentication_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(installations_body()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = OpenMoticsClient::new(base_config(&mock_server)).unwrap();

    let error = client.installations().get_all(None).await.unwrap_err();
    assert!(matches!(error, OpenMoticsError::Authentication(_)));
    assert!(error.is_authentication());
}

#[tokio::test]
async fn test_fetch_token_always_hits_endpoint() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("direct", 3600)))
        .expect(2)
        .mount(&mock_server)
        .await;

    let provider = ClientCredentials::new(
        reqwest::Client::new(),
        format!("{}{}", mock_server.uri(), TOKEN_PATH),
        "my-client",
        SecretString::from("my-secret"),
        "control view configure",
    );

    assert!(provider.token_expires_at().await.is_none());

    let token = provider.fetch_token().await.unwrap();
    assert_eq!(token.expose_secret(), "direct");
    assert!(provider.token_expires_at().await.is_some());

    provider.fetch_token().await.unwrap();
}

#[tokio::test]
async fn test_custom_token_provider() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/base/installations"))
        .and(header("Authorization", "Bearer from-provider"))
        .respond_with(ResponseTemplate::new(200).set_body_json(installations_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Credentials in the config are ignored in favour of the provider
    let config = base_config(&mock_server).with_token("ignored");
    let client =
        OpenMoticsClient::with_token_provider(config, Arc::new(StaticToken::new("from-provider")))
            .unwrap();

    let installations = client.installations().get_all(None).await.unwrap();
    assert_eq!(installations.len(), 1);
}

// ============================================================================
// Unauthorized Handling Tests
// ============================================================================

#[tokio::test]
async fn test_401_triggers_single_token_refresh() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("first", 3600)))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("second", 3600)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/base/installations"))
        .and(header("Authorization", "Bearer first"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token revoked"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/base/installations"))
        .and(header("Authorization", "Bearer second"))
        .respond_with(ResponseTemplate::new(200).set_body_json(installations_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = credentials_client(&mock_server);

    let installations = client.installations().get_all(None).await.unwrap();
    assert_eq!(installations[0].id, 21);
}

#[tokio::test]
async fn test_repeated_401_is_authentication_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("rejected", 3600)))
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/base/installations"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = credentials_client(&mock_server);

    let error = client.installations().get_all(None).await.unwrap_err();
    assert!(matches!(error, OpenMoticsError::Authentication(_)));
    assert!(error.to_string().contains("403"));
}

#[tokio::test]
async fn test_static_token_401_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/base/installations"))
        .and(header("Authorization", "Bearer test_token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = token_client(&mock_server);

    let error = client.installations().get_all(None).await.unwrap_err();
    assert!(matches!(error, OpenMoticsError::Authentication(_)));
}

// ============================================================================
// Retry Tests
// ============================================================================

#[tokio::test]
async fn test_transient_server_errors_are_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/base/installations"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/base/installations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(installations_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = token_client(&mock_server);

    let installations = client.installations().get_all(None).await.unwrap();
    assert_eq!(installations.len(), 1);
}

#[tokio::test]
async fn test_server_errors_give_up_after_max_attempts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/base/installations"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = token_client(&mock_server);

    let error = client.installations().get_all(None).await.unwrap_err();
    assert!(matches!(
        error,
        OpenMoticsError::Api(ApiError::Server { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/base/installations/99"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = token_client(&mock_server);

    let error = client.installations().get_by_id(99).await.unwrap_err();
    assert!(matches!(
        error,
        OpenMoticsError::Api(ApiError::BadRequest { status: 404, .. })
    ));
}

#[tokio::test]
async fn test_too_many_requests_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/base/installations"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Slow down"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = token_client(&mock_server);

    let error = client.installations().get_all(None).await.unwrap_err();
    assert!(matches!(
        error,
        OpenMoticsError::Api(ApiError::TooManyRequests(_))
    ));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    // Bind and release a port so nothing is listening on it
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = ClientConfig::new()
        .with_base_url(format!("http://127.0.0.1:{}", port))
        .with_token("test_token")
        .with_retry(2, Duration::from_millis(5), Duration::from_millis(10));
    let client = OpenMoticsClient::new(config).unwrap();

    let error = client.installations().get_all(None).await.unwrap_err();
    assert!(matches!(error, OpenMoticsError::Api(ApiError::Network(_))));
}

// ============================================================================
// Response Handling Tests
// ============================================================================

#[tokio::test]
async fn test_request_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/base/installations/21"))
        .and(header("Authorization", "Bearer test_token"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": 21, "name": "Home"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = token_client(&mock_server);

    let installation = client.installations().get_by_id(21).await.unwrap();
    assert_eq!(installation.to_string(), "21_Home");
}

#[tokio::test]
async fn test_text_response_is_returned_as_string() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = token_client(&mock_server);

    let value = client.get_value("/ping", &[]).await.unwrap();
    assert_eq!(value, json!("pong"));
}

#[tokio::test]
async fn test_malformed_json_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/base/installations"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{not json", "application/json"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = token_client(&mock_server);

    let error = client.installations().get_all(None).await.unwrap_err();
    assert!(matches!(error, OpenMoticsError::Api(ApiError::Parse(_))));
    assert!(error.to_string().contains("parse"));
}

#[tokio::test]
async fn test_unexpected_shape_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/base/installations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = token_client(&mock_server);

    let error = client.installations().get_all(None).await.unwrap_err();
    assert!(matches!(error, OpenMoticsError::Api(ApiError::Parse(_))));
}

#[tokio::test]
async fn test_installation_filter_is_forwarded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/base/installations"))
        .and(query_param("filter", r#"{"platform":"CLASSIC"}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(installations_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = token_client(&mock_server);

    let installations = client
        .installations()
        .get_all(Some(r#"{"platform":"CLASSIC"}"#))
        .await
        .unwrap();
    assert_eq!(installations.len(), 1);
}

// ============================================================================
// Installation-scoped Accessor Tests
// ============================================================================

#[tokio::test]
async fn test_accessors_require_installation_id() {
    let mock_server = MockServer::start().await;

    let config = base_config(&mock_server).with_token("test_token");
    let client = OpenMoticsClient::new(config).unwrap();

    let error = client.outputs().get_all(None).await.unwrap_err();
    assert!(matches!(error, OpenMoticsError::Config(_)));
}

#[tokio::test]
async fn test_list_outputs() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/base/installations/21/outputs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {
                    "name": "name1",
                    "type": "OUTLET",
                    "capabilities": ["ON_OFF"],
                    "location": {
                        "floor_coordinates": {"x": null, "y": null},
                        "installation_id": 21,
                        "gateway_id": 408,
                        "floor_id": null,
                        "room_id": null
                    },
                    "metadata": null,
                    "status": {"on": false, "locked": false, "manual_override": false},
                    "last_state_change": 1633099611.275243,
                    "id": 18,
                    "_version": 1.0
                },
                {
                    "name": "dimmer",
                    "type": "LIGHT",
                    "capabilities": ["ON_OFF", "RANGE"],
                    "status": {"on": true, "value": 60},
                    "id": 19
                }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = token_client(&mock_server);

    let outputs = client.outputs().get_all(None).await.unwrap();
    assert_eq!(outputs.len(), 2);
    assert_eq!(outputs[0].to_string(), "18_name1_OUTLET");
    assert!(!outputs[0].is_on());
    assert_eq!(
        outputs[0].location.as_ref().and_then(|l| l.gateway_id),
        Some(408)
    );
    assert!(outputs[1].is_on());
    assert!(outputs[1].is_dimmable());
    assert_eq!(outputs[1].status.as_ref().and_then(|s| s.value), Some(60));
}

#[tokio::test]
async fn test_get_output_by_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/base/installations/21/outputs/18"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": 18, "name": "Pond", "type": "OUTLET", "status": {"on": true}}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = token_client(&mock_server);

    let output = client.outputs().get_by_id(18).await.unwrap();
    assert_eq!(output.id, 18);
    assert!(output.is_on());
}

#[tokio::test]
async fn test_output_turn_on_with_value() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/base/installations/21/outputs/18/turn_on"))
        .and(body_json(json!({"value": 60})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": 18}})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = token_client(&mock_server);

    let response = client.outputs().turn_on(18, Some(60)).await.unwrap();
    assert_eq!(response["data"]["id"], 18);
}

#[tokio::test]
async fn test_output_turn_on_clamps_dimmer_value() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/base/installations/21/outputs/18/turn_on"))
        .and(body_json(json!({"value": 100})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": 18}})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = token_client(&mock_server);

    client.outputs().turn_on(18, Some(101)).await.unwrap();
}

#[tokio::test]
async fn test_output_turn_off_and_toggle() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/base/installations/21/outputs/18/turn_off"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/base/installations/21/outputs/18/toggle"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = token_client(&mock_server);

    let response = client.outputs().turn_off(18).await.unwrap();
    assert!(response.is_null());
    client.outputs().toggle(18).await.unwrap();
}

#[tokio::test]
async fn test_lights() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/base/installations/21/lights"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 5, "name": "Kitchen", "type": "LIGHT", "status": {"on": false}}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/base/installations/21/lights/5/turn_on"))
        .and(body_json(json!({"value": 100})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/base/installations/21/lights/5/turn_off"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = token_client(&mock_server);

    let lights = client.lights().get_all(None).await.unwrap();
    assert_eq!(lights.len(), 1);
    assert_eq!(lights[0].output_type.as_deref(), Some("LIGHT"));

    client.lights().turn_on(5, Some(100)).await.unwrap();
    client.lights().turn_off(5).await.unwrap();
}

#[tokio::test]
async fn test_sensors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/base/installations/21/sensors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {
                    "_version": 1.0,
                    "id": 3,
                    "name": "Living room",
                    "physical_quantity": "temperature",
                    "location": {"room_id": null, "installation_id": 21},
                    "status": {"humidity": null, "temperature": 21.5, "brightness": null}
                }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/base/installations/21/sensors/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": 3, "name": "Living room", "status": {"temperature": 22.0}}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = token_client(&mock_server);

    let sensors = client.sensors().get_all(None).await.unwrap();
    assert_eq!(sensors.len(), 1);
    assert_eq!(
        sensors[0].status.as_ref().and_then(|s| s.temperature),
        Some(21.5)
    );
    assert_eq!(sensors[0].physical_quantity.as_deref(), Some("temperature"));

    let sensor = client.sensors().get_by_id(3).await.unwrap();
    assert_eq!(sensor.status.and_then(|s| s.temperature), Some(22.0));
}

#[tokio::test]
async fn test_groupactions_scenes_and_trigger() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/base/installations/21/groupactions"))
        .and(query_param("filter", r#"{"usage":"SCENE"}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"id": 1, "name": "Movie night", "actions": [0, 1, 2], "usage": "SCENE"}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/base/installations/21/groupactions/1/trigger"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": 1}})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = token_client(&mock_server);

    let scenes = client.groupactions().scenes().await.unwrap();
    assert_eq!(scenes.len(), 1);
    assert!(scenes[0].is_scene());
    assert_eq!(scenes[0].actions, vec![0, 1, 2]);

    client.groupactions().trigger(scenes[0].id).await.unwrap();
}

#[tokio::test]
async fn test_inputs() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/base/installations/21/inputs"))
        .and(query_param("filter", r#"{"type":"MOTION_SENSOR"}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {
                    "_version": 1.0,
                    "id": 11,
                    "local_id": 4,
                    "name": "Hallway motion",
                    "type": "MOTION_SENSOR",
                    "location": {"room_id": 2, "installation_id": 21},
                    "status": {"on": null, "last_change": 1633099611.0}
                }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/base/installations/21/inputs/11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": 11, "name": "Hallway motion", "status": {"on": true}}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = token_client(&mock_server);

    let inputs = client
        .inputs()
        .get_all(Some(r#"{"type":"MOTION_SENSOR"}"#))
        .await
        .unwrap();
    assert_eq!(inputs.len(), 1);
    assert_eq!(inputs[0].input_type.as_deref(), Some("MOTION_SENSOR"));
    assert!(!inputs[0].is_on());

    let input = client.inputs().get_by_id(11).await.unwrap();
    assert!(input.is_on());
    assert_eq!(input.to_string(), "11_Hallway motion");
}

#[tokio::test]
async fn test_shutters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/base/installations/21/shutters/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": 4,
                "name": "Bedroom",
                "capabilities": ["UP_DOWN", "POSITION"],
                "status": {"state": "UP", "position": 0, "locked": false}
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/base/installations/21/shutters/4/down"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/base/installations/21/shutters/4/change_position"))
        .and(body_json(json!({"position": 40})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/base/installations/21/shutters/4/change_position"))
        .and(body_json(json!({"position": 100})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = token_client(&mock_server);

    let shutter = client.shutters().get_by_id(4).await.unwrap();
    assert_eq!(
        shutter.status.as_ref().and_then(|s| s.state.as_deref()),
        Some("UP")
    );

    client.shutters().down(4).await.unwrap();
    client.shutters().change_position(4, 40).await.unwrap();

    client.shutters().change_position(4, 140).await.unwrap();
}

#[tokio::test]
async fn test_thermostats() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/base/installations/21/thermostats/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {
                    "id": 1,
                    "local_id": 0,
                    "name": "Ground floor",
                    "status": {"mode": "HEATING", "state": "ON"},
                    "capabilities": ["HEATING", "COOLING"]
                }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/base/installations/21/thermostats/groups/1/mode"))
        .and(body_json(json!({"mode": "COOLING"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/base/installations/21/thermostats/units"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {
                    "id": 7,
                    "name": "Living",
                    "location": {"thermostat_group_id": 1, "installation_id": 21},
                    "status": {
                        "actual_temperature": 20.5,
                        "current_setpoint": 21.0,
                        "preset": "AUTO"
                    }
                }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/base/installations/21/thermostats/units/7/setpoint"))
        .and(body_json(json!({"temperature": 22.5})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/base/installations/21/thermostats/units/7/preset"))
        .and(body_json(json!({"preset": "AWAY"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = token_client(&mock_server);
    let thermostats = client.thermostats();

    let groups = thermostats.groups().get_all(None).await.unwrap();
    assert_eq!(groups[0].to_string(), "1_Ground floor");
    thermostats.groups().set_mode(1, "cooling").await.unwrap();

    let units = thermostats.units().get_all(None).await.unwrap();
    assert_eq!(
        units[0].status.as_ref().and_then(|s| s.current_setpoint),
        Some(21.0)
    );
    thermostats.units().set_temperature(7, 22.5).await.unwrap();
    thermostats.units().set_preset(7, "away").await.unwrap();

    let error = thermostats
        .units()
        .set_temperature(7, f64::NAN)
        .await
        .unwrap_err();
    assert!(matches!(error, OpenMoticsError::InvalidArgument(_)));
}
