//! Integration tests for the sObject client against a mock Salesforce org
//!
//! Each test binds the client to a fixed credential whose `instance_url`
//! points at the mock server, except for `connect`, which performs the full
//! JWT bearer login first.

use std::sync::Arc;

use forcelink_common::auth::JwtBearerService;
use forcelink_common::testing::MockTokenExchanger;
use forcelink_domain::{ApiConfig, AuthConfig, Config, Credential, ForceError};
use forcelink_infra::{connect, SObjectClient};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ACCESS_TOKEN: &str = "00Dxx0000001gPL!AR8AQJXg";
const KEY_PATH: &str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/../common/tests/fixtures/test_rsa_key.pem");

fn credential(instance_url: &str) -> Credential {
    Credential {
        access_token: ACCESS_TOKEN.to_string(),
        instance_url: instance_url.to_string(),
        token_type: "Bearer".to_string(),
        ..Credential::default()
    }
}

fn client_for(server: &MockServer) -> SObjectClient<Credential> {
    let api = ApiConfig { log_requests: true, timeout_secs: 5, ..ApiConfig::default() };
    SObjectClient::new(Arc::new(credential(&server.uri())), api, "https://login.salesforce.com")
        .expect("client")
}

fn api_error_record(err: ForceError) -> Value {
    match err {
        ForceError::Api(message) => serde_json::from_str(&message).expect("record JSON"),
        other => panic!("expected API error, got {other:?}"),
    }
}

/// Validates record creation.
///
/// Assertions:
/// - Ensures the body is posted as JSON with the bearer token.
/// - Ensures the save result is decoded.
#[tokio::test]
async fn test_post_object() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/services/data/v45.0/sobjects/Account"))
        .and(header("authorization", format!("Bearer {ACCESS_TOKEN}").as_str()))
        .and(header("accept", "application/json"))
        .and(body_json(json!({"Name": "Acme"})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({
                "id": "001D000000IqhSLIAZ",
                "errors": [],
                "success": true
            })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).post_object("Account", &json!({"Name": "Acme"})).await.unwrap();
    assert_eq!(result.id, "001D000000IqhSLIAZ");
    assert!(result.success);
    assert!(result.errors.is_empty());
}

/// Validates field selection on reads.
///
/// Assertions:
/// - Ensures the path keeps its trailing slash and `fields` is comma-joined.
/// - Ensures the record is returned as a JSON object.
#[tokio::test]
async fn test_get_object() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/data/v45.0/sobjects/Account/001D000000IqhSLIAZ/"))
        .and(query_param("fields", "Name,Phone"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "attributes": {"type": "Account"},
            "Name": "Acme",
            "Phone": "555-0100"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let record = client_for(&server)
        .get_object("Account", "001D000000IqhSLIAZ", &["Name", "Phone"])
        .await
        .unwrap();
    assert_eq!(record["Name"], "Acme");
    assert_eq!(record["Phone"], "555-0100");
}

/// Validates updates and deletes with empty 204 responses.
///
/// Assertions:
/// - Ensures PATCH sends the changed fields.
/// - Ensures DELETE yields an empty map.
#[tokio::test]
async fn test_patch_and_delete_object() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/services/data/v45.0/sobjects/Contact/003xx"))
        .and(body_json(json!({"Phone": "555-0199"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/services/data/v45.0/sobjects/Contact/003xx"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.patch_object("Contact", "003xx", &json!({"Phone": "555-0199"})).await.unwrap();
    let deleted = client.delete_object("Contact", "003xx").await.unwrap();
    assert!(deleted.is_empty());
}

/// Validates parameterized search.
///
/// Assertions:
/// - Ensures the query string carries `q`, `sobject` and the per-object
///   field list and limit.
/// - Ensures `searchRecords` is returned.
#[tokio::test]
async fn test_search_object() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/data/v45.0/parameterizedSearch/"))
        .and(query_param("q", "Acme"))
        .and(query_param("sobject", "Account"))
        .and(query_param("Account.fields", "Id,Name"))
        .and(query_param("Account.limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "searchRecords": [
                {"attributes": {"type": "Account"}, "Id": "001a", "Name": "Acme"},
                {"attributes": {"type": "Account"}, "Id": "001b", "Name": "Acme Labs"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let records =
        client_for(&server).search_object("Account", "Acme", &["Id", "Name"], 10).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1]["Name"], "Acme Labs");
}

/// Validates SOQL queries.
///
/// Assertions:
/// - Ensures the statement is sent as `q`.
/// - Ensures `records` is returned.
#[tokio::test]
async fn test_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/data/v45.0/query/"))
        .and(query_param("q", "SELECT Id, Name FROM Account LIMIT 1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalSize": 1,
            "done": true,
            "records": [{"Id": "001a", "Name": "Acme"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let records =
        client_for(&server).query("SELECT Id, Name FROM Account LIMIT 1").await.unwrap();
    assert_eq!(records, vec![json!({"Id": "001a", "Name": "Acme"})]);
}

/// Validates a 200 response without the expected record list.
///
/// Assertions:
/// - Ensures a missing `records` field fails with the response record.
#[tokio::test]
async fn test_query_without_records_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/data/v45.0/query/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"totalSize": 0})))
        .mount(&server)
        .await;

    let err = client_for(&server).query("SELECT Id FROM Account").await.unwrap_err();
    let record = api_error_record(err);
    assert_eq!(record["status_code"], 200);
    assert_eq!(record["body"], json!({"totalSize": 0}));
}

/// Validates error statuses.
///
/// Assertions:
/// - Ensures a 404 fails with `{"url","status_code","body"}` as message.
/// - Ensures the request is not retried.
#[tokio::test]
async fn test_error_status_carries_response_record() {
    let server = MockServer::start().await;
    let body = json!([{"errorCode": "NOT_FOUND", "message": "The requested resource does not exist"}]);
    Mock::given(method("GET"))
        .and(path("/services/data/v45.0/sobjects/Account/missing/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(body.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server).get_object("Account", "missing", &["Name"]).await.unwrap_err();
    let record = api_error_record(err);

    assert_eq!(record["status_code"], 404);
    assert_eq!(record["body"], body);
    let url = record["url"].as_str().unwrap();
    assert!(url.starts_with(&server.uri()));
    assert!(url.ends_with("/sobjects/Account/missing/?fields=Name"));
}

/// Validates that a 3xx status is treated as a failure.
///
/// Assertions:
/// - Ensures 300 fails even though it is not an HTTP error class.
#[tokio::test]
async fn test_multiple_choices_is_failure() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(300).set_body_string("ambiguous"))
        .mount(&server)
        .await;

    let err = client_for(&server).delete_object("Account", "001a").await.unwrap_err();
    let record = api_error_record(err);
    assert_eq!(record["status_code"], 300);
    assert_eq!(record["body"], "ambiguous");
}

/// Validates the configured client name.
///
/// Assertions:
/// - Ensures `Sforce-Call-Options` names the client on data calls.
#[tokio::test]
async fn test_client_name_sent_as_call_options() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/data/v45.0/query/"))
        .and(header("sforce-call-options", "client=nightly-sync"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"records": []})))
        .expect(1)
        .mount(&server)
        .await;

    let api = ApiConfig { client_name: Some("nightly-sync".to_string()), ..ApiConfig::default() };
    let client = SObjectClient::new(Arc::new(credential(&server.uri())), api, server.uri()).unwrap();
    client.query("SELECT Id FROM Account").await.unwrap();
}

/// Validates the fallback base URL.
///
/// Assertions:
/// - Ensures calls go to the configured endpoint when the credential has no
///   `instance_url`.
#[tokio::test]
async fn test_falls_back_to_endpoint_without_instance_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/data/v58.0/query/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"records": []})))
        .expect(1)
        .mount(&server)
        .await;

    let api = ApiConfig { api_version: "v58.0".to_string(), ..ApiConfig::default() };
    let client = SObjectClient::new(Arc::new(credential("")), api, server.uri()).unwrap();
    let records = client.query("SELECT Id FROM Account").await.unwrap();
    assert!(records.is_empty());
}

/// Validates calls without a session.
///
/// Assertions:
/// - Ensures an unauthenticated service fails with an auth error.
/// - Ensures no request reaches the server.
#[tokio::test]
async fn test_unauthenticated_service_sends_nothing() {
    let server = MockServer::start().await;
    let config = AuthConfig::new("3MVG9client", "admin@example.com", server.uri(), KEY_PATH);
    let pem = std::fs::read(KEY_PATH).unwrap();
    let service = JwtBearerService::new(config, &pem, MockTokenExchanger::new()).unwrap();

    let client = SObjectClient::new(Arc::new(service), ApiConfig::default(), server.uri()).unwrap();
    let err = client.query("SELECT Id FROM Account").await.unwrap_err();

    assert!(matches!(err, ForceError::Auth(_)), "unexpected error: {err:?}");
    assert!(server.received_requests().await.unwrap().is_empty());
}

/// Validates the session credential flowing into data calls.
///
/// Assertions:
/// - Ensures the token from the scripted login is used as bearer.
#[tokio::test]
async fn test_service_credential_is_used() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/data/v45.0/query/"))
        .and(header("authorization", "Bearer session-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"records": []})))
        .expect(1)
        .mount(&server)
        .await;

    let exchanger = MockTokenExchanger::new();
    exchanger.push_response(Ok(Credential {
        access_token: "session-token".to_string(),
        instance_url: server.uri(),
        ..Credential::default()
    }));
    let config = AuthConfig::new("3MVG9client", "admin@example.com", server.uri(), KEY_PATH);
    let pem = std::fs::read(KEY_PATH).unwrap();
    let service = JwtBearerService::new(config, &pem, exchanger).unwrap();
    service.login().await.unwrap();

    let client = SObjectClient::new(Arc::new(service), ApiConfig::default(), server.uri()).unwrap();
    client.query("SELECT Id FROM Account").await.unwrap();
}

/// Validates the end-to-end connect flow.
///
/// Assertions:
/// - Ensures `connect` logs in at the token endpoint exactly once.
/// - Ensures data calls use the issued token and instance URL.
#[tokio::test]
async fn test_connect_logs_in_and_queries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/services/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": ACCESS_TOKEN,
            "scope": "api",
            "instance_url": server.uri(),
            "id": "https://login.salesforce.com/id/00Dxx0000001gPLEAY/005xx000001SwiUAAS",
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/services/data/v45.0/query/"))
        .and(header("authorization", format!("Bearer {ACCESS_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalSize": 1,
            "done": true,
            "records": [{"Id": "001a"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = Config {
        auth: AuthConfig::new("3MVG9client", "admin@example.com", server.uri(), KEY_PATH),
        api: ApiConfig { timeout_secs: 5, ..ApiConfig::default() },
    };
    let client = connect(&config).await.unwrap();

    let credential = client.provider().credential().await.unwrap();
    assert_eq!(credential.identity_url, "https://login.salesforce.com/id/00Dxx0000001gPLEAY/005xx000001SwiUAAS");
    assert_eq!(client.query("SELECT Id FROM Account").await.unwrap().len(), 1);
}

/// Validates a rejected login.
///
/// Assertions:
/// - Ensures `connect` surfaces the token endpoint's error as an auth error.
#[tokio::test]
async fn test_connect_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/services/oauth2/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "user hasn't approved this consumer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = Config {
        auth: AuthConfig::new("3MVG9client", "admin@example.com", server.uri(), KEY_PATH),
        api: ApiConfig { timeout_secs: 5, ..ApiConfig::default() },
    };
    let err = connect(&config).await.unwrap_err();
    match err {
        ForceError::Auth(message) => assert!(message.contains("invalid_grant"), "{message}"),
        other => panic!("expected auth error, got {other:?}"),
    }
}

/// Validates a missing key file.
///
/// Assertions:
/// - Ensures `connect` fails before any request with a config error.
#[tokio::test]
async fn test_connect_missing_key_file() {
    let server = MockServer::start().await;
    let config = Config {
        auth: AuthConfig::new("3MVG9client", "admin@example.com", server.uri(), "/nonexistent.key"),
        api: ApiConfig::default(),
    };

    let err = connect(&config).await.unwrap_err();
    assert!(matches!(err, ForceError::Config(_)), "unexpected error: {err:?}");
    assert!(server.received_requests().await.unwrap().is_empty());
}
