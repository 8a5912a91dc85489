use serde_json::json;
use terraform_provider_pingdirectory::client::{ApiError, ConfigClient, Operation, OperationKind};
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const AUTHORIZATION: &str = "Basic Y249YWRtaW5pc3RyYXRvcjoyRmVkZXJhdGVNMHJl";

fn client(server: &MockServer) -> ConfigClient {
    ConfigClient::with_client(
        reqwest::Client::new(),
        &server.uri(),
        "cn=administrator".to_string(),
        "2FederateM0re".to_string(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_get_sends_basic_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/config/backends/userRoot"))
        .and(header("authorization", AUTHORIZATION))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "schemas": ["urn:pingidentity:schemas:configuration:2.0:backend:local-db"],
            "id": "userRoot",
            "backendID": "userRoot"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let body = assert_ok!(client(&server).get("backends", "userRoot").await);
    assert_eq!(body["backendID"], "userRoot");
}

#[tokio::test]
async fn test_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header(
            "user-agent",
            terraform_provider_pingdirectory::client::USER_AGENT,
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    // with_client keeps the caller's reqwest::Client, so build one the way new() does.
    let http = reqwest::Client::builder()
        .user_agent(terraform_provider_pingdirectory::client::USER_AGENT)
        .build()
        .unwrap();
    let client = ConfigClient::with_client(http, &server.uri(), "u".to_string(), "p".to_string())
        .unwrap();
    assert_ok!(client.get("backends", "userRoot").await);
}

#[tokio::test]
async fn test_list_with_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/config/backends"))
        .and(query_param("filter", "id sw \"user\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "schemas": ["urn:pingidentity:schemas:configuration:messages:2.0:ListResponse"],
            "totalResults": 1,
            "Resources": [{"id": "userRoot"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let filter = Some("id sw \"user\"");
    let list = assert_ok!(client(&server).list("backends", filter).await);
    assert_eq!(list.ids(), vec!["userRoot"]);
}

#[tokio::test]
async fn test_update_sends_operations() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/config/backends/userRoot"))
        .and(body_json(json!({
            "operations": [
                {"op": "replace", "path": "enabled", "value": "false"},
                {"op": "add", "path": "baseDN", "values": ["dc=example,dc=org"]}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "userRoot"})))
        .expect(1)
        .mount(&server)
        .await;

    let operations = vec![
        Operation::replace("enabled", "false"),
        Operation::new(OperationKind::Add, "baseDN")
            .with_values(vec!["dc=example,dc=org".to_string()]),
    ];
    assert_ok!(
        client(&server)
            .update("backends", "userRoot", &operations)
            .await
    );
}

#[tokio::test]
async fn test_error_carries_detail_and_body() {
    let server = MockServer::start().await;
    let error_body = json!({
        "schemas": ["urn:ietf:params:scim:api:messages:2.0:Error"],
        "status": "400",
        "detail": "The value 'sometimes' is not valid for property writability-mode"
    });
    Mock::given(method("POST"))
        .and(path("/config/backends"))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_body.clone()))
        .mount(&server)
        .await;

    let err = assert_err!(client(&server).create("backends", &json!({})).await);
    assert_eq!(err.status(), Some(400));
    assert_eq!(
        err.message(),
        "The value 'sometimes' is not valid for property writability-mode"
    );
    let body: serde_json::Value = serde_json::from_str(err.body().unwrap()).unwrap();
    assert_eq!(body, error_body);
}

#[tokio::test]
async fn test_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = assert_err!(client(&server).get("backends", "userRoot").await);
    assert!(matches!(err, ApiError::Auth { status: 401, .. }));
    assert!(!err.to_string().contains("2FederateM0re"));
}

#[tokio::test]
async fn test_not_found_and_empty_delete() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/config/backends/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/config/backends/userRoot"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let err = assert_err!(client.get("backends", "missing").await);
    assert!(err.is_not_found());
    assert_ok!(client.delete("backends", "userRoot").await);
}
