use n8n_workflow::core::config::{ApiConfig, ConfigValidator};
use n8n_workflow::core::{ApiError, WorkflowClient};
use serde_json::json;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> WorkflowClient {
    let base_url = Url::parse(&server.uri()).unwrap();
    WorkflowClient::new(ApiConfig::new(base_url, "test-key")).unwrap()
}

#[tokio::test]
async fn test_crud_round_trip_paths() {
    let server = MockServer::start().await;
    let payload = json!({"name": "W", "nodes": [], "connections": {}, "settings": {}});

    Mock::given(method("POST"))
        .and(path("/api/v1/workflows"))
        .and(header("X-N8N-API-KEY", "test-key"))
        .and(header("content-type", "application/json"))
        .and(body_json(&payload))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "wf1", "name": "W"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/workflows/wf1"))
        .and(body_json(&payload))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "wf1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/workflows/wf1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "wf1", "name": "W"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/workflows/wf1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "wf1"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let created = client.create_workflow(&payload).await.unwrap();
    assert_eq!(created["id"], "wf1");
    client.update_workflow("wf1", &payload).await.unwrap();
    assert_eq!(client.get_workflow("wf1").await.unwrap()["name"], "W");
    client.delete_workflow("wf1").await.unwrap();
}

#[tokio::test]
async fn test_lifecycle_and_test_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/workflows/wf1/activate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "wf1", "active": true})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/workflows/wf1/deactivate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "wf1", "active": false})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/workflows/wf1/test"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&server)
        .await;

    let client = client(&server);
    assert_eq!(client.activate_workflow("wf1").await.unwrap()["active"], true);
    assert_eq!(client.deactivate_workflow("wf1").await.unwrap()["active"], false);
    assert_eq!(client.test_workflow("wf1").await.unwrap()["success"], true);
}

#[tokio::test]
async fn test_ids_are_percent_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/workflows/a%2Fb"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "a/b"})))
        .mount(&server)
        .await;

    let value = client(&server).get_workflow("a/b").await.unwrap();
    assert_eq!(value["id"], "a/b");
}

#[tokio::test]
async fn test_base_url_with_api_suffix_is_not_doubled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/workflows"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let base_url = ConfigValidator::parse_base_url(&format!("{}/api/v1", server.uri()), "/api/v1")
        .unwrap();
    let client = WorkflowClient::new(ApiConfig::new(base_url, "k")).unwrap();
    assert!(client.list_workflows().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_server_errors_carry_status_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/workflows"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"message": "request/body must have required property 'settings'"})),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .create_workflow(&json!({"name": "W"}))
        .await
        .unwrap_err();
    match &err {
        ApiError::Status { status, message } => {
            assert_eq!(*status, 400);
            assert!(message.contains("settings"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/workflows/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let mut config = ApiConfig::new(Url::parse(&server.uri()).unwrap(), "k");
    config.request_timeout = Duration::from_millis(200);
    let err = WorkflowClient::new(config)
        .unwrap()
        .get_workflow("slow")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
}

#[tokio::test]
async fn test_webhook_json_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook/stock-price"))
        .and(body_json(json!({"symbol": "AAPL"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"symbol": "AAPL", "price": 190.5})),
        )
        .mount(&server)
        .await;

    let value = client(&server)
        .trigger_webhook("stock-price", &json!({"symbol": "AAPL"}))
        .await
        .unwrap();
    assert_eq!(value["price"], 190.5);
}
