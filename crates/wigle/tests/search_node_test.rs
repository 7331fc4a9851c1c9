// Integration tests for `WigleNode` against a wiremock server.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use engine::{EngineError, ExecutorConfig, NodeDefinition, NodeExecutor};
use nodes::{
    CredentialTestStatus, CredentialTester, DecryptedCredential, ExecutableNode, ExecutionContext,
    Item, NodeError,
};
use wigle::{ClientConfig, WigleNode, NODE_TYPE};

const TOKEN: &str = "QUlEMTIzOnNlY3JldA==";

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, WigleNode) {
    let server = MockServer::start().await;
    let node = WigleNode::with_config(ClientConfig {
        base_url: format!("{}/api/v2", server.uri()),
        timeout_secs: Some(5),
    });
    (server, node)
}

fn credential() -> DecryptedCredential {
    DecryptedCredential::new("wigleApi").with_field("api_key", TOKEN)
}

fn ctx() -> ExecutionContext {
    ExecutionContext::new().with_credential(credential())
}

/// Resolve parameters the way the runner does, then execute one item.
async fn run_one(node: &WigleNode, params: Value, item: Value) -> Result<Item, NodeError> {
    let resolved = node.description().resolve_parameters(&params)?;
    node.execute(Item::from_value(item), 0, &resolved, &ctx()).await
}

async fn mount_status(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path("/api/v2/network/search"))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "success": false })))
        .mount(server)
        .await;
}

// ── Search: success ─────────────────────────────────────────────────

#[tokio::test]
async fn results_are_copied_into_the_default_field() {
    let (server, node) = setup().await;

    let results = json!([
        { "netid": "00:11:22:33:44:55", "ssid": "LIVEBOX-1A2B", "trilat": 48.85, "trilong": 2.35 },
        { "netid": "66:77:88:99:AA:BB", "ssid": "LIVEBOX-FFFF", "trilat": 48.86, "trilong": 2.36 }
    ]);

    Mock::given(method("GET"))
        .and(path("/api/v2/network/search"))
        .and(query_param("ssidlike", "LIVEBOX"))
        .and(query_param("resultsPerPage", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "totalResults": 2,
            "results": results,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let item = run_one(&node, json!({}), json!({ "keep": "me" })).await.unwrap();

    assert_eq!(item.json["wigle"], results);
    assert_eq!(item.json["keep"], json!("me"));
    assert_eq!(item.paired_item.map(|p| p.item), Some(0));
}

#[tokio::test]
async fn requests_carry_basic_auth_and_json_headers() {
    let (server, node) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/network/search"))
        .and(header("authorization", format!("Basic {TOKEN}").as_str()))
        .and(header("accept", "application/json"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let item = run_one(&node, json!({}), json!({})).await.unwrap();
    assert_eq!(item.json["wigle"], json!([]));
}

#[tokio::test]
async fn custom_field_and_page_size_are_honoured() {
    let (server, node) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/network/search"))
        .and(query_param("netid", "0A:2C:EF"))
        .and(query_param("resultsPerPage", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": ["A", "B"] })))
        .expect(1)
        .mount(&server)
        .await;

    let params = json!({
        "query_ssid": "",
        "query_bssid": "0A:2C:EF",
        "options": { "results_per_page": 100, "results_field": "networks" },
    });
    let item = run_one(&node, params, json!({})).await.unwrap();

    assert_eq!(item.json["networks"], json!(["A", "B"]));
    assert!(!item.json.contains_key("wigle"));
}

#[tokio::test]
async fn geo_and_location_filters_reach_the_query_string() {
    let (server, node) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/network/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .mount(&server)
        .await;

    let params = json!({
        "query_ssid": "",
        "filter_geo": true,
        "query_lat": 48.8566,
        "query_lon": 2.3522,
        "query_radius": 0.1,
        "filter_location": true,
        "query_city": " Paris ",
        "query_postalcode": "75001",
    });
    run_one(&node, params, json!({})).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let query: HashMap<String, String> = requests[0].url.query_pairs().into_owned().collect();

    let num = |k: &str| query[k].parse::<f64>().unwrap();
    assert!((num("latrange1") - 48.855_699).abs() < 1e-5);
    assert!((num("latrange2") - 48.857_501).abs() < 1e-5);
    assert!(num("longrange1") < 2.3522 && num("longrange2") > 2.3522);
    assert_eq!(query["city"], "Paris");
    assert_eq!(query["postalCode"], "75001");
    assert!(!query.contains_key("road"));
    assert!(!query.contains_key("ssidlike"));
    assert_eq!(query["resultsPerPage"], "25");
}

#[tokio::test]
async fn missing_results_are_written_as_null() {
    let (server, node) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/network/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    let item = run_one(&node, json!({}), json!({})).await.unwrap();
    assert_eq!(item.json["wigle"], Value::Null);
}

#[tokio::test]
async fn null_parameters_fall_back_to_defaults() {
    let (server, node) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/network/search"))
        .and(query_param("ssidlike", "LIVEBOX"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let params = json!({ "query_ssid": null, "query_bssid": null, "filter_geo": null });
    let item = run_one(&node, params, json!({})).await.unwrap();

    assert_eq!(item.json["wigle"], json!([]));
    let requests = server.received_requests().await.unwrap();
    let query: HashMap<String, String> = requests[0].url.query_pairs().into_owned().collect();
    assert!(!query.contains_key("netid"));
    assert!(!query.contains_key("latrange1"));
}

// ── Search: failures ────────────────────────────────────────────────

#[tokio::test]
async fn status_codes_map_to_fixed_messages() {
    let cases = [
        (400, "Request error."),
        (402, "Insufficient balance for commercial query."),
        (410, "Query Failed."),
        (429, "Too many queries today."),
        (401, "Unknown error occurred."),
        (500, "Unknown error occurred."),
    ];

    for (status, message) in cases {
        let (server, node) = setup().await;
        mount_status(&server, status).await;

        let err = run_one(&node, json!({}), json!({})).await.unwrap_err();
        assert_eq!(err, NodeError::Operation(message.into()), "status {status}");
    }
}

#[tokio::test]
async fn rate_limit_aborts_the_run_without_output() {
    let (server, node) = setup().await;
    mount_status(&server, 429).await;

    let mut executor = NodeExecutor::new(HashMap::new(), ExecutorConfig::default());
    executor.register(Arc::new(node));

    let def = NodeDefinition::new("wigle-1", NODE_TYPE, json!({ "query_ssid": "LIVEBOX" }));
    let items = vec![Item::from_value(json!({})), Item::from_value(json!({}))];
    let err = executor.run(&def, items, &ctx()).await.unwrap_err();

    assert!(matches!(err, EngineError::NodeFailed { item_index: 0, .. }));
    assert_eq!(err.user_message(), "Too many queries today.");

    // No retry and no second item.
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn each_item_gets_its_own_request() {
    let (server, node) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/network/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [1] })))
        .expect(3)
        .mount(&server)
        .await;

    let mut executor = NodeExecutor::new(HashMap::new(), ExecutorConfig::default());
    executor.register(Arc::new(node));

    let def = NodeDefinition::new("wigle-1", NODE_TYPE, Value::Null);
    let items = (0..3).map(|n| Item::from_value(json!({ "n": n }))).collect();
    let result = executor.run(&def, items, &ctx()).await.unwrap();

    assert_eq!(result.items.len(), 3);
    for (i, item) in result.items.iter().enumerate() {
        assert_eq!(item.json["n"], json!(i));
        assert_eq!(item.json["wigle"], json!([1]));
        assert_eq!(item.paired_item.map(|p| p.item), Some(i));
    }
}

#[tokio::test]
async fn invalid_json_body_is_reported() {
    let (server, node) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/network/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = run_one(&node, json!({}), json!({})).await.unwrap_err();
    assert!(
        matches!(&err, NodeError::Operation(msg) if msg.starts_with("Invalid response body")),
        "got {err:?}"
    );
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let node = WigleNode::with_config(ClientConfig {
        base_url: "http://127.0.0.1:1/api/v2/".into(),
        timeout_secs: Some(5),
    });

    let err = run_one(&node, json!({}), json!({})).await.unwrap_err();
    assert!(
        matches!(&err, NodeError::Operation(msg) if msg.starts_with("Network error:")),
        "got {err:?}"
    );
}

#[tokio::test]
async fn timeout_is_a_network_error() {
    let server = MockServer::start().await;
    let node = WigleNode::with_config(ClientConfig {
        base_url: format!("{}/api/v2", server.uri()),
        timeout_secs: Some(1),
    });

    Mock::given(method("GET"))
        .and(path("/api/v2/network/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "results": [] }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = run_one(&node, json!({}), json!({})).await.unwrap_err();
    assert!(
        matches!(&err, NodeError::Operation(msg) if msg.starts_with("Network error:")),
        "got {err:?}"
    );
}

#[tokio::test]
async fn missing_credential_fails_before_any_request() {
    let (server, node) = setup().await;

    let resolved = node.description().resolve_parameters(&Value::Null).unwrap();
    let err = node
        .execute(Item::default(), 0, &resolved, &ExecutionContext::new())
        .await
        .unwrap_err();

    assert!(matches!(err, NodeError::MissingCredentials(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_operation_is_rejected() {
    let (server, node) = setup().await;

    let err = run_one(&node, json!({ "operation": "list_networks" }), json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, NodeError::InvalidParameters(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ── Connection test ─────────────────────────────────────────────────

#[tokio::test]
async fn connection_test_succeeds_on_profile_response() {
    let (server, node) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/profile/user"))
        .and(header("authorization", format!("Basic {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true, "userid": "tester" })))
        .expect(1)
        .mount(&server)
        .await;

    let result = node.test_credential(&credential()).await;
    assert_eq!(result.status, CredentialTestStatus::Ok);
    assert_eq!(result.message, "Connection successful!");
}

#[tokio::test]
async fn connection_test_ignores_the_profile_body() {
    for response in [
        ResponseTemplate::new(200),
        ResponseTemplate::new(200).set_body_string("not json"),
    ] {
        let (server, node) = setup().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/profile/user"))
            .respond_with(response)
            .expect(1)
            .mount(&server)
            .await;

        let result = node.test_credential(&credential()).await;
        assert_eq!(result.status, CredentialTestStatus::Ok, "message: {}", result.message);
        assert_eq!(result.message, "Connection successful!");
    }
}

#[tokio::test]
async fn connection_test_echoes_the_raw_error() {
    let (server, node) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/profile/user"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "success": false })))
        .mount(&server)
        .await;

    let result = node.test_credential(&credential()).await;
    assert_eq!(result.status, CredentialTestStatus::Error);
    assert!(result.message.contains("401"), "message: {}", result.message);
    assert!(!result.message.starts_with("Network error"));
}

#[tokio::test]
async fn connection_test_reports_missing_key() {
    let (_server, node) = setup().await;

    let result = node.test_credential(&DecryptedCredential::new("wigleApi")).await;
    assert!(!result.is_ok());
    assert!(result.message.contains("api_key"));
}
