//! End-to-end pipeline tests against the in-memory service client

use portico_client::MemoryServiceClient;
use portico_gateway::{Envelope, Gateway, GatewayConfig};
use portico_core::{HttpResponse, ServiceRequest};
use serde_json::{json, Value};
use std::sync::Arc;

fn client() -> MemoryServiceClient {
    MemoryServiceClient::new()
        .with_user("key-1", "ada", "secret")
        .with_profile(json!({"username": "ada", "timezone": "UTC"}))
}

fn gateway(client: Arc<MemoryServiceClient>) -> Gateway {
    Gateway::new(&GatewayConfig::default(), client).unwrap()
}

fn envelope(body: Value) -> Envelope {
    Envelope {
        body: Some(body),
        ..Envelope::default()
    }
}

fn authed(extra: Value) -> Value {
    let mut body = json!({"apikey": "key-1", "authkey": "secret"});
    if let (Some(body_map), Some(extra_map)) = (body.as_object_mut(), extra.as_object()) {
        for (key, value) in extra_map {
            body_map.insert(key.clone(), value.clone());
        }
    }
    body
}

fn body_json(response: &HttpResponse) -> Value {
    serde_json::from_str(&response.body).unwrap()
}

fn assert_correlation_id(guid: &str) {
    assert_eq!(guid.len(), 36, "{guid}");
    for (index, ch) in guid.chars().enumerate() {
        match index {
            8 | 13 | 18 | 23 => assert_eq!(ch, '-', "{guid}"),
            14 => assert_eq!(ch, '4', "{guid}"),
            19 => assert!(matches!(ch, '8' | '9' | 'a' | 'b'), "{guid}"),
            _ => assert!(ch.is_ascii_hexdigit(), "{guid}"),
        }
    }
}

#[tokio::test]
async fn reflect_mode_echoes_the_request_and_generates_correlation_ids() {
    let client = Arc::new(client());
    let body = authed(json!({"mode": "reflect", "method": "person-search"}));

    let response = gateway(client)
        .handle(envelope(body.clone()), json!({}))
        .await;
    assert_eq!(response.status_code, 200);

    let data = body_json(&response);
    assert_eq!(data["reflected"], body);
    assert_eq!(data["status"], "OK");
    assert_eq!(data["method"], "person-search");

    let guids = data["guids"].as_object().unwrap();
    assert_eq!(guids.len(), 2);
    assert_correlation_id(guids["log"].as_str().unwrap());
    assert_correlation_id(guids["audit"].as_str().unwrap());
}

#[tokio::test]
async fn bad_apikey_is_a_401_naming_the_key() {
    let client = Arc::new(client());
    let body = json!({"apikey": "no-such-key", "authkey": "secret"});

    let response = gateway(client).handle(envelope(body), json!({})).await;
    assert_eq!(response.status_code, 401);
    assert_eq!(body_json(&response)["error"], "Bad apikey [no-such-key]");
}

#[tokio::test]
async fn bad_authkey_is_a_401_naming_the_key() {
    let client = Arc::new(client());
    let body = json!({"apikey": "key-1", "authkey": "wrong"});

    let response = gateway(client).handle(envelope(body), json!({})).await;
    assert_eq!(response.status_code, 401);
    assert_eq!(body_json(&response)["error"], "Bad authkey [wrong]");
}

#[tokio::test]
async fn identity_lookup_failure_is_a_401() {
    let client = Arc::new(client().with_failing("setup_user"));

    let response = gateway(client)
        .handle(envelope(authed(json!({}))), json!({}))
        .await;
    assert_eq!(response.status_code, 401);
    assert_eq!(
        body_json(&response)["error"],
        "Error processing user authentication."
    );
}

#[tokio::test]
async fn unknown_method_is_a_400_naming_the_method() {
    let client = Arc::new(client());
    let body = authed(json!({"method": "no-such-method"}));

    let response = gateway(client).handle(envelope(body), json!({})).await;
    assert_eq!(response.status_code, 400);

    let data = body_json(&response);
    assert_eq!(data["status"], "ER");
    assert_eq!(data["error"]["code"], "2");
    assert_eq!(
        data["error"]["description"],
        "Not a valid method [no-such-method]"
    );
}

#[tokio::test]
async fn person_search_projects_matched_rows() {
    let client = Arc::new(client().with_rows(
        "contact_person",
        vec![
            json!({
                "firstname": "Ada",
                "surname": "Lovelace",
                "guid": "guid-1",
                "etag": "e1",
                "modifieddate": "2024-01-01"
            }),
            json!({
                "firstname": "Grace",
                "surname": "Hopper",
                "guid": "guid-2",
                "etag": "e2",
                "modifieddate": "2024-02-02"
            }),
        ],
    ));
    let body = authed(json!({
        "method": "person-search",
        "data": {"firstname": "Ada", "surname": ""}
    }));

    let response = gateway(client.clone()).handle(envelope(body), json!({})).await;
    assert_eq!(response.status_code, 200);

    let data = body_json(&response);
    assert_eq!(data["method"], "person-search");
    assert_eq!(data["status"], "OK");
    let people = data["data"].as_array().unwrap();
    assert_eq!(people.len(), 1);
    assert_eq!(people[0]["firstname"], "Ada");
    assert_eq!(people[0]["lastname"], "Lovelace");
    assert_eq!(people[0]["guid"], "guid-1");
    assert_eq!(people[0]["modifieddatetime"], "2024-01-01");

    // First search authenticates, second is the business search
    let searches = client.searches();
    assert_eq!(searches.len(), 2);
    assert_eq!(searches[1].object, "contact_person");
    assert_eq!(searches[1].filters.len(), 1);
    assert_eq!(searches[1].filters[0].field, "firstname");
    assert_eq!(searches[1].row_limit, Some(99999));
}

#[tokio::test]
async fn person_search_with_all_empty_fields_sends_no_filters() {
    let client = Arc::new(client().with_rows("contact_person", vec![]));
    let body = authed(json!({
        "method": "person-search",
        "data": {"firstname": "", "surname": null}
    }));

    let response = gateway(client.clone()).handle(envelope(body), json!({})).await;
    assert_eq!(response.status_code, 200);

    let searches = client.searches();
    assert!(searches[1].filters.is_empty());
}

#[tokio::test]
async fn person_search_without_data_is_a_403() {
    let client = Arc::new(client());
    let body = authed(json!({"method": "person-search"}));

    let response = gateway(client).handle(envelope(body), json!({})).await;
    assert_eq!(response.status_code, 403);
    assert_eq!(body_json(&response)["error"], "Missing data.");
}

#[tokio::test]
async fn person_search_backend_failure_is_a_500() {
    let client = Arc::new(client().with_failing("contact_person"));
    let body = authed(json!({
        "method": "person-search",
        "data": {"firstname": "Ada"}
    }));

    let response = gateway(client).handle(envelope(body), json!({})).await;
    assert_eq!(response.status_code, 500);
    assert_eq!(body_json(&response)["error"], "Can not process request.");
}

#[tokio::test]
async fn audit_log_writes_one_record_when_enabled() {
    let client = Arc::new(client());
    let config = GatewayConfig {
        audit_log: true,
        ..GatewayConfig::default()
    };
    let gateway = Gateway::new(&config, client.clone()).unwrap();
    let body = authed(json!({"method": "no-such-method"}));

    let response = gateway.handle(envelope(body), json!({})).await;
    assert_eq!(response.status_code, 400);

    let audit_writes: Vec<_> = client
        .requests()
        .into_iter()
        .filter(|request| match request {
            ServiceRequest::Invoke(invoke) => {
                invoke.object.as_deref() == Some("core_debug_log")
            }
            _ => false,
        })
        .collect();
    assert_eq!(audit_writes.len(), 1);
}

#[tokio::test]
async fn text_body_is_decoded_before_authentication() {
    let client = Arc::new(client());
    let text = r#"{"apikey": "key-1", "authkey": "secret", "mode": "reflect"}"#;

    let response = gateway(client)
        .handle(envelope(json!(text)), json!({}))
        .await;
    assert_eq!(response.status_code, 200);
    assert_eq!(body_json(&response)["reflected"]["apikey"], "key-1");
}

#[tokio::test]
async fn invalid_json_text_body_is_an_internal_error() {
    let client = Arc::new(client());

    let response = gateway(client)
        .handle(envelope(json!("{broken")), json!({}))
        .await;
    assert_eq!(response.status_code, 500);
    assert_eq!(body_json(&response)["error"], "Internal server error.");
}
