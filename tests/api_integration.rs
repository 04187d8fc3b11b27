//! Integration tests for the backend API client using wiremock.

use rfid_door_reader::domain::{EventType, TagSet};
use rfid_door_reader::infra::Config;
use rfid_door_reader::io::{ApiDispatcher, DispatchOutcome, EventDispatcher};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn dispatcher_for(server: &MockServer) -> ApiDispatcher {
    let config = Config::default().with_api_base_url(format!("{}/api", server.uri()));
    ApiDispatcher::new(&config).unwrap()
}

fn tags(ids: &[&str]) -> TagSet {
    ids.iter().copied().collect()
}

#[tokio::test]
async fn posts_event_json_to_rfid_endpoint() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/rfid/event"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dispatcher = dispatcher_for(&mock_server);
    let outcome = dispatcher.dispatch(&tags(&["A2", "A1"]), EventType::Departure).await.unwrap();
    assert_eq!(outcome, DispatchOutcome::Delivered { status: 201 });

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["tags"], serde_json::json!(["A1", "A2"]));
    assert_eq!(body["event_type"], "departure");
    assert_eq!(body["location"], "main_door");
    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    assert_eq!(body.as_object().unwrap().len(), 4);
}

#[tokio::test]
async fn arrival_with_no_tags_sends_empty_array() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/rfid/event"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let dispatcher = dispatcher_for(&mock_server);
    let outcome = dispatcher.dispatch(&TagSet::new(), EventType::Arrival).await.unwrap();
    assert!(outcome.is_delivered());

    let requests = mock_server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["tags"], serde_json::json!([]));
    assert_eq!(body["event_type"], "arrival");
}

#[tokio::test]
async fn server_error_is_reported_not_raised() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/rfid/event"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dispatcher = dispatcher_for(&mock_server);
    let outcome = dispatcher.dispatch(&tags(&["A1"]), EventType::Departure).await.unwrap();
    assert_eq!(outcome, DispatchOutcome::Rejected { status: 500 });
}

#[tokio::test]
async fn client_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/rfid/event"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dispatcher = dispatcher_for(&mock_server);
    let outcome = dispatcher.dispatch(&tags(&["A1"]), EventType::Arrival).await.unwrap();
    assert_eq!(outcome, DispatchOutcome::Rejected { status: 404 });
}

#[tokio::test]
async fn slow_backend_hits_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/rfid/event"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&mock_server)
        .await;

    let mut temp_file = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(
        &mut temp_file,
        format!("[api]\nbase_url = \"{}/api\"\ntimeout_ms = 200\n", mock_server.uri()).as_bytes(),
    )
    .unwrap();
    let config = Config::from_file(temp_file.path()).unwrap();
    let dispatcher = ApiDispatcher::new(&config).unwrap();

    let outcome = dispatcher.dispatch(&tags(&["A1"]), EventType::Departure).await.unwrap();
    assert_eq!(outcome, DispatchOutcome::Unreachable);
}
