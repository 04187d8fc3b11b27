//! End-to-end reader cycles: file tag source -> classifier -> HTTP backend

use rfid_door_reader::domain::{EventType, TagSet};
use rfid_door_reader::infra::{Config, Metrics};
use rfid_door_reader::io::{ApiDispatcher, DispatchOutcome, FileTagSource};
use rfid_door_reader::services::{CycleOutcome, Poller};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn tags(ids: &[&str]) -> TagSet {
    ids.iter().copied().collect()
}

fn poller_for(base_url: &str, tag_file: &Path) -> Poller<FileTagSource, ApiDispatcher> {
    let config = Config::default().with_api_base_url(base_url);
    let dispatcher = ApiDispatcher::new(&config).unwrap();
    Poller::new(&config, FileTagSource::new(tag_file), dispatcher, Arc::new(Metrics::new()))
}

async fn backend() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/rfid/event"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    server
}

async fn posted_bodies(server: &MockServer) -> Vec<serde_json::Value> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

#[tokio::test]
async fn departure_then_arrival() {
    let server = backend().await;
    let dir = tempdir().unwrap();
    let tag_file = dir.path().join("tags.txt");
    let mut poller = poller_for(&format!("{}/api", server.uri()), &tag_file);

    // Tags come into range
    fs::write(&tag_file, "A1\nA2\n").unwrap();
    let outcome = poller.poll_once().await.unwrap();
    assert!(matches!(
        outcome,
        CycleOutcome::Dispatched { event_type: EventType::Departure, outcome: o } if o.is_delivered()
    ));
    assert_eq!(poller.state().last_tags, tags(&["A1", "A2"]));

    // Tags leave the field
    fs::write(&tag_file, "").unwrap();
    let outcome = poller.poll_once().await.unwrap();
    assert!(matches!(outcome, CycleOutcome::Dispatched { event_type: EventType::Arrival, .. }));
    assert!(poller.state().last_tags.is_empty());

    let bodies = posted_bodies(&server).await;
    assert_eq!(bodies.len(), 2);
    assert_eq!(bodies[0]["event_type"], "departure");
    assert_eq!(bodies[0]["tags"], serde_json::json!(["A1", "A2"]));
    assert_eq!(bodies[1]["event_type"], "arrival");
    assert_eq!(bodies[1]["tags"], serde_json::json!([]));
}

#[tokio::test]
async fn steady_tags_post_nothing() {
    let server = backend().await;
    let dir = tempdir().unwrap();
    let tag_file = dir.path().join("tags.txt");
    let mut poller = poller_for(&format!("{}/api", server.uri()), &tag_file);

    fs::write(&tag_file, "A1\n").unwrap();
    poller.poll_once().await.unwrap();

    for _ in 0..3 {
        assert_eq!(poller.poll_once().await.unwrap(), CycleOutcome::Idle);
    }
    assert_eq!(poller.state().last_tags, tags(&["A1"]));
    assert_eq!(posted_bodies(&server).await.len(), 1);
}

#[tokio::test]
async fn no_tags_ever_posts_nothing() {
    let server = backend().await;
    let dir = tempdir().unwrap();
    let mut poller = poller_for(&format!("{}/api", server.uri()), &dir.path().join("absent.txt"));

    for _ in 0..3 {
        assert_eq!(poller.poll_once().await.unwrap(), CycleOutcome::Idle);
    }
    assert!(posted_bodies(&server).await.is_empty());
}

#[tokio::test]
async fn backend_down_still_advances_state() {
    let dir = tempdir().unwrap();
    let tag_file = dir.path().join("tags.txt");
    fs::write(&tag_file, "A1\n").unwrap();

    // Nothing listens on the discard port
    let mut poller = poller_for("http://127.0.0.1:9/api", &tag_file);

    let outcome = poller.poll_once().await.unwrap();
    assert_eq!(
        outcome,
        CycleOutcome::Dispatched {
            event_type: EventType::Departure,
            outcome: DispatchOutcome::Unreachable
        }
    );
    assert_eq!(poller.state().last_tags, tags(&["A1"]));

    // Same tags on the next cycle: no re-send of the lost event
    assert_eq!(poller.poll_once().await.unwrap(), CycleOutcome::Idle);
}
