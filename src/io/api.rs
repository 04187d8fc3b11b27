//! Backend API client for RFID events
//!
//! POSTs one JSON `RfidEvent` per classified change to `{base_url}/rfid/event`.
//! Delivery is fire-and-forget: HTTP and transport failures are logged and
//! reported as a `DispatchOutcome`, never retried.

use crate::domain::{EventType, RfidEvent, TagSet};
use crate::infra::config::Config;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::{Duration, Instant};
use tracing::{error, info};

/// Result of a single delivery attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Backend answered 2xx
    Delivered { status: u16 },
    /// Backend answered with any other status
    Rejected { status: u16 },
    /// Connection error or timeout
    Unreachable,
}

impl DispatchOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DispatchOutcome::Delivered { .. })
    }
}

/// Sends classified events somewhere.
///
/// Delivery failures come back as `Ok(outcome)`. `Err` is reserved for
/// failures building the event itself, which the poller treats as a cycle
/// error.
#[async_trait]
pub trait EventDispatcher: Send + Sync {
    async fn dispatch(&self, tags: &TagSet, event_type: EventType)
        -> anyhow::Result<DispatchOutcome>;
}

pub struct ApiDispatcher {
    client: reqwest::Client,
    event_url: String,
    location: String,
}

impl ApiDispatcher {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let timeout = Duration::from_millis(config.api_timeout_ms());

        // Create HTTP client once for reuse (connection pooling)
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            event_url: config.event_url(),
            location: config.location().to_string(),
        })
    }

    pub fn event_url(&self) -> &str {
        &self.event_url
    }

    /// POST an already built event
    pub async fn send(&self, event: &RfidEvent) -> anyhow::Result<DispatchOutcome> {
        let body = event.to_json().context("Failed to serialize RFID event")?;
        let start = Instant::now();

        let result = self
            .client
            .post(&self.event_url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await;

        let latency_us = start.elapsed().as_micros() as u64;

        let outcome = match result {
            Ok(response) if response.status().is_success() => {
                let status = response.status().as_u16();
                info!(
                    event_type = %event.event_type,
                    tags = %event.tags.len(),
                    status = %status,
                    latency_us = %latency_us,
                    "rfid_event_sent"
                );
                DispatchOutcome::Delivered { status }
            }
            Ok(response) => {
                let status = response.status().as_u16();
                error!(
                    event_type = %event.event_type,
                    tags = %event.tags.len(),
                    status = %status,
                    latency_us = %latency_us,
                    url = %self.event_url,
                    "rfid_event_rejected"
                );
                DispatchOutcome::Rejected { status }
            }
            Err(e) => {
                error!(
                    event_type = %event.event_type,
                    tags = %event.tags.len(),
                    error = %e,
                    timeout = e.is_timeout(),
                    latency_us = %latency_us,
                    url = %self.event_url,
                    "rfid_event_send_failed"
                );
                DispatchOutcome::Unreachable
            }
        };

        Ok(outcome)
    }
}

#[async_trait]
impl EventDispatcher for ApiDispatcher {
    async fn dispatch(
        &self,
        tags: &TagSet,
        event_type: EventType,
    ) -> anyhow::Result<DispatchOutcome> {
        let event = RfidEvent::new(tags.clone(), event_type, &self.location);
        self.send(&event).await
    }
}
