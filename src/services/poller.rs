//! Reader polling loop
//!
//! One cycle: read the current tag set, classify it against the last
//! dispatched set, and if there is an event, dispatch it and remember the
//! new set. The loop sleeps `poll_interval` after a normal cycle and
//! `error_backoff` after a cycle that failed.
//!
//! The poller owns `ReaderState` and awaits each dispatch before the next
//! read, so at most one event is in flight and `last_tags` is updated in
//! dispatch order.

use crate::domain::{EventType, ReaderState};
use crate::infra::config::Config;
use crate::infra::metrics::Metrics;
use crate::io::api::{DispatchOutcome, EventDispatcher};
use crate::io::tag_source::TagSource;
use crate::services::classifier::classify;
use anyhow::Context;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::{debug, error, info, trace};

/// What a single successful cycle did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Tag set unchanged, nothing sent
    Idle,
    /// Event sent (or attempted) and state advanced
    Dispatched { event_type: EventType, outcome: DispatchOutcome },
}

pub struct Poller<S, D> {
    source: S,
    dispatcher: D,
    state: ReaderState,
    poll_interval: Duration,
    error_backoff: Duration,
    metrics: Arc<Metrics>,
}

impl<S: TagSource, D: EventDispatcher> Poller<S, D> {
    pub fn new(config: &Config, source: S, dispatcher: D, metrics: Arc<Metrics>) -> Self {
        Self {
            source,
            dispatcher,
            state: ReaderState::new(),
            poll_interval: Duration::from_millis(config.poll_interval_ms()),
            error_backoff: Duration::from_millis(config.error_backoff_ms()),
            metrics,
        }
    }

    pub fn state(&self) -> &ReaderState {
        &self.state
    }

    /// Run one read/classify/dispatch cycle.
    ///
    /// An `Err` leaves `last_tags` untouched. A failed delivery is not an
    /// error: the state still advances to the tags that were read.
    pub async fn poll_once(&mut self) -> anyhow::Result<CycleOutcome> {
        let current = self
            .source
            .read_tags()
            .await
            .with_context(|| format!("Failed to read tags from {} source", self.source.name()))?;

        self.metrics.record_cycle(current.len());

        let Some(event_type) = classify(&self.state.last_tags, &current) else {
            trace!(tags = %current.len(), "rfid_poll");
            return Ok(CycleOutcome::Idle);
        };

        debug!(
            event_type = %event_type,
            last = %self.state.last_tags,
            current = %current,
            "rfid_change_detected"
        );

        let start = Instant::now();
        let outcome = self.dispatcher.dispatch(&current, event_type).await?;
        let latency_us = start.elapsed().as_micros() as u64;
        self.metrics.record_dispatch(event_type, outcome.is_delivered(), latency_us);

        self.state.last_tags = current;

        Ok(CycleOutcome::Dispatched { event_type, outcome })
    }

    /// Poll until shutdown is signalled, then return the final state.
    ///
    /// A dropped shutdown sender also stops the loop.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> ReaderState {
        info!(
            source = %self.source.name(),
            poll_interval_ms = %self.poll_interval.as_millis(),
            error_backoff_ms = %self.error_backoff.as_millis(),
            "rfid_reader_started"
        );

        loop {
            let result = tokio::select! {
                biased;
                _ = wait_for_shutdown(&mut shutdown) => break,
                result = self.poll_once() => result,
            };

            let delay = match result {
                Ok(_) => self.poll_interval,
                Err(e) => {
                    self.metrics.record_cycle_error();
                    error!(
                        error = %format!("{e:#}"),
                        backoff_ms = %self.error_backoff.as_millis(),
                        "rfid_cycle_error"
                    );
                    self.error_backoff
                }
            };

            tokio::select! {
                biased;
                _ = wait_for_shutdown(&mut shutdown) => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        info!(tags = %self.state.last_tags.len(), "rfid_reader_stopped");
        self.state
    }
}

async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    // Err means the sender is gone, treated the same as a stop request
    let _ = shutdown.wait_for(|stop| *stop).await;
}
