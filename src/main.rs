//! RFID door reader - reports departures and arrivals at the door
//!
//! Polls the tag reader once a second, classifies changes in the set of
//! tags in range, and posts each classified change to the backend API.
//!
//! Module structure:
//! - `domain/` - Core types (TagSet, EventType, RfidEvent)
//! - `io/` - External interfaces (tag source, backend API)
//! - `services/` - Classifier and polling loop
//! - `infra/` - Infrastructure (Config, Logging, Metrics)

use clap::Parser;
use rfid_door_reader::infra::{init_logging, Config, Metrics};
use rfid_door_reader::io::{tag_source, ApiDispatcher};
use rfid_door_reader::services::Poller;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

/// RFID door reader - tag presence to departure/arrival events
#[derive(Parser, Debug)]
#[command(name = "rfid-door-reader", version, about)]
struct Args {
    /// Path to TOML configuration file (falls back to CONFIG_FILE, then config/reader.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Backend API base URL, overrides `api.base_url`
    #[arg(long)]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Config comes first so the log file location is known
    let config_path = Config::resolve_config_path(args.config.as_deref());
    let mut config = Config::load_from_path(&config_path);
    if let Some(url) = args.api_url {
        config = config.with_api_base_url(url);
    }

    let _log_guard = match init_logging(Some(config.log_file())) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Warning: {:#}. Logging to stdout only.", e);
            init_logging(None)?
        }
    };

    info!(git_rev = env!("READER_GIT_REV"), "rfid-door-reader starting");
    info!(
        config_file = %config.config_file(),
        event_url = %config.event_url(),
        api_timeout_ms = %config.api_timeout_ms(),
        location = %config.location(),
        poll_interval_ms = %config.poll_interval_ms(),
        error_backoff_ms = %config.error_backoff_ms(),
        tag_file = ?config.tag_file(),
        log_file = %config.log_file(),
        "config_loaded"
    );

    // Create shutdown signal
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let metrics = Arc::new(Metrics::new());

    // Start metrics reporter
    let metrics_interval = config.metrics_interval_secs();
    if metrics_interval > 0 {
        let metrics_clone = metrics.clone();
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(std::time::Duration::from_secs(metrics_interval));
            // First tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                metrics_clone.report().log();
            }
        });
    }

    let dispatcher = ApiDispatcher::new(&config)?;
    let source = tag_source::from_config(config.tag_file());
    let poller = Poller::new(&config, source, dispatcher, metrics.clone());

    // Handle shutdown on Ctrl+C
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("RFID reader stopped by user");
        let _ = shutdown_tx.send(true);
    });

    let state = poller.run(shutdown_rx).await;

    metrics.report().log();
    info!(last_tags = %state.last_tags, "rfid-door-reader shutdown complete");
    Ok(())
}
