//! Infrastructure - configuration, logging, and metrics
//!
//! This module contains infrastructure concerns:
//! - `config` - Application configuration (TOML loading, defaults)
//! - `logging` - stdout + file log sinks
//! - `metrics` - Lock-free reader counters

pub mod config;
pub mod logging;
pub mod metrics;

// Re-export commonly used types
pub use config::Config;
pub use logging::init_logging;
pub use metrics::Metrics;
