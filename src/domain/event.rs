//! Event record posted to the backend API

use crate::domain::types::{EventType, TagSet};
use chrono::{DateTime, Local, SecondsFormat};
use serde::Serialize;

/// Default reader location reported with every event
pub const DEFAULT_LOCATION: &str = "main_door";

/// A classified tag set change, serialized as the `/rfid/event` request body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RfidEvent {
    pub tags: TagSet,
    pub event_type: EventType,
    /// ISO-8601 local time with offset
    pub timestamp: String,
    pub location: String,
}

impl RfidEvent {
    /// Build an event stamped with the current local time
    pub fn new(tags: TagSet, event_type: EventType, location: &str) -> Self {
        Self::at(tags, event_type, location, Local::now())
    }

    pub fn at(tags: TagSet, event_type: EventType, location: &str, at: DateTime<Local>) -> Self {
        Self {
            tags,
            event_type,
            timestamp: at.to_rfc3339_opts(SecondsFormat::Micros, false),
            location: location.to_string(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
