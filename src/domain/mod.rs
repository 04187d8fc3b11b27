//! Domain models - core business types
//!
//! This module contains the canonical data types used throughout the system:
//! - `TagSet` - tags currently in the reader field
//! - `EventType` - departure/arrival classification
//! - `ReaderState` - last dispatched tag set
//! - `RfidEvent` - record posted to the backend API

pub mod event;
pub mod types;

// Re-export commonly used types at module level
pub use event::{RfidEvent, DEFAULT_LOCATION};
pub use types::{EventType, ReaderState, TagSet};
