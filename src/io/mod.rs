//! IO modules - external system interfaces
//!
//! - `tag_source` - where tag reads come from (reader driver seam)
//! - `api` - HTTP client posting events to the backend

pub mod api;
pub mod tag_source;

// Re-export commonly used types
pub use api::{ApiDispatcher, DispatchOutcome, EventDispatcher};
pub use tag_source::{FileTagSource, NullTagSource, TagSource};
