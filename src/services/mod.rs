//! Services - business logic and state management
//!
//! - `classifier` - departure/arrival classification of tag set changes
//! - `poller` - the read/classify/dispatch loop

pub mod classifier;
pub mod poller;

// Re-export commonly used types
pub use classifier::classify;
pub use poller::{CycleOutcome, Poller};
