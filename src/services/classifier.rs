//! Departure/arrival classification from two tag set snapshots
//!
//! Only set emptiness, equality and size are used; which tags appeared or
//! left is not considered. Labels are kept as the backend expects them, even
//! though a growing set being a "departure" reads backwards.

use crate::domain::{EventType, TagSet};

/// Classify the change from `last` to `current`.
///
/// 1. empty → non-empty: departure
/// 2. non-empty → empty: arrival
/// 3. otherwise unequal: departure if the set grew, else arrival
/// 4. equal (including both empty): no event
pub fn classify(last: &TagSet, current: &TagSet) -> Option<EventType> {
    if last.is_empty() && !current.is_empty() {
        Some(EventType::Departure)
    } else if !last.is_empty() && current.is_empty() {
        Some(EventType::Arrival)
    } else if last != current {
        if current.len() > last.len() {
            Some(EventType::Departure)
        } else {
            Some(EventType::Arrival)
        }
    } else {
        None
    }
}
