//! Shared types for the RFID door reader

use serde::Serialize;
use std::collections::BTreeSet;

/// Set of tag identifiers seen in a single read of the reader field.
///
/// Backed by a sorted set so duplicates collapse and the wire order of
/// `tags` is stable. Equality is plain set equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagSet(BTreeSet<String>);

impl TagSet {
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl std::fmt::Display for TagSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[")?;
        for (i, tag) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(tag)?;
        }
        f.write_str("]")
    }
}

/// Classification of a tag set change.
///
/// Labels follow the backend contract: a growing tag set is reported as a
/// departure, a shrinking one as an arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Departure,
    Arrival,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Departure => "departure",
            EventType::Arrival => "arrival",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Poller state carried across cycles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReaderState {
    /// Tag set of the most recently dispatched event
    pub last_tags: TagSet,
}

impl ReaderState {
    pub fn new() -> Self {
        Self::default()
    }
}
