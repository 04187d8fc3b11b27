//! Tag sources - where the poller gets the current tag set from
//!
//! The reader hardware driver is platform specific and lives outside this
//! crate. Anything that can produce a `TagSet` on demand plugs in through
//! `TagSource`:
//! - `NullTagSource` - no hardware attached, always reads an empty field
//! - `FileTagSource` - re-reads a text file every cycle (bench setups, demos)

use crate::domain::TagSet;
use anyhow::Context;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, info};

/// Produces the set of tags currently in the reader field.
///
/// No latency or completeness guarantee. An `Err` aborts the current poll
/// cycle and puts the poller into its error cooldown.
#[async_trait]
pub trait TagSource: Send {
    async fn read_tags(&mut self) -> anyhow::Result<TagSet>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

#[async_trait]
impl<T: TagSource + ?Sized> TagSource for Box<T> {
    async fn read_tags(&mut self) -> anyhow::Result<TagSet> {
        (**self).read_tags().await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Stand-in for an unattached reader
#[derive(Debug, Default)]
pub struct NullTagSource;

#[async_trait]
impl TagSource for NullTagSource {
    async fn read_tags(&mut self) -> anyhow::Result<TagSet> {
        Ok(TagSet::new())
    }

    fn name(&self) -> &'static str {
        "null"
    }
}

/// Reads tag ids from a text file, one per line.
///
/// Blank lines and `#` comments are skipped. A missing file means no tags
/// are in range.
#[derive(Debug)]
pub struct FileTagSource {
    path: PathBuf,
}

impl FileTagSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        info!(path = %path.display(), "tag_file_source_initialized");
        Self { path }
    }

    /// Parse file contents into a tag set
    pub fn parse(content: &str) -> TagSet {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .collect()
    }
}

#[async_trait]
impl TagSource for FileTagSource {
    async fn read_tags(&mut self) -> anyhow::Result<TagSet> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => {
                let tags = Self::parse(&content);
                debug!(path = %self.path.display(), tags = %tags.len(), "tag_file_read");
                Ok(tags)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(TagSet::new()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read tag file {}", self.path.display())),
        }
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

/// Pick the tag source for the configured reader
pub fn from_config(tag_file: Option<&str>) -> Box<dyn TagSource> {
    match tag_file {
        Some(path) => Box::new(FileTagSource::new(path)),
        None => Box::new(NullTagSource),
    }
}
