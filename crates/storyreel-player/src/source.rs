//! Profile source backed by a JSON file on disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use storyreel_core::error::DomainError;
use storyreel_core::source::ProfileSource;
use tracing::debug;

/// Reads the profile document from a local JSON file on every fetch.
///
/// Caching is the loader's job.
#[derive(Debug, Clone)]
pub struct FileProfileSource {
    path: PathBuf,
}

impl FileProfileSource {
    /// Creates a source for the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this source reads.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ProfileSource for FileProfileSource {
    async fn fetch_profiles(&self) -> Result<serde_json::Value, DomainError> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            DomainError::Source(format!("failed to read {}: {e}", self.path.display()))
        })?;
        debug!(path = %self.path.display(), bytes = raw.len(), "read profile document");
        serde_json::from_str(&raw).map_err(|e| {
            DomainError::Source(format!("invalid JSON in {}: {e}", self.path.display()))
        })
    }
}
