//! Test profile sources — mock `ProfileSource` implementations for tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use storyreel_core::error::DomainError;
use storyreel_core::source::ProfileSource;

/// A profile source that always returns the same document.
#[derive(Debug, Clone)]
pub struct StaticProfileSource {
    document: serde_json::Value,
}

impl StaticProfileSource {
    /// Creates a source serving `document`.
    #[must_use]
    pub fn new(document: serde_json::Value) -> Self {
        Self { document }
    }
}

#[async_trait]
impl ProfileSource for StaticProfileSource {
    async fn fetch_profiles(&self) -> Result<serde_json::Value, DomainError> {
        Ok(self.document.clone())
    }
}

/// A profile source that counts how many times it was fetched. Clones share
/// the counter.
#[derive(Debug, Clone)]
pub struct CountingProfileSource {
    document: serde_json::Value,
    fetches: Arc<AtomicUsize>,
}

impl CountingProfileSource {
    /// Creates a counting source serving `document`.
    #[must_use]
    pub fn new(document: serde_json::Value) -> Self {
        Self {
            document,
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of completed fetches.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileSource for CountingProfileSource {
    async fn fetch_profiles(&self) -> Result<serde_json::Value, DomainError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.document.clone())
    }
}

/// A profile source that always fails. Useful for testing the empty-catalog
/// fallback.
#[derive(Debug)]
pub struct FailingProfileSource;

#[async_trait]
impl ProfileSource for FailingProfileSource {
    async fn fetch_profiles(&self) -> Result<serde_json::Value, DomainError> {
        Err(DomainError::Source("connection refused".into()))
    }
}
