//! Cached profile loading.
//!
//! The profile list is fetched once per application run. A successful fetch
//! is cached and served to every later caller; a failed fetch is logged and
//! surfaces as an empty catalog. Failures are not retried here.

use std::sync::Arc;

use storyreel_core::error::DomainError;
use storyreel_core::source::ProfileSource;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::domain::catalog::StoryCatalog;
use crate::domain::profile::{Owner, decode_profiles};

/// Loads profiles from a [`ProfileSource`] and caches the first success.
#[derive(Debug)]
pub struct CachedProfileLoader<S> {
    source: S,
    cache: Mutex<Option<Arc<[Owner]>>>,
}

impl<S: ProfileSource> CachedProfileLoader<S> {
    /// Wraps a profile source.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: Mutex::new(None),
        }
    }

    /// Returns the decoded owner list, fetching it on the first call.
    ///
    /// # Errors
    ///
    /// Returns the source's `DomainError` if the fetch fails. Nothing is
    /// cached in that case.
    #[instrument(skip(self))]
    pub async fn load_owners(&self) -> Result<Arc<[Owner]>, DomainError> {
        let mut cache = self.cache.lock().await;
        if let Some(owners) = cache.as_ref() {
            return Ok(Arc::clone(owners));
        }

        let document = self.source.fetch_profiles().await?;
        let owners: Arc<[Owner]> = decode_profiles(&document).into();
        info!(owner_count = owners.len(), "loaded profiles");
        *cache = Some(Arc::clone(&owners));
        Ok(owners)
    }

    /// Builds the story catalog from the cached owner list.
    ///
    /// A failed fetch yields an empty catalog.
    #[instrument(skip(self))]
    pub async fn load_catalog(&self) -> StoryCatalog {
        match self.load_owners().await {
            Ok(owners) => {
                let catalog = StoryCatalog::build(&owners);
                info!(story_count = catalog.len(), "built story catalog");
                catalog
            }
            Err(e) => {
                warn!(error = %e, "failed to load profiles; story catalog is empty");
                StoryCatalog::empty()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use storyreel_test_support::{
        CountingProfileSource, FailingProfileSource, StaticProfileSource, owner_json,
    };

    #[tokio::test]
    async fn test_load_catalog_builds_entries_from_source() {
        // Arrange
        let document = json!([owner_json("a", &["1", "2"]), owner_json("b", &["1"])]);
        let loader = CachedProfileLoader::new(StaticProfileSource::new(document));

        // Act
        let catalog = loader.load_catalog().await;

        // Assert
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.owners().len(), 2);
    }

    #[tokio::test]
    async fn test_load_owners_fetches_only_once() {
        // Arrange
        let source = CountingProfileSource::new(json!([owner_json("a", &["1"])]));
        let loader = CachedProfileLoader::new(source.clone());

        // Act
        let first = loader.load_owners().await.unwrap();
        let second = loader.load_owners().await.unwrap();

        // Assert
        assert_eq!(source.fetch_count(), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_load_catalog_is_empty_when_source_fails() {
        let loader = CachedProfileLoader::new(FailingProfileSource);

        let catalog = loader.load_catalog().await;

        assert!(catalog.is_empty());
    }

    #[tokio::test]
    async fn test_load_owners_propagates_source_error() {
        let loader = CachedProfileLoader::new(FailingProfileSource);

        let result = loader.load_owners().await;

        match result {
            Err(DomainError::Source(message)) => assert_eq!(message, "connection refused"),
            other => panic!("expected Source error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_document_yields_empty_catalog_and_is_cached() {
        let source = CountingProfileSource::new(json!({ "unexpected": true }));
        let loader = CachedProfileLoader::new(source.clone());

        assert!(loader.load_catalog().await.is_empty());
        assert!(loader.load_catalog().await.is_empty());
        assert_eq!(source.fetch_count(), 1);
    }
}
