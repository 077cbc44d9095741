//! Profile source abstraction.

use async_trait::async_trait;

use crate::error::DomainError;

/// The external collaborator that supplies the raw profile list.
///
/// Implementations perform a single best-effort fetch; retrying is not their
/// concern. The returned document is decoded tolerantly by the catalog crate.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Fetches the raw profile document.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Source` if the document cannot be read or parsed
    /// as JSON.
    async fn fetch_profiles(&self) -> Result<serde_json::Value, DomainError>;
}
