//! Storyreel player — host error types.

use storyreel_core::error::DomainError;
use thiserror::Error;

/// Startup and runtime errors for the host binary.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Reading stdin or the profile file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The playback engine rejected an operation.
    #[error("playback error: {0}")]
    Domain(#[from] DomainError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyreel_core::ids::OwnerId;

    #[test]
    fn test_domain_error_converts_and_keeps_message() {
        let err: AppError = DomainError::OwnerNotFound(OwnerId::new("42")).into();

        assert!(matches!(err, AppError::Domain(_)));
        assert_eq!(
            err.to_string(),
            "playback error: owner not found or has no stories: 42"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let err: AppError = std::io::Error::other("stdin closed").into();

        assert!(matches!(err, AppError::Io(_)));
    }
}
