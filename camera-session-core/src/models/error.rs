use thiserror::Error;

/// Errors that can occur during camera session operations.
///
/// `Clone + PartialEq` so failures can ride inside completion events.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CameraError {
    #[error("camera access denied")]
    AuthorizationDenied,

    #[error("no camera device available")]
    NoCameraAvailable,

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("operation failed: {0}")]
    OperationFailed(String),

    #[error("encoding failed: {0}")]
    EncodingFailed(String),

    #[error("persistence failed: {0}")]
    PersistenceFailed(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

impl CameraError {
    /// Session-level failures that leave the session unusable until reconfigured.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::AuthorizationDenied | Self::NoCameraAvailable | Self::ConfigurationFailed(_)
        )
    }
}
