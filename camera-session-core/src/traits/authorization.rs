use crate::models::camera_models::MediaType;
use crate::models::state::AuthorizationState;

/// Platform permission check for camera and microphone access.
pub trait HardwareAuthorization: Send + Sync {
    /// Current verdict. Never blocks.
    fn query_status(&self, media: MediaType) -> AuthorizationState;

    /// Prompt the user when the verdict is undetermined and block until they
    /// answer. Returns immediately otherwise.
    fn request_if_undetermined(&self, media: MediaType) -> AuthorizationState;
}
