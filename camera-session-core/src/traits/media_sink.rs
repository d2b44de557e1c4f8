use std::path::Path;

use crate::models::camera_models::CapturedPhoto;
use crate::models::error::CameraError;
use crate::models::state::AuthorizationState;

/// Destination for finished photos and movies (a system media library or
/// equivalent).
pub trait MediaSink: Send + Sync {
    /// Checked (and, if needed, requested) before every save.
    fn authorize(&self) -> AuthorizationState;

    fn save_photo(&self, photo: &CapturedPhoto) -> Result<(), CameraError>;

    /// Persist the movie at `path`. The sink may move the file; the session
    /// removes whatever is left at `path` afterwards.
    fn save_video(&self, path: &Path) -> Result<(), CameraError>;
}
