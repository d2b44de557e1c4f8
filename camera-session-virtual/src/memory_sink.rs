use std::fs;
use std::path::Path;

use parking_lot::Mutex;

use camera_session_core::models::camera_models::CapturedPhoto;
use camera_session_core::models::error::CameraError;
use camera_session_core::models::state::AuthorizationState;
use camera_session_core::traits::media_sink::MediaSink;

/// Media library kept in memory, with scriptable access and failures.
#[derive(Debug)]
pub struct MemoryMediaSink {
    authorization: Mutex<AuthorizationState>,
    failure: Mutex<Option<CameraError>>,
    photos: Mutex<Vec<CapturedPhoto>>,
    videos: Mutex<Vec<Vec<u8>>>,
}

impl MemoryMediaSink {
    pub fn new() -> Self {
        Self {
            authorization: Mutex::new(AuthorizationState::Authorized),
            failure: Mutex::new(None),
            photos: Mutex::new(Vec::new()),
            videos: Mutex::new(Vec::new()),
        }
    }

    pub fn set_authorization(&self, state: AuthorizationState) {
        *self.authorization.lock() = state;
    }

    /// Make every save fail with `error` until cleared with `None`.
    pub fn fail_saves_with(&self, error: Option<CameraError>) {
        *self.failure.lock() = error;
    }

    pub fn photos(&self) -> Vec<CapturedPhoto> {
        self.photos.lock().clone()
    }

    /// Contents of every saved movie, in save order.
    pub fn videos(&self) -> Vec<Vec<u8>> {
        self.videos.lock().clone()
    }

    fn check_failure(&self) -> Result<(), CameraError> {
        match self.failure.lock().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl Default for MemoryMediaSink {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaSink for MemoryMediaSink {
    fn authorize(&self) -> AuthorizationState {
        *self.authorization.lock()
    }

    fn save_photo(&self, photo: &CapturedPhoto) -> Result<(), CameraError> {
        self.check_failure()?;
        self.photos.lock().push(photo.clone());
        Ok(())
    }

    fn save_video(&self, path: &Path) -> Result<(), CameraError> {
        self.check_failure()?;
        let data = fs::read(path)
            .map_err(|e| CameraError::PersistenceFailed(format!("failed to read movie {}: {}", path.display(), e)))?;
        self.videos.lock().push(data);
        Ok(())
    }
}
