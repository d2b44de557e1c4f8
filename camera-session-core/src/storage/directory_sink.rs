use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::metadata::{write_metadata, MediaMetadata};
use crate::models::camera_models::CapturedPhoto;
use crate::models::error::CameraError;
use crate::models::state::AuthorizationState;
use crate::traits::media_sink::MediaSink;

/// Media sink writing into a plain directory, one JSON sidecar per file.
///
/// ```text
/// <root>/
///   <photo-id>.jpg
///   <photo-id>.metadata.json
///   <video-id>.mov
///   <video-id>.metadata.json
/// ```
#[derive(Debug, Clone)]
pub struct DirectoryMediaSink {
    root: PathBuf,
}

impl DirectoryMediaSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_root(&self) -> Result<(), CameraError> {
        fs::create_dir_all(&self.root)
            .map_err(|e| CameraError::PersistenceFailed(format!("failed to create media directory: {}", e)))
    }
}

impl MediaSink for DirectoryMediaSink {
    /// Authorized when the directory exists or can be created.
    fn authorize(&self) -> AuthorizationState {
        match self.ensure_root() {
            Ok(()) => AuthorizationState::Authorized,
            Err(e) => {
                debug!("media directory unavailable: {}", e);
                AuthorizationState::Denied
            }
        }
    }

    fn save_photo(&self, photo: &CapturedPhoto) -> Result<(), CameraError> {
        self.ensure_root()?;
        let path = self.root.join(format!("{}.jpg", photo.id));
        fs::write(&path, &photo.data)
            .map_err(|e| CameraError::PersistenceFailed(format!("failed to write photo: {}", e)))?;

        let checksum = hex_encode(&Sha256::digest(&photo.data));
        write_metadata(&MediaMetadata::for_photo(photo, &path, &checksum), &path)?;
        info!("photo saved to {}", path.display());
        Ok(())
    }

    /// Moves the movie into the directory. The source path is left empty.
    fn save_video(&self, source: &Path) -> Result<(), CameraError> {
        self.ensure_root()?;
        let id = Uuid::new_v4().to_string();
        let path = self.root.join(format!("{}.mov", id));

        // Rename fails across filesystems; fall back to copying.
        if fs::rename(source, &path).is_err() {
            fs::copy(source, &path)
                .map_err(|e| CameraError::PersistenceFailed(format!("failed to copy movie: {}", e)))?;
            fs::remove_file(source).ok();
        }

        let checksum = sha256_file(&path)?;
        let byte_size = fs::metadata(&path)
            .map(|m| m.len())
            .map_err(|e| CameraError::PersistenceFailed(format!("failed to stat movie: {}", e)))?;
        write_metadata(&MediaMetadata::for_video(&id, &path, &checksum, byte_size), &path)?;
        info!("movie saved to {}", path.display());
        Ok(())
    }
}

fn sha256_file(path: &Path) -> Result<String, CameraError> {
    let data = fs::read(path)
        .map_err(|e| CameraError::StorageError(format!("failed to read file for checksum: {}", e)))?;
    Ok(hex_encode(&Sha256::digest(&data)))
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
