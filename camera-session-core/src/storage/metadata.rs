use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::models::camera_models::{CapturedPhoto, FlashMode};
use crate::models::device::DevicePosition;
use crate::models::error::CameraError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photo,
    Video,
}

/// Sidecar metadata stored next to each saved media file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaMetadata {
    pub id: String,
    pub kind: MediaKind,
    pub file_path: String,
    pub checksum: String,
    pub byte_size: u64,
    pub created_at: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub flash_mode: Option<FlashMode>,
    pub position: Option<DevicePosition>,
}

impl MediaMetadata {
    pub fn for_photo(photo: &CapturedPhoto, file_path: &Path, checksum: &str) -> Self {
        Self {
            id: photo.id.to_string(),
            kind: MediaKind::Photo,
            file_path: file_path.display().to_string(),
            checksum: checksum.to_string(),
            byte_size: photo.data.len() as u64,
            created_at: photo.captured_at.to_rfc3339(),
            width: Some(photo.width),
            height: Some(photo.height),
            flash_mode: Some(photo.flash_mode),
            position: photo.position,
        }
    }

    pub fn for_video(id: &str, file_path: &Path, checksum: &str, byte_size: u64) -> Self {
        Self {
            id: id.to_string(),
            kind: MediaKind::Video,
            file_path: file_path.display().to_string(),
            checksum: checksum.to_string(),
            byte_size,
            created_at: chrono::Utc::now().to_rfc3339(),
            width: None,
            height: None,
            flash_mode: None,
            position: None,
        }
    }
}

/// Write media metadata as a JSON sidecar file.
///
/// Creates `{media_stem}.metadata.json` alongside the media file.
pub fn write_metadata(metadata: &MediaMetadata, media_path: &Path) -> Result<(), CameraError> {
    let metadata_path = media_path.with_extension("metadata.json");
    let json = serde_json::to_string_pretty(metadata)
        .map_err(|e| CameraError::StorageError(format!("failed to serialize metadata: {}", e)))?;
    fs::write(&metadata_path, json)
        .map_err(|e| CameraError::StorageError(format!("failed to write metadata: {}", e)))?;
    Ok(())
}

pub fn read_metadata(media_path: &Path) -> Result<MediaMetadata, CameraError> {
    let metadata_path = media_path.with_extension("metadata.json");
    let json = fs::read_to_string(&metadata_path)
        .map_err(|e| CameraError::StorageError(format!("failed to read metadata: {}", e)))?;
    serde_json::from_str(&json).map_err(|e| CameraError::StorageError(format!("failed to parse metadata: {}", e)))
}
