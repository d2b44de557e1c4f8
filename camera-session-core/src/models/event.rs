use std::path::PathBuf;

use super::camera_models::{CapturedPhoto, FlashMode, Point};
use super::device::DevicePosition;
use super::error::CameraError;

/// Completion events delivered to the host on the delivery context.
#[derive(Debug, Clone, PartialEq)]
pub enum CameraEvent {
    /// The session started running.
    SessionStarted,
    /// Configuration found no usable camera.
    NoCameraDetected,
    /// A session-level failure (authorization or configuration).
    ConfigurationFailed(CameraError),
    /// The hardware acknowledged a capture request (or the request was rejected).
    PhotoCaptured { error: Option<CameraError> },
    /// The encoded photo is available.
    PhotoProcessed(CapturedPhoto),
    /// The media sink accepted or rejected the photo.
    PhotoSaved {
        photo: CapturedPhoto,
        error: Option<CameraError>,
    },
    /// A rotate request was processed; carries the position now active.
    CameraRotated { position: Option<DevicePosition> },
    FlashModeChanged(FlashMode),
    ZoomChanged(f64),
    /// Focus was applied; carries the tap point in preview coordinates.
    FocusedOnPoint(Point),
    VideoRecordingStarted { path: PathBuf },
    /// Emitted for every start or stop request that ends a recording attempt.
    VideoRecordingFinished {
        path: Option<PathBuf>,
        error: Option<CameraError>,
    },
    /// A stop request found no recording to stop, e.g. one that already
    /// finished on its own. Answers only the stop request.
    RecordingStopIgnored(CameraError),
}

impl CameraEvent {
    /// Short name used in logs.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::SessionStarted => "session_started",
            Self::NoCameraDetected => "no_camera_detected",
            Self::ConfigurationFailed(_) => "configuration_failed",
            Self::PhotoCaptured { .. } => "photo_captured",
            Self::PhotoProcessed(_) => "photo_processed",
            Self::PhotoSaved { .. } => "photo_saved",
            Self::CameraRotated { .. } => "camera_rotated",
            Self::FlashModeChanged(_) => "flash_mode_changed",
            Self::ZoomChanged(_) => "zoom_changed",
            Self::FocusedOnPoint(_) => "focused_on_point",
            Self::VideoRecordingStarted { .. } => "video_recording_started",
            Self::VideoRecordingFinished { .. } => "video_recording_finished",
            Self::RecordingStopIgnored(_) => "recording_stop_ignored",
        }
    }

    pub fn error(&self) -> Option<&CameraError> {
        match self {
            Self::ConfigurationFailed(error) | Self::RecordingStopIgnored(error) => Some(error),
            Self::PhotoCaptured { error }
            | Self::PhotoSaved { error, .. }
            | Self::VideoRecordingFinished { error, .. } => error.as_ref(),
            _ => None,
        }
    }
}
