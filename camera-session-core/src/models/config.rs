use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::camera_models::{FlashMode, PreviewGravity, VideoQuality};
use super::device::{DevicePosition, DeviceType};

/// Configuration for a camera session.
///
/// Fixed at construction; changing any field requires a new session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfiguration {
    /// Lens type tried first when picking the starting camera (default: dual).
    pub preferred_device_type: DeviceType,

    /// Position tried first when picking the starting camera (default: back).
    pub preferred_position: DevicePosition,

    /// Upper bound for zoom gestures, further limited by the device (default: unbounded).
    pub max_zoom_scale: f64,

    /// Attach a microphone so recordings carry audio (default: true).
    pub audio_enabled: bool,

    /// Let other applications keep playing audio while the session runs (default: true).
    pub allow_background_audio: bool,

    /// Preview scaling hint for the presentation layer.
    pub preview_gravity: PreviewGravity,

    /// Session preset applied at configuration time (default: high).
    pub video_quality: VideoQuality,

    /// Single tap focuses at the tapped point (default: true).
    pub tap_to_focus: bool,

    /// Double tap switches between front and back cameras (default: true).
    pub double_tap_camera_switch: bool,

    /// Pinch gestures zoom (default: true).
    pub pinch_to_zoom: bool,

    /// Flash mode before the first cycle (default: off).
    pub initial_flash_mode: FlashMode,

    /// Recording length limit in seconds (None = unlimited).
    pub max_video_duration_secs: Option<f64>,

    /// Directory for in-progress recordings (default: system temp dir).
    pub temporary_directory: PathBuf,
}

impl SessionConfiguration {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_zoom_scale.is_nan() || self.max_zoom_scale < 1.0 {
            return Err(format!("max zoom scale must be at least 1.0, got {}", self.max_zoom_scale));
        }
        if let Some(secs) = self.max_video_duration_secs {
            if !secs.is_finite() || secs <= 0.0 {
                return Err(format!("max video duration must be positive, got {}", secs));
            }
            if Duration::try_from_secs_f64(secs).is_err() {
                return Err(format!("max video duration {} is out of range", secs));
            }
        }
        Ok(())
    }

    pub fn max_video_duration(&self) -> Option<Duration> {
        self.max_video_duration_secs
            .filter(|secs| *secs > 0.0)
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }
}

impl Default for SessionConfiguration {
    fn default() -> Self {
        Self {
            preferred_device_type: DeviceType::Dual,
            preferred_position: DevicePosition::Back,
            max_zoom_scale: f64::MAX,
            audio_enabled: true,
            allow_background_audio: true,
            preview_gravity: PreviewGravity::ResizeAspect,
            video_quality: VideoQuality::High,
            tap_to_focus: true,
            double_tap_camera_switch: true,
            pinch_to_zoom: true,
            initial_flash_mode: FlashMode::Off,
            max_video_duration_secs: None,
            temporary_directory: std::env::temp_dir(),
        }
    }
}
