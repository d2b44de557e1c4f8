use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use image::GenericImageView;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::device::DevicePosition;
use super::error::CameraError;

/// Kind of hardware a permission applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Video,
    Audio,
}

/// Flash mode applied at the next photo capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashMode {
    #[default]
    Off,
    Auto,
    On,
}

impl FlashMode {
    /// Off → Auto → On → Off.
    pub fn next(self) -> Self {
        match self {
            Self::Off => Self::Auto,
            Self::Auto => Self::On,
            Self::On => Self::Off,
        }
    }
}

impl fmt::Display for FlashMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "off"),
            Self::Auto => write!(f, "auto"),
            Self::On => write!(f, "on"),
        }
    }
}

/// A 2D point, either in preview coordinates or normalized device coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Pinch-to-zoom state.
///
/// `begin_scale` snapshots `current_scale` when a gesture starts; gesture
/// updates are relative to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomState {
    pub current_scale: f64,
    pub begin_scale: f64,
}

impl Default for ZoomState {
    fn default() -> Self {
        Self {
            current_scale: 1.0,
            begin_scale: 1.0,
        }
    }
}

impl ZoomState {
    /// Clamp a requested scale to `[1.0, min(device_max, configured_max)]`.
    ///
    /// NaN requests resolve to 1.0; an upper bound below 1.0 collapses to 1.0.
    pub fn clamp(raw: f64, device_max: f64, configured_max: f64) -> f64 {
        let upper = device_max.min(configured_max);
        let upper = if upper.is_nan() || upper < 1.0 { 1.0 } else { upper };
        if raw.is_nan() {
            return 1.0;
        }
        raw.clamp(1.0, upper)
    }

    pub fn begin_gesture(&mut self) {
        self.begin_scale = self.current_scale;
    }

    /// Scale requested by a pinch of `gesture_scale` relative to the gesture start.
    pub fn gesture_target(&self, gesture_scale: f64) -> f64 {
        self.begin_scale * gesture_scale
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoOrientation {
    #[default]
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoCodec {
    H264,
    Hevc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StabilizationMode {
    Off,
    Auto,
}

/// Session preset applied when configuration begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoQuality {
    #[default]
    High,
    Medium,
    Low,
    Photo,
}

/// How the host scales the live preview. Carried for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewGravity {
    #[default]
    ResizeAspect,
    ResizeAspectFill,
    Resize,
}

/// Per-capture settings handed to the hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoSettings {
    /// `None` when the active device has no flash.
    pub flash_mode: Option<FlashMode>,
}

/// Per-recording settings handed to the hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordingSettings {
    pub orientation: VideoOrientation,
    pub codec: VideoCodec,
    pub max_duration: Option<Duration>,
}

/// What the movie output attached during configuration can do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieOutputCapabilities {
    pub stabilization_supported: bool,
    pub available_codecs: Vec<VideoCodec>,
}

impl MovieOutputCapabilities {
    /// HEVC when the output offers it, H.264 otherwise.
    pub fn preferred_codec(&self) -> VideoCodec {
        if self.available_codecs.contains(&VideoCodec::Hevc) {
            VideoCodec::Hevc
        } else {
            VideoCodec::H264
        }
    }
}

/// An encoded photo ready for the host and the media sink.
#[derive(Clone, PartialEq)]
pub struct CapturedPhoto {
    pub id: Uuid,
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub captured_at: DateTime<Utc>,
    pub flash_mode: FlashMode,
    pub position: Option<DevicePosition>,
}

impl CapturedPhoto {
    /// Decode the hardware's file representation to validate it and read its size.
    pub fn decode(
        data: Vec<u8>,
        flash_mode: FlashMode,
        position: Option<DevicePosition>,
    ) -> Result<Self, CameraError> {
        let (width, height) = image::load_from_memory(&data)
            .map_err(|e| CameraError::EncodingFailed(format!("photo data is not a decodable image: {}", e)))?
            .dimensions();
        Ok(Self {
            id: Uuid::new_v4(),
            data,
            width,
            height,
            captured_at: Utc::now(),
            flash_mode,
            position,
        })
    }
}

impl fmt::Debug for CapturedPhoto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapturedPhoto")
            .field("id", &self.id)
            .field("bytes", &self.data.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .field("captured_at", &self.captured_at)
            .field("flash_mode", &self.flash_mode)
            .field("position", &self.position)
            .finish()
    }
}
