use std::fmt;

use serde::{Deserialize, Serialize};

/// Physical placement of a camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevicePosition {
    Front,
    Back,
    Unspecified,
}

impl fmt::Display for DevicePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Front => write!(f, "front"),
            Self::Back => write!(f, "back"),
            Self::Unspecified => write!(f, "unspecified"),
        }
    }
}

/// Lens/sensor capability of a camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    WideAngle,
    Dual,
    TrueDepth,
    Telephoto,
    UltraWide,
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::WideAngle => "wide-angle",
            Self::Dual => "dual",
            Self::TrueDepth => "true-depth",
            Self::Telephoto => "telephoto",
            Self::UltraWide => "ultra-wide",
        };
        f.write_str(name)
    }
}

/// An enumerated physical camera. Immutable once discovered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    /// Opaque backend reference.
    pub id: String,
    pub name: String,
    pub position: DevicePosition,
    pub device_type: DeviceType,
    pub has_flash: bool,
    pub max_zoom_factor: f64,
    pub focus_point_supported: bool,
}

impl DeviceDescriptor {
    pub fn new(id: impl Into<String>, position: DevicePosition, device_type: DeviceType) -> Self {
        let id = id.into();
        Self {
            name: format!("{} {} camera", position, device_type),
            id,
            position,
            device_type,
            has_flash: matches!(position, DevicePosition::Back),
            max_zoom_factor: 16.0,
            focus_point_supported: true,
        }
    }

    pub fn with_flash(mut self, has_flash: bool) -> Self {
        self.has_flash = has_flash;
        self
    }

    pub fn with_max_zoom(mut self, max_zoom_factor: f64) -> Self {
        self.max_zoom_factor = max_zoom_factor;
        self
    }

    pub fn with_focus_point(mut self, supported: bool) -> Self {
        self.focus_point_supported = supported;
        self
    }

    pub fn matches(&self, device_type: DeviceType, position: DevicePosition) -> bool {
        self.device_type == device_type && self.position == position
    }
}

/// Opaque handle to a device input created by the hardware backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputHandle(pub u64);

/// The video input currently attached to the session.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveVideoInput {
    pub handle: InputHandle,
    pub device: DeviceDescriptor,
}
