use serde::{Deserialize, Serialize};

use super::camera_models::FlashMode;
use super::device::DeviceDescriptor;

/// Hardware permission verdict, resolved once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorizationState {
    Undetermined,
    Authorized,
    Denied,
}

impl AuthorizationState {
    pub fn is_authorized(&self) -> bool {
        matches!(self, Self::Authorized)
    }
}

/// Session configuration state machine.
///
/// State transitions:
/// ```text
/// unconfigured → configuring → ready
///                     ↓
///            configuration_failed ──(reconfigure)──→ unconfigured
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionConfigState {
    Unconfigured,
    Configuring,
    Ready,
    ConfigurationFailed,
}

impl SessionConfigState {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::ConfigurationFailed)
    }
}

/// Point-in-time view of a camera session, readable without queuing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub authorization: AuthorizationState,
    pub config_state: SessionConfigState,
    pub is_running: bool,
    pub is_recording: bool,
    pub flash_mode: FlashMode,
    pub zoom_scale: f64,
    pub active_device: Option<DeviceDescriptor>,
    pub has_audio_input: bool,
    pub has_movie_output: bool,
}
