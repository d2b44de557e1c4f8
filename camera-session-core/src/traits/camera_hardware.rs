use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::models::camera_models::{
    MovieOutputCapabilities, PhotoSettings, Point, RecordingSettings, StabilizationMode, VideoQuality,
};
use crate::models::device::{DeviceDescriptor, InputHandle};
use crate::models::error::CameraError;

/// Asynchronous completion reported by the hardware.
#[derive(Debug, Clone, PartialEq)]
pub enum HardwareEvent {
    /// The sensor captured the frame; encoding continues afterwards.
    PhotoCaptured { error: Option<CameraError> },
    /// The encoded file representation of the photo (or why there is none).
    PhotoProcessed(Result<Vec<u8>, CameraError>),
    RecordingStarted { path: PathBuf },
    /// The movie file is closed. `successfully_finished` is true when the file is
    /// usable despite `error` (for example when a duration limit was reached).
    RecordingFinished {
        path: PathBuf,
        error: Option<CameraError>,
        successfully_finished: bool,
    },
}

/// Callback invoked by the hardware when an asynchronous operation progresses.
///
/// May fire on any thread, including synchronously inside the call that
/// registered it.
pub type HardwareEventCallback = Arc<dyn Fn(HardwareEvent) + Send + Sync + 'static>;

/// Interface for a platform camera stack: one capture session with its
/// device inputs, photo output and movie output.
///
/// Graph mutations (`add_*`, `remove_input`, `reset`) are only issued between
/// `begin_configuration` and `commit_configuration`, and only from the session's
/// serialized worker.
pub trait CameraHardware: Send + Sync {
    /// Video devices currently attached to the system.
    fn discover_devices(&self) -> Vec<DeviceDescriptor>;

    fn begin_configuration(&self);

    fn commit_configuration(&self);

    fn set_quality(&self, quality: VideoQuality);

    fn create_video_input(&self, device: &DeviceDescriptor) -> Result<InputHandle, CameraError>;

    /// Create the microphone input. `mix_with_others` keeps background audio playing.
    fn create_audio_input(&self, mix_with_others: bool) -> Result<InputHandle, CameraError>;

    /// Attach an input; fails when the session cannot accept it.
    fn add_input(&self, input: InputHandle) -> Result<(), CameraError>;

    fn remove_input(&self, input: InputHandle);

    fn add_photo_output(&self) -> Result<(), CameraError>;

    fn add_movie_output(&self) -> Result<MovieOutputCapabilities, CameraError>;

    /// Apply a stabilization mode to the movie output's video connection.
    fn set_movie_stabilization(&self, mode: StabilizationMode);

    /// Detach every input and output.
    fn reset(&self);

    /// Blocking: returns once the session is running (or failed to run).
    fn start_running(&self);

    /// Blocking: returns once the session stopped.
    fn stop_running(&self);

    fn is_running(&self) -> bool;

    /// Request a still capture; completions arrive through `on_event`.
    fn capture_photo(&self, settings: PhotoSettings, on_event: HardwareEventCallback) -> Result<(), CameraError>;

    /// Start writing a movie to `path`; completions arrive through `on_event`.
    fn start_recording(
        &self,
        path: &Path,
        settings: RecordingSettings,
        on_event: HardwareEventCallback,
    ) -> Result<(), CameraError>;

    /// Request the active recording to finish. No-op when nothing is recording.
    fn stop_recording(&self);

    fn is_recording(&self) -> bool;

    /// Lock the device, set its zoom factor, unlock.
    fn set_zoom_factor(&self, device: &DeviceDescriptor, factor: f64) -> Result<(), CameraError>;

    /// Lock the device, set focus (when supported) and auto exposure at a
    /// normalized point of interest, unlock.
    fn focus(&self, device: &DeviceDescriptor, point_of_interest: Point) -> Result<(), CameraError>;
}
