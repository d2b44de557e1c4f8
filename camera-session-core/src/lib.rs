//! # camera-session-core
//!
//! Platform-agnostic camera capture session core.
//!
//! Provides the session state machine, latched intents, device selection,
//! gesture routing and media persistence. Platform camera stacks implement
//! the `CameraHardware` trait and plug into the generic `CameraSession`.
//!
//! ## Architecture
//!
//! ```text
//! camera-session-core (this crate)
//! ├── traits/       ← CameraHardware, HardwareAuthorization, MediaSink, IntentTarget, GestureTarget
//! ├── models/       ← CameraError, CameraEvent, SessionConfiguration, DeviceDescriptor, etc.
//! ├── devices/      ← DeviceCatalog (selection + rotation fallback)
//! ├── intents/      ← IntentFlags latches, IntentQueue dispatch
//! ├── session/      ← CameraSession, SerialQueue worker, completion delivery, GestureRouter
//! └── storage/      ← DirectoryMediaSink, metadata sidecars
//! ```

pub mod devices;
pub mod intents;
pub mod models;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use devices::catalog::DeviceCatalog;
pub use intents::flags::{IntentFlags, IntentKind};
pub use intents::queue::IntentQueue;
pub use models::camera_models::{
    CapturedPhoto, FlashMode, MediaType, MovieOutputCapabilities, PhotoSettings, Point, PreviewGravity,
    RecordingSettings, Size, StabilizationMode, VideoCodec, VideoOrientation, VideoQuality, ZoomState,
};
pub use models::config::SessionConfiguration;
pub use models::device::{ActiveVideoInput, DeviceDescriptor, DevicePosition, DeviceType, InputHandle};
pub use models::error::CameraError;
pub use models::event::CameraEvent;
pub use models::recording::RecordingSession;
pub use models::state::{AuthorizationState, SessionConfigState, SessionSnapshot};
pub use session::camera_session::CameraSession;
pub use session::gestures::{point_of_interest, GestureRouter};
pub use session::notifier::{completion_channel, CompletionNotifier, DeliveryContext};
pub use session::worker::{QueueHandle, SerialQueue};
pub use storage::directory_sink::DirectoryMediaSink;
pub use storage::metadata::{MediaKind, MediaMetadata};
pub use traits::authorization::HardwareAuthorization;
pub use traits::camera_hardware::{CameraHardware, HardwareEvent, HardwareEventCallback};
pub use traits::gesture_target::GestureTarget;
pub use traits::intent_target::IntentTarget;
pub use traits::media_sink::MediaSink;
