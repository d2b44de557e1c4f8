//! # camera-session-virtual
//!
//! In-memory camera backend for camera-session-kit.
//!
//! Provides:
//! - `VirtualCamera`: `CameraHardware` with device presets, injectable failures
//!   and asynchronous photo/movie completions on background threads
//! - `VirtualAuthorization`: scripted camera and microphone permission prompts
//! - `MemoryMediaSink`: media library kept in memory
//! - `MovieWriter`: placeholder QuickTime file writer used for recordings
//!
//! ## Usage
//! ```ignore
//! use std::sync::Arc;
//! use camera_session_core::{CameraSession, SessionConfiguration};
//! use camera_session_virtual::{presets, MemoryMediaSink, VirtualAuthorization, VirtualCamera};
//!
//! let camera = Arc::new(VirtualCamera::new(presets::dual_back_true_depth_front()));
//! let (session, delivery) = CameraSession::new(
//!     camera,
//!     Arc::new(VirtualAuthorization::new()),
//!     Arc::new(MemoryMediaSink::new()),
//!     SessionConfiguration::default(),
//! )?;
//! session.configure();
//! session.start();
//! ```

pub mod memory_sink;
pub mod movie_writer;
pub mod permissions;
pub mod presets;
pub mod virtual_hardware;

pub use memory_sink::MemoryMediaSink;
pub use movie_writer::MovieWriter;
pub use permissions::VirtualAuthorization;
pub use virtual_hardware::{VirtualCamera, VirtualCameraOptions};
