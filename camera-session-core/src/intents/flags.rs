//! Latched intent flags shared between the host and the core.
//!
//! Each latch has one writer per direction: the host raises it, the delivery
//! context clears it when the matching completion arrives. A second internal
//! bit records that the core already dispatched the raised latch, so repeated
//! refresh ticks never re-trigger a slow hardware operation.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::models::event::CameraEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentKind {
    CapturePhoto,
    RecordVideo,
    StopRecording,
    RotateCamera,
    ChangeFlash,
}

impl IntentKind {
    /// Dispatch order used by `IntentQueue::apply_pending`.
    pub const ALL: [IntentKind; 5] = [
        IntentKind::CapturePhoto,
        IntentKind::RotateCamera,
        IntentKind::ChangeFlash,
        IntentKind::RecordVideo,
        IntentKind::StopRecording,
    ];
}

#[derive(Debug, Default)]
struct Latch {
    requested: AtomicBool,
    dispatched: AtomicBool,
}

impl Latch {
    fn raise(&self) -> bool {
        self.requested
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn is_raised(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }

    fn begin_dispatch(&self) -> bool {
        self.is_raised()
            && self
                .dispatched
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
    }

    fn clear(&self) {
        // Lower `requested` first: a tick that runs between the two stores must
        // still see the latch as dispatched.
        self.requested.store(false, Ordering::Release);
        self.dispatched.store(false, Ordering::Release);
    }
}

#[derive(Debug, Default)]
pub struct IntentFlags {
    capture_photo: Latch,
    record_video: Latch,
    stop_recording: Latch,
    rotate_camera: Latch,
    change_flash: Latch,
    recording_active: AtomicBool,
}

impl IntentFlags {
    pub fn new() -> Self {
        Self::default()
    }

    fn latch(&self, kind: IntentKind) -> &Latch {
        match kind {
            IntentKind::CapturePhoto => &self.capture_photo,
            IntentKind::RecordVideo => &self.record_video,
            IntentKind::StopRecording => &self.stop_recording,
            IntentKind::RotateCamera => &self.rotate_camera,
            IntentKind::ChangeFlash => &self.change_flash,
        }
    }

    /// Whether the host raised `kind` and no completion has cleared it yet.
    pub fn is_pending(&self, kind: IntentKind) -> bool {
        self.latch(kind).is_raised()
    }

    /// Whether a recording start was acknowledged and its finish not yet delivered.
    pub fn is_recording(&self) -> bool {
        self.recording_active.load(Ordering::Acquire)
    }

    // --- Host side: each returns false when the request coalesced into a pending one ---

    pub fn capture_photo(&self) -> bool {
        self.capture_photo.raise()
    }

    pub fn rotate_camera(&self) -> bool {
        self.rotate_camera.raise()
    }

    pub fn change_flash_mode(&self) -> bool {
        self.change_flash.raise()
    }

    /// Raise RecordVideo when idle, StopRecording while a recording is active.
    ///
    /// Ignored while either latch is still pending, so the two are never raised
    /// together.
    pub fn toggle_video_recording(&self) -> bool {
        if self.record_video.is_raised() || self.stop_recording.is_raised() {
            return false;
        }
        if self.is_recording() {
            self.stop_recording.raise()
        } else {
            self.record_video.raise()
        }
    }

    // --- Core side ---

    /// Claim a raised, not yet dispatched latch. True at most once per raise.
    pub(crate) fn begin_dispatch(&self, kind: IntentKind) -> bool {
        self.latch(kind).begin_dispatch()
    }

    /// Clear the latches a completion answers.
    pub(crate) fn acknowledge(&self, event: &CameraEvent) {
        match event {
            CameraEvent::PhotoCaptured { .. } => self.capture_photo.clear(),
            CameraEvent::CameraRotated { .. } => self.rotate_camera.clear(),
            CameraEvent::FlashModeChanged(_) => self.change_flash.clear(),
            CameraEvent::VideoRecordingStarted { .. } => {
                self.recording_active.store(true, Ordering::Release);
                self.record_video.clear();
            }
            CameraEvent::VideoRecordingFinished { .. } => {
                self.recording_active.store(false, Ordering::Release);
                self.record_video.clear();
                self.stop_recording.clear();
            }
            CameraEvent::RecordingStopIgnored(_) => self.stop_recording.clear(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::camera_models::FlashMode;
    use std::path::PathBuf;

    fn started() -> CameraEvent {
        CameraEvent::VideoRecordingStarted {
            path: PathBuf::from("/tmp/a.mov"),
        }
    }

    fn finished() -> CameraEvent {
        CameraEvent::VideoRecordingFinished {
            path: Some(PathBuf::from("/tmp/a.mov")),
            error: None,
        }
    }

    #[test]
    fn duplicate_requests_coalesce() {
        let flags = IntentFlags::new();
        assert!(flags.capture_photo());
        assert!(!flags.capture_photo());
        assert!(flags.is_pending(IntentKind::CapturePhoto));

        flags.acknowledge(&CameraEvent::PhotoCaptured { error: None });
        assert!(!flags.is_pending(IntentKind::CapturePhoto));
        assert!(flags.capture_photo());
    }

    #[test]
    fn dispatch_claims_once_per_raise() {
        let flags = IntentFlags::new();
        assert!(!flags.begin_dispatch(IntentKind::RotateCamera));

        flags.rotate_camera();
        assert!(flags.begin_dispatch(IntentKind::RotateCamera));
        assert!(!flags.begin_dispatch(IntentKind::RotateCamera));

        flags.acknowledge(&CameraEvent::CameraRotated { position: None });
        assert!(!flags.begin_dispatch(IntentKind::RotateCamera));
        flags.rotate_camera();
        assert!(flags.begin_dispatch(IntentKind::RotateCamera));
    }

    #[test]
    fn unrelated_events_clear_nothing() {
        let flags = IntentFlags::new();
        flags.change_flash_mode();
        flags.acknowledge(&CameraEvent::ZoomChanged(2.0));
        flags.acknowledge(&CameraEvent::SessionStarted);
        assert!(flags.is_pending(IntentKind::ChangeFlash));
        flags.acknowledge(&CameraEvent::FlashModeChanged(FlashMode::Auto));
        assert!(!flags.is_pending(IntentKind::ChangeFlash));
    }

    #[test]
    fn toggle_walks_start_then_stop() {
        let flags = IntentFlags::new();
        assert!(flags.toggle_video_recording());
        assert!(flags.is_pending(IntentKind::RecordVideo));
        assert!(!flags.is_pending(IntentKind::StopRecording));

        // start not yet acknowledged: coalesced
        assert!(!flags.toggle_video_recording());
        assert!(!flags.is_pending(IntentKind::StopRecording));

        flags.acknowledge(&started());
        assert!(flags.is_recording());
        assert!(!flags.is_pending(IntentKind::RecordVideo));

        assert!(flags.toggle_video_recording());
        assert!(flags.is_pending(IntentKind::StopRecording));
        assert!(!flags.is_pending(IntentKind::RecordVideo));
        assert!(!flags.toggle_video_recording());

        flags.acknowledge(&finished());
        assert!(!flags.is_recording());
        assert!(!flags.is_pending(IntentKind::RecordVideo));
        assert!(!flags.is_pending(IntentKind::StopRecording));
    }

    #[test]
    fn record_and_stop_never_raised_together() {
        let flags = IntentFlags::new();
        let events = [started(), finished(), started(), finished()];
        for event in events.iter().cycle().take(12) {
            flags.toggle_video_recording();
            flags.toggle_video_recording();
            assert!(!(flags.is_pending(IntentKind::RecordVideo) && flags.is_pending(IntentKind::StopRecording)));
            flags.acknowledge(event);
            assert!(!(flags.is_pending(IntentKind::RecordVideo) && flags.is_pending(IntentKind::StopRecording)));
        }
    }

    #[test]
    fn failed_start_clears_record_latch() {
        let flags = IntentFlags::new();
        flags.toggle_video_recording();
        flags.acknowledge(&CameraEvent::VideoRecordingFinished {
            path: None,
            error: Some(crate::models::error::CameraError::OperationFailed("no movie output".into())),
        });
        assert!(!flags.is_pending(IntentKind::RecordVideo));
        assert!(!flags.is_recording());
        assert!(flags.toggle_video_recording());
        assert!(flags.is_pending(IntentKind::RecordVideo));
    }

    #[test]
    fn ignored_stop_leaves_a_new_start_pending() {
        let flags = IntentFlags::new();
        flags.toggle_video_recording();
        flags.acknowledge(&started());
        assert!(flags.toggle_video_recording());
        assert!(flags.begin_dispatch(IntentKind::StopRecording));

        // the recording ended on its own before the stop ran
        flags.acknowledge(&finished());
        assert!(flags.toggle_video_recording());
        assert!(flags.is_pending(IntentKind::RecordVideo));

        flags.acknowledge(&CameraEvent::RecordingStopIgnored(
            crate::models::error::CameraError::OperationFailed("no active recording".into()),
        ));
        assert!(flags.is_pending(IntentKind::RecordVideo));
        assert!(!flags.is_pending(IntentKind::StopRecording));
    }
}
