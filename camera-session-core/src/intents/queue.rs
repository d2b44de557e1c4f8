use std::sync::Arc;

use log::debug;

use super::flags::{IntentFlags, IntentKind};
use crate::traits::intent_target::IntentTarget;

/// Turns raised intent latches into session operations, once per latch.
#[derive(Debug, Clone)]
pub struct IntentQueue {
    flags: Arc<IntentFlags>,
}

impl IntentQueue {
    pub fn new(flags: Arc<IntentFlags>) -> Self {
        Self { flags }
    }

    pub fn flags(&self) -> &Arc<IntentFlags> {
        &self.flags
    }

    /// Dispatch every raised latch that has not been dispatched yet.
    ///
    /// Called once per host refresh tick. Latches stay raised until their
    /// completion is delivered, so later ticks skip them. Returns how many
    /// operations were dispatched.
    pub fn apply_pending<T: IntentTarget + ?Sized>(&self, target: &T) -> usize {
        let mut dispatched = 0;
        for kind in IntentKind::ALL {
            if !self.flags.begin_dispatch(kind) {
                continue;
            }
            debug!("dispatching intent {:?}", kind);
            match kind {
                IntentKind::CapturePhoto => target.capture_photo(),
                IntentKind::RecordVideo => target.start_recording(),
                IntentKind::StopRecording => target.stop_recording(),
                IntentKind::RotateCamera => target.rotate_camera(),
                IntentKind::ChangeFlash => target.cycle_flash_mode(),
            }
            dispatched += 1;
        }
        dispatched
    }
}
