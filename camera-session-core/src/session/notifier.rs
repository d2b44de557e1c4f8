//! Completion delivery.
//!
//! The worker and hardware completion paths push `CameraEvent`s through a
//! `CompletionNotifier`. A single `DeliveryContext` receives them, clears the
//! matching intent latches and hands the event to the host, so the host
//! observes every flag clear together with its completion.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use log::{debug, warn};

use crate::intents::flags::IntentFlags;
use crate::models::error::CameraError;
use crate::models::event::CameraEvent;

/// Sender side of the completion channel.
#[derive(Clone)]
pub struct CompletionNotifier {
    tx: Sender<CameraEvent>,
}

impl CompletionNotifier {
    pub fn notify(&self, event: CameraEvent) {
        debug!("completion: {}", event.event_type());
        if self.tx.send(event).is_err() {
            warn!("completion dropped, delivery context is gone");
        }
    }
}

/// The single context on which completions are observed.
pub struct DeliveryContext {
    rx: Receiver<CameraEvent>,
    flags: Arc<IntentFlags>,
}

/// Create a connected notifier/delivery pair clearing latches in `flags`.
pub fn completion_channel(flags: Arc<IntentFlags>) -> (CompletionNotifier, DeliveryContext) {
    let (tx, rx) = channel::unbounded();
    (CompletionNotifier { tx }, DeliveryContext { rx, flags })
}

impl DeliveryContext {
    fn deliver(&self, event: CameraEvent) -> CameraEvent {
        self.flags.acknowledge(&event);
        event
    }

    pub fn flags(&self) -> &Arc<IntentFlags> {
        &self.flags
    }

    /// Next event if one is waiting.
    pub fn try_recv(&self) -> Option<CameraEvent> {
        self.rx.try_recv().ok().map(|event| self.deliver(event))
    }

    /// Block for the next event. `None` once every notifier is gone.
    pub fn recv(&self) -> Option<CameraEvent> {
        self.rx.recv().ok().map(|event| self.deliver(event))
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<CameraEvent> {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => Some(self.deliver(event)),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Every event currently waiting, in emission order.
    pub fn drain(&self) -> Vec<CameraEvent> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }

    /// Move delivery onto a dedicated thread that calls `handler` per event
    /// until the session is dropped.
    pub fn spawn<F>(self, mut handler: F) -> Result<thread::JoinHandle<()>, CameraError>
    where
        F: FnMut(CameraEvent) + Send + 'static,
    {
        thread::Builder::new()
            .name("camera-delivery".into())
            .spawn(move || {
                while let Some(event) = self.recv() {
                    handler(event);
                }
                debug!("delivery context closed");
            })
            .map_err(|e| CameraError::OperationFailed(format!("failed to spawn delivery thread: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intents::flags::IntentKind;
    use crate::models::camera_models::FlashMode;
    use parking_lot::Mutex;

    #[test]
    fn flag_clears_on_delivery_not_on_notify() {
        let flags = Arc::new(IntentFlags::new());
        let (notifier, delivery) = completion_channel(Arc::clone(&flags));

        flags.change_flash_mode();
        notifier.notify(CameraEvent::FlashModeChanged(FlashMode::Auto));
        assert!(flags.is_pending(IntentKind::ChangeFlash));

        let event = delivery.try_recv().unwrap();
        assert_eq!(event, CameraEvent::FlashModeChanged(FlashMode::Auto));
        assert!(!flags.is_pending(IntentKind::ChangeFlash));
    }

    #[test]
    fn drain_preserves_order() {
        let (notifier, delivery) = completion_channel(Arc::new(IntentFlags::new()));
        notifier.notify(CameraEvent::SessionStarted);
        notifier.notify(CameraEvent::ZoomChanged(2.0));
        notifier.notify(CameraEvent::NoCameraDetected);
        assert_eq!(
            delivery.drain(),
            vec![
                CameraEvent::SessionStarted,
                CameraEvent::ZoomChanged(2.0),
                CameraEvent::NoCameraDetected
            ]
        );
        assert!(delivery.try_recv().is_none());
    }

    #[test]
    fn recv_ends_when_notifiers_drop() {
        let (notifier, delivery) = completion_channel(Arc::new(IntentFlags::new()));
        notifier.notify(CameraEvent::SessionStarted);
        drop(notifier);
        assert_eq!(delivery.recv(), Some(CameraEvent::SessionStarted));
        assert_eq!(delivery.recv(), None);
        assert_eq!(delivery.recv_timeout(Duration::from_millis(5)), None);
    }

    #[test]
    fn spawned_context_runs_handler() {
        let flags = Arc::new(IntentFlags::new());
        let (notifier, delivery) = completion_channel(Arc::clone(&flags));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let handle = delivery
            .spawn(move |event| sink.lock().push(event.event_type()))
            .unwrap();

        flags.rotate_camera();
        notifier.notify(CameraEvent::CameraRotated { position: None });
        notifier.notify(CameraEvent::SessionStarted);
        drop(notifier);
        handle.join().unwrap();

        assert_eq!(*seen.lock(), vec!["camera_rotated", "session_started"]);
        assert!(!flags.is_pending(IntentKind::RotateCamera));
    }
}
