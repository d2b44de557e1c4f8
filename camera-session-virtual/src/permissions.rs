//! Scripted camera and microphone permissions.
//!
//! Each media type has a current status and the verdict a prompt resolves to.
//! Prompts only happen while the status is undetermined, and a resolved verdict
//! sticks for the lifetime of the object.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use log::info;
use parking_lot::Mutex;

use camera_session_core::models::camera_models::MediaType;
use camera_session_core::models::state::AuthorizationState;
use camera_session_core::traits::authorization::HardwareAuthorization;

#[derive(Debug)]
pub struct VirtualAuthorization {
    statuses: Mutex<HashMap<MediaType, AuthorizationState>>,
    verdicts: HashMap<MediaType, AuthorizationState>,
    prompt_delay: Duration,
    prompts: AtomicUsize,
}

impl VirtualAuthorization {
    /// Everything undetermined; prompts grant access.
    pub fn new() -> Self {
        Self {
            statuses: Mutex::new(HashMap::from([
                (MediaType::Video, AuthorizationState::Undetermined),
                (MediaType::Audio, AuthorizationState::Undetermined),
            ])),
            verdicts: HashMap::from([
                (MediaType::Video, AuthorizationState::Authorized),
                (MediaType::Audio, AuthorizationState::Authorized),
            ]),
            prompt_delay: Duration::ZERO,
            prompts: AtomicUsize::new(0),
        }
    }

    /// Both media types already granted.
    pub fn authorized() -> Self {
        Self::new()
            .with_status(MediaType::Video, AuthorizationState::Authorized)
            .with_status(MediaType::Audio, AuthorizationState::Authorized)
    }

    /// Both media types already refused.
    pub fn denied() -> Self {
        Self::new()
            .with_status(MediaType::Video, AuthorizationState::Denied)
            .with_status(MediaType::Audio, AuthorizationState::Denied)
    }

    pub fn with_status(self, media: MediaType, status: AuthorizationState) -> Self {
        self.statuses.lock().insert(media, status);
        self
    }

    /// What a prompt for `media` resolves to.
    pub fn with_verdict(mut self, media: MediaType, verdict: AuthorizationState) -> Self {
        self.verdicts.insert(media, verdict);
        self
    }

    /// How long a prompt blocks before resolving.
    pub fn with_prompt_delay(mut self, delay: Duration) -> Self {
        self.prompt_delay = delay;
        self
    }

    /// Number of prompts shown so far.
    pub fn prompt_count(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }
}

impl Default for VirtualAuthorization {
    fn default() -> Self {
        Self::new()
    }
}

impl HardwareAuthorization for VirtualAuthorization {
    fn query_status(&self, media: MediaType) -> AuthorizationState {
        self.statuses
            .lock()
            .get(&media)
            .copied()
            .unwrap_or(AuthorizationState::Undetermined)
    }

    fn request_if_undetermined(&self, media: MediaType) -> AuthorizationState {
        let current = self.query_status(media);
        if current != AuthorizationState::Undetermined {
            return current;
        }

        self.prompts.fetch_add(1, Ordering::SeqCst);
        if !self.prompt_delay.is_zero() {
            thread::sleep(self.prompt_delay);
        }

        let verdict = self
            .verdicts
            .get(&media)
            .copied()
            .unwrap_or(AuthorizationState::Denied);
        info!("{:?} access prompt resolved: {:?}", media, verdict);
        self.statuses.lock().insert(media, verdict);
        verdict
    }
}
