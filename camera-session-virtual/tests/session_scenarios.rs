use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use approx::assert_relative_eq;

use camera_session_core::{
    AuthorizationState, CameraError, CameraEvent, CameraSession, DeliveryContext, DevicePosition, FlashMode,
    GestureRouter, IntentKind, MediaType, Point, SessionConfigState, SessionConfiguration, Size, StabilizationMode,
    VideoQuality,
};
use camera_session_virtual::{presets, MemoryMediaSink, VirtualAuthorization, VirtualCamera, VirtualCameraOptions};

const TIMEOUT: Duration = Duration::from_secs(5);

struct Harness {
    session: CameraSession<VirtualCamera>,
    delivery: DeliveryContext,
    camera: Arc<VirtualCamera>,
    auth: Arc<VirtualAuthorization>,
    sink: Arc<MemoryMediaSink>,
    temp_dir: PathBuf,
}

fn test_config() -> SessionConfiguration {
    SessionConfiguration {
        temporary_directory: std::env::temp_dir().join(format!("camera_scenario_{}", uuid::Uuid::new_v4())),
        ..Default::default()
    }
}

impl Harness {
    fn new(camera: VirtualCamera, auth: VirtualAuthorization, config: SessionConfiguration) -> Self {
        let camera = Arc::new(camera);
        let auth = Arc::new(auth);
        let sink = Arc::new(MemoryMediaSink::new());
        let temp_dir = config.temporary_directory.clone();
        let (session, delivery) = CameraSession::new(
            Arc::clone(&camera),
            auth.clone(),
            sink.clone(),
            config,
        )
        .unwrap();
        Self {
            session,
            delivery,
            camera,
            auth,
            sink,
            temp_dir,
        }
    }

    fn with_devices(devices: Vec<camera_session_core::DeviceDescriptor>) -> Self {
        Self::new(VirtualCamera::new(devices), VirtualAuthorization::authorized(), test_config())
    }

    /// Configure, start and discard the startup completions.
    fn running(devices: Vec<camera_session_core::DeviceDescriptor>) -> Self {
        let harness = Self::with_devices(devices);
        harness.session.configure();
        harness.session.start();
        harness.wait_for(|e| *e == CameraEvent::SessionStarted);
        harness
    }

    /// One host refresh tick.
    fn tick(&self) {
        self.session.apply_pending();
        self.session.flush();
    }

    /// Collect completions until `done` matches one.
    fn wait_for(&self, mut done: impl FnMut(&CameraEvent) -> bool) -> Vec<CameraEvent> {
        let deadline = Instant::now() + TIMEOUT;
        let mut seen = Vec::new();
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.delivery.recv_timeout(remaining) {
                Some(event) => {
                    let finished = done(&event);
                    seen.push(event);
                    if finished {
                        return seen;
                    }
                }
                None => panic!("timed out waiting for a completion, saw {:?}", seen),
            }
        }
    }

    fn settle(&self) -> Vec<CameraEvent> {
        thread::sleep(Duration::from_millis(100));
        self.session.flush();
        self.delivery.drain()
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        fs::remove_dir_all(&self.temp_dir).ok();
    }
}

fn count(events: &[CameraEvent], name: &str) -> usize {
    events.iter().filter(|e| e.event_type() == name).count()
}

// --- Lifecycle ---

#[test]
fn undetermined_access_prompts_then_runs() {
    let harness = Harness::new(
        VirtualCamera::new(presets::dual_back_true_depth_front()),
        VirtualAuthorization::new().with_prompt_delay(Duration::from_millis(20)),
        test_config(),
    );
    harness.session.configure();
    harness.session.start();
    harness.wait_for(|e| *e == CameraEvent::SessionStarted);

    let state = harness.session.state();
    assert_eq!(state.authorization, AuthorizationState::Authorized);
    assert_eq!(state.config_state, SessionConfigState::Ready);
    assert!(state.is_running);
    assert!(state.has_audio_input);
    assert!(state.has_movie_output);
    assert_eq!(state.active_device.map(|d| d.id), Some("back-dual".to_string()));

    assert_eq!(harness.auth.prompt_count(), 2);
    assert_eq!(harness.camera.quality(), Some(VideoQuality::High));
    assert_eq!(harness.camera.stabilization(), Some(StabilizationMode::Auto));
    assert_eq!(harness.camera.attached_audio(), Some(true));
    assert!(!harness.camera.is_configuring());
}

#[test]
fn denied_access_fails_and_is_not_retried() {
    let harness = Harness::new(
        VirtualCamera::new(presets::dual_back_true_depth_front()),
        VirtualAuthorization::denied(),
        test_config(),
    );
    harness.session.configure();
    let events = harness.wait_for(|e| matches!(e, CameraEvent::ConfigurationFailed(_)));
    assert_eq!(
        events.last(),
        Some(&CameraEvent::ConfigurationFailed(CameraError::AuthorizationDenied))
    );

    harness.session.activate();
    harness.wait_for(|e| *e == CameraEvent::ConfigurationFailed(CameraError::AuthorizationDenied));

    let state = harness.session.state();
    assert_eq!(state.authorization, AuthorizationState::Denied);
    assert_eq!(state.config_state, SessionConfigState::Unconfigured);
    assert!(!state.is_running);
    assert!(harness.camera.attached_video_devices().is_empty());
    assert_eq!(harness.auth.prompt_count(), 0);
}

#[test]
fn prompt_refusal_is_treated_as_denied() {
    let harness = Harness::new(
        VirtualCamera::new(presets::single_back()),
        VirtualAuthorization::new().with_verdict(MediaType::Video, AuthorizationState::Denied),
        test_config(),
    );
    harness.session.configure();
    harness.session.configure();
    harness.wait_for(|e| *e == CameraEvent::ConfigurationFailed(CameraError::AuthorizationDenied));
    assert_eq!(harness.auth.prompt_count(), 1);
}

#[test]
fn no_camera_is_reported_and_resurfaced_on_activate() {
    let harness = Harness::with_devices(presets::no_cameras());
    harness.session.configure();
    harness.wait_for(|e| *e == CameraEvent::NoCameraDetected);
    assert_eq!(harness.session.state().config_state, SessionConfigState::ConfigurationFailed);

    harness.session.activate();
    harness.wait_for(|e| *e == CameraEvent::NoCameraDetected);
    assert!(!harness.session.state().is_running);
}

#[test]
fn fallback_picks_front_camera_when_back_is_missing() {
    let harness = Harness::running(presets::front_only());
    let device = harness.session.state().active_device.unwrap();
    assert_eq!(device.position, DevicePosition::Front);
}

#[test]
fn audio_failures_are_not_fatal() {
    let camera = VirtualCamera::new(presets::dual_back_true_depth_front());
    camera.fail_audio_input(true);
    let harness = Harness::new(camera, VirtualAuthorization::authorized(), test_config());
    harness.session.configure();
    harness.session.flush();
    let state = harness.session.state();
    assert_eq!(state.config_state, SessionConfigState::Ready);
    assert!(!state.has_audio_input);

    let harness = Harness::new(
        VirtualCamera::new(presets::dual_back_true_depth_front()),
        VirtualAuthorization::authorized().with_status(MediaType::Audio, AuthorizationState::Denied),
        test_config(),
    );
    harness.session.configure();
    harness.session.flush();
    assert_eq!(harness.session.state().config_state, SessionConfigState::Ready);
    assert_eq!(harness.camera.attached_audio(), None);
}

#[test]
fn audio_disabled_skips_microphone() {
    let config = SessionConfiguration {
        audio_enabled: false,
        ..test_config()
    };
    let harness = Harness::new(
        VirtualCamera::new(presets::single_back()),
        VirtualAuthorization::new(),
        config,
    );
    harness.session.configure();
    harness.session.flush();
    assert!(!harness.session.state().has_audio_input);
    assert_eq!(harness.auth.prompt_count(), 1);
}

#[test]
fn background_audio_policy_reaches_the_microphone() {
    let config = SessionConfiguration {
        allow_background_audio: false,
        ..test_config()
    };
    let harness = Harness::new(
        VirtualCamera::new(presets::single_back()),
        VirtualAuthorization::authorized(),
        config,
    );
    harness.session.configure();
    harness.session.flush();
    assert_eq!(harness.camera.attached_audio(), Some(false));
}

#[test]
fn missing_photo_output_is_fatal() {
    let options = VirtualCameraOptions {
        photo_output_available: false,
        ..Default::default()
    };
    let harness = Harness::new(
        VirtualCamera::with_options(presets::single_back(), options),
        VirtualAuthorization::authorized(),
        test_config(),
    );
    harness.session.configure();
    let events = harness.wait_for(|e| matches!(e, CameraEvent::ConfigurationFailed(_)));
    assert!(matches!(
        events.last(),
        Some(CameraEvent::ConfigurationFailed(CameraError::ConfigurationFailed(_)))
    ));
    let state = harness.session.state();
    assert_eq!(state.config_state, SessionConfigState::ConfigurationFailed);
    assert_eq!(state.active_device, None);
    assert!(!state.has_audio_input);

    harness.session.start();
    harness.session.flush();
    assert!(!harness.session.state().is_running);
}

#[test]
fn reconfigure_recovers_after_input_failure() {
    let camera = VirtualCamera::new(presets::dual_back_true_depth_front());
    camera.fail_input_creation("back-dual");
    let harness = Harness::new(camera, VirtualAuthorization::authorized(), test_config());

    harness.session.configure();
    harness.wait_for(|e| matches!(e, CameraEvent::ConfigurationFailed(_)));
    assert!(harness.session.state().config_state.is_failed());

    harness.camera.clear_faults();
    harness.session.reconfigure();
    harness.session.activate();
    harness.wait_for(|e| *e == CameraEvent::SessionStarted);

    assert_eq!(harness.session.state().config_state, SessionConfigState::Ready);
    assert_eq!(harness.camera.reset_count(), 1);
    assert_eq!(harness.camera.attached_video_devices().len(), 1);
}

#[test]
fn reconfigure_is_ignored_when_ready() {
    let harness = Harness::running(presets::single_back());
    harness.session.reconfigure();
    harness.session.flush();
    assert_eq!(harness.camera.reset_count(), 0);
    assert!(harness.session.state().is_running);
}

#[test]
fn deactivate_stops_the_session() {
    let harness = Harness::running(presets::single_back());
    harness.session.deactivate();
    harness.session.flush();
    assert!(!harness.session.state().is_running);

    harness.session.activate();
    harness.wait_for(|e| *e == CameraEvent::SessionStarted);
    assert!(harness.session.state().is_running);
}

// --- Photos ---

#[test]
fn photo_with_auto_flash_is_processed_and_saved() {
    let harness = Harness::running(presets::dual_back_true_depth_front());
    let intents = Arc::clone(harness.session.intents());

    assert!(intents.change_flash_mode());
    harness.tick();
    harness.wait_for(|e| *e == CameraEvent::FlashModeChanged(FlashMode::Auto));

    assert!(intents.capture_photo());
    harness.tick();
    let events = harness.wait_for(|e| matches!(e, CameraEvent::PhotoSaved { .. }));

    assert_eq!(events[0], CameraEvent::PhotoCaptured { error: None });
    assert!(!intents.is_pending(IntentKind::CapturePhoto));
    match &events[1] {
        CameraEvent::PhotoProcessed(photo) => {
            assert_eq!((photo.width, photo.height), (64, 48));
            assert_eq!(photo.flash_mode, FlashMode::Auto);
            assert_eq!(photo.position, Some(DevicePosition::Back));
        }
        other => panic!("expected a processed photo, got {:?}", other),
    }
    assert!(matches!(events[2], CameraEvent::PhotoSaved { error: None, .. }));

    assert_eq!(harness.sink.photos().len(), 1);
    assert_eq!(harness.camera.photo_requests()[0].flash_mode, Some(FlashMode::Auto));
}

#[test]
fn front_camera_without_flash_captures_without_flash_setting() {
    let harness = Harness::running(presets::front_only());
    harness.session.capture_photo();
    harness.wait_for(|e| matches!(e, CameraEvent::PhotoProcessed(_)));
    assert_eq!(harness.camera.photo_requests()[0].flash_mode, None);
}

#[test]
fn repeated_capture_requests_coalesce() {
    let harness = Harness::running(presets::single_back());
    let intents = harness.session.intents();

    assert!(intents.capture_photo());
    assert!(!intents.capture_photo());
    harness.tick();
    harness.tick();
    assert!(!intents.capture_photo());

    harness.wait_for(|e| matches!(e, CameraEvent::PhotoSaved { .. }));
    let later = harness.settle();
    assert_eq!(count(&later, "photo_captured"), 0);
    assert_eq!(harness.camera.photo_requests().len(), 1);

    assert!(intents.capture_photo());
}

#[test]
fn capture_before_start_still_completes() {
    let harness = Harness::with_devices(presets::single_back());
    harness.session.configure();
    let intents = harness.session.intents();
    intents.capture_photo();
    harness.tick();

    let events = harness.wait_for(|e| matches!(e, CameraEvent::PhotoCaptured { .. }));
    assert!(events.last().and_then(|e| e.error()).is_some());
    assert!(!intents.is_pending(IntentKind::CapturePhoto));
    assert!(harness.camera.photo_requests().is_empty());
}

#[test]
fn hardware_capture_failure_is_reported() {
    let harness = Harness::running(presets::single_back());
    harness
        .camera
        .fail_next_photo(CameraError::OperationFailed("sensor glitch".into()));
    harness.session.capture_photo();

    let events = harness.wait_for(|e| matches!(e, CameraEvent::PhotoCaptured { .. }));
    assert_eq!(
        events.last().and_then(|e| e.error()),
        Some(&CameraError::OperationFailed("sensor glitch".into()))
    );
    assert_eq!(count(&harness.settle(), "photo_processed"), 0);
}

#[test]
fn undecodable_photo_is_dropped() {
    let options = VirtualCameraOptions {
        corrupt_photos: true,
        ..Default::default()
    };
    let harness = Harness::new(
        VirtualCamera::with_options(presets::single_back(), options),
        VirtualAuthorization::authorized(),
        test_config(),
    );
    harness.session.configure();
    harness.session.start();
    harness.session.capture_photo();
    harness.wait_for(|e| *e == CameraEvent::PhotoCaptured { error: None });

    let later = harness.settle();
    assert_eq!(count(&later, "photo_processed"), 0);
    assert_eq!(count(&later, "photo_saved"), 0);
    assert!(harness.sink.photos().is_empty());
}

#[test]
fn refused_library_access_reports_save_error() {
    let harness = Harness::running(presets::single_back());
    harness.sink.set_authorization(AuthorizationState::Denied);
    harness.session.capture_photo();

    let events = harness.wait_for(|e| matches!(e, CameraEvent::PhotoSaved { .. }));
    assert!(matches!(
        events.last().and_then(|e| e.error()),
        Some(CameraError::PersistenceFailed(_))
    ));
    assert!(harness.sink.photos().is_empty());
    assert!(harness.session.state().is_running);
}

// --- Recording ---

#[test]
fn toggle_pair_starts_and_finishes_once() {
    let harness = Harness::running(presets::dual_back_true_depth_front());
    let intents = Arc::clone(harness.session.intents());

    assert!(intents.toggle_video_recording());
    assert!(!intents.toggle_video_recording());
    assert!(!intents.is_pending(IntentKind::StopRecording));
    harness.tick();
    let started = harness.wait_for(|e| matches!(e, CameraEvent::VideoRecordingStarted { .. }));
    assert!(intents.is_recording());
    assert!(!intents.is_pending(IntentKind::RecordVideo));

    let path = match started.last() {
        Some(CameraEvent::VideoRecordingStarted { path }) => path.clone(),
        other => panic!("expected a start, got {:?}", other),
    };
    assert!(path.starts_with(&harness.temp_dir));

    thread::sleep(Duration::from_millis(50));
    assert!(intents.toggle_video_recording());
    assert!(intents.is_pending(IntentKind::StopRecording));
    assert!(!intents.is_pending(IntentKind::RecordVideo));
    harness.tick();
    harness.tick();
    let finished = harness.wait_for(|e| matches!(e, CameraEvent::VideoRecordingFinished { .. }));
    assert_eq!(
        finished.last(),
        Some(&CameraEvent::VideoRecordingFinished {
            path: Some(path.clone()),
            error: None
        })
    );

    let later = harness.settle();
    assert_eq!(count(&started, "video_recording_started") + count(&later, "video_recording_started"), 1);
    assert_eq!(count(&finished, "video_recording_finished") + count(&later, "video_recording_finished"), 1);

    assert!(!intents.is_recording());
    assert!(!intents.is_pending(IntentKind::StopRecording));
    assert!(!path.exists());

    let videos = harness.sink.videos();
    assert_eq!(videos.len(), 1);
    assert_eq!(&videos[0][4..8], b"ftyp");
    let (_, settings) = &harness.camera.recordings()[0];
    assert_eq!(settings.codec, camera_session_core::VideoCodec::Hevc);
}

#[test]
fn recording_without_movie_output_completes_with_error() {
    let options = VirtualCameraOptions {
        movie_output_available: false,
        ..Default::default()
    };
    let harness = Harness::new(
        VirtualCamera::with_options(presets::single_back(), options),
        VirtualAuthorization::authorized(),
        test_config(),
    );
    harness.session.configure();
    harness.session.start();
    harness.wait_for(|e| *e == CameraEvent::SessionStarted);
    assert!(!harness.session.state().has_movie_output);

    let intents = harness.session.intents();
    intents.toggle_video_recording();
    harness.tick();
    let events = harness.wait_for(|e| matches!(e, CameraEvent::VideoRecordingFinished { .. }));
    assert!(matches!(
        events.last(),
        Some(CameraEvent::VideoRecordingFinished { path: None, error: Some(_) })
    ));
    assert!(!intents.is_pending(IntentKind::RecordVideo));
    assert!(!intents.is_recording());
}

#[test]
fn max_duration_finish_is_still_saved() {
    let config = SessionConfiguration {
        max_video_duration_secs: Some(0.05),
        ..test_config()
    };
    let harness = Harness::new(
        VirtualCamera::new(presets::single_back()),
        VirtualAuthorization::authorized(),
        config,
    );
    harness.session.configure();
    harness.session.start();
    harness.session.start_recording();

    let events = harness.wait_for(|e| matches!(e, CameraEvent::VideoRecordingFinished { .. }));
    assert_eq!(count(&events, "video_recording_started"), 1);
    assert!(events.last().and_then(|e| e.error()).is_some());
    assert_eq!(harness.sink.videos().len(), 1);
    assert_eq!(
        harness.camera.recordings()[0].1.max_duration,
        Some(Duration::from_millis(50))
    );
    assert!(!harness.session.state().is_recording);
}

#[test]
fn stopping_the_session_finishes_the_recording() {
    let harness = Harness::running(presets::single_back());
    harness.session.toggle_recording();
    harness.wait_for(|e| matches!(e, CameraEvent::VideoRecordingStarted { .. }));

    harness.session.stop();
    harness.wait_for(|e| matches!(e, CameraEvent::VideoRecordingFinished { .. }));
    let state = harness.session.state();
    assert!(!state.is_running);
    assert!(!state.is_recording);
    assert_eq!(harness.sink.videos().len(), 1);
}

#[test]
fn stop_without_recording_still_completes() {
    let harness = Harness::running(presets::single_back());
    harness.session.stop_recording();
    let events = harness.wait_for(|e| matches!(e, CameraEvent::RecordingStopIgnored(_)));
    assert_eq!(count(&events, "video_recording_finished"), 0);
    assert!(events.last().and_then(|e| e.error()).is_some());
}

#[test]
fn stop_after_max_duration_finish_reports_one_finish() {
    let config = SessionConfiguration {
        max_video_duration_secs: Some(0.05),
        ..test_config()
    };
    let harness = Harness::new(
        VirtualCamera::new(presets::single_back()),
        VirtualAuthorization::authorized(),
        config,
    );
    harness.session.configure();
    harness.session.start();
    harness.wait_for(|e| *e == CameraEvent::SessionStarted);
    let intents = Arc::clone(harness.session.intents());

    intents.toggle_video_recording();
    harness.tick();
    harness.wait_for(|e| matches!(e, CameraEvent::VideoRecordingStarted { .. }));

    // the limit ends the recording before the host drains the finish
    thread::sleep(Duration::from_millis(200));
    assert!(intents.is_recording());
    assert!(intents.toggle_video_recording());
    assert!(intents.is_pending(IntentKind::StopRecording));
    harness.tick();

    let mut events = harness.wait_for(|e| matches!(e, CameraEvent::RecordingStopIgnored(_)));
    events.extend(harness.settle());
    assert_eq!(count(&events, "video_recording_finished"), 1);
    assert_eq!(count(&events, "recording_stop_ignored"), 1);
    assert!(!intents.is_recording());
    assert!(!intents.is_pending(IntentKind::StopRecording));
    assert_eq!(harness.sink.videos().len(), 1);

    assert!(intents.toggle_video_recording());
    assert!(intents.is_pending(IntentKind::RecordVideo));
    harness.tick();
    harness.wait_for(|e| matches!(e, CameraEvent::VideoRecordingStarted { .. }));
    assert!(!intents.is_pending(IntentKind::RecordVideo));
}

// --- Rotation, flash, zoom, focus ---

#[test]
fn rotate_with_single_camera_keeps_input_and_completes() {
    let harness = Harness::running(presets::single_back());
    let intents = harness.session.intents();

    assert!(intents.rotate_camera());
    harness.tick();
    harness.wait_for(|e| {
        *e == CameraEvent::CameraRotated {
            position: Some(DevicePosition::Back),
        }
    });

    assert!(!intents.is_pending(IntentKind::RotateCamera));
    let attached = harness.camera.attached_video_devices();
    assert_eq!(attached.len(), 1);
    assert_eq!(attached[0].id, "back-wide");
}

#[test]
fn rotate_switches_lens_and_resets_zoom() {
    let harness = Harness::running(presets::dual_back_true_depth_front());
    harness.session.set_zoom(4.0);
    harness.wait_for(|e| *e == CameraEvent::ZoomChanged(4.0));

    harness.session.rotate_camera();
    harness.wait_for(|e| {
        *e == CameraEvent::CameraRotated {
            position: Some(DevicePosition::Front),
        }
    });
    let state = harness.session.state();
    assert_eq!(state.active_device.map(|d| d.id), Some("front-true-depth".to_string()));
    assert_relative_eq!(state.zoom_scale, 1.0);
    assert_eq!(harness.camera.attached_video_devices().len(), 1);
    assert_eq!(harness.camera.stabilization(), Some(StabilizationMode::Auto));

    harness.session.rotate_camera();
    harness.wait_for(|e| {
        *e == CameraEvent::CameraRotated {
            position: Some(DevicePosition::Back),
        }
    });
    assert_eq!(
        harness.session.state().active_device.map(|d| d.id),
        Some("back-dual".to_string())
    );
}

#[test]
fn rejected_rotation_restores_previous_input() {
    let harness = Harness::running(presets::dual_back_true_depth_front());
    harness.camera.reject_input("front-true-depth");

    harness.session.rotate_camera();
    harness.wait_for(|e| {
        *e == CameraEvent::CameraRotated {
            position: Some(DevicePosition::Back),
        }
    });
    let attached = harness.camera.attached_video_devices();
    assert_eq!(attached.len(), 1);
    assert_eq!(attached[0].id, "back-dual");
}

#[test]
fn double_tap_rotates_through_the_intent_latch() {
    let harness = Harness::running(presets::wide_back_and_front());
    let router = GestureRouter::new(harness.session.config());

    assert!(router.double_tap(harness.session.intents()));
    assert!(!router.double_tap(harness.session.intents()));
    harness.tick();
    harness.wait_for(|e| matches!(e, CameraEvent::CameraRotated { .. }));
    assert_eq!(
        harness.session.state().active_device.map(|d| d.position),
        Some(DevicePosition::Front)
    );
}

#[test]
fn flash_cycles_with_period_three() {
    let harness = Harness::running(presets::single_back());
    let intents = harness.session.intents();

    let mut modes = Vec::new();
    for _ in 0..3 {
        assert!(intents.change_flash_mode());
        harness.tick();
        let events = harness.wait_for(|e| matches!(e, CameraEvent::FlashModeChanged(_)));
        if let Some(CameraEvent::FlashModeChanged(mode)) = events.last() {
            modes.push(*mode);
        }
    }
    assert_eq!(modes, vec![FlashMode::Auto, FlashMode::On, FlashMode::Off]);
    assert_eq!(harness.session.state().flash_mode, FlashMode::Off);
}

#[test]
fn zoom_stays_within_bounds() {
    let config = SessionConfiguration {
        max_zoom_scale: 5.0,
        ..test_config()
    };
    let harness = Harness::new(
        VirtualCamera::new(presets::dual_back_true_depth_front()),
        VirtualAuthorization::authorized(),
        config,
    );
    harness.session.configure();
    harness.session.start();

    for (raw, expected) in [(100.0, 5.0), (-3.0, 1.0), (f64::NAN, 1.0), (f64::INFINITY, 5.0), (2.5, 2.5)] {
        harness.session.set_zoom(raw);
        let events = harness.wait_for(|e| matches!(e, CameraEvent::ZoomChanged(_)));
        match events.last() {
            Some(CameraEvent::ZoomChanged(scale)) => assert_relative_eq!(*scale, expected),
            other => panic!("expected a zoom change, got {:?}", other),
        }
    }
    assert_eq!(harness.camera.zoom_factor("back-dual"), Some(2.5));
}

#[test]
fn pinch_scales_from_gesture_start() {
    let harness = Harness::running(presets::dual_back_true_depth_front());
    let router = GestureRouter::new(harness.session.config());

    harness.session.set_zoom(2.0);
    harness.wait_for(|e| matches!(e, CameraEvent::ZoomChanged(_)));

    assert!(router.pinch_began(&harness.session));
    assert!(router.pinch_changed(&harness.session, 1.5));
    harness.wait_for(|e| *e == CameraEvent::ZoomChanged(3.0));
    assert!(router.pinch_changed(&harness.session, 2.0));
    harness.wait_for(|e| *e == CameraEvent::ZoomChanged(4.0));
    assert_relative_eq!(harness.session.state().zoom_scale, 4.0);
}

#[test]
fn tap_focuses_at_mapped_point() {
    let harness = Harness::running(presets::dual_back_true_depth_front());
    let router = GestureRouter::new(harness.session.config());

    let tap = Point::new(100.0, 300.0);
    assert!(router.single_tap(&harness.session, tap, Size::new(400.0, 600.0)));
    harness.wait_for(|e| *e == CameraEvent::FocusedOnPoint(tap));

    let focus = harness.camera.focus_points();
    assert_eq!(focus.len(), 1);
    assert_eq!(focus[0].0, "back-dual");
    assert_relative_eq!(focus[0].1.x, 0.5);
    assert_relative_eq!(focus[0].1.y, 0.75);
}

#[test]
fn invalid_configuration_is_rejected_up_front() {
    let config = SessionConfiguration {
        max_zoom_scale: 0.5,
        ..test_config()
    };
    let result = CameraSession::new(
        Arc::new(VirtualCamera::new(presets::single_back())),
        Arc::new(VirtualAuthorization::authorized()),
        Arc::new(MemoryMediaSink::new()),
        config,
    );
    assert!(matches!(result, Err(CameraError::ConfigurationFailed(_))));
}

#[test]
fn unrepresentable_duration_is_rejected_up_front() {
    let config = SessionConfiguration {
        max_video_duration_secs: Some(1e20),
        ..test_config()
    };
    let result = CameraSession::new(
        Arc::new(VirtualCamera::new(presets::single_back())),
        Arc::new(VirtualAuthorization::authorized()),
        Arc::new(MemoryMediaSink::new()),
        config,
    );
    assert!(matches!(result, Err(CameraError::ConfigurationFailed(_))));
}
