use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, error, info, warn};
use parking_lot::Mutex;

use crate::devices::catalog::DeviceCatalog;
use crate::intents::flags::IntentFlags;
use crate::intents::queue::IntentQueue;
use crate::models::camera_models::{
    CapturedPhoto, FlashMode, MediaType, MovieOutputCapabilities, PhotoSettings, Point, RecordingSettings, Size,
    StabilizationMode, VideoCodec, VideoOrientation, ZoomState,
};
use crate::models::config::SessionConfiguration;
use crate::models::device::{ActiveVideoInput, DeviceDescriptor, DevicePosition, InputHandle};
use crate::models::error::CameraError;
use crate::models::event::CameraEvent;
use crate::models::recording::RecordingSession;
use crate::models::state::{AuthorizationState, SessionConfigState, SessionSnapshot};
use crate::session::gestures::point_of_interest;
use crate::session::notifier::{completion_channel, CompletionNotifier, DeliveryContext};
use crate::session::worker::{QueueHandle, SerialQueue};
use crate::traits::authorization::HardwareAuthorization;
use crate::traits::camera_hardware::{CameraHardware, HardwareEvent, HardwareEventCallback};
use crate::traits::gesture_target::GestureTarget;
use crate::traits::intent_target::IntentTarget;
use crate::traits::media_sink::MediaSink;

/// Internal mutable session state, protected by `parking_lot::Mutex`.
///
/// Only the worker mutates the device-graph fields (`video_input`,
/// `audio_input`, outputs); other fields are read by `state()` from any thread.
struct SessionCore {
    authorization: AuthorizationState,
    config_state: SessionConfigState,
    last_error: Option<CameraError>,
    running: bool,
    video_input: Option<ActiveVideoInput>,
    audio_input: Option<InputHandle>,
    has_photo_output: bool,
    movie_output: Option<MovieOutputCapabilities>,
    flash_mode: FlashMode,
    zoom: ZoomState,
    orientation: VideoOrientation,
    recording: Option<RecordingSession>,
    photo_in_flight: bool,
}

impl SessionCore {
    fn new(config: &SessionConfiguration) -> Self {
        Self {
            authorization: AuthorizationState::Undetermined,
            config_state: SessionConfigState::Unconfigured,
            last_error: None,
            running: false,
            video_input: None,
            audio_input: None,
            has_photo_output: false,
            movie_output: None,
            flash_mode: config.initial_flash_mode,
            zoom: ZoomState::default(),
            orientation: VideoOrientation::default(),
            recording: None,
            photo_in_flight: false,
        }
    }

    fn is_live(&self) -> bool {
        self.config_state.is_ready() && self.running
    }

    /// The active device, when the session is configured.
    fn ready_device(&self) -> Option<DeviceDescriptor> {
        if !self.config_state.is_ready() {
            return None;
        }
        self.video_input.as_ref().map(|input| input.device.clone())
    }

    fn detach_all(&mut self) {
        self.video_input = None;
        self.audio_input = None;
        self.has_photo_output = false;
        self.movie_output = None;
    }
}

/// Flash and lens in effect when a capture was requested.
#[derive(Debug, Clone, Copy)]
struct PhotoContext {
    flash_mode: FlashMode,
    position: Option<DevicePosition>,
}

#[derive(Debug, Clone, Copy)]
enum ZoomRequest {
    Absolute(f64),
    Gesture(f64),
}

struct SessionInner<H: CameraHardware + 'static> {
    hardware: Arc<H>,
    authorization: Arc<dyn HardwareAuthorization>,
    sink: Arc<dyn MediaSink>,
    config: SessionConfiguration,
    state: Mutex<SessionCore>,
    notifier: CompletionNotifier,
    jobs: QueueHandle,
}

/// Camera capture session orchestrator.
///
/// Generic over the platform camera stack via the `CameraHardware` trait.
/// Every operation except `state()` is queued onto one serialized worker and
/// runs in submission order; hardware completions are routed back onto the
/// same worker before they reach the host:
/// ```text
/// host ─ intents ─→ [IntentQueue] ─→ [SerialQueue worker] ─→ CameraHardware
///                                          ↑                      │
///                                          └── HardwareEvent ─────┘
///                                          │
///                                  [CompletionNotifier] ─→ [DeliveryContext] ─→ host
/// ```
pub struct CameraSession<H: CameraHardware + 'static> {
    inner: Arc<SessionInner<H>>,
    intents: IntentQueue,
    queue: SerialQueue,
}

impl<H: CameraHardware + 'static> CameraSession<H> {
    /// Build a session and the delivery context its completions arrive on.
    pub fn new(
        hardware: Arc<H>,
        authorization: Arc<dyn HardwareAuthorization>,
        sink: Arc<dyn MediaSink>,
        config: SessionConfiguration,
    ) -> Result<(Self, DeliveryContext), CameraError> {
        config.validate().map_err(CameraError::ConfigurationFailed)?;

        let flags = Arc::new(IntentFlags::new());
        let (notifier, delivery) = completion_channel(Arc::clone(&flags));
        let queue = SerialQueue::new("camera-session-queue")?;

        let inner = Arc::new(SessionInner {
            hardware,
            authorization,
            sink,
            state: Mutex::new(SessionCore::new(&config)),
            config,
            notifier,
            jobs: queue.handle(),
        });

        Ok((
            Self {
                inner,
                intents: IntentQueue::new(flags),
                queue,
            },
            delivery,
        ))
    }

    fn submit(&self, op: impl FnOnce(&Arc<SessionInner<H>>) + Send + 'static) {
        let inner = Arc::clone(&self.inner);
        self.queue.enqueue(move || op(&inner));
    }

    pub fn config(&self) -> &SessionConfiguration {
        &self.inner.config
    }

    /// Intent latches the host raises.
    pub fn intents(&self) -> &Arc<IntentFlags> {
        self.intents.flags()
    }

    /// Dispatch raised intents once. Call once per host refresh tick.
    pub fn apply_pending(&self) -> usize {
        self.intents.apply_pending(self)
    }

    pub fn state(&self) -> SessionSnapshot {
        let state = self.inner.state.lock();
        SessionSnapshot {
            authorization: state.authorization,
            config_state: state.config_state,
            is_running: state.running,
            is_recording: state.recording.is_some(),
            flash_mode: state.flash_mode,
            zoom_scale: state.zoom.current_scale,
            active_device: state.video_input.as_ref().map(|input| input.device.clone()),
            has_audio_input: state.audio_input.is_some(),
            has_movie_output: state.movie_output.is_some(),
        }
    }

    /// Block until every operation queued so far has run.
    pub fn flush(&self) {
        self.queue.flush();
    }

    // --- Lifecycle ---

    /// Resolve authorization (prompting when undetermined) and build the
    /// device graph. Transitions: unconfigured → configuring → ready / failed.
    pub fn configure(&self) {
        self.submit(|inner| inner.configure_now());
    }

    /// Tear down a failed configuration and try again.
    pub fn reconfigure(&self) {
        self.submit(|inner| inner.reconfigure_now());
    }

    pub fn start(&self) {
        self.submit(|inner| inner.start_now());
    }

    pub fn stop(&self) {
        self.submit(|inner| inner.stop_now());
    }

    /// Host became visible: start a ready session or re-surface why it cannot run.
    pub fn activate(&self) {
        self.submit(|inner| inner.activate_now());
    }

    /// Host went away: stop the session.
    pub fn deactivate(&self) {
        self.submit(|inner| inner.stop_now());
    }

    // --- Operations ---

    pub fn capture_photo(&self) {
        self.submit(|inner| inner.capture_photo_now());
    }

    pub fn start_recording(&self) {
        self.submit(|inner| inner.start_recording_now());
    }

    pub fn stop_recording(&self) {
        self.submit(|inner| inner.stop_recording_now());
    }

    /// Start when idle, stop while recording.
    pub fn toggle_recording(&self) {
        self.submit(|inner| {
            let recording = inner.state.lock().recording.is_some();
            if recording {
                inner.stop_recording_now();
            } else {
                inner.start_recording_now();
            }
        });
    }

    pub fn rotate_camera(&self) {
        self.submit(|inner| inner.rotate_camera_now());
    }

    pub fn cycle_flash_mode(&self) {
        self.submit(|inner| inner.cycle_flash_now());
    }

    pub fn begin_zoom(&self) {
        self.submit(|inner| inner.state.lock().zoom.begin_gesture());
    }

    /// Zoom to `scale`, clamped to the device and configured limits.
    pub fn set_zoom(&self, scale: f64) {
        self.submit(move |inner| inner.zoom_now(ZoomRequest::Absolute(scale)));
    }

    pub fn zoom_by_gesture(&self, gesture_scale: f64) {
        self.submit(move |inner| inner.zoom_now(ZoomRequest::Gesture(gesture_scale)));
    }

    pub fn focus(&self, tap: Point, preview_size: Size) {
        self.submit(move |inner| inner.focus_now(tap, preview_size));
    }

    /// Orientation stamped onto the next recording.
    pub fn set_video_orientation(&self, orientation: VideoOrientation) {
        self.submit(move |inner| inner.state.lock().orientation = orientation);
    }
}

impl<H: CameraHardware + 'static> IntentTarget for CameraSession<H> {
    fn capture_photo(&self) {
        CameraSession::capture_photo(self);
    }

    fn start_recording(&self) {
        CameraSession::start_recording(self);
    }

    fn stop_recording(&self) {
        CameraSession::stop_recording(self);
    }

    fn rotate_camera(&self) {
        CameraSession::rotate_camera(self);
    }

    fn cycle_flash_mode(&self) {
        CameraSession::cycle_flash_mode(self);
    }
}

impl<H: CameraHardware + 'static> GestureTarget for CameraSession<H> {
    fn focus(&self, tap: Point, preview_size: Size) {
        CameraSession::focus(self, tap, preview_size);
    }

    fn begin_zoom(&self) {
        CameraSession::begin_zoom(self);
    }

    fn zoom_by_gesture(&self, gesture_scale: f64) {
        CameraSession::zoom_by_gesture(self, gesture_scale);
    }
}

// --- Worker-side implementation. Everything below runs on the serial queue. ---

impl<H: CameraHardware + 'static> SessionInner<H> {
    /// Wrap `handler` into a hardware callback that re-enters the worker.
    fn hardware_callback<F>(self: &Arc<Self>, handler: F) -> HardwareEventCallback
    where
        F: Fn(&Arc<Self>, HardwareEvent) + Send + Sync + 'static,
    {
        let weak = Arc::downgrade(self);
        let jobs = self.jobs.clone();
        let handler = Arc::new(handler);
        Arc::new(move |event: HardwareEvent| {
            let weak = weak.clone();
            let handler = Arc::clone(&handler);
            jobs.enqueue(move || {
                if let Some(inner) = weak.upgrade() {
                    handler(&inner, event);
                }
            });
        })
    }

    fn ensure_authorized(&self) -> AuthorizationState {
        let current = self.state.lock().authorization;
        if current != AuthorizationState::Undetermined {
            return current;
        }

        let mut verdict = self.authorization.query_status(MediaType::Video);
        if verdict == AuthorizationState::Undetermined {
            info!("camera access undetermined, requesting");
            verdict = self.authorization.request_if_undetermined(MediaType::Video);
        }
        if verdict == AuthorizationState::Undetermined {
            verdict = AuthorizationState::Denied;
        }

        self.state.lock().authorization = verdict;
        verdict
    }

    fn configure_now(&self) {
        if !self.ensure_authorized().is_authorized() {
            warn!("camera access denied, session not configured");
            self.state.lock().last_error = Some(CameraError::AuthorizationDenied);
            self.notifier
                .notify(CameraEvent::ConfigurationFailed(CameraError::AuthorizationDenied));
            return;
        }

        {
            let mut state = self.state.lock();
            if state.config_state != SessionConfigState::Unconfigured {
                debug!("configure ignored in state {:?}", state.config_state);
                return;
            }
            state.config_state = SessionConfigState::Configuring;
        }

        self.hardware.begin_configuration();
        let result = self.attach_graph();
        self.hardware.commit_configuration();

        match result {
            Ok(()) => {
                let mut state = self.state.lock();
                state.config_state = SessionConfigState::Ready;
                state.last_error = None;
                info!(
                    "camera session configured (audio: {}, movie output: {})",
                    state.audio_input.is_some(),
                    state.movie_output.is_some()
                );
            }
            Err(err) => {
                error!("camera session configuration failed: {}", err);
                {
                    let mut state = self.state.lock();
                    state.detach_all();
                    state.config_state = SessionConfigState::ConfigurationFailed;
                    state.last_error = Some(err.clone());
                }
                self.notifier.notify(failure_event(err));
            }
        }
    }

    /// Attach inputs and outputs. Stops at the first fatal failure.
    fn attach_graph(&self) -> Result<(), CameraError> {
        self.hardware.set_quality(self.config.video_quality);

        let catalog = DeviceCatalog::new(self.hardware.discover_devices());
        let device = catalog
            .select_device(self.config.preferred_device_type, self.config.preferred_position)
            .ok_or(CameraError::NoCameraAvailable)?;

        let handle = self.hardware.create_video_input(&device).map_err(|e| {
            CameraError::ConfigurationFailed(format!("could not create video input for {}: {}", device.name, e))
        })?;
        self.hardware
            .add_input(handle)
            .map_err(|e| CameraError::ConfigurationFailed(format!("could not add video input: {}", e)))?;
        info!("video input attached: {}", device.name);
        self.state.lock().video_input = Some(ActiveVideoInput { handle, device });

        if self.config.audio_enabled {
            self.attach_audio();
        }

        self.hardware
            .add_photo_output()
            .map_err(|e| CameraError::ConfigurationFailed(format!("could not add photo output: {}", e)))?;
        self.state.lock().has_photo_output = true;

        match self.hardware.add_movie_output() {
            Ok(capabilities) => {
                if capabilities.stabilization_supported {
                    self.hardware.set_movie_stabilization(StabilizationMode::Auto);
                }
                self.state.lock().movie_output = Some(capabilities);
            }
            Err(e) => info!("movie output unavailable, recording disabled: {}", e),
        }

        Ok(())
    }

    fn attach_audio(&self) {
        let verdict = self.authorization.request_if_undetermined(MediaType::Audio);
        if !verdict.is_authorized() {
            warn!("microphone access {:?}, recording without audio", verdict);
            return;
        }

        let attached = self
            .hardware
            .create_audio_input(self.config.allow_background_audio)
            .and_then(|input| self.hardware.add_input(input).map(|_| input));
        match attached {
            Ok(input) => self.state.lock().audio_input = Some(input),
            Err(e) => warn!("could not attach audio input, recording without audio: {}", e),
        }
    }

    fn reconfigure_now(&self) {
        {
            let mut state = self.state.lock();
            if !state.config_state.is_failed() {
                debug!("reconfigure ignored in state {:?}", state.config_state);
                return;
            }
            state.detach_all();
            state.last_error = None;
            state.config_state = SessionConfigState::Unconfigured;
        }

        self.hardware.begin_configuration();
        self.hardware.reset();
        self.hardware.commit_configuration();

        info!("reconfiguring camera session");
        self.configure_now();
    }

    fn start_now(&self) {
        if !self.state.lock().config_state.is_ready() {
            debug!("start ignored, session not ready");
            return;
        }
        if self.hardware.is_running() {
            debug!("start ignored, session already running");
            self.state.lock().running = true;
            return;
        }

        self.hardware.start_running();
        let running = self.hardware.is_running();
        self.state.lock().running = running;

        if running {
            info!("camera session started");
            self.notifier.notify(CameraEvent::SessionStarted);
        } else {
            warn!("camera session did not start");
            self.notifier.notify(CameraEvent::ConfigurationFailed(CameraError::OperationFailed(
                "capture session did not start".into(),
            )));
        }
    }

    fn stop_now(&self) {
        if !self.state.lock().config_state.is_ready() {
            debug!("stop ignored, session not ready");
            return;
        }
        if !self.hardware.is_running() {
            debug!("stop ignored, session not running");
            self.state.lock().running = false;
            return;
        }

        if self.hardware.is_recording() {
            info!("stopping active recording before session stop");
            self.hardware.stop_recording();
        }
        self.hardware.stop_running();
        self.state.lock().running = self.hardware.is_running();
        info!("camera session stopped");
    }

    fn activate_now(&self) {
        let (config_state, last_error) = {
            let state = self.state.lock();
            (state.config_state, state.last_error.clone())
        };

        match (config_state, last_error) {
            (SessionConfigState::Ready, _) => self.start_now(),
            (_, Some(err)) => self.notifier.notify(failure_event(err)),
            (state, None) => debug!("activate ignored in state {:?}", state),
        }
    }

    fn capture_photo_now(self: &Arc<Self>) {
        let (settings, context) = {
            let mut state = self.state.lock();
            if state.photo_in_flight {
                debug!("photo capture already in flight");
                return;
            }
            if !(state.is_live() && state.has_photo_output) {
                drop(state);
                warn!("photo capture rejected, session not running");
                self.notifier.notify(CameraEvent::PhotoCaptured {
                    error: Some(CameraError::OperationFailed("session is not running".into())),
                });
                return;
            }

            state.photo_in_flight = true;
            let device = state.video_input.as_ref().map(|input| &input.device);
            let settings = PhotoSettings {
                flash_mode: device.filter(|d| d.has_flash).map(|_| state.flash_mode),
            };
            let context = PhotoContext {
                flash_mode: state.flash_mode,
                position: device.map(|d| d.position),
            };
            (settings, context)
        };

        let callback = self.hardware_callback(move |inner, event| inner.handle_photo_event(event, context));
        if let Err(e) = self.hardware.capture_photo(settings, callback) {
            warn!("photo capture failed to start: {}", e);
            self.state.lock().photo_in_flight = false;
            self.notifier.notify(CameraEvent::PhotoCaptured { error: Some(e) });
        }
    }

    fn handle_photo_event(&self, event: HardwareEvent, context: PhotoContext) {
        match event {
            HardwareEvent::PhotoCaptured { error } => {
                self.state.lock().photo_in_flight = false;
                if let Some(e) = &error {
                    warn!("photo capture failed: {}", e);
                }
                self.notifier.notify(CameraEvent::PhotoCaptured { error });
            }
            HardwareEvent::PhotoProcessed(Ok(data)) => {
                match CapturedPhoto::decode(data, context.flash_mode, context.position) {
                    Ok(photo) => {
                        info!("photo processed: {}x{}, {} bytes", photo.width, photo.height, photo.data.len());
                        self.notifier.notify(CameraEvent::PhotoProcessed(photo.clone()));
                        self.persist_photo(photo);
                    }
                    Err(e) => warn!("dropping captured photo: {}", e),
                }
            }
            HardwareEvent::PhotoProcessed(Err(e)) => warn!("photo processing failed: {}", e),
            other => debug!("ignoring {:?} during photo capture", other),
        }
    }

    fn persist_photo(&self, photo: CapturedPhoto) {
        let error = match self.sink.authorize() {
            AuthorizationState::Authorized => self.sink.save_photo(&photo).err().map(as_persistence_error),
            verdict => Some(CameraError::PersistenceFailed(format!(
                "media library access {:?}",
                verdict
            ))),
        };
        if let Some(e) = &error {
            warn!("photo not saved: {}", e);
        }
        self.notifier.notify(CameraEvent::PhotoSaved { photo, error });
    }

    fn start_recording_now(self: &Arc<Self>) {
        let mut state = self.state.lock();

        let existing = state
            .recording
            .as_ref()
            .map(|recording| (recording.output_path.clone(), recording.is_active));
        if let Some((path, active)) = existing {
            drop(state);
            debug!("recording already in progress at {}", path.display());
            // An acknowledged recording answers the request; a pending one
            // will answer it when the hardware confirms.
            if active {
                self.notifier.notify(CameraEvent::VideoRecordingStarted { path });
            }
            return;
        }

        let rejection = if !state.is_live() {
            Some(CameraError::OperationFailed("session is not running".into()))
        } else if state.movie_output.is_none() {
            Some(CameraError::OperationFailed("movie output unavailable".into()))
        } else {
            fs::create_dir_all(&self.config.temporary_directory)
                .err()
                .map(|e| CameraError::StorageError(format!("failed to create temporary directory: {}", e)))
        };
        if let Some(err) = rejection {
            drop(state);
            warn!("recording rejected: {}", err);
            self.notifier.notify(CameraEvent::VideoRecordingFinished {
                path: None,
                error: Some(err),
            });
            return;
        }

        let codec = state
            .movie_output
            .as_ref()
            .map(|output| output.preferred_codec())
            .unwrap_or(VideoCodec::H264);
        let settings = RecordingSettings {
            orientation: state.orientation,
            codec,
            max_duration: self.config.max_video_duration(),
        };
        let recording = RecordingSession::in_directory(&self.config.temporary_directory);
        let path = recording.output_path.clone();
        state.recording = Some(recording);
        drop(state);

        let callback = self.hardware_callback(|inner, event| inner.handle_recording_event(event));
        match self.hardware.start_recording(&path, settings, callback) {
            Ok(()) => info!("recording requested: {} ({:?}, {:?})", path.display(), codec, settings.orientation),
            Err(e) => {
                warn!("could not start recording: {}", e);
                self.state.lock().recording = None;
                remove_temporary_file(&path);
                self.notifier.notify(CameraEvent::VideoRecordingFinished {
                    path: Some(path),
                    error: Some(e),
                });
            }
        }
    }

    fn stop_recording_now(&self) {
        let has_recording = self.state.lock().recording.is_some();
        if has_recording || self.hardware.is_recording() {
            info!("stopping recording");
            self.hardware.stop_recording();
        } else {
            debug!("stop requested with no active recording");
            self.notifier.notify(CameraEvent::RecordingStopIgnored(CameraError::OperationFailed(
                "no active recording".into(),
            )));
        }
    }

    fn handle_recording_event(&self, event: HardwareEvent) {
        match event {
            HardwareEvent::RecordingStarted { path } => {
                if let Some(recording) = self.state.lock().recording.as_mut() {
                    recording.is_active = true;
                }
                info!("recording started: {}", path.display());
                self.notifier.notify(CameraEvent::VideoRecordingStarted { path });
            }
            HardwareEvent::RecordingFinished {
                path,
                error,
                successfully_finished,
            } => self.finish_recording(path, error, successfully_finished),
            other => debug!("ignoring {:?} during recording", other),
        }
    }

    /// Hand the movie to the sink when usable, then always remove the
    /// temporary file and report the finish.
    fn finish_recording(&self, path: PathBuf, error: Option<CameraError>, successfully_finished: bool) {
        let recording = self.state.lock().recording.take();
        let usable = error.is_none() || successfully_finished;

        match (&error, usable) {
            (Some(e), true) => info!("recording finished with {}, file is usable", e),
            (Some(e), false) => warn!("recording failed: {}", e),
            (None, _) => {}
        }

        if usable {
            match self.sink.authorize() {
                AuthorizationState::Authorized => {
                    if let Err(e) = self.sink.save_video(&path) {
                        warn!("movie not saved: {}", as_persistence_error(e));
                    }
                }
                verdict => warn!("media library access {:?}, discarding movie", verdict),
            }
        }

        remove_temporary_file(&path);

        if let Some(recording) = recording {
            info!("recording finished after {:.1}s", recording.elapsed().as_secs_f64());
        }
        self.notifier.notify(CameraEvent::VideoRecordingFinished {
            path: Some(path),
            error,
        });
    }

    fn rotate_camera_now(&self) {
        let (current, movie_stabilization) = {
            let state = self.state.lock();
            let current = state.video_input.clone().filter(|_| state.config_state.is_ready());
            let stabilization = state
                .movie_output
                .as_ref()
                .map_or(false, |output| output.stabilization_supported);
            (current, stabilization)
        };

        let Some(current) = current else {
            debug!("rotate ignored, session not configured");
            self.notifier.notify(CameraEvent::CameraRotated { position: None });
            return;
        };

        let catalog = DeviceCatalog::new(self.hardware.discover_devices());
        match catalog.device_for_rotation(Some(current.device.position)) {
            Some(device) => self.switch_video_input(&current, device, movie_stabilization),
            None => info!("no camera to rotate to from the {} camera", current.device.position),
        }

        let position = self
            .state
            .lock()
            .video_input
            .as_ref()
            .map(|input| input.device.position);
        self.notifier.notify(CameraEvent::CameraRotated { position });
    }

    /// Swap `current` for `device`; the session keeps exactly one video input.
    fn switch_video_input(&self, current: &ActiveVideoInput, device: DeviceDescriptor, movie_stabilization: bool) {
        let handle = match self.hardware.create_video_input(&device) {
            Ok(handle) => handle,
            Err(e) => {
                warn!("could not create input for {}, keeping {}: {}", device.name, current.device.name, e);
                return;
            }
        };

        self.hardware.begin_configuration();
        self.hardware.remove_input(current.handle);
        match self.hardware.add_input(handle) {
            Ok(()) => {
                info!("switched camera to {}", device.name);
                let mut state = self.state.lock();
                state.video_input = Some(ActiveVideoInput { handle, device });
                state.zoom.reset();
            }
            Err(e) => {
                warn!("could not add input for {}, restoring {}: {}", device.name, current.device.name, e);
                if let Err(e) = self.hardware.add_input(current.handle) {
                    error!("failed to restore video input {}: {}", current.device.name, e);
                    self.state.lock().video_input = None;
                }
            }
        }
        if movie_stabilization {
            self.hardware.set_movie_stabilization(StabilizationMode::Auto);
        }
        self.hardware.commit_configuration();
    }

    fn cycle_flash_now(&self) {
        let mode = {
            let mut state = self.state.lock();
            state.flash_mode = state.flash_mode.next();
            state.flash_mode
        };
        debug!("flash mode now {}", mode);
        self.notifier.notify(CameraEvent::FlashModeChanged(mode));
    }

    fn zoom_now(&self, request: ZoomRequest) {
        let (device, raw) = {
            let state = self.state.lock();
            let Some(device) = state.ready_device() else {
                debug!("zoom ignored, no active camera");
                return;
            };
            let raw = match request {
                ZoomRequest::Absolute(scale) => scale,
                ZoomRequest::Gesture(gesture_scale) => state.zoom.gesture_target(gesture_scale),
            };
            (device, raw)
        };

        let scale = ZoomState::clamp(raw, device.max_zoom_factor, self.config.max_zoom_scale);
        match self.hardware.set_zoom_factor(&device, scale) {
            Ok(()) => {
                self.state.lock().zoom.current_scale = scale;
                self.notifier.notify(CameraEvent::ZoomChanged(scale));
            }
            Err(e) => warn!("zoom failed on {}: {}", device.name, e),
        }
    }

    fn focus_now(&self, tap: Point, preview_size: Size) {
        let Some(device) = self.state.lock().ready_device() else {
            debug!("focus ignored, no active camera");
            return;
        };

        let target = point_of_interest(tap, preview_size);
        match self.hardware.focus(&device, target) {
            Ok(()) => self.notifier.notify(CameraEvent::FocusedOnPoint(tap)),
            Err(e) => warn!("focus failed on {}: {}", device.name, e),
        }
    }
}

fn failure_event(err: CameraError) -> CameraEvent {
    match err {
        CameraError::NoCameraAvailable => CameraEvent::NoCameraDetected,
        other => CameraEvent::ConfigurationFailed(other),
    }
}

fn as_persistence_error(err: CameraError) -> CameraError {
    match err {
        CameraError::PersistenceFailed(_) => err,
        other => CameraError::PersistenceFailed(other.to_string()),
    }
}

fn remove_temporary_file(path: &Path) {
    if !path.exists() {
        return;
    }
    if let Err(e) = fs::remove_file(path) {
        warn!("could not remove temporary file {}: {}", path.display(), e);
    }
}
