//! In-memory camera stack.
//!
//! Models one capture session with at most one video and one audio input,
//! a photo output and a movie output. Photo and movie completions arrive on
//! background threads, like a real camera pipeline. Failures can be injected
//! per device or per operation.

use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use image::{ImageFormat, Rgb, RgbImage};
use log::{debug, info, warn};
use parking_lot::Mutex;

use camera_session_core::models::camera_models::{
    MovieOutputCapabilities, PhotoSettings, Point, RecordingSettings, StabilizationMode, VideoCodec, VideoQuality,
};
use camera_session_core::models::device::{DeviceDescriptor, InputHandle};
use camera_session_core::models::error::CameraError;
use camera_session_core::traits::camera_hardware::{CameraHardware, HardwareEvent, HardwareEventCallback};

use crate::movie_writer::MovieWriter;

const FRAME_BYTES: usize = 512;

/// Capabilities and timing of a `VirtualCamera`.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualCameraOptions {
    pub audio_available: bool,
    pub photo_output_available: bool,
    pub movie_output_available: bool,
    pub stabilization_supported: bool,
    pub hevc_available: bool,
    /// Dimensions of captured photos.
    pub photo_size: (u32, u32),
    /// Delay between a capture request and its first completion.
    pub photo_latency: Duration,
    /// Delay between a recording request and its start acknowledgement.
    pub recording_start_latency: Duration,
    /// Interval between movie frames.
    pub frame_interval: Duration,
    /// Deliver undecodable photo data.
    pub corrupt_photos: bool,
}

impl Default for VirtualCameraOptions {
    fn default() -> Self {
        Self {
            audio_available: true,
            photo_output_available: true,
            movie_output_available: true,
            stabilization_supported: true,
            hevc_available: true,
            photo_size: (64, 48),
            photo_latency: Duration::from_millis(5),
            recording_start_latency: Duration::from_millis(5),
            frame_interval: Duration::from_millis(10),
            corrupt_photos: false,
        }
    }
}

#[derive(Debug, Clone)]
enum InputKind {
    Video(DeviceDescriptor),
    Audio { mix_with_others: bool },
}

#[derive(Debug, Default)]
struct Graph {
    next_handle: u64,
    created: HashMap<InputHandle, InputKind>,
    attached: Vec<InputHandle>,
    photo_output: bool,
    movie_output: bool,
    quality: Option<VideoQuality>,
    stabilization: Option<StabilizationMode>,
    configuration_depth: u32,
    running: bool,
}

impl Graph {
    fn attached_kinds(&self) -> impl Iterator<Item = &InputKind> {
        self.attached.iter().filter_map(|handle| self.created.get(handle))
    }
}

#[derive(Debug, Default)]
struct Faults {
    failing_devices: HashSet<String>,
    rejected_devices: HashSet<String>,
    next_photo: Option<CameraError>,
    start_running: bool,
    audio_input: bool,
}

#[derive(Debug, Default)]
struct Activity {
    photo_requests: Vec<PhotoSettings>,
    recordings: Vec<(PathBuf, RecordingSettings)>,
    zoom_factors: HashMap<String, f64>,
    focus_points: Vec<(String, Point)>,
    resets: usize,
}

type RecordingSlot = Arc<Mutex<Option<Sender<()>>>>;

pub struct VirtualCamera {
    options: VirtualCameraOptions,
    devices: Mutex<Vec<DeviceDescriptor>>,
    graph: Mutex<Graph>,
    faults: Mutex<Faults>,
    activity: Mutex<Activity>,
    recording: RecordingSlot,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl VirtualCamera {
    pub fn new(devices: Vec<DeviceDescriptor>) -> Self {
        Self::with_options(devices, VirtualCameraOptions::default())
    }

    pub fn with_options(devices: Vec<DeviceDescriptor>, options: VirtualCameraOptions) -> Self {
        Self {
            options,
            devices: Mutex::new(devices),
            graph: Mutex::new(Graph::default()),
            faults: Mutex::new(Faults::default()),
            activity: Mutex::new(Activity::default()),
            recording: Arc::new(Mutex::new(None)),
            workers: Mutex::new(Vec::new()),
        }
    }

    pub fn options(&self) -> &VirtualCameraOptions {
        &self.options
    }

    /// Replace the connected devices, as when a camera is plugged or unplugged.
    pub fn set_devices(&self, devices: Vec<DeviceDescriptor>) {
        *self.devices.lock() = devices;
    }

    // --- Fault injection ---

    /// Creating an input for `device_id` fails.
    pub fn fail_input_creation(&self, device_id: &str) {
        self.faults.lock().failing_devices.insert(device_id.to_string());
    }

    /// The session refuses to add an input for `device_id`.
    pub fn reject_input(&self, device_id: &str) {
        self.faults.lock().rejected_devices.insert(device_id.to_string());
    }

    pub fn clear_faults(&self) {
        *self.faults.lock() = Faults::default();
    }

    /// The next capture reports `error` instead of a photo.
    pub fn fail_next_photo(&self, error: CameraError) {
        self.faults.lock().next_photo = Some(error);
    }

    pub fn fail_start_running(&self, fail: bool) {
        self.faults.lock().start_running = fail;
    }

    pub fn fail_audio_input(&self, fail: bool) {
        self.faults.lock().audio_input = fail;
    }

    // --- Inspection ---

    pub fn attached_video_devices(&self) -> Vec<DeviceDescriptor> {
        self.graph
            .lock()
            .attached_kinds()
            .filter_map(|kind| match kind {
                InputKind::Video(device) => Some(device.clone()),
                InputKind::Audio { .. } => None,
            })
            .collect()
    }

    /// `Some(mix_with_others)` while an audio input is attached.
    pub fn attached_audio(&self) -> Option<bool> {
        self.graph.lock().attached_kinds().find_map(|kind| match kind {
            InputKind::Audio { mix_with_others } => Some(*mix_with_others),
            InputKind::Video(_) => None,
        })
    }

    pub fn has_photo_output(&self) -> bool {
        self.graph.lock().photo_output
    }

    pub fn has_movie_output(&self) -> bool {
        self.graph.lock().movie_output
    }

    pub fn quality(&self) -> Option<VideoQuality> {
        self.graph.lock().quality
    }

    pub fn stabilization(&self) -> Option<StabilizationMode> {
        self.graph.lock().stabilization
    }

    pub fn is_configuring(&self) -> bool {
        self.graph.lock().configuration_depth > 0
    }

    pub fn photo_requests(&self) -> Vec<PhotoSettings> {
        self.activity.lock().photo_requests.clone()
    }

    pub fn recordings(&self) -> Vec<(PathBuf, RecordingSettings)> {
        self.activity.lock().recordings.clone()
    }

    pub fn zoom_factor(&self, device_id: &str) -> Option<f64> {
        self.activity.lock().zoom_factors.get(device_id).copied()
    }

    pub fn focus_points(&self) -> Vec<(String, Point)> {
        self.activity.lock().focus_points.clone()
    }

    pub fn reset_count(&self) -> usize {
        self.activity.lock().resets
    }

    fn allocate_input(&self, kind: InputKind) -> InputHandle {
        let mut graph = self.graph.lock();
        graph.next_handle += 1;
        let handle = InputHandle(graph.next_handle);
        graph.created.insert(handle, kind);
        handle
    }

    fn spawn_worker(&self, name: &str, body: impl FnOnce() + Send + 'static) -> Result<(), CameraError> {
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(body)
            .map_err(|e| CameraError::OperationFailed(format!("failed to spawn {} thread: {}", name, e)))?;
        let mut workers = self.workers.lock();
        workers.retain(|worker| !worker.is_finished());
        workers.push(handle);
        Ok(())
    }
}

impl CameraHardware for VirtualCamera {
    fn discover_devices(&self) -> Vec<DeviceDescriptor> {
        self.devices.lock().clone()
    }

    fn begin_configuration(&self) {
        self.graph.lock().configuration_depth += 1;
    }

    fn commit_configuration(&self) {
        let mut graph = self.graph.lock();
        graph.configuration_depth = graph.configuration_depth.saturating_sub(1);
    }

    fn set_quality(&self, quality: VideoQuality) {
        self.graph.lock().quality = Some(quality);
    }

    fn create_video_input(&self, device: &DeviceDescriptor) -> Result<InputHandle, CameraError> {
        if !self.devices.lock().iter().any(|d| d.id == device.id) {
            return Err(CameraError::OperationFailed(format!("device {} is not connected", device.id)));
        }
        if self.faults.lock().failing_devices.contains(&device.id) {
            return Err(CameraError::OperationFailed(format!("device {} is busy", device.id)));
        }
        Ok(self.allocate_input(InputKind::Video(device.clone())))
    }

    fn create_audio_input(&self, mix_with_others: bool) -> Result<InputHandle, CameraError> {
        if !self.options.audio_available || self.faults.lock().audio_input {
            return Err(CameraError::OperationFailed("no microphone available".into()));
        }
        Ok(self.allocate_input(InputKind::Audio { mix_with_others }))
    }

    fn add_input(&self, input: InputHandle) -> Result<(), CameraError> {
        let rejected = self.faults.lock().rejected_devices.clone();
        let mut graph = self.graph.lock();

        let kind = graph
            .created
            .get(&input)
            .cloned()
            .ok_or_else(|| CameraError::OperationFailed(format!("unknown input {:?}", input)))?;
        if graph.attached.contains(&input) {
            return Err(CameraError::OperationFailed(format!("input {:?} already attached", input)));
        }

        match &kind {
            InputKind::Video(device) => {
                if rejected.contains(&device.id) {
                    return Err(CameraError::OperationFailed(format!(
                        "session cannot add input for {}",
                        device.id
                    )));
                }
                if graph.attached_kinds().any(|k| matches!(k, InputKind::Video(_))) {
                    return Err(CameraError::OperationFailed("session already has a video input".into()));
                }
            }
            InputKind::Audio { .. } => {
                if graph.attached_kinds().any(|k| matches!(k, InputKind::Audio { .. })) {
                    return Err(CameraError::OperationFailed("session already has an audio input".into()));
                }
            }
        }

        graph.attached.push(input);
        Ok(())
    }

    fn remove_input(&self, input: InputHandle) {
        self.graph.lock().attached.retain(|handle| *handle != input);
    }

    fn add_photo_output(&self) -> Result<(), CameraError> {
        let mut graph = self.graph.lock();
        if !self.options.photo_output_available || graph.photo_output {
            return Err(CameraError::OperationFailed("session cannot add a photo output".into()));
        }
        graph.photo_output = true;
        Ok(())
    }

    fn add_movie_output(&self) -> Result<MovieOutputCapabilities, CameraError> {
        let mut graph = self.graph.lock();
        if !self.options.movie_output_available || graph.movie_output {
            return Err(CameraError::OperationFailed("session cannot add a movie output".into()));
        }
        graph.movie_output = true;

        let available_codecs = if self.options.hevc_available {
            vec![VideoCodec::Hevc, VideoCodec::H264]
        } else {
            vec![VideoCodec::H264]
        };
        Ok(MovieOutputCapabilities {
            stabilization_supported: self.options.stabilization_supported,
            available_codecs,
        })
    }

    fn set_movie_stabilization(&self, mode: StabilizationMode) {
        let mut graph = self.graph.lock();
        if graph.movie_output {
            graph.stabilization = Some(mode);
        }
    }

    fn reset(&self) {
        self.stop_recording();
        let mut graph = self.graph.lock();
        graph.attached.clear();
        graph.created.clear();
        graph.photo_output = false;
        graph.movie_output = false;
        graph.stabilization = None;
        self.activity.lock().resets += 1;
    }

    fn start_running(&self) {
        if self.faults.lock().start_running {
            warn!("virtual camera refused to start");
            return;
        }
        self.graph.lock().running = true;
        debug!("virtual camera running");
    }

    fn stop_running(&self) {
        self.stop_recording();
        self.graph.lock().running = false;
        debug!("virtual camera stopped");
    }

    fn is_running(&self) -> bool {
        self.graph.lock().running
    }

    fn capture_photo(&self, settings: PhotoSettings, on_event: HardwareEventCallback) -> Result<(), CameraError> {
        {
            let graph = self.graph.lock();
            if !(graph.running && graph.photo_output) {
                return Err(CameraError::OperationFailed("photo output is not running".into()));
            }
        }
        self.activity.lock().photo_requests.push(settings);

        let fault = self.faults.lock().next_photo.take();
        let (width, height) = self.options.photo_size;
        let latency = self.options.photo_latency;
        let corrupt = self.options.corrupt_photos;

        self.spawn_worker("virtual-photo", move || {
            thread::sleep(latency);
            if let Some(error) = fault {
                on_event(HardwareEvent::PhotoCaptured { error: Some(error) });
                return;
            }
            on_event(HardwareEvent::PhotoCaptured { error: None });

            let data = if corrupt {
                Ok(b"corrupt frame".to_vec())
            } else {
                encode_frame(width, height)
            };
            on_event(HardwareEvent::PhotoProcessed(data));
        })
    }

    fn start_recording(
        &self,
        path: &Path,
        settings: RecordingSettings,
        on_event: HardwareEventCallback,
    ) -> Result<(), CameraError> {
        {
            let graph = self.graph.lock();
            if !(graph.running && graph.movie_output) {
                return Err(CameraError::OperationFailed("movie output is not running".into()));
            }
        }

        let mut slot = self.recording.lock();
        if slot.is_some() {
            return Err(CameraError::OperationFailed("movie output is already recording".into()));
        }

        let writer = MovieWriter::create(path)?;
        let (stop_tx, stop_rx) = channel::bounded(1);
        *slot = Some(stop_tx);
        drop(slot);

        self.activity.lock().recordings.push((path.to_path_buf(), settings));
        info!("virtual recording to {}", path.display());

        let job = RecordingJob {
            writer,
            stop_rx,
            on_event,
            max_duration: settings.max_duration,
            start_latency: self.options.recording_start_latency,
            frame_interval: self.options.frame_interval,
            slot: Arc::clone(&self.recording),
        };
        let spawned = self.spawn_worker("virtual-recording", move || job.run());
        if spawned.is_err() {
            self.recording.lock().take();
        }
        spawned
    }

    fn stop_recording(&self) {
        if let Some(stop) = self.recording.lock().as_ref() {
            // A full channel already carries a stop request.
            let _ = stop.try_send(());
        }
    }

    fn is_recording(&self) -> bool {
        self.recording.lock().is_some()
    }

    fn set_zoom_factor(&self, device: &DeviceDescriptor, factor: f64) -> Result<(), CameraError> {
        if !(1.0..=device.max_zoom_factor).contains(&factor) {
            return Err(CameraError::OperationFailed(format!(
                "zoom factor {} outside 1.0..={} for {}",
                factor, device.max_zoom_factor, device.id
            )));
        }
        self.activity.lock().zoom_factors.insert(device.id.clone(), factor);
        Ok(())
    }

    fn focus(&self, device: &DeviceDescriptor, point_of_interest: Point) -> Result<(), CameraError> {
        let unit = 0.0..=1.0;
        if !unit.contains(&point_of_interest.x) || !unit.contains(&point_of_interest.y) {
            return Err(CameraError::OperationFailed(format!(
                "point of interest ({}, {}) outside the unit square",
                point_of_interest.x, point_of_interest.y
            )));
        }
        if !device.focus_point_supported {
            debug!("{} has fixed focus, adjusting exposure only", device.id);
        }
        self.activity
            .lock()
            .focus_points
            .push((device.id.clone(), point_of_interest));
        Ok(())
    }
}

impl Drop for VirtualCamera {
    fn drop(&mut self) {
        // Dropping the sender disconnects the channel and ends any recording.
        self.recording.lock().take();
        for worker in self.workers.lock().drain(..) {
            let _ = worker.join();
        }
    }
}

/// One movie being written on its own thread.
struct RecordingJob {
    writer: MovieWriter,
    stop_rx: Receiver<()>,
    on_event: HardwareEventCallback,
    max_duration: Option<Duration>,
    start_latency: Duration,
    frame_interval: Duration,
    slot: RecordingSlot,
}

impl RecordingJob {
    fn run(mut self) {
        let path = self.writer.file_path().to_path_buf();
        thread::sleep(self.start_latency);
        (self.on_event)(HardwareEvent::RecordingStarted { path: path.clone() });

        let started = Instant::now();
        let mut frame = vec![0u8; FRAME_BYTES];
        let mut outcome: Option<(CameraError, bool)> = None;
        loop {
            match self.stop_rx.recv_timeout(self.frame_interval) {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {
                    frame[0] = frame[0].wrapping_add(1);
                    if let Err(e) = self.writer.write_frame(&frame) {
                        outcome = Some((e, false));
                        break;
                    }
                    if self.max_duration.map_or(false, |limit| started.elapsed() >= limit) {
                        outcome = Some((
                            CameraError::OperationFailed("maximum recording duration reached".into()),
                            true,
                        ));
                        break;
                    }
                }
            }
        }

        let closed = self.writer.close();
        self.slot.lock().take();

        let (error, successfully_finished) = match (outcome, closed) {
            (Some((error, usable)), _) => (Some(error), usable),
            (None, Err(error)) => (Some(error), false),
            (None, Ok(_)) => (None, true),
        };
        info!(
            "virtual recording finished: {} frames, error: {:?}",
            self.writer.frames_written(),
            error
        );
        (self.on_event)(HardwareEvent::RecordingFinished {
            path,
            error,
            successfully_finished,
        });
    }
}

/// Encode a gradient test frame as JPEG.
fn encode_frame(width: u32, height: u32) -> Result<Vec<u8>, CameraError> {
    let (width, height) = (width.max(1), height.max(1));
    let frame = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 255 / width) as u8, (y * 255 / height) as u8, 128])
    });
    let mut bytes = Cursor::new(Vec::new());
    frame
        .write_to(&mut bytes, ImageFormat::Jpeg)
        .map_err(|e| CameraError::EncodingFailed(format!("failed to encode frame: {}", e)))?;
    Ok(bytes.into_inner())
}
