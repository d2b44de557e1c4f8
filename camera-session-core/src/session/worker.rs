//! Single-threaded FIFO job queue that owns every device-graph mutation.

use std::thread::{self, ThreadId};

use crossbeam::channel::{self, Receiver, Sender};
use log::{debug, warn};
use parking_lot::Mutex;

use crate::models::error::CameraError;

type Job = Box<dyn FnOnce() + Send + 'static>;

enum Message {
    Run(Job),
    Shutdown,
}

/// Cloneable submission handle for a `SerialQueue`.
///
/// Hardware callbacks hold one of these to route completions back onto the
/// worker.
#[derive(Clone)]
pub struct QueueHandle {
    tx: Sender<Message>,
}

impl QueueHandle {
    /// Queue `job` behind everything already submitted. Returns false once the
    /// worker has shut down.
    pub fn enqueue(&self, job: impl FnOnce() + Send + 'static) -> bool {
        self.tx.send(Message::Run(Box::new(job))).is_ok()
    }
}

pub struct SerialQueue {
    label: String,
    handle: QueueHandle,
    worker_id: ThreadId,
    join_handle: Mutex<Option<thread::JoinHandle<()>>>,
}

impl SerialQueue {
    pub fn new(label: &str) -> Result<Self, CameraError> {
        let (tx, rx) = channel::unbounded::<Message>();

        let join_handle = thread::Builder::new()
            .name(label.to_string())
            .spawn(move || run_jobs(rx))
            .map_err(|e| CameraError::OperationFailed(format!("failed to spawn {} thread: {}", label, e)))?;

        Ok(Self {
            label: label.to_string(),
            handle: QueueHandle { tx },
            worker_id: join_handle.thread().id(),
            join_handle: Mutex::new(Some(join_handle)),
        })
    }

    pub fn handle(&self) -> QueueHandle {
        self.handle.clone()
    }

    pub fn enqueue(&self, job: impl FnOnce() + Send + 'static) -> bool {
        let queued = self.handle.enqueue(job);
        if !queued {
            warn!("{}: job dropped, worker has shut down", self.label);
        }
        queued
    }

    fn is_worker_thread(&self) -> bool {
        thread::current().id() == self.worker_id
    }

    /// Block until every job queued before this call has run.
    ///
    /// Returns immediately when called from the worker itself.
    pub fn flush(&self) {
        if self.is_worker_thread() {
            return;
        }
        let (done_tx, done_rx) = channel::bounded::<()>(1);
        if self.handle.enqueue(move || {
            let _ = done_tx.send(());
        }) {
            let _ = done_rx.recv();
        }
    }
}

impl Drop for SerialQueue {
    fn drop(&mut self) {
        let _ = self.handle.tx.send(Message::Shutdown);
        if self.is_worker_thread() {
            return;
        }
        if let Some(handle) = self.join_handle.lock().take() {
            if handle.join().is_err() {
                warn!("{}: worker panicked", self.label);
            }
        }
    }
}

fn run_jobs(rx: Receiver<Message>) {
    for message in rx {
        match message {
            Message::Run(job) => job(),
            Message::Shutdown => break,
        }
    }
    debug!("serial queue worker exiting");
}
