use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// An in-progress movie recording. Lives from start request to finish handling.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingSession {
    pub output_path: PathBuf,
    pub started_at: DateTime<Utc>,
    /// Set once the hardware acknowledges the start.
    pub is_active: bool,
}

impl RecordingSession {
    /// Creates a session writing to a fresh `<uuid>.mov` inside `directory`.
    pub fn in_directory(directory: &std::path::Path) -> Self {
        let file_name = format!("{}.mov", Uuid::new_v4());
        Self {
            output_path: directory.join(file_name),
            started_at: Utc::now(),
            is_active: false,
        }
    }

    pub fn elapsed(&self) -> Duration {
        (Utc::now() - self.started_at).to_std().unwrap_or(Duration::ZERO)
    }
}
