use std::fs::{self, File};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use camera_session_core::models::error::CameraError;

/// Size of the `ftyp` box written at the start of every movie.
pub const FTYP_BOX_SIZE: u64 = 20;

/// Size of the `mdat` box header that follows `ftyp`.
pub const MDAT_HEADER_SIZE: u64 = 8;

/// Streaming writer for placeholder QuickTime movies.
///
/// ## File Format
///
/// ```text
/// [20-byte ftyp box: size | "ftyp" | "qt  " | minor version | "qt  "]
/// [8-byte mdat header: size | "mdat"]   ← size patched on close
/// [frame payload...]
/// ```
///
/// All box sizes are big-endian `u32`, including the header itself.
pub struct MovieWriter {
    file_path: PathBuf,
    file: Option<File>,
    total_bytes_written: u64,
    frames_written: u64,
}

impl MovieWriter {
    /// Create the file and write the box headers.
    pub fn create(file_path: &Path) -> Result<Self, CameraError> {
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| CameraError::StorageError(format!("failed to create directory: {}", e)))?;
        }

        let file = File::create(file_path)
            .map_err(|e| CameraError::StorageError(format!("failed to create movie file: {}", e)))?;

        let mut writer = Self {
            file_path: file_path.to_path_buf(),
            file: Some(file),
            total_bytes_written: 0,
            frames_written: 0,
        };

        let mut header = Vec::with_capacity((FTYP_BOX_SIZE + MDAT_HEADER_SIZE) as usize);
        header.extend_from_slice(&(FTYP_BOX_SIZE as u32).to_be_bytes());
        header.extend_from_slice(b"ftypqt  ");
        header.extend_from_slice(&0u32.to_be_bytes());
        header.extend_from_slice(b"qt  ");
        header.extend_from_slice(&0u32.to_be_bytes()); // mdat size placeholder
        header.extend_from_slice(b"mdat");
        writer.write_raw(&header)?;

        Ok(writer)
    }

    pub fn write_frame(&mut self, frame: &[u8]) -> Result<(), CameraError> {
        self.write_raw(frame)?;
        self.frames_written += 1;
        Ok(())
    }

    /// Patch the `mdat` size and close the file. Returns the final file size.
    pub fn close(&mut self) -> Result<u64, CameraError> {
        let mut file = self
            .file
            .take()
            .ok_or_else(|| CameraError::StorageError("movie file is not open".into()))?;

        let mdat_size = (self.total_bytes_written - FTYP_BOX_SIZE) as u32;
        file.seek(SeekFrom::Start(FTYP_BOX_SIZE))
            .map_err(|e| CameraError::StorageError(e.to_string()))?;
        file.write_all(&mdat_size.to_be_bytes())
            .map_err(|e| CameraError::StorageError(e.to_string()))?;
        file.flush().map_err(|e| CameraError::StorageError(e.to_string()))?;

        Ok(self.total_bytes_written)
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn write_raw(&mut self, data: &[u8]) -> Result<(), CameraError> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| CameraError::StorageError("movie file is not open".into()))?;
        file.write_all(data)
            .map_err(|e| CameraError::StorageError(format!("write failed: {}", e)))?;
        self.total_bytes_written += data.len() as u64;
        Ok(())
    }
}
