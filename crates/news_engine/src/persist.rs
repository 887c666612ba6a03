use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory {path} missing or not writable: {message}")]
    OutputDir { path: PathBuf, message: String },
    #[error("io error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Ensure the output directory exists, creating it and its parents if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    let dir_error = |message: String| PersistError::OutputDir {
        path: dir.to_path_buf(),
        message,
    };
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| dir_error(e.to_string()))?;
        if !meta.is_dir() {
            return Err(dir_error("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| dir_error(e.to_string()))?;
    }
    Ok(())
}

/// Writes files into one directory via a sibling temp file and a rename, so a
/// failed download or write never leaves a truncated asset behind.
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        self.write_bytes(filename, content.as_bytes())
    }

    /// Replaces `{dir}/{filename}` if it already exists.
    pub fn write_bytes(&self, filename: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let io_error = |source: io::Error| PersistError::Io {
            path: target.clone(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(io_error)?;
        tmp.write_all(content).map_err(io_error)?;
        tmp.flush().map_err(io_error)?;
        tmp.as_file_mut().sync_all().map_err(io_error)?;
        tmp.persist(&target).map_err(|e| io_error(e.error))?;
        Ok(target)
    }
}
