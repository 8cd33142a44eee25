use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

pub const DEFAULT_PAGE_FILENAME: &str = "dashboard.html";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// Publishes the rendered page so readers never observe a half-written file.
#[derive(Debug, Clone)]
pub struct PagePublisher {
    dir: PathBuf,
    filename: String,
}

impl PagePublisher {
    pub fn new(dir: PathBuf) -> Self {
        Self::with_filename(dir, DEFAULT_PAGE_FILENAME)
    }

    pub fn with_filename(dir: PathBuf, filename: impl Into<String>) -> Self {
        Self {
            dir,
            filename: filename.into(),
        }
    }

    pub fn target(&self) -> PathBuf {
        self.dir.join(&self.filename)
    }

    /// Write to a temp file in the same directory, then rename over the target.
    pub fn publish(&self, html: &str) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;

        let target = self.target();
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(html.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}
