use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open log file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write log file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Append-only writer for the log file.
///
/// The file is opened per append and closed before `append` returns, so other
/// processes (the log server, `tail -f`) always see complete chunks.
#[derive(Debug)]
pub struct LogSink {
    path: PathBuf,
    // Serializes appends from plugins sharing one sink.
    write_lock: Mutex<()>,
}

impl LogSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, text: &str) -> Result<(), SinkError> {
        // A poisoned lock only means another append panicked; the file itself is fine.
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| SinkError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| SinkError::Open {
                path: self.path.clone(),
                source,
            })?;

        file.write_all(text.as_bytes())
            .map_err(|source| SinkError::Write {
                path: self.path.clone(),
                source,
            })?;

        tracing::trace!(path = %self.path.display(), bytes = text.len(), "appended to log");
        Ok(())
    }
}
