use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// A pid file owned by this process, removed on drop.
#[derive(Debug)]
pub struct PidFile {
    path: PathBuf,
    pid: u32,
}

impl PidFile {
    /// Write the current process id to `path`, replacing a stale file.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let pid = std::process::id();
        fs::write(&path, pid.to_string())
            .with_context(|| format!("failed to write pid file {}", path.display()))?;
        Ok(Self { path, pid })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for PidFile {
    fn drop(&mut self) {
        // Another instance may have taken the file over since we wrote it.
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim() == self.pid.to_string() => {
                if let Err(e) = fs::remove_file(&self.path) {
                    tracing::warn!(pid_file = %self.path.display(), error = %e, "failed to remove pid file");
                }
            }
            Ok(_) => {
                tracing::debug!(pid_file = %self.path.display(), "pid file owned by another process; leaving it");
            }
            Err(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pid_file_is_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ec.pid");

        let pid_file = PidFile::create(&path).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            std::process::id().to_string()
        );

        drop(pid_file);
        assert!(!path.exists());
    }

    #[test]
    fn foreign_pid_file_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ec.pid");

        let pid_file = PidFile::create(&path).unwrap();
        fs::write(&path, "1").unwrap();
        drop(pid_file);

        assert_eq!(fs::read_to_string(&path).unwrap(), "1");
    }

    #[test]
    fn missing_parent_is_an_error() {
        let dir = tempfile::tempdir().unwrap();

        let err = PidFile::create(dir.path().join("missing/ec.pid")).unwrap_err();

        assert!(err.to_string().contains("failed to write pid file"));
    }
}
