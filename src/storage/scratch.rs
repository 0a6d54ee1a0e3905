// src/storage/scratch.rs
use std::io::{self, Write};
use std::path::PathBuf;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Per-request holder for temporary image files.
///
/// Every staged file is removed by [`ScratchSpace::cleanup`], and again on
/// drop for anything still held. Removal failures are logged and swallowed.
pub struct ScratchSpace {
    dir: PathBuf,
    files: Vec<NamedTempFile>,
}

impl ScratchSpace {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            files: Vec::new(),
        }
    }

    /// Writes `bytes` to a fresh `.jpg` file and returns its path.
    pub fn stage(&mut self, label: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let prefix = format!("face-verifier-{}-", label);
        let mut file = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".jpg")
            .tempfile_in(&self.dir)?;

        file.write_all(bytes)?;
        file.flush()?;

        let path = file.path().to_path_buf();
        debug!(path = %path.display(), size = bytes.len(), "Staged temporary image");
        self.files.push(file);

        Ok(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn cleanup(&mut self) {
        for file in self.files.drain(..) {
            let path = file.path().to_path_buf();
            if let Err(e) = file.close() {
                warn!(path = %path.display(), error = %e, "Failed to clean up temporary image");
            }
        }
    }
}

impl Drop for ScratchSpace {
    fn drop(&mut self) {
        self.cleanup();
    }
}
