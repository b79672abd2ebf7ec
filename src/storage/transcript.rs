use std::fs;
use std::path::{Path, PathBuf};

use crate::common::{ChatMessage, ScraperError};

use super::ensure_parent_dir;

/// Ordered list of saved messages, mirrored to a JSON file.
pub struct Transcript {
    path: PathBuf,
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            messages: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn count(&self) -> usize {
        self.messages.len()
    }

    /// Appends `message` and rewrites the whole file.
    ///
    /// The message is kept in memory even if the write fails; the next
    /// successful push brings the file back in sync.
    pub fn push(&mut self, message: ChatMessage) -> Result<(), ScraperError> {
        self.messages.push(message);
        self.flush()
    }

    fn flush(&self) -> Result<(), ScraperError> {
        ensure_parent_dir(&self.path)?;
        let json = serde_json::to_string_pretty(&self.messages)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
