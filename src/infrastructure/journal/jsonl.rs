//! JSON Lines journal store adapter

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::application::ports::{JournalError, JournalStore};
use crate::domain::journal::Turn;

/// Journal file with one JSON-encoded turn per line.
///
/// A missing file is an empty journal. Lines that are not valid UTF-8 or fail
/// to parse are skipped with a warning so one bad write never loses the rest
/// of the history.
pub struct JsonlJournalStore {
    path: PathBuf,
}

impl JsonlJournalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parse(content: &[u8]) -> Vec<Turn> {
        content
            .split(|byte| *byte == b'\n')
            .enumerate()
            .filter(|(_, line)| !line.trim_ascii().is_empty())
            .filter_map(|(index, line)| {
                let parsed = std::str::from_utf8(line)
                    .map_err(|e| e.to_string())
                    .and_then(|text| serde_json::from_str::<Turn>(text).map_err(|e| e.to_string()));
                match parsed {
                    Ok(turn) => Some(turn),
                    Err(e) => {
                        tracing::warn!(line = index + 1, error = %e, "skipping malformed journal line");
                        None
                    }
                }
            })
            .collect()
    }

    /// Whether the file ends in the middle of a line
    fn has_unterminated_tail(file: &mut File) -> std::io::Result<bool> {
        if file.metadata()?.len() == 0 {
            return Ok(false);
        }
        file.seek(SeekFrom::End(-1))?;
        let mut last = [0u8; 1];
        file.read_exact(&mut last)?;
        Ok(last[0] != b'\n')
    }
}

impl JournalStore for JsonlJournalStore {
    fn load(&self) -> Result<Vec<Turn>, JournalError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read(&self.path)
            .map_err(|e| JournalError::ReadError(format!("{}: {}", self.path.display(), e)))?;

        Ok(Self::parse(&content))
    }

    fn append(&self, turn: &Turn) -> Result<(), JournalError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| JournalError::WriteError(e.to_string()))?;
        }

        let record =
            serde_json::to_string(turn).map_err(|e| JournalError::WriteError(e.to_string()))?;

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| JournalError::WriteError(format!("{}: {}", self.path.display(), e)))?;

        // A torn earlier write must not swallow this record
        let mut line = String::with_capacity(record.len() + 2);
        if Self::has_unterminated_tail(&mut file)
            .map_err(|e| JournalError::WriteError(e.to_string()))?
        {
            line.push('\n');
        }
        line.push_str(&record);
        line.push('\n');

        // Single write per line keeps concurrent appends from interleaving
        file.write_all(line.as_bytes())
            .map_err(|e| JournalError::WriteError(e.to_string()))?;

        Ok(())
    }

    fn location(&self) -> &Path {
        &self.path
    }
}
