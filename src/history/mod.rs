//! Ordered, append-only command history with a plain-text backing file.

mod file_ops;

use std::{
    fmt,
    path::{Path, PathBuf},
};

use log::{info, warn};

use self::file_ops::FileOps;

#[derive(Debug)]
pub enum HistoryError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryError::Io { path, source } => write!(f, "{}: {}", path.display(), source),
        }
    }
}

impl std::error::Error for HistoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HistoryError::Io { source, .. } => Some(source),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry<'a> {
    /// Zero-based position in the log.
    pub position: usize,
    pub line: &'a str,
}

pub struct HistoryManager {
    entries: Vec<String>,
    cursor: usize,
    saved_count: usize,
    backing: Option<FileOps>,
}

impl HistoryManager {
    /// Loads `path` and appends every recorded line to it from then on.
    /// A missing or unreadable file just means an empty history.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let backing = FileOps::new(path);
        let entries = match backing.load_entries() {
            Ok(entries) => {
                info!("loaded {} history entries from {}", entries.len(), backing.path().display());
                entries
            }
            Err(e) => {
                info!("starting with empty history: {}", e);
                Vec::new()
            }
        };

        let count = entries.len();
        Self {
            entries,
            cursor: count,
            saved_count: count,
            backing: Some(backing),
        }
    }

    /// A history that is never written anywhere.
    pub fn in_memory() -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            saved_count: 0,
            backing: None,
        }
    }

    pub fn backing_file(&self) -> Option<&Path> {
        self.backing.as_ref().map(FileOps::path)
    }

    /// Appends a line verbatim, whether or not it ran successfully.
    pub fn record(&mut self, line: &str) {
        self.entries.push(line.to_string());
        self.cursor = self.entries.len();

        if let Some(backing) = &self.backing {
            if let Err(e) = backing.append_entries(&self.entries[self.entries.len() - 1..]) {
                warn!("could not persist history entry: {}", e);
            }
        }
    }

    pub fn all(&self) -> &[String] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = HistoryEntry<'_>> {
        self.entries
            .iter()
            .enumerate()
            .map(|(position, line)| HistoryEntry { position, line })
    }

    /// The last `count` entries with their positions.
    pub fn recent(&self, count: usize) -> impl Iterator<Item = HistoryEntry<'_>> {
        let skip = self.entries.len().saturating_sub(count);
        self.iter().skip(skip)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Walks the cursor without touching the log. Stepping forward past the
    /// newest entry yields an empty line so the caller can clear its input.
    pub fn navigate(&mut self, direction: Direction) -> Option<String> {
        match direction {
            Direction::Previous => {
                if self.cursor == 0 {
                    return None;
                }
                self.cursor -= 1;
                self.entries.get(self.cursor).cloned()
            }
            Direction::Next => {
                let len = self.entries.len();
                if self.cursor + 1 < len {
                    self.cursor += 1;
                    self.entries.get(self.cursor).cloned()
                } else if self.cursor + 1 == len {
                    self.cursor = len;
                    Some(String::new())
                } else {
                    None
                }
            }
        }
    }

    /// Replaces the log with the contents of `path`. The backing file, if
    /// any, is rewritten so it keeps matching the log.
    pub fn read_from(&mut self, path: &Path) -> Result<usize, HistoryError> {
        let entries = FileOps::new(path).load_entries()?;
        self.entries = entries;
        self.saved_count = self.entries.len();
        self.cursor = self.entries.len();

        if let Some(backing) = &self.backing {
            if let Err(e) = backing.write_entries(&self.entries) {
                warn!("could not rewrite history file: {}", e);
            }
        }
        Ok(self.entries.len())
    }

    /// Writes the whole log to `path`, replacing its contents.
    pub fn write_to(&mut self, path: &Path) -> Result<usize, HistoryError> {
        FileOps::new(path).write_entries(&self.entries)?;
        self.saved_count = self.entries.len();
        Ok(self.entries.len())
    }

    /// Appends the entries recorded since the last read, write or append.
    pub fn append_to(&mut self, path: &Path) -> Result<usize, HistoryError> {
        let pending = &self.entries[self.saved_count.min(self.entries.len())..];
        if pending.is_empty() {
            return Ok(0);
        }

        FileOps::new(path).append_entries(pending)?;
        let count = pending.len();
        self.saved_count = self.entries.len();
        Ok(count)
    }
}
