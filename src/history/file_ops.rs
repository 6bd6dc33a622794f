use std::{
    fs::{File, OpenOptions},
    io::{BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use super::HistoryError;

/// Line-per-entry access to a history file.
///
/// Entries are stored one per line with `\` and newlines escaped, so an
/// entry that spans several lines reloads as a single entry.
pub struct FileOps {
    file_path: PathBuf,
}

impl FileOps {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    pub fn load_entries(&self) -> Result<Vec<String>, HistoryError> {
        let file = File::open(&self.file_path).map_err(|e| self.error(e))?;
        let reader = BufReader::new(file);

        let mut entries = Vec::new();
        for line in reader.lines() {
            let line = line.map_err(|e| self.error(e))?;
            if !line.trim().is_empty() {
                entries.push(unescape(&line));
            }
        }

        Ok(entries)
    }

    pub fn append_entries(&self, entries: &[String]) -> Result<(), HistoryError> {
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.file_path)
            .map_err(|e| self.error(e))?;
        self.write_lines(file, entries)
    }

    pub fn write_entries(&self, entries: &[String]) -> Result<(), HistoryError> {
        let file = File::create(&self.file_path).map_err(|e| self.error(e))?;
        self.write_lines(file, entries)
    }

    fn write_lines(&self, file: File, entries: &[String]) -> Result<(), HistoryError> {
        let mut writer = BufWriter::new(file);
        for entry in entries {
            writeln!(writer, "{}", escape(entry)).map_err(|e| self.error(e))?;
        }
        writer.flush().map_err(|e| self.error(e))
    }

    fn error(&self, source: std::io::Error) -> HistoryError {
        HistoryError::Io {
            path: self.file_path.clone(),
            source,
        }
    }
}

fn escape(entry: &str) -> String {
    let mut escaped = String::with_capacity(entry.len());
    for c in entry.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn unescape(line: &str) -> String {
    let mut entry = String::with_capacity(line.len());
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            entry.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => entry.push('\n'),
            Some(other) => entry.push(other),
            None => entry.push('\\'),
        }
    }
    entry
}
