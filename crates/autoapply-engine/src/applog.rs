//! Append-only record of submitted applications.

use chrono::{DateTime, Local};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Sink for submission records. One call per submitted application.
pub trait ApplicationLog: Send {
    fn record(&mut self, title: &str) -> io::Result<()>;
}

/// `<YYYY-MM-DD HH:MM:SS> - Applied: <title>`
pub fn format_line(at: DateTime<Local>, title: &str) -> String {
    format!("{} - Applied: {}", at.format(TIMESTAMP_FORMAT), title)
}

/// Appends one line per submission to a text file.
pub struct FileApplicationLog {
    path: PathBuf,
    file: File,
}

impl FileApplicationLog {
    /// Open (creating if needed) the log for appending.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ApplicationLog for FileApplicationLog {
    fn record(&mut self, title: &str) -> io::Result<()> {
        let line = format_line(Local::now(), title);
        writeln!(self.file, "{}", line)?;
        self.file.flush()?;
        debug!("Appended to {}: {}", self.path.display(), line);
        Ok(())
    }
}

/// In-memory log, for dry runs and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryApplicationLog {
    pub lines: Vec<String>,
}

impl MemoryApplicationLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ApplicationLog for MemoryApplicationLog {
    fn record(&mut self, title: &str) -> io::Result<()> {
        self.lines.push(format_line(Local::now(), title));
        Ok(())
    }
}
