//! Loading caller-supplied data: agent log entries and issue lists.
//!
//! Log files are JSONL, one entry per line, or a single JSON array. The
//! agent writes them best-effort, so a line that does not parse is skipped
//! with a warning rather than failing the whole load.

use std::path::{Path, PathBuf};
use std::{fs, io};

// Trait must be in scope for `.lines()` on BufReader.
use io::BufRead;

use tracing::warn;

use crate::model::{Issue, LogEntry};

/// Errors that can occur while loading input files.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, SourceError>;

/// Load log entries in arrival order.
pub fn load_log(path: &Path) -> Result<Vec<LogEntry>> {
    let file = open(path)?;
    let mut reader = io::BufReader::new(file);

    // A JSON array file starts with `[`; anything else is JSONL.
    if reader.fill_buf()?.iter().find(|b| !b.is_ascii_whitespace()) == Some(&b'[') {
        return Ok(serde_json::from_reader(reader)?);
    }

    let mut entries = Vec::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(&line) {
            Ok(entry) => entries.push(entry),
            Err(e) => warn!(
                event = "skipped_line",
                path = %path.display(),
                line = number + 1,
                error = %e,
            ),
        }
    }
    Ok(entries)
}

/// Load an issue list from a JSON array file.
pub fn load_issues(path: &Path) -> Result<Vec<Issue>> {
    let file = open(path)?;
    Ok(serde_json::from_reader(io::BufReader::new(file))?)
}

/// Write an issue list as pretty JSON.
pub fn write_issues(path: &Path, issues: &[Issue]) -> Result<()> {
    let json = serde_json::to_string_pretty(issues)?;
    fs::write(path, json)?;
    Ok(())
}

fn open(path: &Path) -> Result<fs::File> {
    match fs::File::open(path) {
        Ok(file) => Ok(file),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(SourceError::NotFound(path.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}
