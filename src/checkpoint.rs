//! Checkpoint log loading.
//!
//! A checkpoint log is a plain text file with one `registration,timestamp`
//! record per line. Lines without a comma are treated as noise. Malformed
//! records are skipped individually and reported back to the caller, and a
//! missing or unreadable file degrades to an empty table.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::SpeedTrapError;
use crate::logging;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A single passage of a vehicle through a checkpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkpoint {
    pub registration: String,
    pub timestamp: NaiveDateTime,
    /// The timestamp exactly as it appeared in the log, trimmed.
    pub raw_timestamp: String,
}

/// Registration number to passage lookup for one checkpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckpointTable {
    records: HashMap<String, Checkpoint>,
}

impl CheckpointTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a passage, replacing any earlier one for the same registration.
    pub fn insert(&mut self, checkpoint: Checkpoint) -> Option<Checkpoint> {
        self.records
            .insert(checkpoint.registration.clone(), checkpoint)
    }

    pub fn get(&self, registration: &str) -> Option<&Checkpoint> {
        self.records.get(registration)
    }

    pub fn contains(&self, registration: &str) -> bool {
        self.records.contains_key(registration)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Checkpoint> {
        self.records.values()
    }

    pub fn registrations(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}

impl FromIterator<Checkpoint> for CheckpointTable {
    fn from_iter<I: IntoIterator<Item = Checkpoint>>(iter: I) -> Self {
        let mut table = Self::new();
        for checkpoint in iter {
            table.insert(checkpoint);
        }
        table
    }
}

/// A record that was dropped while loading.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedLine {
    /// 1-based line number within the file.
    pub line_number: usize,
    pub content: String,
    pub reason: String,
}

impl SkippedLine {
    pub fn to_error(&self, path: &Path) -> SpeedTrapError {
        SpeedTrapError::parse(
            path.display().to_string(),
            self.line_number,
            format!("{} ({})", self.reason, self.content),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Loaded,
    Missing,
    Unreadable(String),
}

/// Result of loading one checkpoint log.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub path: PathBuf,
    pub table: CheckpointTable,
    pub status: LoadStatus,
    pub skipped: Vec<SkippedLine>,
}

impl LoadReport {
    pub fn is_missing(&self) -> bool {
        self.status == LoadStatus::Missing
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Every non-fatal problem met during the load, as displayable errors.
    pub fn diagnostics(&self) -> Vec<SpeedTrapError> {
        let mut diagnostics = Vec::new();
        match &self.status {
            LoadStatus::Loaded => {}
            LoadStatus::Missing => {
                diagnostics.push(SpeedTrapError::missing_file(
                    self.path.display().to_string(),
                ));
            }
            LoadStatus::Unreadable(message) => {
                diagnostics.push(SpeedTrapError::io_error(
                    "read checkpoint log",
                    Some(self.path.display().to_string()),
                    io::Error::other(message.clone()),
                ));
            }
        }
        diagnostics.extend(self.skipped.iter().map(|line| line.to_error(&self.path)));
        diagnostics
    }
}

/// Parse an ISO-8601 timestamp.
///
/// Accepts `YYYY-MM-DDTHH:MM[:SS[.fff]]` with `T` or a space as separator,
/// the same with a `Z`/`±HH:MM` suffix (normalised to UTC), and a bare date
/// meaning midnight.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, String> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Ok(with_offset.naive_utc());
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| format!("invalid ISO-8601 timestamp '{raw}'"))
}

/// Parse one log line. `None` means the line carries no record.
pub fn parse_line(line: &str) -> Option<Result<Checkpoint, String>> {
    let (registration, timestamp) = line.split_once(',')?;
    let registration = registration.trim();
    let raw_timestamp = timestamp.trim();

    if registration.is_empty() {
        return Some(Err("empty registration number".to_string()));
    }

    Some(parse_timestamp(raw_timestamp).map(|timestamp| Checkpoint {
        registration: registration.to_string(),
        timestamp,
        raw_timestamp: raw_timestamp.to_string(),
    }))
}

/// Build a table from log contents, collecting malformed lines instead of stopping.
pub fn parse_checkpoints(contents: &str) -> (CheckpointTable, Vec<SkippedLine>) {
    let mut table = CheckpointTable::new();
    let mut skipped = Vec::new();

    for (index, line) in contents.lines().enumerate() {
        match parse_line(line) {
            None => continue,
            Some(Ok(checkpoint)) => {
                table.insert(checkpoint);
            }
            Some(Err(reason)) => skipped.push(SkippedLine {
                line_number: index + 1,
                content: line.trim().to_string(),
                reason,
            }),
        }
    }

    (table, skipped)
}

/// Load a checkpoint log from disk. Never fails: problems end up in the report.
pub fn load_checkpoints(path: &Path) -> LoadReport {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            let status = if e.kind() == io::ErrorKind::NotFound {
                tracing::warn!(path = %path.display(), "Checkpoint log not found");
                LoadStatus::Missing
            } else {
                tracing::warn!(path = %path.display(), error = %e, "Checkpoint log unreadable");
                LoadStatus::Unreadable(e.to_string())
            };
            return LoadReport {
                path: path.to_path_buf(),
                table: CheckpointTable::new(),
                status,
                skipped: Vec::new(),
            };
        }
    };

    let contents = String::from_utf8_lossy(&bytes);
    let (table, skipped) = parse_checkpoints(&contents);
    logging::log_checkpoint_load(path, table.len(), skipped.len());

    LoadReport {
        path: path.to_path_buf(),
        table,
        status: LoadStatus::Loaded,
        skipped,
    }
}
