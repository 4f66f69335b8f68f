use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::record::{format_local, EventLogRecord};

/// File-name timestamp used when a configured pattern is unusable.
pub const DEFAULT_FILE_TIMESTAMP_PATTERN: &str = "%d-%-m-%Y_%H-%M-%S";

/// Upper bound on `-N` suffixes tried by [`Collision::Suffix`].
const MAX_NAME_SUFFIX: u32 = 999;

/// Line format of an exported log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// `<display timestamp> [<category>] <message>` per line.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Text => "log",
            ExportFormat::Json => "json",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Text => "text/plain",
            ExportFormat::Json => "application/x-ndjson",
        }
    }

    fn line(self, record: &EventLogRecord) -> Result<String, serde_json::Error> {
        match self {
            ExportFormat::Text => Ok(record.to_line()),
            ExportFormat::Json => record.to_json_line(),
        }
    }
}

/// Parse an export format name, case-insensitively.
///
/// Accepts `text`/`txt`/`plain` and `json`/`ndjson`.
pub fn parse_format(name: &str) -> Result<ExportFormat, FormatError> {
    match name.trim().to_ascii_lowercase().as_str() {
        "text" | "txt" | "plain" => Ok(ExportFormat::Text),
        "json" | "ndjson" => Ok(ExportFormat::Json),
        _ => Err(FormatError::Unknown(name.to_string())),
    }
}

#[derive(thiserror::Error, Debug)]
pub enum FormatError {
    #[error("unknown export format: {0}")]
    Unknown(String),
}

/// What to do when the export file name is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Collision {
    /// Fail with [`ExportError::AlreadyExists`].
    #[default]
    Fail,
    /// Append `-1`, `-2`, ... to the file stem until a free name is found.
    Suffix,
}

/// Errors from exporting the log buffer.
///
/// None of these touch the buffer; a failed export can be retried.
#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("export file already exists: {}", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("an export is already being shared")]
    ShareInProgress,

    #[error("export task failed: {0}")]
    Task(String),
}

/// Writes snapshots of the log buffer into uniquely named files.
#[derive(Debug, Clone)]
pub struct LogExporter {
    directory: PathBuf,
    file_prefix: String,
    file_timestamp_pattern: String,
    format: ExportFormat,
}

impl LogExporter {
    pub fn new(
        directory: impl Into<PathBuf>,
        file_prefix: impl Into<String>,
        file_timestamp_pattern: impl Into<String>,
        format: ExportFormat,
    ) -> Self {
        Self {
            directory: directory.into(),
            file_prefix: file_prefix.into(),
            file_timestamp_pattern: file_timestamp_pattern.into(),
            format,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    fn file_stem_at(&self, at: DateTime<Utc>) -> String {
        let stamp = format_local(at, &self.file_timestamp_pattern)
            .or_else(|| format_local(at, DEFAULT_FILE_TIMESTAMP_PATTERN))
            .unwrap_or_else(|| at.timestamp().to_string());
        format!("{}_{}", self.file_prefix, stamp)
    }

    /// Path of the file an export started at `at` would create.
    ///
    /// An unusable timestamp pattern falls back to
    /// [`DEFAULT_FILE_TIMESTAMP_PATTERN`].
    pub fn file_path_at(&self, at: DateTime<Utc>) -> PathBuf {
        self.directory
            .join(format!("{}.{}", self.file_stem_at(at), self.format.extension()))
    }

    /// Write `records` to a new file named after `at`.
    ///
    /// The logs directory is created on first use. An existing file with the
    /// same name is never overwritten; a partially written file is removed.
    pub fn write(&self, records: &[EventLogRecord], at: DateTime<Utc>) -> Result<PathBuf, ExportError> {
        self.write_with(records, at, Collision::Fail)
    }

    /// Like [`write`](Self::write), with an explicit policy for name
    /// collisions.
    pub fn write_with(
        &self,
        records: &[EventLogRecord],
        at: DateTime<Utc>,
        collision: Collision,
    ) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(&self.directory).map_err(|source| ExportError::Io {
            path: self.directory.clone(),
            source,
        })?;

        let (path, file) = self.create_file(at, collision)?;

        if let Err(e) = self.write_lines(BufWriter::new(file), records, &path) {
            let _ = fs::remove_file(&path);
            return Err(e);
        }
        Ok(path)
    }

    fn create_file(&self, at: DateTime<Utc>, collision: Collision) -> Result<(PathBuf, fs::File), ExportError> {
        let stem = self.file_stem_at(at);
        let ext = self.format.extension();
        let mut suffix = 0;
        loop {
            let path = if suffix == 0 {
                self.directory.join(format!("{stem}.{ext}"))
            } else {
                self.directory.join(format!("{stem}-{suffix}.{ext}"))
            };
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    if collision == Collision::Fail || suffix >= MAX_NAME_SUFFIX {
                        return Err(ExportError::AlreadyExists { path });
                    }
                    suffix += 1;
                }
                Err(source) => return Err(ExportError::Io { path, source }),
            }
        }
    }

    fn write_lines<W: Write>(
        &self,
        mut writer: W,
        records: &[EventLogRecord],
        path: &Path,
    ) -> Result<(), ExportError> {
        let io_err = |source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        };
        for record in records {
            let line = self.format.line(record)?;
            writeln!(writer, "{line}").map_err(io_err)?;
        }
        writer.flush().map_err(io_err)
    }
}
