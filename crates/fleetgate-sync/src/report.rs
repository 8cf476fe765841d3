//! Exception report artifact.
//!
//! Devices a reconciliation pass could not resolve in the directory are
//! accumulated here and written out once per run as a flat delimited table
//! for operator follow-up. The set is not retained between runs.

use std::io;
use std::path::{Path, PathBuf};

/// File name of the persisted artifact.
pub const REPORT_FILE_NAME: &str = "UnenrolledDevices.csv";

const HEADER: &str = "Tag, Make, Model, Serial Number, OS, Hostname, Action";

/// One unresolved record.
///
/// Match-phase failures only; a failed patch is not an exception row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExceptionRow {
    pub tag: String,
    pub make: String,
    pub model: String,
    pub serial_number: String,
    pub os: String,
    pub hostname: String,
    pub action: String,
}

impl ExceptionRow {
    /// Row for a device with no directory match. OS, hostname and action are
    /// left blank.
    #[must_use]
    pub fn unmatched(
        tag: impl Into<String>,
        make: impl Into<String>,
        model: impl Into<String>,
        serial_number: impl Into<String>,
    ) -> Self {
        Self {
            tag: tag.into(),
            make: make.into(),
            model: model.into(),
            serial_number: serial_number.into(),
            ..Self::default()
        }
    }

    fn render(&self) -> String {
        format!(
            "{}, {}, {}, {}, {}, {}, {}",
            self.tag, self.make, self.model, self.serial_number, self.os, self.hostname, self.action
        )
    }
}

/// Accumulates exception rows for one run.
#[derive(Debug, Clone, Default)]
pub struct ExceptionReport {
    rows: Vec<ExceptionRow>,
}

impl ExceptionReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row.
    pub fn push(&mut self, row: ExceptionRow) {
        self.rows.push(row);
    }

    /// Rows accumulated so far.
    #[must_use]
    pub fn rows(&self) -> &[ExceptionRow] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when no exceptions were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Renders the table: header line plus one line per row, comma+space
    /// separated, no quoting.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::from(HEADER);
        out.push('\n');
        for row in &self.rows {
            out.push_str(&row.render());
            out.push('\n');
        }
        out
    }

    /// Writes the rendered table to `UnenrolledDevices.csv` in `dir`,
    /// returning the path written.
    pub fn persist(&self, dir: &Path) -> io::Result<PathBuf> {
        let path = dir.join(REPORT_FILE_NAME);
        std::fs::write(&path, self.render())?;
        Ok(path)
    }
}
