//! Run summary tallies and the optional per-run log file.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

/// Per-run counts of what happened to each record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub updated: usize,
    pub not_found: usize,
    pub errors: usize,
    pub skipped: usize,
    pub invalid_coordinates: usize,
    pub outside_area: usize,
}

impl RunSummary {
    pub fn processed(&self) -> usize {
        self.updated
            + self.not_found
            + self.errors
            + self.skipped
            + self.invalid_coordinates
            + self.outside_area
    }

    /// Summary lines in display order
    pub fn lines(&self, area_label: &str) -> Vec<String> {
        vec![
            format!("Updated: {} restaurants", self.updated),
            format!("Not found: {} restaurants", self.not_found),
            format!("Errors: {} restaurants", self.errors),
            format!("Skipped: {} restaurants", self.skipped),
            format!("Invalid coordinates: {} restaurants", self.invalid_coordinates),
            format!("Outside {}: {} restaurants", area_label, self.outside_area),
        ]
    }
}

/// Mirrors run messages to tracing and, optionally, an append-only log file
pub struct RunLog {
    file: Option<BufWriter<File>>,
}

impl RunLog {
    /// Log to tracing only
    pub fn console() -> Self {
        Self { file: None }
    }

    /// Open (or create) `path` for appending and write the start banner
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = BufWriter::new(file);
        writeln!(
            writer,
            "\n=== Neighborhood Update Started at {} ===",
            Utc::now().to_rfc3339()
        )?;
        Ok(Self { file: Some(writer) })
    }

    pub fn info(&mut self, message: &str) {
        info!("{}", message);
        self.append(message);
    }

    pub fn warn(&mut self, message: &str) {
        warn!("{}", message);
        self.append(message);
    }

    fn append(&mut self, message: &str) {
        if let Some(writer) = self.file.as_mut() {
            if let Err(e) = writeln!(writer, "{}: {}", Utc::now().to_rfc3339(), message) {
                warn!("Failed to write to log file: {}", e);
                self.file = None;
            }
        }
    }

    /// Write the completion banner and flush
    pub fn finish(mut self) -> io::Result<()> {
        if let Some(mut writer) = self.file.take() {
            writeln!(
                writer,
                "=== Neighborhood Update Completed at {} ===\n",
                Utc::now().to_rfc3339()
            )?;
            writer.flush()?;
        }
        Ok(())
    }
}
