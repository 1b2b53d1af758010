//! Per-run outcome collection and the report file.

use std::path::{Path, PathBuf};

/// A single entry in the run report.
#[derive(Debug, Clone)]
pub enum ReportEntry {
    /// Downloaded and tagged.
    Completed { track: String, path: PathBuf },
    /// Destination already existed; nothing was done.
    AlreadyPresent { track: String, path: PathBuf },
    /// Downloaded, but the metadata write failed.
    TagFailed {
        track: String,
        path: PathBuf,
        message: String,
    },
    /// Download failed; item skipped.
    Failed { track: String, message: String },
}

/// Collects per-item outcomes and writes the report file.
#[derive(Debug, Default)]
pub struct RunReport {
    entries: Vec<ReportEntry>,
}

/// Aggregate counts across a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub completed: usize,
    pub already_present: usize,
    pub tag_failures: usize,
    pub failures: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.completed + self.already_present + self.tag_failures + self.failures
    }
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: ReportEntry) {
        self.entries.push(entry);
    }

    /// Fold another report's entries into this one (interactive mode runs
    /// several batches per session).
    pub fn merge(&mut self, other: RunReport) {
        self.entries.extend(other.entries);
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary::default();
        for entry in &self.entries {
            match entry {
                ReportEntry::Completed { .. } => summary.completed += 1,
                ReportEntry::AlreadyPresent { .. } => summary.already_present += 1,
                ReportEntry::TagFailed { .. } => summary.tag_failures += 1,
                ReportEntry::Failed { .. } => summary.failures += 1,
            }
        }
        summary
    }

    /// Write the report to a file.
    pub fn write_to_file(&self, path: &Path) -> std::io::Result<()> {
        use std::io::Write;

        let mut file = std::fs::File::create(path)?;
        let summary = self.summary();

        writeln!(file, "=== Download Report ===")?;
        writeln!(
            file,
            "Date: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(file)?;
        writeln!(
            file,
            "Items: {} ({} downloaded, {} already present, {} tag failures, {} failed)",
            summary.total(),
            summary.completed,
            summary.already_present,
            summary.tag_failures,
            summary.failures
        )?;
        writeln!(file)?;

        for entry in &self.entries {
            match entry {
                ReportEntry::Completed { track, path } => {
                    writeln!(file, "[ok]      {} -> {}", track, path.display())?;
                }
                ReportEntry::AlreadyPresent { track, path } => {
                    writeln!(file, "[present] {} -> {}", track, path.display())?;
                }
                ReportEntry::TagFailed {
                    track,
                    path,
                    message,
                } => {
                    writeln!(
                        file,
                        "[tag]     {} -> {} ({})",
                        track,
                        path.display(),
                        message
                    )?;
                }
                ReportEntry::Failed { track, message } => {
                    writeln!(file, "[failed]  {} ({})", track, message)?;
                }
            }
        }

        Ok(())
    }
}
