//! Per-item download orchestration and the batch loop.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::Duration;

use andante_catalog::Track;
use log::{debug, error, info, warn};

use crate::challenge::ChallengeOutcome;
use crate::completion::CompletionWatcher;
use crate::error::DownloadError;
use crate::format::AudioFormat;
use crate::pacing::Pacer;
use crate::paths::{self, PlaylistContext};
use crate::report::{ReportEntry, RunReport};
use crate::session::SiteDriver;
use crate::webdriver::ClickOutcome;

/// Extensions a finished download may carry.
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "flac"];

/// One item to download. Created per track, dropped when it resolves.
#[derive(Debug, Clone)]
pub struct DownloadTask {
    pub track: Track,
    pub format: AudioFormat,
    /// Playlist placement; mutually exclusive with the per-album layout.
    pub playlist: Option<PlaylistContext>,
}

impl DownloadTask {
    fn label(&self) -> String {
        format!("{} - {}", self.track.artist_name, self.track.title)
    }
}

/// How one item resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Downloaded(PathBuf),
    /// The destination already existed; no browser work happened.
    AlreadyPresent(PathBuf),
}

/// Drives one item at a time through the site's download flow.
///
/// Strictly sequential: the scratch directory and the browser tab are
/// shared singletons, so an item is fully resolved (moved out of scratch)
/// before the next one starts.
pub struct Orchestrator<D: SiteDriver> {
    driver: D,
    pacer: Pacer,
    watcher: CompletionWatcher,
    scratch_dir: PathBuf,
    dest_root: PathBuf,
    completion_deadline: Duration,
}

impl<D: SiteDriver> Orchestrator<D> {
    pub fn new(driver: D, pacer: Pacer, scratch_dir: PathBuf, dest_root: PathBuf) -> Self {
        Self {
            driver,
            pacer,
            watcher: CompletionWatcher::default(),
            scratch_dir,
            dest_root,
            completion_deadline: Duration::from_secs(60),
        }
    }

    pub fn with_watcher(mut self, watcher: CompletionWatcher) -> Self {
        self.watcher = watcher;
        self
    }

    pub fn with_completion_deadline(mut self, deadline: Duration) -> Self {
        self.completion_deadline = deadline;
        self
    }

    /// Download one item to its deterministic destination.
    ///
    /// Pacing is resumed for the duration of the browser interaction and
    /// always paused again on exit, so handling time between items never
    /// consumes the pacing budget.
    pub fn download(&mut self, task: &DownloadTask) -> Result<DownloadOutcome, DownloadError> {
        let dest = paths::destination_path(
            &self.dest_root,
            &task.track,
            task.format,
            task.playlist.as_ref(),
        );
        if dest.exists() {
            info!("Already downloaded: {}", dest.display());
            return Ok(DownloadOutcome::AlreadyPresent(dest));
        }

        self.pacer.resume();
        let result = self.download_inner(task, &dest);
        self.pacer.pause();
        result
    }

    fn download_inner(
        &mut self,
        task: &DownloadTask,
        dest: &Path,
    ) -> Result<DownloadOutcome, DownloadError> {
        self.driver.open_item_page(&task.track)?;
        self.pacer.wait(Duration::ZERO);

        self.driver.select_format(task.format)?;

        if self.driver.challenge_present()? {
            // A human may be about to take over; that time is outside the
            // pacing contract.
            self.pacer.pause();
            let outcome = self.driver.clear_challenge();
            self.pacer.resume();
            match outcome? {
                ChallengeOutcome::Solved => {}
                ChallengeOutcome::Unsolved => return Err(DownloadError::ChallengeFailed),
            }
        }

        self.pacer.quick_wait(Duration::ZERO);
        match self.driver.trigger_download()? {
            ClickOutcome::Clicked => {}
            ClickOutcome::InterceptedRetriedViaScript => {
                debug!("Download click was intercepted; dispatched programmatically")
            }
        }

        // A rejected submission surfaces as an error toast rather than a
        // download; catch the prompt ones before settling into the poll.
        if self.driver.error_indicator_present()? {
            return Err(DownloadError::ServerError);
        }

        let completed = match self.watcher.await_completion(
            &self.scratch_dir,
            AUDIO_EXTENSIONS,
            self.completion_deadline,
        ) {
            Ok(path) => path,
            Err(timeout @ DownloadError::Timeout(_)) => {
                if self.driver.error_indicator_present().unwrap_or(false) {
                    // Item-scoped: nothing was ever in flight, so the
                    // session can be kept.
                    return Err(DownloadError::ServerError);
                }
                warn!("Download did not complete; restarting the browser session");
                self.driver.restart()?;
                self.sweep_scratch();
                return Err(timeout);
            }
            Err(e) => return Err(e),
        };

        relocate(&completed, dest)?;
        info!("Saved {}", dest.display());
        Ok(DownloadOutcome::Downloaded(dest.to_path_buf()))
    }

    /// Remove leftover files so the next item's scan starts clean.
    fn sweep_scratch(&self) {
        let Ok(entries) = std::fs::read_dir(&self.scratch_dir) else {
            return;
        };
        let mut removed = 0usize;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() && std::fs::remove_file(&path).is_ok() {
                removed += 1;
            }
        }
        if removed > 0 {
            debug!("Swept {removed} stray file(s) from the scratch directory");
        }
    }

    /// Drain an owned task queue, one item at a time.
    ///
    /// Per-item failures are logged into the report and never abort the
    /// batch. Each downloaded file is handed to `on_downloaded` (the
    /// tagging pipeline); its failures are recorded per file.
    pub fn run_batch<F>(&mut self, tasks: VecDeque<DownloadTask>, mut on_downloaded: F) -> RunReport
    where
        F: FnMut(&Path, &Track) -> Result<(), Box<dyn std::error::Error>>,
    {
        let mut report = RunReport::new();
        let total = tasks.len();

        for (index, task) in tasks.into_iter().enumerate() {
            let label = task.label();
            info!("[{}/{}] {}", index + 1, total, label);

            match self.download(&task) {
                Ok(DownloadOutcome::AlreadyPresent(path)) => {
                    report.add(ReportEntry::AlreadyPresent { track: label, path });
                }
                Ok(DownloadOutcome::Downloaded(path)) => match on_downloaded(&path, &task.track) {
                    Ok(()) => report.add(ReportEntry::Completed { track: label, path }),
                    Err(e) => {
                        error!("Tagging failed for {}: {e}", path.display());
                        report.add(ReportEntry::TagFailed {
                            track: label,
                            path,
                            message: e.to_string(),
                        });
                    }
                },
                Err(e) => {
                    error!("Skipping {label}: {e}");
                    report.add(ReportEntry::Failed {
                        track: label,
                        message: e.to_string(),
                    });
                }
            }
        }

        report
    }
}

/// Move a finished download into place, creating parent directories.
/// Falls back to copy+remove when the destination is on another device.
fn relocate(src: &Path, dest: &Path) -> std::io::Result<()> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    match std::fs::rename(src, dest) {
        Ok(()) => Ok(()),
        Err(_) => {
            std::fs::copy(src, dest)?;
            std::fs::remove_file(src)
        }
    }
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
