//! Download-completion detection by directory observation.
//!
//! The browser gives no completion callback, so the only way to know a
//! download finished is to watch the scratch directory until the newest
//! file stops being a partial and carries a recognized extension.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

use log::{debug, trace};

use crate::error::DownloadError;

/// What one directory scan concluded.
enum Scan {
    /// No candidate files yet; the download has not started.
    Empty,
    /// The newest file's extension is not recognized (browser partial).
    Pending(PathBuf),
    /// The newest file carries a recognized extension.
    Ready(PathBuf),
}

/// Polls a scratch directory until a download materializes.
///
/// Purely observational: it does not know which download it is watching,
/// so the caller must keep the directory to one pending item at a time.
pub struct CompletionWatcher {
    poll_interval: Duration,
}

impl Default for CompletionWatcher {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
        }
    }
}

impl CompletionWatcher {
    pub fn new(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }

    /// Block until the newest file in `dir` carries one of
    /// `recognized_exts`, returning its path, or fail with
    /// [`DownloadError::Timeout`] once `deadline` elapses.
    pub fn await_completion(
        &self,
        dir: &Path,
        recognized_exts: &[&str],
        deadline: Duration,
    ) -> Result<PathBuf, DownloadError> {
        let start = Instant::now();
        loop {
            match self.scan(dir, recognized_exts)? {
                Scan::Ready(path) => {
                    debug!("Download complete: {}", path.display());
                    return Ok(path);
                }
                Scan::Pending(path) => trace!("Download in progress: {}", path.display()),
                Scan::Empty => trace!("Download not started yet"),
            }
            if start.elapsed() >= deadline {
                return Err(DownloadError::Timeout(deadline));
            }
            std::thread::sleep(self.poll_interval);
        }
    }

    fn scan(&self, dir: &Path, recognized_exts: &[&str]) -> Result<Scan, DownloadError> {
        let mut newest: Option<(SystemTime, PathBuf)> = None;

        for entry in std::fs::read_dir(dir)? {
            let Ok(entry) = entry else { continue };
            let path = entry.path();
            if path
                .file_name()
                .and_then(|n| n.to_str())
                .is_none_or(|n| n.starts_with('.'))
            {
                continue;
            }
            // The browser may rename or remove a partial between listing
            // and stat; treat that as transient and let the next poll see
            // the settled state.
            let Ok(meta) = entry.metadata() else { continue };
            if !meta.is_file() {
                continue;
            }
            let stamp = meta
                .created()
                .or_else(|_| meta.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            if newest.as_ref().is_none_or(|(t, _)| stamp > *t) {
                newest = Some((stamp, path));
            }
        }

        Ok(match newest {
            None => Scan::Empty,
            Some((_, path)) => {
                let recognized = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|ext| {
                        recognized_exts.iter().any(|r| r.eq_ignore_ascii_case(ext))
                    });
                if recognized {
                    Scan::Ready(path)
                } else {
                    Scan::Pending(path)
                }
            }
        })
    }
}

#[cfg(test)]
#[path = "tests/completion_tests.rs"]
mod tests;
