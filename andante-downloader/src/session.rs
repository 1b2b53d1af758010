//! Site-level driver over the WebDriver session.

use std::path::PathBuf;
use std::time::Duration;

use andante_catalog::Track;
use log::{info, warn};

use crate::challenge::{self, ChallengeOutcome, ChallengeSolver};
use crate::error::DownloadError;
use crate::format::AudioFormat;
use crate::selectors;
use crate::webdriver::{Browser, ClickOutcome, WebDriverError};

/// The site interactions the orchestrator needs, as a seam so tests can
/// substitute a stub for the real browser-backed session.
pub trait SiteDriver {
    /// Open the download page for one item; page-load trouble is
    /// best-effort (logged, not fatal; later steps will fail and report).
    fn open_item_page(&mut self, track: &Track) -> Result<(), DownloadError>;

    fn select_format(&mut self, format: AudioFormat) -> Result<(), DownloadError>;

    /// Whether an interactive challenge is present and visible.
    fn challenge_present(&mut self) -> Result<bool, DownloadError>;

    /// Attempt to clear the challenge: automatic solver first when
    /// configured, manual gate as the fallback.
    fn clear_challenge(&mut self) -> Result<ChallengeOutcome, DownloadError>;

    fn trigger_download(&mut self) -> Result<ClickOutcome, DownloadError>;

    /// Whether the service surfaced an error indicator after submission.
    fn error_indicator_present(&mut self) -> Result<bool, DownloadError>;

    /// Re-acquire the browser session (used after a completion timeout so
    /// no stray in-flight download pollutes the next item's scan).
    fn restart(&mut self) -> Result<(), DownloadError>;
}

/// WebDriver-backed [`SiteDriver`] for the download service.
pub struct SiteSession {
    browser: Browser,
    endpoint: String,
    site_base: String,
    scratch_dir: PathBuf,
    auto_solver: Option<Box<dyn ChallengeSolver>>,
    page_timeout: Duration,
}

impl SiteSession {
    pub fn launch(
        endpoint: &str,
        site_base: &str,
        scratch_dir: PathBuf,
        auto_solver: Option<Box<dyn ChallengeSolver>>,
    ) -> Result<Self, DownloadError> {
        let browser = Browser::launch(endpoint, &scratch_dir)?;
        Ok(Self {
            browser,
            endpoint: endpoint.to_string(),
            site_base: site_base.to_string(),
            scratch_dir,
            auto_solver,
            page_timeout: Duration::from_secs(15),
        })
    }

    /// Probe for a selector that may legitimately be absent.
    fn visible(&self, selector: &str) -> Result<bool, DownloadError> {
        match self.browser.find(selector) {
            Ok(element) => Ok(self.browser.is_displayed(&element).unwrap_or(false)),
            Err(WebDriverError::NoSuchElement(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

impl SiteDriver for SiteSession {
    fn open_item_page(&mut self, track: &Track) -> Result<(), DownloadError> {
        let url = selectors::download_page_url(&self.site_base, track.id, &track.search_string());
        self.browser.navigate(&url)?;
        match self
            .browser
            .wait_for(selectors::DOWNLOAD_BUTTON, self.page_timeout)
        {
            Ok(_) => Ok(()),
            Err(WebDriverError::ElementWait(_)) => {
                warn!("Download page did not finish loading; continuing best-effort");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn select_format(&mut self, format: AudioFormat) -> Result<(), DownloadError> {
        let control = self
            .browser
            .wait_for(selectors::format_control(format), self.page_timeout)?;
        self.browser.click(&control)?;
        Ok(())
    }

    fn challenge_present(&mut self) -> Result<bool, DownloadError> {
        self.visible(selectors::CHALLENGE_FRAME)
    }

    fn clear_challenge(&mut self) -> Result<ChallengeOutcome, DownloadError> {
        if let Some(mut solver) = self.auto_solver.take() {
            let frame = self.browser.find(selectors::CHALLENGE_FRAME)?;
            let attempt = solver.solve(&mut self.browser, &frame);
            self.auto_solver = Some(solver);
            match attempt {
                Ok(ChallengeOutcome::Solved) => return Ok(ChallengeOutcome::Solved),
                Ok(ChallengeOutcome::Unsolved) => {
                    info!("Automatic challenge solving failed; falling back to manual gate")
                }
                Err(e) => warn!("Challenge solver error: {e}; falling back to manual gate"),
            }
        }
        Ok(challenge::manual_gate())
    }

    fn trigger_download(&mut self) -> Result<ClickOutcome, DownloadError> {
        let button = self
            .browser
            .wait_for(selectors::DOWNLOAD_BUTTON, self.page_timeout)?;
        Ok(self.browser.click(&button)?)
    }

    fn error_indicator_present(&mut self) -> Result<bool, DownloadError> {
        self.visible(selectors::ERROR_TOAST)
    }

    fn restart(&mut self) -> Result<(), DownloadError> {
        info!("Restarting browser session");
        self.browser.quit();
        self.browser = Browser::launch(&self.endpoint, &self.scratch_dir)?;
        Ok(())
    }
}
