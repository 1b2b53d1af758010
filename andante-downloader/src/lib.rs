pub mod challenge;
pub mod completion;
pub mod error;
pub mod format;
pub mod orchestrator;
pub mod pacing;
pub mod paths;
pub mod report;
pub mod selectors;
pub mod session;
pub mod webdriver;

pub use challenge::{ChallengeOutcome, ChallengeSolver};
pub use completion::CompletionWatcher;
pub use error::DownloadError;
pub use format::AudioFormat;
pub use orchestrator::{DownloadOutcome, DownloadTask, Orchestrator};
pub use pacing::{Pacer, PacingConfig};
pub use paths::{PlaylistContext, destination_path, sanitize};
pub use report::{ReportEntry, RunReport, RunSummary};
pub use session::{SiteDriver, SiteSession};
pub use webdriver::{Browser, ClickOutcome, WebDriverError};
