use std::time::Duration;

use crate::webdriver::WebDriverError;

/// Errors that can occur while orchestrating downloads.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Unsupported bitrate: {0}")]
    UnsupportedBitrate(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Entity unavailable: {0}")]
    EntityUnavailable(#[from] andante_catalog::CatalogError),

    #[error("Download did not complete within {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Remote service reported an error after submission")]
    ServerError,

    #[error("Interactive challenge was not cleared")]
    ChallengeFailed,

    #[error("Browser error: {0}")]
    Browser(#[from] WebDriverError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
