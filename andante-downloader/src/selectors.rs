//! The remote site's element selectors and page URLs, kept in one place.

use crate::format::AudioFormat;

/// Download service driven through the browser.
pub const DEFAULT_SITE_BASE: &str = "https://free-mp3-download.net";

pub const DOWNLOAD_BUTTON: &str = ".dl";
pub const CHALLENGE_FRAME: &str = "iframe[title=\"reCAPTCHA\"]";
pub const ERROR_TOAST: &str = ".alert-danger";

/// Radio control for the requested format/bitrate.
pub fn format_control(format: AudioFormat) -> &'static str {
    match format {
        AudioFormat::Mp3_128 => "#mp3-128",
        AudioFormat::Mp3_320 => "#mp3-320",
        AudioFormat::Flac => "#flac",
    }
}

/// Download page for one item: the item id plus a URL-safe search string.
pub fn download_page_url(base: &str, item_id: u64, query: &str) -> String {
    format!(
        "{}/download.php?id={}&q={}",
        base.trim_end_matches('/'),
        item_id,
        urlencoding::encode(query)
    )
}
