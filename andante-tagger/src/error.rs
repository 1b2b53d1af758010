/// Errors that can occur while writing metadata to a downloaded file.
#[derive(Debug, thiserror::Error)]
pub enum TagError {
    #[error("Artwork fetch failed: {0}")]
    Artwork(#[from] reqwest::Error),

    #[error("Tag engine error: {0}")]
    Engine(#[from] lofty::error::LoftyError),

    #[error("MP3 tag engine error: {0}")]
    Mp3Engine(#[from] id3::Error),

    #[error("FLAC tag engine error: {0}")]
    FlacEngine(#[from] metaflac::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
