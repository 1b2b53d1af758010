use thiserror::Error;

/// Errors that can occur during CLI execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Catalog lookup failed
    #[error("{0}")]
    Catalog(#[from] andante_catalog::CatalogError),

    /// Download orchestration failed
    #[error("{0}")]
    Download(#[from] andante_downloader::DownloadError),

    /// Tagging setup failed
    #[error("{0}")]
    Tag(#[from] andante_tagger::TagError),

    /// Malformed arguments or prompt answers
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CliError {
    pub(crate) fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
