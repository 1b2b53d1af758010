/// Errors that can occur while talking to the music catalog API.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Entity unavailable: {0}")]
    EntityUnavailable(String),

    #[error("Not a catalog URL: {0}")]
    InvalidUrl(String),

    #[error("Server error (HTTP {status}): {message}")]
    ServerError { status: u16, message: String },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error: {0}")]
    Api(String),
}
