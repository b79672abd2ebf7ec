use thiserror::Error;

/// Failure of a single browser command (lookup, text read, navigation).
#[derive(Debug, Error)]
pub enum PageError {
    #[error("webdriver command failed: {0}")]
    Command(String),
}

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error(
        "invalid URL '{url}': it must start with 'http://' or 'https://' and contain '{expected}'"
    )]
    InvalidUrl { url: String, expected: String },

    #[error("browser session failed: {0}")]
    Session(String),

    #[error(transparent)]
    Page(#[from] PageError),

    #[error("failed to write output file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode messages: {0}")]
    Json(#[from] serde_json::Error),
}
