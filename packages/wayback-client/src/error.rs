use thiserror::Error;

#[derive(Debug, Error)]
pub enum WaybackError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("archive API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("no usable snapshot of {url}: {detail}")]
    NoSnapshot { url: String, detail: String },

    #[error("unparseable snapshot timestamp: {0}")]
    BadTimestamp(String),
}

pub type Result<T> = std::result::Result<T, WaybackError>;
