use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    /// The seed target has no usable scheme or host. Fatal for a run.
    #[error("The URL provided is not built in a proper way: {0}")]
    MalformedTarget(String),

    /// A single candidate link could not be resolved, or its root domain
    /// could not be derived. The candidate is dropped.
    #[error("Malformed URL: {0}")]
    MalformedUrl(String),

    #[error("HTTP request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Output encoding failed: {0}")]
    OutputEncoding(#[from] serde_json::Error),

    #[error("Task join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),

    #[error("Other error: {0}")]
    Other(String),
}

impl ScanError {
    /// Only a malformed target aborts the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ScanError::MalformedTarget(_))
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
