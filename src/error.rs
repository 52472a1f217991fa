use thiserror::Error;

/// Failures raised while talking to the MediaWiki API or driving the month fan-out.
///
/// The cleaner never fails; an empty `YearSummary` is a value, not an error.
#[derive(Debug, Error)]
pub enum WikiError {
    /// No HTTP response was obtained (connect error, timeout, broken body).
    #[error("wikipedia unavailable: {0}")]
    RemoteUnavailable(#[source] reqwest::Error),

    #[error("wikipedia rejected the request with status {status}")]
    RemoteRejected { status: u16 },

    #[error("wikipedia returned a malformed body: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("month fetch task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

impl WikiError {
    /// Upstream status code, if the remote answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            WikiError::RemoteRejected { status } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, WikiError>;
