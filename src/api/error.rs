use thiserror::Error;

/// Failures talking to the attendance backend.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Backend rejected request to {path} with status {status}")]
    Rejected { path: &'static str, status: u16 },

    #[error("Failed to reach the attendance backend: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend sent a malformed response from {path}: {source}")]
    MalformedResponse {
        path: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Whether the backend answered with a non-2xx status (as opposed to the
    /// request never completing).
    pub fn is_rejection(&self) -> bool {
        matches!(self, ApiError::Rejected { .. })
    }
}
