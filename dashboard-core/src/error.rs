use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Failure of a single provider call.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("'{query}' was not found by the weather provider")]
    NotFound { query: String },

    #[error("{endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("Failed to reach the weather provider: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to parse {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }
}

/// Why the primary weather lookup failed, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureReason {
    NotFound,
    Transient,
}

impl FailureReason {
    pub fn message(&self) -> &'static str {
        match self {
            FailureReason::NotFound => "City not found. Please check the spelling and try again.",
            FailureReason::Transient => "Unable to fetch weather data. Please try again later.",
        }
    }
}

impl From<&FetchError> for FailureReason {
    fn from(err: &FetchError) -> Self {
        if err.is_not_found() { FailureReason::NotFound } else { FailureReason::Transient }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}
