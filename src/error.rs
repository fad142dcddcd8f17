use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataTaleError {
    #[error("API token not found. Please set the {0} environment variable.")]
    MissingCredential(&'static str),

    #[error("Invalid file path or not a CSV file: {0}")]
    InvalidInputPath(String),

    #[error("Failed to load dataset: {0}")]
    LoadError(String),

    #[error("LLM request failed after {attempts} attempts: {cause}")]
    AnalysisUnavailable { attempts: u32, cause: QueryFailure },

    #[error("Invalid LLM response: {0}")]
    InvalidResponse(String),

    #[error("Chart rendering failed: {0}")]
    ChartError(String),

    #[error("Invalid command line arguments: {0}")]
    InvalidArguments(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

/// Classification of a single failed chat-completion attempt.
///
/// `Timeout`, `Transport` and `BadStatus` are transient and eligible for
/// retry under the configured [`crate::analyzer::RetryPolicy`]. A
/// `MalformedBody` means the service answered with a success status but the
/// payload is unusable, so resending the identical request cannot help.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryFailure {
    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("server returned status {0}")]
    BadStatus(u16),

    #[error("malformed response body: {0}")]
    MalformedBody(String),
}

impl QueryFailure {
    pub fn is_retryable(&self) -> bool {
        !matches!(self, QueryFailure::MalformedBody(_))
    }
}
