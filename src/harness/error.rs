use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Invalid target URL: {0}")]
    InvalidUrl(String),

    #[error("Unsupported URL scheme: {0} (expected http or https)")]
    UnsupportedScheme(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Invalid strategy: {0}")]
    InvalidStrategy(String),

    #[error("HTTP client setup failed: {0}")]
    ClientBuild(String),

    #[error("TLS error: {0}")]
    Tls(#[from] crate::tls::TlsError),

    #[error("Worker task failed: {0}")]
    WorkerFailed(String),

    #[error("Accounting mismatch: expected {expected} attempts, recorded {recorded}")]
    AccountingMismatch { expected: u64, recorded: u64 },
}

impl From<reqwest::Error> for HarnessError {
    fn from(err: reqwest::Error) -> Self {
        HarnessError::ClientBuild(err.to_string())
    }
}

impl From<tokio::task::JoinError> for HarnessError {
    fn from(err: tokio::task::JoinError) -> Self {
        HarnessError::WorkerFailed(err.to_string())
    }
}

pub type HarnessResult<T> = Result<T, HarnessError>;
