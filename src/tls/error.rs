use thiserror::Error;

#[derive(Error, Debug)]
pub enum TlsError {
    #[error("Unsupported protocol versions: {0}")]
    ProtocolVersions(String),
}

impl From<rustls::Error> for TlsError {
    fn from(err: rustls::Error) -> Self {
        TlsError::ProtocolVersions(err.to_string())
    }
}

pub type TlsResult<T> = Result<T, TlsError>;
