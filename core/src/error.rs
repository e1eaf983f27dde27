use thiserror::Error;

/// The error surface of this crate.
///
/// Every failure a send can produce lands in one of these variants: the
/// request could not be assembled, the transport failed below HTTP, the
/// service answered with a non-2xx status, or the body could not be decoded.
/// Messages never contain credentials or signing intermediates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The request URL was malformed or could not be constructed.
    #[error("bad url: {0}")]
    BadUrl(String),

    /// The transport gave up waiting for a response.
    #[error("request timed out")]
    Timeout,

    /// The transport failed before a response arrived.
    #[error("network error")]
    NetworkError,

    /// The service answered with a non-2xx status.
    #[error("bad status: {0}")]
    BadStatus(u16),

    /// The response body could not be decoded into the expected value, or
    /// the request could not be prepared for sending.
    #[error("bad body: {0}")]
    BadBody(String),
}

/// Convenience type alias for results of this crate.
pub type Result<T> = std::result::Result<T, Error>;

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Error::BadBody(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::BadBody(err.to_string())
    }
}
