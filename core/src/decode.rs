//! The contract turning transport bytes into typed results.
//!
//! A decoder sees the response after two things have already happened: the
//! transport round-trip succeeded (lower-level failures short-circuit), and
//! the status was classified. What the decoder returns is what the caller
//! gets.

use http::HeaderMap;
use http::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::Error;
use crate::Result;

/// Two valued projection of the HTTP outcome handed to decoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// The service answered 2xx.
    Good,
    /// The service answered, but with any other status.
    Bad,
}

impl StatusClass {
    /// Classify an HTTP status code.
    pub fn of(status: StatusCode) -> Self {
        if status.is_success() {
            StatusClass::Good
        } else {
            StatusClass::Bad
        }
    }
}

/// Everything about a response except its body.
#[derive(Debug, Clone)]
pub struct ResponseMetadata {
    /// The URL the request went to.
    pub url: String,
    /// Response status code.
    pub status: StatusCode,
    /// Canonical reason phrase for the status, empty when unknown.
    pub status_text: String,
    /// Response headers.
    pub headers: HeaderMap,
}

/// Maps a classified transport outcome to a typed result.
pub type ResponseDecoder<T> =
    Box<dyn Fn(StatusClass, &ResponseMetadata, &str) -> Result<T> + Send + Sync>;

/// A decoder with full control over every outcome, good and bad.
///
/// `Err(msg)` from `f` becomes `Error::BadBody(msg)`.
pub fn full_decoder<T, F>(f: F) -> ResponseDecoder<T>
where
    F: Fn(StatusClass, &ResponseMetadata, &str) -> std::result::Result<T, String>
        + Send
        + Sync
        + 'static,
{
    Box::new(move |class, metadata, body| f(class, metadata, body).map_err(Error::BadBody))
}

/// Like [`full_decoder`], with the body parsed as JSON first.
///
/// Parse failures and `Err(msg)` from `f` both become `Error::BadBody`.
pub fn json_full_decoder<T, F>(f: F) -> ResponseDecoder<T>
where
    F: Fn(StatusClass, &ResponseMetadata, Value) -> std::result::Result<T, String>
        + Send
        + Sync
        + 'static,
{
    Box::new(move |class, metadata, body| {
        let value = serde_json::from_str(body)?;
        f(class, metadata, value).map_err(Error::BadBody)
    })
}

/// Decode the body text of a 2xx response.
///
/// Any other status short-circuits to `Error::BadStatus` without consulting
/// `f`.
pub fn string_body_decoder<T, F>(f: F) -> ResponseDecoder<T>
where
    F: Fn(&str) -> std::result::Result<T, String> + Send + Sync + 'static,
{
    Box::new(move |class, metadata, body| match class {
        StatusClass::Good => f(body).map_err(Error::BadBody),
        StatusClass::Bad => Err(Error::BadStatus(metadata.status.as_u16())),
    })
}

/// Deserialize the JSON body of a 2xx response into `T`.
///
/// Any other status short-circuits to `Error::BadStatus`, whether or not
/// the body would have parsed.
pub fn json_body_decoder<T>() -> ResponseDecoder<T>
where
    T: DeserializeOwned + 'static,
{
    Box::new(|class, metadata, body| match class {
        StatusClass::Good => Ok(serde_json::from_str(body)?),
        StatusClass::Bad => Err(Error::BadStatus(metadata.status.as_u16())),
    })
}

/// Return a fixed value for any 2xx response, ignoring the body.
pub fn constant_decoder<T>(value: T) -> ResponseDecoder<T>
where
    T: Clone + Send + Sync + 'static,
{
    Box::new(move |class, metadata, _| match class {
        StatusClass::Good => Ok(value.clone()),
        StatusClass::Bad => Err(Error::BadStatus(metadata.status.as_u16())),
    })
}
