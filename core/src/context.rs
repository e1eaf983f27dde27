use std::fmt::Debug;
use std::sync::Arc;

use bytes::Bytes;

use crate::Result;

/// HttpSend is used to issue the round-trip of a prepared request.
///
/// Implementations translate their transport's failure modes into the typed
/// errors: a malformed URL becomes `BadUrl`, an elapsed deadline `Timeout`,
/// anything else below HTTP `NetworkError`. The signing layer sets no
/// deadline of its own; timeouts belong to the transport.
#[async_trait::async_trait]
pub trait HttpSend: Debug + Send + Sync + 'static {
    /// Send the request and return the response with its body collected.
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>>;
}

/// Context carries the transport that requests are sent through.
///
/// Cloning is cheap; clones share the transport and may be used from any
/// number of concurrent tasks.
#[derive(Debug, Clone)]
pub struct Context {
    http: Arc<dyn HttpSend>,
}

impl Context {
    /// Create a new context over the given transport.
    #[inline]
    pub fn new(http: impl HttpSend) -> Self {
        Self {
            http: Arc::new(http),
        }
    }

    /// Send an http request and return the response.
    #[inline]
    pub async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        self.http.http_send(req).await
    }
}
