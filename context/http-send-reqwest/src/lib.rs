//! Reqwest backed [`HttpSend`] implementation.
//!
//! This is the default transport for awsreq. It collects response bodies
//! eagerly and maps reqwest's failure modes onto the typed transport
//! errors, so decoders only ever see responses that actually arrived.

#![warn(missing_docs)]

use async_trait::async_trait;
use awsreq_core::Error;
use awsreq_core::HttpSend;
use bytes::Bytes;
use http_body_util::BodyExt;
use reqwest::Client;
use reqwest::Request;

/// [`HttpSend`] implementation on a shared `reqwest::Client`.
///
/// The default client is built without a timeout; callers that want one
/// pass their own configured client.
#[derive(Debug, Default)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> awsreq_core::Result<http::Response<Bytes>> {
        let req = Request::try_from(req).map_err(classify)?;
        let resp: http::Response<_> = self.client.execute(req).await.map_err(classify)?.into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(classify)?;
        Ok(http::Response::from_parts(parts, bs))
    }
}

/// Map a reqwest failure onto the typed transport errors.
fn classify(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout
    } else if err.is_builder() {
        Error::BadUrl(err.to_string())
    } else {
        Error::NetworkError
    }
}
