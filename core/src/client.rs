use bytes::Bytes;
use log::debug;

use crate::context::Context;
use crate::decode::ResponseDecoder;
use crate::decode::ResponseMetadata;
use crate::decode::StatusClass;
use crate::request::UnsignedRequest;
use crate::service::Service;
use crate::service::SigningScheme;
use crate::sign;
use crate::time;
use crate::Credential;
use crate::Error;
use crate::Result;

/// Dispatches assembled requests over a [`Context`]'s transport.
///
/// A send is a deferred computation: nothing happens until the returned
/// future is awaited, and dropping it mid-flight aborts the transport
/// round-trip. The signing timestamp is captured at await time, right
/// before the request leaves.
#[derive(Debug, Clone)]
pub struct Client {
    ctx: Context,
}

impl Client {
    /// Create a client over the given context.
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }

    /// Sign and send a request, decoding the response.
    ///
    /// The request is consumed. Fails without touching the network when the
    /// service demands the unimplemented S3 signing scheme.
    pub async fn send<T>(
        &self,
        service: &Service,
        credential: &Credential,
        mut req: UnsignedRequest<T>,
    ) -> Result<T> {
        sign::attach_dialect_headers(service, &mut req);

        let http_req = match service.signer() {
            SigningScheme::V4 => sign::sign(service, credential, time::now(), &req)?,
            SigningScheme::S3 => {
                return Err(Error::BadBody(
                    "TODO: S3 Signing Scheme not implemented.".to_string(),
                ));
            }
        };

        self.roundtrip(http_req, &req.decoder).await
    }

    /// Send a request without authentication headers.
    ///
    /// The request still gets the dialect transformation and the date,
    /// payload-hash and content-negotiation headers.
    pub async fn send_unsigned<T>(&self, service: &Service, mut req: UnsignedRequest<T>) -> Result<T> {
        sign::attach_dialect_headers(service, &mut req);
        let http_req = sign::prepare_unsigned(service, time::now(), &req)?;

        self.roundtrip(http_req, &req.decoder).await
    }

    async fn roundtrip<T>(
        &self,
        req: http::Request<Bytes>,
        decoder: &ResponseDecoder<T>,
    ) -> Result<T> {
        let url = req.uri().to_string();
        debug!("sending {} {url}", req.method());

        let resp = self.ctx.http_send(req).await?;
        let (parts, body) = resp.into_parts();
        let body = String::from_utf8_lossy(&body).into_owned();

        let metadata = ResponseMetadata {
            url,
            status: parts.status,
            status_text: parts
                .status
                .canonical_reason()
                .unwrap_or_default()
                .to_string(),
            headers: parts.headers,
        };
        debug!("received {} from {}", metadata.status, metadata.url);

        decoder(StatusClass::of(metadata.status), &metadata, &body)
    }
}
