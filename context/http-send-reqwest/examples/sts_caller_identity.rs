//! Ask STS who the configured credentials belong to.
//!
//! ```shell
//! AWS_ACCESS_KEY_ID=... AWS_SECRET_ACCESS_KEY=... \
//!     cargo run --example sts_caller_identity
//! ```

use awsreq_core::{
    json_full_decoder, Body, Client, Context, Credential, Protocol, Service, SigningScheme,
    UnsignedRequest,
};
use awsreq_http_send_reqwest::ReqwestHttpSend;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let service = Service::global("sts", "2011-06-15", Protocol::Query, SigningScheme::V4);
    let credential = Credential::new(
        &std::env::var("AWS_ACCESS_KEY_ID")?,
        &std::env::var("AWS_SECRET_ACCESS_KEY")?,
    );

    let mut request = UnsignedRequest::new(
        "GetCallerIdentity",
        http::Method::POST,
        "/",
        Body::Empty,
        json_full_decoder(|_, _, value| Ok::<_, String>(value)),
    );
    request.add_query([("Action", "GetCallerIdentity"), ("Version", "2011-06-15")]);

    let client = Client::new(Context::new(ReqwestHttpSend::default()));
    let identity = client.send(&service, &credential, request).await?;
    println!("{identity:#}");

    Ok(())
}
