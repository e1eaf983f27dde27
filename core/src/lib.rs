//! Core components for building and dispatching signed AWS API requests.
//!
//! This crate is the foundation the service bindings sit on: it knows how
//! to shape a request for a service dialect, sign it with AWS Signature
//! Version 4, hand it to a pluggable transport, and turn the response into
//! a typed result.
//!
//! ## Overview
//!
//! Four values meet at a send:
//!
//! - **[`Service`]**: an immutable descriptor of one service's knobs:
//!   endpoint, protocol dialect, signing scheme, content negotiation.
//! - **[`Credential`]**: the caller-supplied access keys. Never logged,
//!   never persisted.
//! - **[`UnsignedRequest`]**: operation name, method, path, body, headers,
//!   query, and the decoder that will interpret the response.
//! - **[`Client`]**: dispatches over the [`Context`]'s transport.
//!
//! The transport is anything implementing [`HttpSend`]; the companion
//! `awsreq-http-send-reqwest` crate provides the reqwest-backed default.
//!
//! ## Example
//!
//! ```no_run
//! use awsreq_core::{
//!     json_body_decoder, Body, Client, Context, Credential, Protocol, Service, SigningScheme,
//!     UnsignedRequest,
//! };
//!
//! # #[derive(Debug)]
//! # struct MockHttpSend;
//! # #[async_trait::async_trait]
//! # impl awsreq_core::HttpSend for MockHttpSend {
//! #     async fn http_send(
//! #         &self,
//! #         _req: http::Request<bytes::Bytes>,
//! #     ) -> awsreq_core::Result<http::Response<bytes::Bytes>> {
//! #         Ok(http::Response::builder()
//! #             .status(200)
//! #             .body(bytes::Bytes::from_static(b"{}"))?)
//! #     }
//! # }
//! # async fn example() -> awsreq_core::Result<()> {
//! let dynamodb = Service::regional(
//!     "dynamodb",
//!     "2012-08-10",
//!     Protocol::Json,
//!     SigningScheme::V4,
//!     "us-west-2",
//! )
//! .with_json_version("1.0");
//!
//! let credential = Credential::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY");
//!
//! let request = UnsignedRequest::new(
//!     "ListTables",
//!     http::Method::POST,
//!     "/",
//!     Body::Json(serde_json::json!({})),
//!     json_body_decoder::<serde_json::Value>(),
//! );
//!
//! let client = Client::new(Context::new(MockHttpSend));
//! let tables = client.send(&dynamodb, &credential, request).await?;
//! # let _ = tables;
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod encode;
pub mod time;

mod error;
pub use error::{Error, Result};

mod context;
pub use context::Context;
pub use context::HttpSend;

mod credential;
pub use credential::Credential;

mod service;
pub use service::{Endpoint, EndpointResolver, Protocol, Service, SigningScheme, TimestampFormat};

mod request;
pub use request::{Body, UnsignedRequest};

mod decode;
pub use decode::{
    constant_decoder, full_decoder, json_body_decoder, json_full_decoder, string_body_decoder,
    ResponseDecoder, ResponseMetadata, StatusClass,
};

mod sign;
pub use sign::EMPTY_STRING_SHA256;

mod client;
pub use client::Client;
