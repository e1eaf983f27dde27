use std::fmt::Debug;
use std::fmt::Formatter;

use bytes::Bytes;
use http::Method;
use serde_json::Value;

use crate::decode::ResponseDecoder;

/// Request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// No payload. Hashes as the empty string.
    Empty,
    /// UTF-8 text carrying its own MIME type.
    Text {
        /// MIME type sent as `Content-Type`.
        mime: String,
        /// The payload text.
        content: String,
    },
    /// A JSON document, serialized compactly on the wire.
    Json(Value),
}

impl Body {
    /// A text body with an explicit MIME type.
    pub fn text(mime: &str, content: &str) -> Self {
        Body::Text {
            mime: mime.to_string(),
            content: content.to_string(),
        }
    }

    /// The payload bytes as they go on the wire.
    pub fn to_bytes(&self) -> Bytes {
        match self {
            Body::Empty => Bytes::new(),
            Body::Text { content, .. } => Bytes::copy_from_slice(content.as_bytes()),
            // Compact serialization of a Value cannot fail.
            Body::Json(value) => {
                Bytes::from(serde_json::to_vec(value).expect("json value must serialize"))
            }
        }
    }

    /// The MIME type declared by the payload itself, if any.
    pub fn mime(&self) -> Option<&str> {
        match self {
            Body::Text { mime, .. } => Some(mime),
            _ => None,
        }
    }
}

/// An assembled, not yet signed request.
///
/// Carries no credentials and no notion of time; both are supplied when the
/// request is handed to a send function, which consumes it. Path and query
/// values are logical, the library owns all percent encoding.
pub struct UnsignedRequest<T> {
    pub(crate) name: String,
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) body: Body,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) decoder: ResponseDecoder<T>,
}

impl<T> UnsignedRequest<T> {
    /// Create an unsigned request with empty headers and query.
    ///
    /// `name` is the operation name; `method` is one of the six verbs the
    /// service model uses (DELETE, GET, HEAD, OPTIONS, POST, PUT); `path`
    /// begins with `/`.
    pub fn new(
        name: &str,
        method: Method,
        path: &str,
        body: Body,
        decoder: ResponseDecoder<T>,
    ) -> Self {
        Self {
            name: name.to_string(),
            method,
            path: path.to_string(),
            body,
            headers: Vec::new(),
            query: Vec::new(),
            decoder,
        }
    }

    /// Append headers, preserving order. Duplicate names are allowed.
    pub fn add_headers<K, V>(&mut self, headers: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    /// Append query parameters, preserving order. Duplicate keys are
    /// allowed.
    pub fn add_query<K, V>(&mut self, query: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(query.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    /// The operation name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The logical (un-encoded) path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The payload.
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Headers added so far, in insertion order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Query parameters added so far, in insertion order.
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }
}

impl<T> Debug for UnsignedRequest<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnsignedRequest")
            .field("name", &self.name)
            .field("method", &self.method)
            .field("path", &self.path)
            .field("body", &self.body)
            .field("headers", &self.headers)
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}
