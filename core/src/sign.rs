//! AWS Signature Version 4 engine.
//!
//! - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
//!
//! Signing happens in one pass over a value snapshot of the request: augment
//! headers, build the canonical request, hash it into the string to sign,
//! derive the signing key, and synthesize the Authorization header. Every
//! buffer is scoped to the invocation.

use bytes::Bytes;
use hmac::Hmac;
use hmac::Mac;
use http::Method;
use log::debug;
use sha2::Digest;
use sha2::Sha256;

use crate::encode;
use crate::request::UnsignedRequest;
use crate::service::Protocol;
use crate::service::Service;
use crate::service::SigningScheme;
use crate::time::format_date;
use crate::time::format_iso8601;
use crate::time::DateTime;
use crate::Credential;
use crate::Error;
use crate::Result;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Hex encoded SHA256 of the empty string, the payload hash of bodyless
/// requests.
pub const EMPTY_STRING_SHA256: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

// Transports (browsers included) rewrite these at will; a signature over
// them would fail verification server side.
const UNSIGNABLE_HEADERS: &[&str] = &["content-type", "accept"];

/// Attach the protocol-dialect headers every send gets, signed or not.
///
/// JSON protocol services address operations through `x-amz-target`; the
/// other dialects add nothing at this stage.
pub(crate) fn attach_dialect_headers<T>(service: &Service, req: &mut UnsignedRequest<T>) {
    if service.protocol() == Protocol::Json {
        req.headers.insert(
            0,
            (
                "x-amz-target".to_string(),
                format!("{}.{}", service.target_prefix(), req.name),
            ),
        );
    }
}

/// Produce the fully decorated, signed HTTP request.
pub(crate) fn sign<T>(
    service: &Service,
    credential: &Credential,
    time: DateTime,
    req: &UnsignedRequest<T>,
) -> Result<http::Request<Bytes>> {
    let payload = req.body.to_bytes();
    let payload_hash = sha256_hex(&payload);
    let host = service.host();
    let region = service.region();

    let mut headers = augmented_headers(service, req, time, &payload_hash);

    let signed_set = signed_header_set(&host, &headers);
    let creq = canonical_request(
        &req.method,
        &req.path,
        &req.query,
        &signed_set,
        &payload_hash,
        service.signer(),
    );
    debug!("calculated canonical request:\n{creq}");

    let scope = credential_scope(time, &region, service.signing_name());
    debug!("calculated scope: {scope}");

    let string_to_sign = string_to_sign(time, &scope, &creq);
    let key = signing_key(&credential.secret_access_key, time, &region, service.signing_name());
    let signature = hex::encode(hmac_sha256(&key, string_to_sign.as_bytes()));

    headers.push((
        "Authorization".to_string(),
        format!(
            "{ALGORITHM} Credential={}/{}, SignedHeaders={}, Signature={}",
            credential.access_key_id,
            scope,
            signed_header_names(&signed_set).join(";"),
            signature
        ),
    ));

    // The token travels with the request but is never part of the signed
    // set.
    if let Some(token) = &credential.session_token {
        headers.push(("x-amz-security-token".to_string(), token.clone()));
    }

    build_http_request(&host, req, headers, payload)
}

/// Prepare a request for the unsigned variant: the same header
/// augmentation, no authentication.
pub(crate) fn prepare_unsigned<T>(
    service: &Service,
    time: DateTime,
    req: &UnsignedRequest<T>,
) -> Result<http::Request<Bytes>> {
    let payload = req.body.to_bytes();
    let payload_hash = sha256_hex(&payload);
    let headers = augmented_headers(service, req, time, &payload_hash);

    build_http_request(&service.host(), req, headers, payload)
}

/// The headers every send gains, appended after the caller's own: the
/// timestamp, the payload hash, and content negotiation where the caller
/// left it open.
fn augmented_headers<T>(
    service: &Service,
    req: &UnsignedRequest<T>,
    time: DateTime,
    payload_hash: &str,
) -> Vec<(String, String)> {
    let mut headers = req.headers.clone();

    headers.push(("x-amz-date".to_string(), format_iso8601(time)));
    headers.push(("x-amz-content-sha256".to_string(), payload_hash.to_string()));

    if !has_header(&headers, "accept") {
        headers.push(("Accept".to_string(), service.accept_type().to_string()));
    }
    if !has_header(&headers, "content-type") {
        // A text body declares its own MIME; everything else negotiates per
        // service.
        let content_type = match req.body.mime() {
            Some(mime) => mime.to_string(),
            None => service.content_type(),
        };
        headers.push(("Content-Type".to_string(), content_type));
    }

    headers
}

fn has_header(headers: &[(String, String)], name: &str) -> bool {
    headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
}

/// The canonicalized signed header set: a synthetic `host` plus everything
/// in `headers` except the unsignable names, lowercased, normalized,
/// sorted.
fn signed_header_set(host: &str, headers: &[(String, String)]) -> Vec<(String, String)> {
    let mut set = headers
        .iter()
        .filter(|(name, _)| {
            !UNSIGNABLE_HEADERS
                .iter()
                .any(|excluded| name.eq_ignore_ascii_case(excluded))
        })
        .map(|(name, value)| (name.to_ascii_lowercase(), normalize_header_value(value)))
        .collect::<Vec<_>>();
    set.push(("host".to_string(), host.to_string()));
    set.sort();

    set
}

/// Trim ASCII whitespace and collapse internal whitespace runs to a single
/// space, per step 4 of the canonical request rules.
fn normalize_header_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_run = false;
    for c in value.trim_matches(|c: char| c.is_ascii_whitespace()).chars() {
        if c.is_ascii_whitespace() {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            in_run = false;
            out.push(c);
        }
    }

    out
}

fn signed_header_names(signed_set: &[(String, String)]) -> Vec<&str> {
    signed_set.iter().map(|(name, _)| name.as_str()).collect()
}

fn canonical_request(
    method: &Method,
    path: &str,
    query: &[(String, String)],
    signed_set: &[(String, String)],
    payload_hash: &str,
    scheme: SigningScheme,
) -> String {
    // 256 is specially chosen to avoid reallocation for most requests.
    let mut f = String::with_capacity(256);

    f.push_str(method.as_str());
    f.push('\n');
    // V4 encodes the path twice; S3 once.
    f.push_str(&encode::canonical_uri(path, scheme == SigningScheme::V4));
    f.push('\n');
    f.push_str(&encode::canonical_query_string(query));
    f.push('\n');
    for (name, value) in signed_set {
        f.push_str(name);
        f.push(':');
        f.push_str(value);
        f.push('\n');
    }
    f.push('\n');
    f.push_str(&signed_header_names(signed_set).join(";"));
    f.push('\n');
    f.push_str(payload_hash);

    f
}

/// Scope binding a derived key to one day, region and service:
/// `20150830/us-east-1/sts/aws4_request`.
fn credential_scope(time: DateTime, region: &str, signing_name: &str) -> String {
    format!("{}/{}/{}/aws4_request", format_date(time), region, signing_name)
}

fn string_to_sign(time: DateTime, scope: &str, canonical_request: &str) -> String {
    let mut f = String::with_capacity(128);
    f.push_str(ALGORITHM);
    f.push('\n');
    f.push_str(&format_iso8601(time));
    f.push('\n');
    f.push_str(scope);
    f.push('\n');
    f.push_str(&sha256_hex(canonical_request.as_bytes()));

    f
}

/// The four step HMAC chain deriving the signing key.
fn signing_key(secret_access_key: &str, time: DateTime, region: &str, signing_name: &str) -> Vec<u8> {
    let secret = format!("AWS4{secret_access_key}");
    let k_date = hmac_sha256(secret.as_bytes(), format_date(time).as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, signing_name.as_bytes());

    hmac_sha256(&k_service, b"aws4_request")
}

/// Lowercase hex of SHA-256, the encoding every hash in SigV4 carries.
fn sha256_hex(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

fn hmac_sha256(key: &[u8], content: &[u8]) -> Vec<u8> {
    // An HMAC key may be any length, so construction cannot fail.
    let mut mac = Hmac::<Sha256>::new_from_slice(key).expect("hmac accepts any key length");
    mac.update(content);

    mac.finalize().into_bytes().to_vec()
}

/// Assemble the outgoing request: `https`, resolved host, rendered path and
/// query, headers in insertion order.
fn build_http_request<T>(
    host: &str,
    req: &UnsignedRequest<T>,
    headers: Vec<(String, String)>,
    payload: Bytes,
) -> Result<http::Request<Bytes>> {
    let url = format!(
        "https://{}{}{}",
        host,
        encode::encode_path(&req.path),
        encode::query_string(&req.query)
    );

    let mut builder = http::Request::builder().method(req.method.clone()).uri(&url);
    for (name, value) in headers {
        builder = builder.header(name, value);
    }

    builder.body(payload).map_err(|e| Error::BadUrl(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::constant_decoder;
    use crate::request::Body;
    use crate::service::EndpointResolver;
    use crate::time::parse_rfc3339;

    // The `get-vanilla` example of the published AWS SigV4 test suite.
    const SUITE_ACCESS_KEY_ID: &str = "AKIDEXAMPLE";
    const SUITE_SECRET_ACCESS_KEY: &str = "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY";
    const SUITE_HOST: &str = "example.amazonaws.com";

    fn suite_time() -> DateTime {
        parse_rfc3339("2015-08-30T12:36:00Z").expect("must parse")
    }

    fn suite_service() -> Service {
        Service::global("service", "2015-08-30", Protocol::Query, SigningScheme::V4)
            .with_endpoint_resolver(EndpointResolver::Custom {
                host: |_, _| SUITE_HOST.to_string(),
                region: |_| "us-east-1".to_string(),
            })
    }

    #[test]
    fn test_get_vanilla_canonical_request() {
        let headers = vec![("x-amz-date".to_string(), format_iso8601(suite_time()))];
        let signed_set = signed_header_set(SUITE_HOST, &headers);
        let creq = canonical_request(
            &Method::GET,
            "/",
            &[],
            &signed_set,
            EMPTY_STRING_SHA256,
            SigningScheme::V4,
        );

        assert_eq!(
            creq,
            "GET\n\
             /\n\
             \n\
             host:example.amazonaws.com\n\
             x-amz-date:20150830T123600Z\n\
             \n\
             host;x-amz-date\n\
             e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_get_vanilla_signature() {
        let time = suite_time();
        let headers = vec![("x-amz-date".to_string(), format_iso8601(time))];
        let signed_set = signed_header_set(SUITE_HOST, &headers);
        let creq = canonical_request(
            &Method::GET,
            "/",
            &[],
            &signed_set,
            EMPTY_STRING_SHA256,
            SigningScheme::V4,
        );

        let scope = credential_scope(time, "us-east-1", "service");
        assert_eq!(scope, "20150830/us-east-1/service/aws4_request");

        let string_to_sign = string_to_sign(time, &scope, &creq);
        assert_eq!(
            string_to_sign,
            format!(
                "AWS4-HMAC-SHA256\n20150830T123600Z\n{scope}\n{}",
                sha256_hex(creq.as_bytes())
            )
        );

        let key = signing_key(SUITE_SECRET_ACCESS_KEY, time, "us-east-1", "service");
        let signature = hex::encode(hmac_sha256(&key, string_to_sign.as_bytes()));
        assert_eq!(
            signature,
            "5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31"
        );
    }

    #[test]
    fn test_sign_produces_the_suite_scope() {
        let req = UnsignedRequest::new("Vanilla", Method::GET, "/", Body::Empty, constant_decoder(()));
        let credential = Credential::new(SUITE_ACCESS_KEY_ID, SUITE_SECRET_ACCESS_KEY);

        let signed = sign(&suite_service(), &credential, suite_time(), &req).expect("must sign");

        let authorization = signed.headers()["authorization"].to_str().expect("must be ascii");
        assert!(authorization.starts_with(
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request, "
        ));
        assert!(authorization
            .contains("SignedHeaders=host;x-amz-content-sha256;x-amz-date, Signature="));
        assert_eq!(signed.uri().to_string(), "https://example.amazonaws.com/");
        assert_eq!(signed.headers()["x-amz-date"], "20150830T123600Z");
        assert_eq!(signed.headers()["x-amz-content-sha256"], EMPTY_STRING_SHA256);
    }

    #[test]
    fn test_signed_set_excludes_rewritable_headers() {
        let headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
            ("X-Amz-Meta-Tag".to_string(), "  a   b  ".to_string()),
        ];
        let signed_set = signed_header_set("sts.amazonaws.com", &headers);

        assert_eq!(
            signed_set,
            vec![
                ("host".to_string(), "sts.amazonaws.com".to_string()),
                ("x-amz-meta-tag".to_string(), "a b".to_string()),
            ]
        );
    }

    #[test]
    fn test_normalize_header_value() {
        let cases = vec![
            ("plain", "plain"),
            ("  padded  ", "padded"),
            ("a   b", "a b"),
            ("a \t b", "a b"),
            ("", ""),
        ];

        for (input, expected) in cases {
            assert_eq!(
                normalize_header_value(input),
                expected,
                "failed on input: {input:?}"
            );
        }
    }

    #[test]
    fn test_canonical_request_double_encodes_v4_paths() {
        let creq = canonical_request(
            &Method::GET,
            "/a b/c",
            &[],
            &[],
            EMPTY_STRING_SHA256,
            SigningScheme::V4,
        );
        assert!(creq.starts_with("GET\n/a%2520b/c\n"));

        let creq = canonical_request(
            &Method::GET,
            "/a b/c",
            &[],
            &[],
            EMPTY_STRING_SHA256,
            SigningScheme::S3,
        );
        assert!(creq.starts_with("GET\n/a%20b/c\n"));
    }

    #[test]
    fn test_attach_dialect_headers_prepends_target() {
        let service = Service::regional("acm", "2015-12-08", Protocol::Json, SigningScheme::V4, "us-east-1");
        let mut req =
            UnsignedRequest::new("ListCertificates", Method::POST, "/", Body::Empty, constant_decoder(()));
        req.add_headers([("x-first", "1")]);

        attach_dialect_headers(&service, &mut req);

        assert_eq!(
            req.headers()[0],
            (
                "x-amz-target".to_string(),
                "AWSACM_20151208.ListCertificates".to_string()
            )
        );
    }

    #[test]
    fn test_attach_dialect_headers_other_protocols_add_nothing() {
        let service = Service::global("sts", "2011-06-15", Protocol::Query, SigningScheme::V4);
        let mut req =
            UnsignedRequest::new("GetCallerIdentity", Method::POST, "/", Body::Empty, constant_decoder(()));

        attach_dialect_headers(&service, &mut req);

        assert!(req.headers().is_empty());
    }

    #[test]
    fn test_prepare_unsigned_has_no_authorization() {
        let service = Service::global("sts", "2011-06-15", Protocol::Query, SigningScheme::V4);
        let req = UnsignedRequest::new("GetCallerIdentity", Method::POST, "/", Body::Empty, constant_decoder(()));

        let prepared = prepare_unsigned(&service, suite_time(), &req).expect("must prepare");

        assert!(prepared.headers().get("authorization").is_none());
        assert_eq!(prepared.headers()["x-amz-date"], "20150830T123600Z");
        assert_eq!(prepared.headers()["x-amz-content-sha256"], EMPTY_STRING_SHA256);
        assert_eq!(prepared.headers()["accept"], "application/json");
        assert_eq!(
            prepared.headers()["content-type"],
            "application/json; charset=utf-8"
        );
    }

    #[test]
    fn test_text_body_declares_its_own_mime() {
        let service = Service::global("sts", "2011-06-15", Protocol::Query, SigningScheme::V4);
        let req = UnsignedRequest::new(
            "Upload",
            Method::PUT,
            "/doc",
            Body::text("text/csv", "a,b\n1,2\n"),
            constant_decoder(()),
        );

        let prepared = prepare_unsigned(&service, suite_time(), &req).expect("must prepare");

        assert_eq!(prepared.headers()["content-type"], "text/csv");
        assert_eq!(
            prepared.headers()["x-amz-content-sha256"].to_str().expect("ascii"),
            sha256_hex(b"a,b\n1,2\n")
        );
    }

    #[test]
    fn test_sha256_hex_of_empty_input() {
        assert_eq!(sha256_hex(b""), EMPTY_STRING_SHA256);
    }

    #[test]
    fn test_hmac_sha256_known_vector() {
        // RFC 4231 test case 2.
        assert_eq!(
            hex::encode(hmac_sha256(b"Jefe", b"what do ya want for nothing?")),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_caller_headers_win_content_negotiation() {
        let service = Service::global("sts", "2011-06-15", Protocol::Query, SigningScheme::V4);
        let mut req =
            UnsignedRequest::new("GetCallerIdentity", Method::POST, "/", Body::Empty, constant_decoder(()));
        req.add_headers([("Accept", "text/html"), ("Content-Type", "text/plain")]);

        let prepared = prepare_unsigned(&service, suite_time(), &req).expect("must prepare");

        let accepts = prepared
            .headers()
            .get_all("accept")
            .iter()
            .collect::<Vec<_>>();
        assert_eq!(accepts, vec!["text/html"]);
        let content_types = prepared
            .headers()
            .get_all("content-type")
            .iter()
            .collect::<Vec<_>>();
        assert_eq!(content_types, vec!["text/plain"]);
    }

    #[test]
    fn test_session_token_is_sent_but_not_signed() {
        let credential =
            Credential::new(SUITE_ACCESS_KEY_ID, SUITE_SECRET_ACCESS_KEY).with_session_token("T0K3N");
        let req = UnsignedRequest::new("Vanilla", Method::GET, "/", Body::Empty, constant_decoder(()));

        let signed = sign(&suite_service(), &credential, suite_time(), &req).expect("must sign");

        assert_eq!(signed.headers()["x-amz-security-token"], "T0K3N");
        let authorization = signed.headers()["authorization"].to_str().expect("must be ascii");
        assert!(!authorization.contains("x-amz-security-token"));
    }

    #[test]
    fn test_rendered_query_keeps_the_fold_order() {
        let service = Service::global("sts", "2011-06-15", Protocol::Query, SigningScheme::V4);
        let mut req =
            UnsignedRequest::new("GetCallerIdentity", Method::GET, "/", Body::Empty, constant_decoder(()));
        req.add_query([("a", "1"), ("b", "2"), ("a", "3")]);

        let prepared = prepare_unsigned(&service, suite_time(), &req).expect("must prepare");

        assert_eq!(prepared.uri().query(), Some("a=3&a=1&b=2"));
    }
}
