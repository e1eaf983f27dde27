//! AWS flavored percent encoding and query string assembly.
//!
//! AWS verifies signatures against its own canonical encoding, which is
//! stricter than generic URL-form encoding: `/`, `:`, `+` and space must all
//! be percent encoded, and hex digits are uppercase.

use std::collections::BTreeMap;

use percent_encoding::utf8_percent_encode;
use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

/// AsciiSet for [AWS UriEncode](https://docs.aws.amazon.com/AmazonS3/latest/API/sig-v4-header-based-auth.html)
///
/// - URI encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', and '~'.
pub static AWS_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent encode per the AWS UriEncode rules.
pub fn percent_encode(s: &str) -> String {
    utf8_percent_encode(s, &AWS_ENCODE_SET).to_string()
}

/// Percent encode a path segment by segment, leaving the `/` separators
/// alone. The empty path normalizes to `/`.
pub fn encode_path(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }
    path.split('/').map(percent_encode).collect::<Vec<_>>().join("/")
}

/// The canonical URI line of a canonical request.
///
/// V4 signed services encode the path a second time, a documented AWS quirk.
pub fn canonical_uri(path: &str, double: bool) -> String {
    let encoded = encode_path(path);
    if double {
        encode_path(&encoded)
    } else {
        encoded
    }
}

/// Render a query string for a request URL, `?` included, or the empty
/// string when there are no pairs.
///
/// Keys are sorted by their encoded form. Values under the same key are
/// emitted in the reverse of their insertion order; existing clients depend
/// on this, so it is kept even though no service is known to care.
pub fn query_string(pairs: &[(String, String)]) -> String {
    if pairs.is_empty() {
        return String::new();
    }

    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (k, v) in pairs {
        grouped
            .entry(percent_encode(k))
            .or_default()
            .insert(0, percent_encode(v));
    }

    let mut s = String::with_capacity(16);
    s.push('?');
    for (idx, (k, v)) in grouped
        .iter()
        .flat_map(|(k, vs)| vs.iter().map(move |v| (k, v)))
        .enumerate()
    {
        if idx != 0 {
            s.push('&');
        }
        s.push_str(k);
        s.push('=');
        s.push_str(v);
    }

    s
}

/// The canonical query string line of a canonical request: pairs sorted by
/// encoded key, then encoded value, joined `k=v` with `&`, no leading `?`.
pub fn canonical_query_string(pairs: &[(String, String)]) -> String {
    let mut encoded = pairs
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>();
    encoded.sort();

    let mut s = String::with_capacity(16);
    for (idx, (k, v)) in encoded.into_iter().enumerate() {
        if idx != 0 {
            s.push('&');
        }
        s.push_str(&k);
        s.push('=');
        s.push_str(&v);
    }

    s
}
