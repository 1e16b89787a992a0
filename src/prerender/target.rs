//! Prerender service URL construction.
//!
//! The service is addressed as `<base><protocol>://<host><path>?<query>`,
//! where the protocol is resolved from the inbound request through an ordered
//! chain of overrides. Later sources win.

use std::sync::LazyLock;

use axum::http::{HeaderMap, Uri, header};
use regex::Regex;
use url::Url;

use super::{CF_VISITOR, X_FORWARDED_PROTO};

/// Protocol used when nothing on the request says otherwise.
pub const DEFAULT_PROTOCOL: &str = "http";

type ProtocolSource = fn(&HeaderMap, &Uri) -> Option<String>;

/// Protocol sources in ascending precedence.
const PROTOCOL_SOURCES: &[ProtocolSource] = &[from_uri_scheme, from_cf_visitor, from_forwarded_proto];

/// Ensures the base URL ends with a path separator so the target can be appended.
pub fn normalize_base(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

/// Resolves the protocol the original client used to reach us.
pub fn resolve_protocol(headers: &HeaderMap, uri: &Uri) -> String {
    PROTOCOL_SOURCES
        .iter()
        .fold(DEFAULT_PROTOCOL.to_string(), |protocol, source| {
            source(headers, uri).unwrap_or(protocol)
        })
}

/// Builds the full prerender service URL for an inbound request.
pub fn build_api_url(base: &Url, headers: &HeaderMap, uri: &Uri) -> String {
    let protocol = resolve_protocol(headers, uri);
    let host = uri
        .authority()
        .map(|a| a.as_str())
        .or_else(|| headers.get(header::HOST).and_then(|v| v.to_str().ok()))
        .unwrap_or_default();

    format!(
        "{}{}://{}{}?{}",
        base,
        protocol,
        host,
        uri.path(),
        uri.query().unwrap_or_default()
    )
}

fn from_uri_scheme(_headers: &HeaderMap, uri: &Uri) -> Option<String> {
    uri.scheme_str().map(str::to_string)
}

static CF_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""scheme":"(http|https)""#).expect("valid CF-Visitor pattern"));

/// Cloudflare sends `CF-Visitor: {"scheme":"https"}`. Matched as a pattern,
/// not parsed as JSON; the first occurrence wins.
fn from_cf_visitor(headers: &HeaderMap, _uri: &Uri) -> Option<String> {
    let raw = headers.get(&CF_VISITOR)?.to_str().ok()?;
    let captures = CF_SCHEME.captures(raw)?;
    captures.get(1).map(|m| m.as_str().to_string())
}

fn from_forwarded_proto(headers: &HeaderMap, _uri: &Uri) -> Option<String> {
    let raw = headers.get(&X_FORWARDED_PROTO)?.to_str().ok()?;
    let first = raw.split(',').next()?.trim();
    (!first.is_empty()).then(|| first.to_string())
}
