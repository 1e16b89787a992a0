//! Request classification.
//!
//! Decides whether a request comes from a crawler that should receive a
//! prerendered page. Pure: reads the method, headers and URI only.

use axum::http::{HeaderMap, Method, Request, Uri, header};
use url::form_urlencoded;

use super::agents::{matching_crawler, matching_extension};
use super::{X_BUFFERBOT, X_PRERENDER};

/// Query key of the legacy AJAX crawling scheme (`#!` URLs).
pub const ESCAPED_FRAGMENT: &str = "_escaped_fragment_";

/// Returns `true` when the request must be answered with a prerendered page.
pub fn should_prerender<B>(req: &Request<B>) -> bool {
    classify(req.method(), req.headers(), req.uri())
}

/// Classification over the individual request parts.
///
/// Checks run in a fixed order and short-circuit. A matching static asset
/// extension always wins over a positive crawler signal.
pub fn classify(method: &Method, headers: &HeaderMap, uri: &Uri) -> bool {
    let user_agent = headers
        .get(header::USER_AGENT)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).to_lowercase())
        .unwrap_or_default();
    if user_agent.is_empty() {
        return false;
    }

    if method != Method::GET && method != Method::HEAD {
        return false;
    }

    if has_value(headers, &X_PRERENDER) {
        return false;
    }

    let is_requesting_prerendered_page = has_escaped_fragment(uri)
        || matching_crawler(&user_agent).is_some()
        || has_value(headers, &X_BUFFERBOT);

    if matching_extension(&uri.to_string().to_lowercase()).is_some() {
        return false;
    }

    is_requesting_prerendered_page
}

fn has_value(headers: &HeaderMap, name: &header::HeaderName) -> bool {
    headers.get(name).is_some_and(|v| !v.is_empty())
}

fn has_escaped_fragment(uri: &Uri) -> bool {
    uri.query().is_some_and(|query| {
        form_urlencoded::parse(query.as_bytes()).any(|(key, _)| key == ESCAPED_FRAGMENT)
    })
}
