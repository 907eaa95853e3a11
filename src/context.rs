//! Per-request data available to value extractors.
//!
//! A [`RequestContext`] is built by the host for every inbound request and is
//! only ever read by providers. Nothing is cached between evaluations.

use http::header::{HeaderMap, HeaderName, HeaderValue, COOKIE, USER_AGENT};
use percent_encoding::percent_decode_str;
use std::collections::HashMap;

/// Read-only view over the headers and cookies of one request.
///
/// # Example
///
/// ```
/// use feature_flag_bundle::RequestContext;
/// use http::header::{HeaderValue, COOKIE, USER_AGENT};
///
/// let ctx = RequestContext::new()
///     .with_header(USER_AGENT, HeaderValue::from_static("OldBrowser/1.0"))
///     .with_header(COOKIE, HeaderValue::from_static("betaUI=on; theme=dark"));
///
/// assert_eq!(ctx.user_agent(), Some("OldBrowser/1.0"));
/// assert_eq!(ctx.cookie("betaUI"), Some("on"));
/// assert_eq!(ctx.cookie("missing"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    headers: HeaderMap,
    cookies: HashMap<String, String>,
}

impl RequestContext {
    /// Creates a context with no headers and no cookies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context from request headers, parsing every `Cookie` header.
    pub fn from_headers(headers: HeaderMap) -> Self {
        let mut cookies = HashMap::new();
        for value in headers.get_all(COOKIE) {
            parse_cookie_header(value, &mut cookies);
        }
        Self { headers, cookies }
    }

    /// Appends a header. `Cookie` headers are parsed into the cookie jar.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        if name == COOKIE {
            parse_cookie_header(&value, &mut self.cookies);
        }
        self.headers.append(name, value);
        self
    }

    /// Sets a cookie directly, replacing any value parsed from headers.
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// Returns the raw request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the first `User-Agent` header.
    ///
    /// Absent when the header is missing or contains bytes outside visible ASCII.
    pub fn user_agent(&self) -> Option<&str> {
        self.headers
            .get(USER_AGENT)
            .and_then(|value| value.to_str().ok())
    }

    /// Returns the decoded value of the cookie called `name`.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Iterates over all cookies in no particular order.
    pub fn cookies(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cookies.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<HeaderMap> for RequestContext {
    fn from(headers: HeaderMap) -> Self {
        Self::from_headers(headers)
    }
}

impl<B> From<&http::Request<B>> for RequestContext {
    fn from(request: &http::Request<B>) -> Self {
        Self::from_headers(request.headers().clone())
    }
}

/// Splits a `Cookie` header into name/value pairs.
///
/// The first occurrence of a name wins. Pairs without `=` are skipped and
/// values are percent-decoded with `+` read as a space.
fn parse_cookie_header(value: &HeaderValue, cookies: &mut HashMap<String, String>) {
    let Ok(header) = value.to_str() else {
        return;
    };

    for pair in header.split(';') {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }

        if let Some((name, value)) = pair.split_once('=') {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            cookies
                .entry(name.to_string())
                .or_insert_with(|| decode_cookie_value(value.trim()));
        }
    }
}

fn decode_cookie_value(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    percent_decode_str(&raw).decode_utf8_lossy().into_owned()
}
