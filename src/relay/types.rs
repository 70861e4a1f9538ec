//! Per-request value objects flowing through the relay.
//!
//! None of these outlive a single request/response cycle.

use bytes::Bytes;
use http::{header, HeaderMap, Method, StatusCode};
use hyper::ext::ReasonPhrase;
use std::fmt;

/// A request as handed over by the inbound adapter.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    /// Full request path, still percent-encoded, including the mount prefix.
    pub path: String,
    /// Query string including its leading `?`, or empty.
    pub query: String,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl InboundRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: String::new(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_header(mut self, name: header::HeaderName, value: &'static str) -> Self {
        self.headers.append(name, header::HeaderValue::from_static(value));
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// The inbound `Content-Type`, if present and readable.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }
}

/// Where an inbound request is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTarget {
    pub base_address: String,
    /// Remainder after the mount prefix, without its leading `/`.
    pub resolved_path: String,
    /// Query string with its leading `?`, or empty.
    pub resolved_query: String,
}

impl fmt::Display for UpstreamTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.resolved_path.is_empty() {
            return f.write_str(&self.base_address);
        }
        write!(
            f,
            "{}/{}{}",
            self.base_address, self.resolved_path, self.resolved_query
        )
    }
}

/// A fully synthesized upstream request.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

/// What the upstream answered.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
    /// `Location` of a redirect-range response.
    pub redirect_location: Option<String>,
    /// Reason phrase from the status line, when the transport kept it.
    pub reason: Option<ReasonPhrase>,
}

impl UpstreamResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        let redirect_location = if status.is_redirection() {
            headers
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        } else {
            None
        };

        Self {
            status,
            headers,
            body,
            redirect_location,
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: Option<ReasonPhrase>) -> Self {
        self.reason = reason;
        self
    }
}

/// What the relay answers to its caller.
#[derive(Debug, Clone)]
pub struct OutboundResponse {
    pub status: StatusCode,
    /// Sent on the status line instead of the canonical phrase.
    pub reason: Option<ReasonPhrase>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Why the upstream call did not produce a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Timeout,
    NetworkFailure,
    /// The relay shut down while the call was outstanding.
    Cancelled,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Timeout => "timeout",
            FailureKind::NetworkFailure => "network_failure",
            FailureKind::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Produced instead of an [`UpstreamResponse`] when the invoker cannot complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureResult {
    pub kind: FailureKind,
    pub message: String,
    /// Short transport classification (e.g. `connect`), when known.
    pub code: Option<&'static str>,
}

impl FailureResult {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: Option<&'static str>) -> Self {
        self.code = code;
        self
    }
}

impl fmt::Display for FailureResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}
