//! Response translation: upstream answer (or its absence) → caller response.
//!
//! # Responsibilities
//! - Copy status and reason phrase, Content-Type, every Set-Cookie and
//!   redirect Location
//! - Forward the body bytes untouched
//! - Add the cross-origin headers
//! - Turn failures into JSON diagnostics so the caller always gets a response

use bytes::Bytes;
use chrono::{SecondsFormat, Utc};
use http::header::{self, HeaderMap, HeaderValue};
use http::StatusCode;
use serde::Serialize;

use crate::relay::error::TranslationError;
use crate::relay::types::{FailureKind, FailureResult, OutboundResponse, UpstreamResponse};
use crate::security::CorsPolicy;

const NETWORK_FAILURE_DETAILS: &str =
    "Unable to connect to upstream. It may be down or blocking requests.";

/// Current time as an RFC 3339 UTC timestamp with milliseconds.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// JSON body of every locally generated error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<&'a str>,
    pub timestamp: String,
}

impl<'a> ErrorBody<'a> {
    pub fn new(error: &'a str, message: &'a str) -> Self {
        Self {
            error,
            message,
            code: None,
            details: None,
            timestamp: timestamp(),
        }
    }
}

/// Maps upstream outcomes to [`OutboundResponse`]s.
#[derive(Debug, Clone, Default)]
pub struct ResponseTranslator {
    cors: CorsPolicy,
}

impl ResponseTranslator {
    pub fn new(cors: CorsPolicy) -> Self {
        Self { cors }
    }

    pub fn cors(&self) -> &CorsPolicy {
        &self.cors
    }

    /// Map a successful upstream exchange.
    pub fn translate(&self, upstream: UpstreamResponse) -> OutboundResponse {
        let mut headers = HeaderMap::new();

        if let Some(content_type) = upstream.headers.get(header::CONTENT_TYPE) {
            headers.insert(header::CONTENT_TYPE, content_type.clone());
        }

        // One line per cookie; merging them breaks multi-cookie logins.
        for cookie in upstream.headers.get_all(header::SET_COOKIE) {
            headers.append(header::SET_COOKIE, cookie.clone());
        }

        if upstream.status.is_redirection() {
            if let Some(location) = upstream.headers.get(header::LOCATION) {
                tracing::debug!(
                    status = upstream.status.as_u16(),
                    location = ?upstream.redirect_location,
                    "Passing redirect through"
                );
                headers.insert(header::LOCATION, location.clone());
            }
        }

        self.cors.apply(&mut headers);

        OutboundResponse {
            status: upstream.status,
            reason: upstream.reason,
            headers,
            body: upstream.body,
        }
    }

    /// Diagnostic response for an upstream call that did not complete.
    pub fn failure(&self, failure: &FailureResult) -> OutboundResponse {
        let mut body = ErrorBody::new("", &failure.message);
        let status = match failure.kind {
            FailureKind::Timeout => {
                body.error = "Timeout";
                StatusCode::GATEWAY_TIMEOUT
            }
            FailureKind::NetworkFailure => {
                body.error = "Proxy failed";
                body.code = failure.code;
                body.details = Some(NETWORK_FAILURE_DETAILS);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            FailureKind::Cancelled => {
                body.error = "Cancelled";
                StatusCode::SERVICE_UNAVAILABLE
            }
        };
        self.diagnostic(status, &body)
    }

    /// Local response for a request that could not be translated.
    pub fn rejection(&self, err: &TranslationError) -> OutboundResponse {
        let message = err.to_string();
        let status = err.status();
        let error = if status == StatusCode::NOT_FOUND {
            "Not found"
        } else {
            "Bad request"
        };
        self.diagnostic(status, &ErrorBody::new(error, &message))
    }

    /// A JSON diagnostic response carrying the CORS headers.
    pub fn diagnostic(&self, status: StatusCode, body: &ErrorBody<'_>) -> OutboundResponse {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        self.cors.apply(&mut headers);

        OutboundResponse {
            status,
            reason: None,
            headers,
            body: serde_json::to_vec(body).map(Bytes::from).unwrap_or_default(),
        }
    }
}
