//! Inbound request extraction.
//!
//! # Responsibilities
//! - Turn the parts axum parsed into a relay [`InboundRequest`]
//! - Expose the request ID assigned by the request-id layer
//!
//! # Design Decisions
//! - Path stays percent-encoded exactly as received
//! - Query keeps its leading `?` so it can be appended verbatim upstream
//! - An empty body is treated as absent

use bytes::Bytes;
use http::{HeaderMap, Method, Uri};

use crate::relay::InboundRequest;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// The request ID set by the request-id layer, or `"unknown"`.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Build the relay's view of an inbound request.
pub fn inbound_request(
    method: Method,
    uri: &Uri,
    headers: HeaderMap,
    body: Bytes,
) -> InboundRequest {
    InboundRequest {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(|q| format!("?{}", q)).unwrap_or_default(),
        headers,
        body: (!body.is_empty()).then_some(body),
    }
}
