//! Outbound response conversion.
//!
//! # Responsibilities
//! - Convert relay [`OutboundResponse`]s into axum responses
//! - Local responses that never touch the relay: preflight, 404
//!
//! CORS headers are added afterwards by the router's response middleware.

use axum::{
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::relay::OutboundResponse;

impl IntoResponse for OutboundResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        // hyper writes this on the HTTP/1 status line.
        if let Some(reason) = self.reason {
            response.extensions_mut().insert(reason);
        }
        response
    }
}

/// Answer to a CORS preflight.
pub fn preflight() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// Anything the relay does not serve.
pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}
