//! Cross-origin response headers.
//!
//! Every response leaving the relay carries the same fixed set of
//! `Access-Control-*` headers, whatever produced it: a proxied upstream
//! answer, a local diagnostic, the health endpoint, a preflight or a 404.

use axum::{extract::State, response::Response};
use http::header::{self, HeaderMap, HeaderValue, InvalidHeaderValue};

use crate::config::CorsConfig;

/// The cross-origin header set added to responses.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    headers: HeaderMap,
}

impl CorsPolicy {
    pub fn new(config: &CorsConfig) -> Result<Self, InvalidHeaderValue> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_str(&config.allow_origin)?,
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_str(&config.allow_methods)?,
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_str(&config.allow_headers)?,
        );
        if config.allow_credentials {
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
                HeaderValue::from_static("true"),
            );
        }
        Ok(Self { headers })
    }

    /// Insert the policy headers, replacing any existing values.
    pub fn apply(&self, headers: &mut HeaderMap) {
        for (name, value) in &self.headers {
            headers.insert(name.clone(), value.clone());
        }
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

impl Default for CorsPolicy {
    fn default() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, OPTIONS"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type, Cookie, Authorization"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
        Self { headers }
    }
}

/// Response middleware applying the policy to every outgoing response.
pub async fn cors_middleware(State(policy): State<CorsPolicy>, mut response: Response) -> Response {
    policy.apply(response.headers_mut());
    response
}
