//! Request translation: inbound request → upstream request.
//!
//! # Responsibilities
//! - Compute the upstream address from the inbound path and query
//! - Synthesize a fresh, browser-like header set
//! - Re-encode the body according to its declared Content-Type
//!
//! # Design Decisions
//! - Pure and deterministic: no clocks, no randomness, no I/O
//! - Path remainder and query are passed through byte-for-byte
//! - Inbound headers are an allow-list (Content-Type, Cookie); everything
//!   else the caller sends is dropped

use bytes::Bytes;
use http::header::{self, HeaderMap, HeaderValue, InvalidHeaderValue};
use http::Method;
use url::{form_urlencoded, Url};

use crate::config::{BrowserConfig, RelayConfig};
use crate::relay::error::TranslationError;
use crate::relay::types::{InboundRequest, OutboundRequest, UpstreamTarget};

/// Content-Type sent upstream for body-bearing requests that declare none.
pub const DEFAULT_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Methods whose requests carry a payload upstream.
pub fn is_body_bearing(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}

/// Builds [`OutboundRequest`]s against one fixed upstream.
#[derive(Debug, Clone)]
pub struct RequestTranslator {
    base_address: String,
    mount: String,
    browser_headers: HeaderMap,
}

impl RequestTranslator {
    /// Create a translator for `base_address`, serving requests under `mount`.
    pub fn new(
        base_address: impl Into<String>,
        mount: impl Into<String>,
        browser: &BrowserConfig,
    ) -> Result<Self, InvalidHeaderValue> {
        let base_address = base_address.into();

        let mut browser_headers = HeaderMap::new();
        browser_headers.insert(header::USER_AGENT, HeaderValue::from_str(&browser.user_agent)?);
        browser_headers.insert(header::ACCEPT, HeaderValue::from_str(&browser.accept)?);
        browser_headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_str(&browser.accept_language)?,
        );
        if browser.send_origin {
            let origin = HeaderValue::from_str(&base_address)?;
            browser_headers.insert(header::REFERER, origin.clone());
            browser_headers.insert(header::ORIGIN, origin);
        }

        Ok(Self {
            base_address,
            mount: mount.into(),
            browser_headers,
        })
    }

    pub fn from_config(config: &RelayConfig, mount: &str) -> Result<Self, InvalidHeaderValue> {
        Self::new(config.upstream.base_url.clone(), mount, &config.browser)
    }

    pub fn base_address(&self) -> &str {
        &self.base_address
    }

    /// Resolve where `inbound` goes.
    ///
    /// An empty remainder targets the bare base address and drops the query.
    pub fn target(&self, inbound: &InboundRequest) -> Result<UpstreamTarget, TranslationError> {
        let rest = inbound
            .path
            .strip_prefix(self.mount.as_str())
            .ok_or_else(|| TranslationError::OutsideMount(inbound.path.clone()))?;

        let remainder = if rest.is_empty() {
            ""
        } else {
            rest.strip_prefix('/')
                .ok_or_else(|| TranslationError::OutsideMount(inbound.path.clone()))?
        };

        Ok(UpstreamTarget {
            base_address: self.base_address.clone(),
            resolved_path: remainder.to_string(),
            resolved_query: inbound.query.clone(),
        })
    }

    /// Build the upstream request for `inbound`.
    pub fn translate(&self, inbound: &InboundRequest) -> Result<OutboundRequest, TranslationError> {
        let url = self.target(inbound)?.to_string();
        if let Err(source) = Url::parse(&url) {
            return Err(TranslationError::InvalidTarget { url, source });
        }

        let body_bearing = is_body_bearing(&inbound.method);
        let body = if body_bearing {
            translate_body(inbound)?
        } else {
            None
        };

        Ok(OutboundRequest {
            method: inbound.method.clone(),
            url,
            headers: self.synthesize_headers(inbound, body_bearing),
            body,
        })
    }

    fn synthesize_headers(&self, inbound: &InboundRequest, body_bearing: bool) -> HeaderMap {
        let mut headers = self.browser_headers.clone();

        if body_bearing {
            let content_type = inbound
                .headers
                .get(header::CONTENT_TYPE)
                .cloned()
                .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
            headers.insert(header::CONTENT_TYPE, content_type);
        }

        // HTTP/2 callers may split cookies over several lines; upstream gets one.
        let mut cookies = inbound.headers.get_all(header::COOKIE).iter();
        if let Some(first) = cookies.next() {
            let mut joined = first.as_bytes().to_vec();
            for next in cookies {
                joined.extend_from_slice(b"; ");
                joined.extend_from_slice(next.as_bytes());
            }
            if let Ok(value) = HeaderValue::from_bytes(&joined) {
                headers.insert(header::COOKIE, value);
            }
        }

        headers
    }
}

fn translate_body(inbound: &InboundRequest) -> Result<Option<Bytes>, TranslationError> {
    let body = match &inbound.body {
        Some(body) if !body.is_empty() => body,
        _ => return Ok(None),
    };

    let content_type = inbound
        .content_type()
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if content_type.contains("application/json") {
        let value: serde_json::Value = serde_json::from_slice(body)?;
        return Ok(Some(Bytes::from(serde_json::to_vec(&value)?)));
    }

    if content_type.contains("application/x-www-form-urlencoded") {
        std::str::from_utf8(body)?;
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(form_urlencoded::parse(body))
            .finish();
        return Ok(Some(Bytes::from(encoded)));
    }

    Ok(Some(body.clone()))
}
