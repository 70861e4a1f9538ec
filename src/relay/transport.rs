//! `reqwest`-backed transport for the upstream call.

use std::error::Error as StdError;
use std::future::Future;
use std::time::Duration;

use hyper::ext::ReasonPhrase;
use reqwest::redirect::Policy;

use crate::config::UpstreamConfig;
use crate::relay::error::TransportError;
use crate::relay::invoker::Transport;
use crate::relay::types::{OutboundRequest, UpstreamResponse};

/// HTTP client with redirect-following disabled and no body decoding.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(connect_timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .connect_timeout(connect_timeout)
            .build()?;
        Ok(Self { client })
    }

    pub fn from_config(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        Self::new(config.connect_timeout())
    }
}

impl Transport for ReqwestTransport {
    fn send(
        &self,
        request: OutboundRequest,
    ) -> impl Future<Output = Result<UpstreamResponse, TransportError>> + Send {
        let mut builder = self
            .client
            .request(request.method, request.url.as_str())
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        async move {
            let response = builder.send().await.map_err(classify)?;
            let status = response.status();
            let headers = response.headers().clone();
            let reason = response.extensions().get::<ReasonPhrase>().cloned();
            let body = response.bytes().await.map_err(classify)?;
            Ok(UpstreamResponse::new(status, headers, body).with_reason(reason))
        }
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    let code = if err.is_timeout() {
        Some("timeout")
    } else if err.is_connect() {
        Some("connect")
    } else if err.is_body() {
        Some("body")
    } else if err.is_decode() {
        Some("decode")
    } else if err.is_redirect() {
        Some("redirect")
    } else if err.is_builder() {
        Some("builder")
    } else if err.is_request() {
        Some("request")
    } else {
        None
    };
    TransportError::new(error_chain(&err), code)
}

/// Render an error with all of its sources, outermost first.
fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
