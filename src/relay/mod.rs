//! Relay core: forwarding one request to the fixed upstream.
//!
//! # Data Flow
//! ```text
//! InboundRequest (from an inbound adapter)
//!     → translator.rs (target address, header allow-list, body encoding)
//!     → invoker.rs (single bounded call through a Transport)
//!     → response.rs (status, selected headers, body, CORS)
//!     → OutboundResponse (to the adapter)
//! ```
//!
//! # Design Decisions
//! - No state is shared between requests besides the immutable translator
//!   configuration and the tracing sink
//! - The upstream call is the only await point
//! - Every failure ends as an OutboundResponse; nothing escapes `handle`
//! - The core has no axum types; adapters convert at the edges

pub mod error;
pub mod invoker;
pub mod response;
pub mod transport;
pub mod translator;
pub mod types;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::config::RelayConfig;
use crate::security::CorsPolicy;

pub use error::{TransportError, TranslationError};
pub use invoker::{Transport, UpstreamInvoker};
pub use response::ResponseTranslator;
pub use transport::ReqwestTransport;
pub use translator::RequestTranslator;
pub use types::{
    FailureKind, FailureResult, InboundRequest, OutboundRequest, OutboundResponse,
    UpstreamResponse, UpstreamTarget,
};

/// Error building a relay from configuration.
#[derive(Debug, Error)]
pub enum RelayBuildError {
    #[error("invalid header value in configuration: {0}")]
    InvalidHeader(#[from] http::header::InvalidHeaderValue),

    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),
}

/// The three relay stages composed per request.
#[derive(Debug, Clone)]
pub struct Relay<T> {
    translator: RequestTranslator,
    invoker: UpstreamInvoker<T>,
    responder: ResponseTranslator,
}

impl Relay<ReqwestTransport> {
    /// Build a relay serving requests under `mount` from validated configuration.
    pub fn from_config(config: &RelayConfig, mount: &str) -> Result<Self, RelayBuildError> {
        let translator = RequestTranslator::from_config(config, mount)?;
        let transport = ReqwestTransport::from_config(&config.upstream)?;
        let invoker = UpstreamInvoker::new(transport, config.upstream.timeout());
        let responder = ResponseTranslator::new(CorsPolicy::new(&config.cors)?);
        Ok(Self::new(translator, invoker, responder))
    }
}

impl<T: Transport> Relay<T> {
    pub fn new(
        translator: RequestTranslator,
        invoker: UpstreamInvoker<T>,
        responder: ResponseTranslator,
    ) -> Self {
        Self {
            translator,
            invoker,
            responder,
        }
    }

    pub fn translator(&self) -> &RequestTranslator {
        &self.translator
    }

    pub fn responder(&self) -> &ResponseTranslator {
        &self.responder
    }

    /// Forward `inbound` upstream and produce the caller's response.
    ///
    /// `cancel` aborts the outstanding upstream call when fired.
    pub async fn handle(
        &self,
        inbound: InboundRequest,
        cancel: &CancellationToken,
    ) -> OutboundResponse {
        let outbound = match self.translator.translate(&inbound) {
            Ok(outbound) => outbound,
            Err(e) => {
                tracing::warn!(
                    method = %inbound.method,
                    path = %inbound.path,
                    error = %e,
                    "Rejected request before forwarding"
                );
                return self.responder.rejection(&e);
            }
        };

        match self.invoker.invoke(outbound, cancel).await {
            Ok(upstream) => self.responder.translate(upstream),
            Err(failure) => self.responder.failure(&failure),
        }
    }
}
