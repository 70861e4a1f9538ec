//! Upstream invocation: exactly one bounded call per inbound request.
//!
//! # Responsibilities
//! - Issue the outbound request through a [`Transport`]
//! - Enforce the timeout and honour the cancellation token
//! - Classify failures into [`FailureResult`]s
//! - Emit diagnostic events before and after the call
//!
//! # Design Decisions
//! - Single attempt, never retried
//! - Redirects are never followed here; transports must surface them

use std::future::Future;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use crate::observability::metrics;
use crate::relay::error::TransportError;
use crate::relay::types::{FailureKind, FailureResult, OutboundRequest, UpstreamResponse};
use crate::resilience::timeouts::{with_deadline, DeadlineError};

/// Message reported when the upstream misses its deadline.
pub const TIMEOUT_MESSAGE: &str = "Upstream took too long to respond";

/// Message reported when the relay shuts down mid-call.
pub const CANCELLED_MESSAGE: &str = "Relay is shutting down";

/// The primitive that performs one HTTP exchange.
///
/// Implementations must not follow redirects and must release their
/// connection when the returned future is dropped.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: OutboundRequest,
    ) -> impl Future<Output = Result<UpstreamResponse, TransportError>> + Send;
}

/// Performs the single upstream call of a request.
#[derive(Debug, Clone)]
pub struct UpstreamInvoker<T> {
    transport: T,
    timeout: Duration,
}

impl<T: Transport> UpstreamInvoker<T> {
    pub fn new(transport: T, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send `request` upstream, waiting at most the configured timeout.
    pub async fn invoke(
        &self,
        request: OutboundRequest,
        cancel: &CancellationToken,
    ) -> Result<UpstreamResponse, FailureResult> {
        let method = request.method.clone();
        let target = request.url.clone();
        tracing::info!(method = %method, target = %target, "Forwarding request upstream");

        let started = Instant::now();
        let outcome = with_deadline(self.timeout, cancel, self.transport.send(request)).await;
        metrics::record_upstream_duration(started);
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let failure = match outcome {
            Ok(Ok(response)) => {
                tracing::info!(
                    method = %method,
                    target = %target,
                    status = response.status.as_u16(),
                    elapsed_ms,
                    "Upstream responded"
                );
                return Ok(response);
            }
            Ok(Err(e)) if e.code == Some("timeout") => {
                FailureResult::new(FailureKind::Timeout, TIMEOUT_MESSAGE).with_code(e.code)
            }
            Ok(Err(e)) => FailureResult::new(FailureKind::NetworkFailure, e.message).with_code(e.code),
            Err(DeadlineError::Elapsed(_)) => FailureResult::new(FailureKind::Timeout, TIMEOUT_MESSAGE),
            Err(DeadlineError::Cancelled) => {
                FailureResult::new(FailureKind::Cancelled, CANCELLED_MESSAGE)
            }
        };

        match failure.kind {
            FailureKind::NetworkFailure => tracing::error!(
                method = %method,
                target = %target,
                kind = %failure.kind,
                code = ?failure.code,
                error = %failure.message,
                elapsed_ms,
                "Upstream request failed"
            ),
            _ => tracing::warn!(
                method = %method,
                target = %target,
                kind = %failure.kind,
                timeout_ms = self.timeout.as_millis() as u64,
                elapsed_ms,
                "Upstream request abandoned"
            ),
        }
        metrics::record_upstream_failure(failure.kind.as_str());

        Err(failure)
    }
}
