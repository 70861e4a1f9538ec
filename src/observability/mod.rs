//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! relay / http layers produce:
//!     → logging.rs (structured, timestamped tracing events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape), when enabled
//! ```
//!
//! # Design Decisions
//! - Request ID (x-request-id) is recorded on the relay span, never sent upstream
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
