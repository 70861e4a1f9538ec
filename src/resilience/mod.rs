//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to upstream:
//!     → timeouts.rs (deadline + cancellation token around the single call)
//!     → On expiry: call dropped, Timeout reported
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every upstream call has a deadline
//! - No retries: a relayed POST must reach the upstream at most once

pub mod timeouts;

pub use timeouts::{with_deadline, DeadlineError};
