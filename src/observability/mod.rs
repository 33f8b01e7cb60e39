//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! parser / compiler / router / dispatcher produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters and gauges through the `metrics` facade)
//!
//! Consumers:
//!     → tracing subscriber installed by the binary (or the host)
//!     → whatever metrics recorder the host installs
//! ```
//!
//! # Design Decisions
//! - The library never installs a global subscriber or recorder on its own
//! - Dispatch events are `trace` level; registration is `debug`; lifecycle is `info`
//! - Without a recorder, metric calls are no-ops

pub mod logging;
pub mod metrics;
