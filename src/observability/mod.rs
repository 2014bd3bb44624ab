//! Logs and metrics.
//!
//! Every event emitted while a request is in the filter chain sits inside the
//! `correlation` span opened by the trace filter, so its `correlation_id`
//! appears on each line (and as a span field in JSON output).
//!
//! - `logging`: subscriber setup, `RUST_LOG` over the configured level
//! - `metrics`: Prometheus exporter plus request and upstream recorders

pub mod logging;
pub mod metrics;
