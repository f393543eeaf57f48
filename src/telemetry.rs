//! Telemetry metric name constants.
//!
//! Centralised metric names for muninn operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `muninn_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `task` — task kind (e.g. "admin_sentiment", "rag_query")
//! - `gateway` — gateway name (e.g. "openai", "pinecone")
//! - `operation` — gateway operation (e.g. "complete", "search")
//! - `status` — outcome: "ok" or "error"

/// Total task requests executed by the orchestrator.
///
/// Labels: `task`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "muninn_requests_total";

/// Task request duration in seconds.
///
/// Labels: `task`.
pub const REQUEST_DURATION_SECONDS: &str = "muninn_request_duration_seconds";

/// Total retry attempts (not counting the initial request).
///
/// Labels: `gateway`, `operation`.
pub const RETRIES_TOTAL: &str = "muninn_retries_total";

/// Total report persistence jobs, by outcome.
///
/// Labels: `status` ("ok" | "error").
pub const REPORTS_PERSISTED_TOTAL: &str = "muninn_reports_persisted_total";
