//! Metrics collection.
//!
//! # Metrics
//! - `probe_outcomes_total` (counter): probes by outcome label
//! - `probe_latency_seconds` (histogram): time from dispatch to classification

use crate::probe::ProbeRecord;

/// Record one completed probe.
pub fn record_probe(record: &ProbeRecord) {
    metrics::counter!("probe_outcomes_total", "outcome" => record.outcome.label()).increment(1);
    metrics::histogram!("probe_latency_seconds").record(record.latency.as_secs_f64());
}
