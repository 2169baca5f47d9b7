//! Outcome accumulation.
//!
//! The aggregator is owned by the run that drives it and is only touched
//! from that run's task, so plain `&mut self` is enough: completions may
//! arrive in any order but `record` calls never overlap.

use serde::Serialize;
use std::time::Duration;

use crate::probe::ProbeOutcome;

/// Counts per outcome category.
///
/// `failure_count` includes rate-limited probes, so
/// `success + rate_limited + (failure - rate_limited)` is the number recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregateCounters {
    pub success_count: u32,
    pub rate_limited_count: u32,
    pub failure_count: u32,
    pub unauthorized_count: u32,
    pub other_failure_count: u32,
    pub transport_error_count: u32,
}

impl AggregateCounters {
    /// Number of outcomes these counters account for.
    pub fn total(&self) -> u32 {
        self.success_count + self.rate_limited_count + (self.failure_count - self.rate_limited_count)
    }
}

/// Accumulates outcomes and per-probe latencies for one run.
#[derive(Debug, Default)]
pub struct OutcomeAggregator {
    counters: AggregateCounters,
    latencies: Vec<Duration>,
}

impl OutcomeAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one outcome in its category bucket.
    pub fn record(&mut self, outcome: &ProbeOutcome) {
        let c = &mut self.counters;
        match outcome {
            ProbeOutcome::Success => c.success_count += 1,
            ProbeOutcome::RateLimited => {
                c.rate_limited_count += 1;
                c.failure_count += 1;
            }
            ProbeOutcome::Unauthorized => {
                c.unauthorized_count += 1;
                c.failure_count += 1;
            }
            ProbeOutcome::OtherFailure { .. } => {
                c.other_failure_count += 1;
                c.failure_count += 1;
            }
            ProbeOutcome::TransportError { .. } => {
                c.transport_error_count += 1;
                c.failure_count += 1;
            }
        }
    }

    pub fn record_latency(&mut self, latency: Duration) {
        self.latencies.push(latency);
    }

    /// Current counters, by value.
    pub fn snapshot(&self) -> AggregateCounters {
        self.counters
    }

    pub fn latencies(&self) -> &[Duration] {
        &self.latencies
    }
}
