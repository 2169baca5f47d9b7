//! Final run report and verdict.

use serde::Serialize;
use std::time::Duration;

use crate::run::aggregator::AggregateCounters;

/// Why issuance ended before all planned probes were sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Shutdown signal (e.g. Ctrl-C).
    Cancelled,
    /// Configured deadline elapsed.
    DeadlineElapsed,
    /// First 429 observed with halt-on-rate-limit enabled.
    RateLimitObserved,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cancelled => write!(f, "cancelled"),
            Self::DeadlineElapsed => write!(f, "deadline elapsed"),
            Self::RateLimitObserved => write!(f, "rate limit observed"),
        }
    }
}

/// What a correct limiter should produce for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expectation {
    pub probe_count: u32,
    pub expected_success: u32,
    pub halt_on_rate_limit: bool,
}

impl Expectation {
    pub fn expected_rate_limited(&self) -> u32 {
        self.probe_count.saturating_sub(self.expected_success)
    }

    /// Compare observed counters against the expectation.
    ///
    /// Returns one human-readable line per mismatch; empty means passed.
    /// A run cut short by cancellation or the deadline never passes; in halt
    /// mode the first 429 is the only acceptable early stop.
    pub fn evaluate(
        &self,
        counters: &AggregateCounters,
        issued: u32,
        stop_reason: Option<StopReason>,
    ) -> Vec<String> {
        let mut mismatches = Vec::new();

        match stop_reason {
            Some(reason @ (StopReason::Cancelled | StopReason::DeadlineElapsed)) => {
                mismatches.push(format!("run stopped early ({})", reason));
            }
            Some(StopReason::RateLimitObserved) if !self.halt_on_rate_limit => {
                mismatches.push("run halted on a rate limit without halt mode".to_string());
            }
            _ => {}
        }

        if counters.success_count != self.expected_success {
            mismatches.push(format!(
                "expected {} successful probes, observed {}",
                self.expected_success, counters.success_count
            ));
        }

        if self.halt_on_rate_limit {
            if counters.rate_limited_count == 0 {
                mismatches.push("expected at least one rate-limited probe, observed none".to_string());
            }
            let other = counters.failure_count - counters.rate_limited_count;
            if other > 0 {
                mismatches.push(format!("{} probes failed for reasons other than rate limiting", other));
            }
        } else {
            if issued < self.probe_count {
                mismatches.push(format!(
                    "only {} of {} planned probes were issued",
                    issued, self.probe_count
                ));
            }
            if counters.rate_limited_count != self.expected_rate_limited() {
                mismatches.push(format!(
                    "expected {} rate-limited probes, observed {}",
                    self.expected_rate_limited(),
                    counters.rate_limited_count
                ));
            }
        }

        mismatches
    }
}

/// Latency distribution over all recorded probes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LatencySummary {
    pub median_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

impl LatencySummary {
    pub fn from_samples(samples: &[Duration]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }
        let mut sorted: Vec<u64> = samples.iter().map(|d| d.as_micros() as u64).collect();
        sorted.sort_unstable();
        let p99_idx = ((sorted.len() as f64 * 0.99) as usize).min(sorted.len() - 1);
        Self {
            median_us: sorted[sorted.len() / 2],
            p99_us: sorted[p99_idx],
            max_us: sorted[sorted.len() - 1],
        }
    }
}

/// Terminal summary of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    #[serde(flatten)]
    pub counters: AggregateCounters,
    pub planned: u32,
    pub issued: u32,
    pub expected_success: u32,
    pub expected_rate_limited: u32,
    pub halt_on_rate_limit: bool,
    pub stop_reason: Option<StopReason>,
    pub passed: bool,
    pub mismatches: Vec<String>,
    pub elapsed_ms: u64,
    pub probes_per_second: f64,
    pub latency: LatencySummary,
}

impl RunReport {
    pub fn new(
        expectation: Expectation,
        counters: AggregateCounters,
        issued: u32,
        stop_reason: Option<StopReason>,
        elapsed: Duration,
        latencies: &[Duration],
    ) -> Self {
        let mismatches = expectation.evaluate(&counters, issued, stop_reason);
        let secs = elapsed.as_secs_f64();
        Self {
            counters,
            planned: expectation.probe_count,
            issued,
            expected_success: expectation.expected_success,
            expected_rate_limited: expectation.expected_rate_limited(),
            halt_on_rate_limit: expectation.halt_on_rate_limit,
            stop_reason,
            passed: mismatches.is_empty(),
            mismatches,
            elapsed_ms: elapsed.as_millis() as u64,
            probes_per_second: if secs > 0.0 { counters.total() as f64 / secs } else { 0.0 },
            latency: LatencySummary::from_samples(latencies),
        }
    }
}

const RULE: &str = "=========================================";

impl std::fmt::Display for RunReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let c = &self.counters;
        writeln!(f, "{}", RULE)?;
        writeln!(f, "Test Results:")?;
        writeln!(f, "Successful probes:  {}", c.success_count)?;
        writeln!(f, "Rate limited (429): {}", c.rate_limited_count)?;
        writeln!(f, "Failed probes:      {}", c.failure_count)?;
        writeln!(f, "  Unauthorized (401): {}", c.unauthorized_count)?;
        writeln!(f, "  Other HTTP status:  {}", c.other_failure_count)?;
        writeln!(f, "  Transport errors:   {}", c.transport_error_count)?;
        writeln!(
            f,
            "Issued {} of {} in {} ms ({:.2} probes/sec)",
            self.issued, self.planned, self.elapsed_ms, self.probes_per_second
        )?;
        writeln!(
            f,
            "Latency: median {} us, p99 {} us, max {} us",
            self.latency.median_us, self.latency.p99_us, self.latency.max_us
        )?;
        if let Some(reason) = self.stop_reason {
            writeln!(f, "Stopped early: {}", reason)?;
        }
        writeln!(f, "{}", RULE)?;
        writeln!(f)?;
        if self.halt_on_rate_limit {
            writeln!(
                f,
                "Expected: first {} probes succeed, then a rate limit (429)",
                self.expected_success
            )?;
        } else {
            writeln!(
                f,
                "Expected: first {} probes succeed, remaining {} rate limited (429)",
                self.expected_success, self.expected_rate_limited
            )?;
        }
        for mismatch in &self.mismatches {
            writeln!(f, "MISMATCH: {}", mismatch)?;
        }
        write!(f, "Result: {}", if self.passed { "PASS" } else { "FAIL" })
    }
}
