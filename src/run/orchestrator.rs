//! Run orchestration.
//!
//! # Responsibilities
//! - Issue N probes, one pacing interval apart
//! - Record completions as they arrive, in whatever order they arrive
//! - Drain every in-flight probe before reporting
//! - Stop issuing early on shutdown, deadline or (optionally) the first 429
//!
//! # State machine
//! ```text
//! Idle → Issuing (1..N, interleaved with recording completions)
//!      → Draining (await stragglers)
//!      → Reported
//! ```
//!
//! All in-flight probes live in one `FuturesUnordered` polled by the run's
//! own task, so network I/O overlaps while `record` calls stay serialized.

use futures_util::stream::{FuturesUnordered, Stream, StreamExt};
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::Instant;

use crate::config::HarnessConfig;
use crate::observability::metrics;
use crate::probe::{Dispatch, ProbeFactory, ProbeOutcome, ProbeRecord, ProbeRequest};
use crate::run::aggregator::OutcomeAggregator;
use crate::run::pacing::Pacer;
use crate::run::report::{Expectation, RunReport, StopReason};

/// Lifecycle phase of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Issuing,
    Draining,
    Reported,
}

/// Parameters of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPlan {
    pub probe_count: u32,
    pub expected_success: u32,
    pub halt_on_rate_limit: bool,
    pub deadline: Option<Duration>,
}

impl RunPlan {
    pub fn from_config(config: &HarnessConfig) -> Self {
        Self {
            probe_count: config.probe.count,
            expected_success: config.probe.expected_success,
            halt_on_rate_limit: config.run.halt_on_rate_limit,
            deadline: config.run.deadline(),
        }
    }

    fn expectation(&self) -> Expectation {
        Expectation {
            probe_count: self.probe_count,
            expected_success: self.expected_success,
            halt_on_rate_limit: self.halt_on_rate_limit,
        }
    }
}

/// Drives a single run against one dispatcher.
pub struct Orchestrator<D> {
    dispatcher: D,
    factory: ProbeFactory,
    pacer: Pacer,
    plan: RunPlan,
}

impl<D: Dispatch> Orchestrator<D> {
    pub fn new(dispatcher: D, factory: ProbeFactory, pacer: Pacer, plan: RunPlan) -> Self {
        Self {
            dispatcher,
            factory,
            pacer,
            plan,
        }
    }

    pub fn plan(&self) -> &RunPlan {
        &self.plan
    }

    /// Run to completion and return the report.
    pub async fn run(&self, shutdown: broadcast::Receiver<()>) -> RunReport {
        self.run_observed(shutdown, |_| {}).await
    }

    /// Run to completion, handing every recorded probe to `observer` as it lands.
    pub async fn run_observed<F>(&self, mut shutdown: broadcast::Receiver<()>, mut observer: F) -> RunReport
    where
        F: FnMut(&ProbeRecord),
    {
        let started = Instant::now();
        let deadline = self.plan.deadline.map(|d| started + d);
        let mut phase = RunPhase::Idle;
        let mut aggregator = OutcomeAggregator::new();
        let mut in_flight = FuturesUnordered::new();
        let mut issued = 0u32;
        let mut stop_reason = None;
        let mut listening = true;

        tracing::info!(
            endpoint = %self.factory.target(),
            probes = self.plan.probe_count,
            expected_success = self.plan.expected_success,
            pacing_ms = self.pacer.interval().as_millis() as u64,
            "Starting run"
        );
        transition(&mut phase, RunPhase::Issuing);

        for sequence in 1..=self.plan.probe_count {
            in_flight.push(self.timed_dispatch(self.factory.build(sequence)));
            issued += 1;

            if sequence == self.plan.probe_count {
                break;
            }

            let pause = self.pacer.wait();
            tokio::pin!(pause);
            loop {
                tokio::select! {
                    biased;
                    res = shutdown.recv(), if listening => match res {
                        Err(RecvError::Closed) => listening = false,
                        _ => {
                            stop_reason = Some(StopReason::Cancelled);
                            break;
                        }
                    },
                    _ = wait_deadline(deadline) => {
                        stop_reason = Some(StopReason::DeadlineElapsed);
                        break;
                    }
                    Some(record) = in_flight.next(), if !in_flight.is_empty() => {
                        absorb(&mut aggregator, &mut observer, &record);
                        if self.plan.halt_on_rate_limit && record.outcome == ProbeOutcome::RateLimited {
                            stop_reason = Some(StopReason::RateLimitObserved);
                            break;
                        }
                    }
                    _ = &mut pause => break,
                }
            }

            if let Some(reason) = stop_reason {
                tracing::warn!(%reason, issued, planned = self.plan.probe_count, "Stopping issuance early");
                break;
            }
        }

        transition(&mut phase, RunPhase::Draining);
        tracing::debug!(in_flight = in_flight.len(), "Draining in-flight probes");
        drain(&mut in_flight, &mut aggregator, &mut observer).await;

        let report = RunReport::new(
            self.plan.expectation(),
            aggregator.snapshot(),
            issued,
            stop_reason,
            started.elapsed(),
            aggregator.latencies(),
        );
        debug_assert_eq!(report.counters.total(), issued);
        transition(&mut phase, RunPhase::Reported);

        tracing::info!(
            success = report.counters.success_count,
            rate_limited = report.counters.rate_limited_count,
            failed = report.counters.failure_count,
            passed = report.passed,
            "Run complete"
        );
        report
    }

    async fn timed_dispatch(&self, request: ProbeRequest) -> ProbeRecord {
        let sequence = request.sequence;
        let start = Instant::now();
        let outcome = self.dispatcher.dispatch(request).await;
        ProbeRecord {
            sequence,
            outcome,
            latency: start.elapsed(),
        }
    }
}

/// Await every remaining probe and fold it into the aggregate.
///
/// Completion order is irrelevant; each record is counted exactly once.
pub async fn drain<S, F>(in_flight: &mut S, aggregator: &mut OutcomeAggregator, observer: &mut F)
where
    S: Stream<Item = ProbeRecord> + Unpin,
    F: FnMut(&ProbeRecord),
{
    while let Some(record) = in_flight.next().await {
        absorb(aggregator, observer, &record);
    }
}

fn absorb<F: FnMut(&ProbeRecord)>(aggregator: &mut OutcomeAggregator, observer: &mut F, record: &ProbeRecord) {
    aggregator.record(&record.outcome);
    aggregator.record_latency(record.latency);
    metrics::record_probe(record);
    tracing::debug!(
        sequence = record.sequence,
        outcome = record.outcome.label(),
        latency_us = record.latency.as_micros() as u64,
        "Probe recorded"
    );
    observer(record);
}

async fn wait_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

fn transition(phase: &mut RunPhase, next: RunPhase) {
    tracing::debug!(from = ?phase, to = ?next, "Run phase");
    *phase = next;
}
