//! Basic metrics instrumentation for dispatch attempts.
//!
//! Provides counters for outcomes and duration tracking for provider requests.

use crate::dispatch::{DispatchOutcome, FailureReason};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Metrics collector shared by clones of one dispatcher.
#[derive(Debug, Clone)]
pub struct Metrics {
    /// Dispatch attempts started
    attempts_total: Arc<AtomicU64>,

    /// Attempts that reached the provider and completed
    sent_total: Arc<AtomicU64>,

    empty_number_total: Arc<AtomicU64>,
    invalid_number_total: Arc<AtomicU64>,
    not_configured_total: Arc<AtomicU64>,
    empty_content_total: Arc<AtomicU64>,
    transport_error_total: Arc<AtomicU64>,

    /// Provider requests issued
    http_requests_total: Arc<AtomicU64>,

    /// Provider requests that failed at the network level
    http_errors_total: Arc<AtomicU64>,

    /// Total duration of all provider requests in milliseconds
    http_duration_total_ms: Arc<AtomicU64>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self {
            attempts_total: Arc::new(AtomicU64::new(0)),
            sent_total: Arc::new(AtomicU64::new(0)),
            empty_number_total: Arc::new(AtomicU64::new(0)),
            invalid_number_total: Arc::new(AtomicU64::new(0)),
            not_configured_total: Arc::new(AtomicU64::new(0)),
            empty_content_total: Arc::new(AtomicU64::new(0)),
            transport_error_total: Arc::new(AtomicU64::new(0)),
            http_requests_total: Arc::new(AtomicU64::new(0)),
            http_errors_total: Arc::new(AtomicU64::new(0)),
            http_duration_total_ms: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Record the start of a dispatch attempt.
    pub fn record_attempt(&self) {
        self.attempts_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record how a dispatch attempt ended.
    pub fn record_outcome(&self, outcome: &DispatchOutcome) {
        let counter = match outcome {
            DispatchOutcome::Sent { .. } => &self.sent_total,
            DispatchOutcome::Failed { reason } => match reason {
                FailureReason::EmptyNumber => &self.empty_number_total,
                FailureReason::InvalidNumber(_) => &self.invalid_number_total,
                FailureReason::NotConfigured => &self.not_configured_total,
                FailureReason::EmptyContent => &self.empty_content_total,
                FailureReason::TransportError(_) => &self.transport_error_total,
            },
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a provider request with duration.
    pub fn record_http_request(&self, duration: Duration) {
        self.http_requests_total.fetch_add(1, Ordering::Relaxed);
        self.http_duration_total_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Record a provider request that failed at the network level.
    pub fn record_http_error(&self) {
        self.http_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn attempts_total(&self) -> u64 {
        self.attempts_total.load(Ordering::Relaxed)
    }

    pub fn sent_total(&self) -> u64 {
        self.sent_total.load(Ordering::Relaxed)
    }

    /// Get total failed attempts across all reasons.
    pub fn failed_total(&self) -> u64 {
        [
            &self.empty_number_total,
            &self.invalid_number_total,
            &self.not_configured_total,
            &self.empty_content_total,
            &self.transport_error_total,
        ]
        .iter()
        .map(|c| c.load(Ordering::Relaxed))
        .sum()
    }

    pub fn http_requests_total(&self) -> u64 {
        self.http_requests_total.load(Ordering::Relaxed)
    }

    pub fn http_errors_total(&self) -> u64 {
        self.http_errors_total.load(Ordering::Relaxed)
    }

    pub fn http_duration_total_ms(&self) -> u64 {
        self.http_duration_total_ms.load(Ordering::Relaxed)
    }

    /// Get average provider request duration in milliseconds.
    pub fn http_duration_avg_ms(&self) -> f64 {
        let total = self.http_duration_total_ms.load(Ordering::Relaxed);
        let count = self.http_requests_total.load(Ordering::Relaxed);
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    /// Get a summary of all metrics.
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            attempts_total: self.attempts_total(),
            sent_total: self.sent_total(),
            empty_number_total: self.empty_number_total.load(Ordering::Relaxed),
            invalid_number_total: self.invalid_number_total.load(Ordering::Relaxed),
            not_configured_total: self.not_configured_total.load(Ordering::Relaxed),
            empty_content_total: self.empty_content_total.load(Ordering::Relaxed),
            transport_error_total: self.transport_error_total.load(Ordering::Relaxed),
            http_requests_total: self.http_requests_total(),
            http_errors_total: self.http_errors_total(),
            http_duration_avg_ms: self.http_duration_avg_ms(),
        }
    }
}

/// A snapshot of metrics values.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSummary {
    pub attempts_total: u64,
    pub sent_total: u64,
    pub empty_number_total: u64,
    pub invalid_number_total: u64,
    pub not_configured_total: u64,
    pub empty_content_total: u64,
    pub transport_error_total: u64,
    pub http_requests_total: u64,
    pub http_errors_total: u64,
    pub http_duration_avg_ms: f64,
}

/// Helper for timing provider requests.
pub struct HttpTimer {
    start: Instant,
    metrics: Metrics,
}

impl HttpTimer {
    /// Start timing a provider request.
    pub fn new(metrics: Metrics) -> Self {
        Self {
            start: Instant::now(),
            metrics,
        }
    }

    /// Complete the timing and record the duration.
    pub fn complete(self) {
        let duration = self.start.elapsed();
        self.metrics.record_http_request(duration);
    }

    /// Complete the timing and record as an error.
    pub fn complete_with_error(self) {
        let duration = self.start.elapsed();
        self.metrics.record_http_request(duration);
        self.metrics.record_http_error();
    }
}
