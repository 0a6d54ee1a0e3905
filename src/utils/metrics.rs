// src/utils/metrics.rs
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// How a single verification request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Verified,
    NotVerified,
    NoFace,
    ClientError,
    Failed,
}

#[derive(Debug, Default)]
pub struct Metrics {
    requests_total: AtomicU64,
    verified: AtomicU64,
    not_verified: AtomicU64,
    no_face: AtomicU64,
    client_errors: AtomicU64,
    failures: AtomicU64,
    processing_time: AtomicU64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub total: u64,
    pub verified: u64,
    pub not_verified: u64,
    pub no_face: u64,
    pub client_errors: u64,
    pub failures: u64,
    pub avg_processing_ms: f64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self, outcome: RequestOutcome, duration: Duration) {
        self.requests_total.fetch_add(1, Ordering::SeqCst);
        self.processing_time
            .fetch_add(duration.as_micros() as u64, Ordering::SeqCst);

        let counter = match outcome {
            RequestOutcome::Verified => &self.verified,
            RequestOutcome::NotVerified => &self.not_verified,
            RequestOutcome::NoFace => &self.no_face,
            RequestOutcome::ClientError => &self.client_errors,
            RequestOutcome::Failed => &self.failures,
        };
        counter.fetch_add(1, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let total = self.requests_total.load(Ordering::SeqCst);
        let processing_us = self.processing_time.load(Ordering::SeqCst);

        MetricsSnapshot {
            total,
            verified: self.verified.load(Ordering::SeqCst),
            not_verified: self.not_verified.load(Ordering::SeqCst),
            no_face: self.no_face.load(Ordering::SeqCst),
            client_errors: self.client_errors.load(Ordering::SeqCst),
            failures: self.failures.load(Ordering::SeqCst),
            avg_processing_ms: if total == 0 {
                0.0
            } else {
                processing_us as f64 / total as f64 / 1000.0
            },
        }
    }
}
