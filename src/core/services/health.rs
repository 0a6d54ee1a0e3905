// src/core/services/health.rs
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::utils::metrics::{Metrics, MetricsSnapshot};

pub struct HealthService {
    started_at: DateTime<Utc>,
    metrics: Arc<Metrics>,
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub version: &'static str,
    pub started_at: DateTime<Utc>,
    pub uptime_secs: i64,
    pub requests: MetricsSnapshot,
}

impl HealthService {
    pub fn new(metrics: Arc<Metrics>) -> Self {
        Self {
            started_at: Utc::now(),
            metrics,
        }
    }

    pub fn report(&self) -> HealthReport {
        HealthReport {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            started_at: self.started_at,
            uptime_secs: (Utc::now() - self.started_at).num_seconds(),
            requests: self.metrics.snapshot(),
        }
    }
}
