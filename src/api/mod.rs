// src/api/mod.rs
pub mod handlers;
pub mod types;

use actix_web::{http::header, middleware::DefaultHeaders, web};
use std::sync::Arc;

use crate::{
    core::services::{HealthService, VerificationService},
    utils::metrics::Metrics,
};

/// Shared per-app state, cloned into every actix worker.
#[derive(Clone)]
pub struct ApiState {
    verification: web::Data<VerificationService>,
    health: web::Data<HealthService>,
    metrics: web::Data<Metrics>,
    max_payload_bytes: usize,
}

impl ApiState {
    pub fn new(
        verification: VerificationService,
        metrics: Arc<Metrics>,
        max_payload_bytes: usize,
    ) -> Self {
        Self {
            verification: web::Data::new(verification),
            health: web::Data::new(HealthService::new(metrics.clone())),
            metrics: web::Data::from(metrics),
            max_payload_bytes,
        }
    }

    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.verification.clone())
            .app_data(self.health.clone())
            .app_data(self.metrics.clone())
            .app_data(web::PayloadConfig::new(self.max_payload_bytes))
            .configure(handlers::verification::configure)
            .configure(handlers::health::configure);
    }
}

/// Every response is readable cross-origin.
pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new().add((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
}
