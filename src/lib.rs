pub mod api;
pub mod core;
pub mod storage;
pub mod utils;

use std::sync::Arc;
use tracing::info;

use crate::{
    api::ApiState,
    core::{comparator::DeepFaceComparator, services::VerificationService},
    utils::{
        config::Config,
        error::{Result, ServiceError},
        metrics::Metrics,
    },
};

pub struct Application {
    config: Arc<Config>,
    state: ApiState,
}

impl Application {
    pub fn new(config: Config) -> Result<Self> {
        let config = Arc::new(config);

        info!(backend = ?config.storage.backend, bucket = %config.storage.bucket, "Initializing object store...");
        let store = storage::build_object_store(&config.storage)?;

        info!(
            python = %config.comparator.python,
            model = %config.comparator.model,
            detector = %config.comparator.detector_backend,
            "Initializing face comparator..."
        );
        let comparator = Arc::new(DeepFaceComparator::new(&config.comparator));

        let scratch_dir = config.scratch_dir();
        std::fs::create_dir_all(&scratch_dir).map_err(|e| {
            ServiceError::Init(format!(
                "Failed to prepare scratch directory {}: {}",
                scratch_dir.display(),
                e
            ))
        })?;

        let metrics = Arc::new(Metrics::new());
        let verification = VerificationService::new(store, comparator, scratch_dir);
        let state = ApiState::new(verification, metrics, config.server.max_payload_bytes);

        Ok(Self { config, state })
    }

    /// Serves the API until the server receives a shutdown signal.
    pub async fn run(self) -> Result<()> {
        use actix_web::{App, HttpServer};

        let state = self.state.clone();
        let mut server = HttpServer::new(move || {
            let state = state.clone();
            App::new()
                .wrap(api::cors_headers())
                .configure(move |cfg| state.configure(cfg))
        });
        if let Some(workers) = self.config.server.workers {
            server = server.workers(workers);
        }

        let host = self.config.server.host.as_str();
        let port = self.config.server.port;
        info!(%host, port, "Starting API server...");

        server
            .bind((host, port))
            .map_err(|e| ServiceError::Init(format!("Failed to bind API server: {}", e)))?
            .run()
            .await?;

        info!("API server stopped");
        Ok(())
    }
}
