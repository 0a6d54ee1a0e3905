use anyhow::Context;
use face_verifier::{
    utils::{config::Config, logging},
    Application,
};
use tracing::{error, info};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::new().context("Failed to load configuration")?;
    let _log_guard = logging::init(&config.logging).context("Failed to initialize logging")?;

    info!("Starting face verifier v{}", env!("CARGO_PKG_VERSION"));

    let app = Application::new(config).map_err(|e| {
        error!("Failed to initialize application: {}", e);
        e
    })?;

    app.run().await.map_err(|e| {
        error!("API server failed: {}", e);
        e
    })?;

    info!("Application shutdown complete");
    Ok(())
}
