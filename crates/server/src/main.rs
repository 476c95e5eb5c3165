//! Twinguard prediction service
//!
//! Trains both domain models at startup from seeded synthetic corpora,
//! then serves predictions over HTTP. Each process owns its own models;
//! nothing is persisted or shared between instances.

use anyhow::Result;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use twinguard_core::{
    auth::MemoryCredentialStore, health::components, HealthRegistry, ModelRegistry,
    ServiceMetrics, StructuredLogger,
};

use twinguard_server::{api, config};

const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting twinguard-server");

    let config = config::ServiceConfig::load()?;
    info!(
        api_port = config.api_port,
        cyber_samples = config.cyber_samples,
        triage_samples = config.triage_samples,
        "Service configured"
    );

    let registry = Arc::new(ModelRegistry::new(config.registry_settings()));
    let store = Arc::new(MemoryCredentialStore::with_default_accounts());
    let health_registry = HealthRegistry::new();
    let metrics = ServiceMetrics::new();
    let logger = StructuredLogger::new("twinguard-server");

    health_registry.register(components::INTRUSION_MODEL).await;
    health_registry.register(components::TRIAGE_MODEL).await;
    health_registry.register(components::CREDENTIAL_STORE).await;
    logger.log_startup(SERVICE_VERSION);

    // One-time corpus/fit step; a failure here is fatal for this process.
    warm_models(&registry, &health_registry, &metrics, &logger).await?;
    health_registry.set_ready(true).await;

    let app_state = Arc::new(api::AppState {
        registry,
        store,
        health_registry,
        metrics,
        logger: logger.clone(),
    });

    let api_handle = tokio::spawn(api::serve(config.api_port, app_state));

    tokio::signal::ctrl_c().await?;
    logger.log_shutdown("SIGINT received");
    info!("Shutting down");
    api_handle.abort();

    Ok(())
}

/// Build both models off the async runtime, recording build times.
async fn warm_models(
    registry: &Arc<ModelRegistry>,
    health_registry: &HealthRegistry,
    metrics: &ServiceMetrics,
    logger: &StructuredLogger,
) -> Result<()> {
    let build_registry = registry.clone();
    let result = tokio::task::spawn_blocking(move || {
        let started = Instant::now();
        let detector = build_registry.intrusion()?;
        let intrusion_elapsed = started.elapsed();

        let started = Instant::now();
        let engine = build_registry.triage()?;
        let triage_elapsed = started.elapsed();

        Ok::<_, twinguard_core::PipelineError>((
            detector.trained_on(),
            intrusion_elapsed,
            engine.trained_on(),
            triage_elapsed,
        ))
    })
    .await?;

    match result {
        Ok((intrusion_samples, intrusion_elapsed, triage_samples, triage_elapsed)) => {
            metrics.set_model_build_time("intrusion", intrusion_elapsed.as_secs_f64());
            metrics.set_model_build_time("triage", triage_elapsed.as_secs_f64());
            logger.log_model_built(
                "intrusion",
                intrusion_samples,
                intrusion_elapsed.as_millis() as u64,
            );
            logger.log_model_built("triage", triage_samples, triage_elapsed.as_millis() as u64);
            Ok(())
        }
        Err(e) => {
            health_registry
                .set_unhealthy(components::INTRUSION_MODEL, e.to_string())
                .await;
            health_registry
                .set_unhealthy(components::TRIAGE_MODEL, e.to_string())
                .await;
            Err(e.into())
        }
    }
}
