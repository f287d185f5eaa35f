//! Predictive Maintenance Core - Main Entry Point

use std::sync::Arc;
use std::time::Duration;

use predictive_maintenance_core::constants;
use predictive_maintenance_core::logic::config::CoreConfig;
use predictive_maintenance_core::logic::model::artifact::ArtifactStore;
use predictive_maintenance_core::logic::model::inference::ClassifierAdapter;
use predictive_maintenance_core::logic::model::threshold::HealthClassifier;
use predictive_maintenance_core::logic::monitor::MonitoringCoordinator;
use predictive_maintenance_core::logic::simulation_loop::SimulationLoop;
use predictive_maintenance_core::logic::simulator::fleet::FleetSimulator;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!(
        "Starting {} v{}...",
        constants::APP_NAME,
        constants::APP_VERSION
    );

    let config = CoreConfig::from_env();
    log::info!(
        "Configuration: {} machines, {}s interval, alert threshold {:.2}, environment {}",
        config.num_machines,
        config.tick_interval_secs,
        config.failure_threshold,
        config.environment
    );

    // Load the frozen model before answering anything.
    let store = ArtifactStore::new(&config.model_dir);
    if let Err(e) = store.preflight() {
        log::error!("Model artifacts incomplete: {}", e);
        std::process::exit(1);
    }
    let artifact = match store.load() {
        Ok(artifact) => artifact,
        Err(e) => {
            log::error!("Failed to load model: {}", e);
            std::process::exit(1);
        }
    };

    // Explicit construction order instead of lazy singletons.
    let fleet = Arc::new(FleetSimulator::new(&config));
    let classifier = Arc::new(ClassifierAdapter::new(artifact));
    let health = HealthClassifier::with_threshold(config.failure_threshold);
    let coordinator = Arc::new(MonitoringCoordinator::new(fleet, classifier, health));

    let simulation = SimulationLoop::new(
        coordinator.clone(),
        Duration::from_secs(config.tick_interval_secs),
    );
    let handle = simulation.start();

    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }

    log::info!("Shutdown signal received");
    simulation.stop();
    let _ = handle.await;

    for summary in coordinator.fleet_status() {
        log::info!(
            "  {} finished at {} cycles, tool wear {}min",
            summary.machine_id,
            summary.cycles,
            summary.tool_wear
        );
    }
}
