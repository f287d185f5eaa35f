//! Simulation Loop - Continuous tick driver
//!
//! Optional external driver for the monitoring core: tick, predict,
//! log, sleep. Stops cooperatively between ticks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::logic::monitor::MonitoringCoordinator;

pub struct SimulationLoop {
    coordinator: Arc<MonitoringCoordinator>,
    interval: Duration,
    running: Arc<AtomicBool>,
}

impl SimulationLoop {
    pub fn new(coordinator: Arc<MonitoringCoordinator>, interval: Duration) -> Self {
        Self {
            coordinator,
            interval,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Spawn the loop task. Runs until `stop` is called.
    pub fn start(&self) -> JoinHandle<()> {
        self.running.store(true, Ordering::SeqCst);

        let coordinator = self.coordinator.clone();
        let running = self.running.clone();
        let interval = self.interval;

        tokio::spawn(async move {
            run_loop(coordinator, interval, running).await;
        })
    }

    /// Request a cooperative stop. The loop exits before its next tick.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

async fn run_loop(
    coordinator: Arc<MonitoringCoordinator>,
    interval: Duration,
    running: Arc<AtomicBool>,
) {
    log::info!(
        "Simulation loop started (interval: {:?}, machines: {})",
        interval,
        coordinator.fleet_status().len()
    );

    let mut iteration = 0u64;
    while running.load(Ordering::SeqCst) {
        iteration += 1;

        match coordinator.predict_fleet() {
            Ok(reports) => {
                for report in &reports {
                    log::info!(
                        "[iteration {}] {}: temp={:.1}K, speed={:.0}rpm, torque={:.1}Nm, wear={:.0}min -> {} (p={:.4})",
                        iteration,
                        report.machine_id,
                        report.sensor_data.process_temperature,
                        report.sensor_data.rotational_speed,
                        report.sensor_data.torque,
                        report.sensor_data.tool_wear,
                        report.health_status,
                        report.failure_probability
                    );
                    if report.alert {
                        log::warn!(
                            "[ALERT] {} requires maintenance (p={:.4})",
                            report.machine_id,
                            report.failure_probability
                        );
                    }
                }
            }
            Err(e) => log::error!("simulation tick failed: {}", e),
        }

        tokio::time::sleep(interval).await;
    }

    log::info!("Simulation loop stopped after {} iterations", iteration);
}
