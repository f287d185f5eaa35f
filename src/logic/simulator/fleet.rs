//! Fleet Simulator - Fixed set of machine simulators
//!
//! Owns every machine behind its own lock so that concurrent requests
//! touching different machines never contend, while a generate and a
//! maintenance reset racing on the same machine serialize.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::logic::config::CoreConfig;
use crate::logic::error::{CoreError, CoreResult};
use crate::logic::simulator::machine::{
    InitialCondition, MachineSimulator, MachineType, OperatingMode, Reading,
};

/// Status snapshot of one machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineSummary {
    pub machine_id: String,
    #[serde(rename = "type")]
    pub machine_type: MachineType,
    pub tool_wear: u64,
    pub operating_mode: OperatingMode,
    pub cycles: u64,
    pub degradation_rate: f64,
}

/// Manages the fixed set of machine simulators.
pub struct FleetSimulator {
    machines: Vec<Mutex<MachineSimulator>>,
}

impl FleetSimulator {
    /// Build the fleet with entropy-seeded machines.
    pub fn new(config: &CoreConfig) -> Self {
        Self::build(config, StdRng::from_entropy())
    }

    /// Build the fleet from a fixed seed. Machine types, profiles and all
    /// subsequent readings become reproducible.
    pub fn with_seed(config: &CoreConfig, seed: u64) -> Self {
        Self::build(config, StdRng::seed_from_u64(seed))
    }

    fn build(config: &CoreConfig, mut seeder: StdRng) -> Self {
        let conditions = condition_mix(config.num_machines);

        let mut machines = Vec::with_capacity(config.num_machines);
        for (i, condition) in conditions.into_iter().enumerate() {
            let machine_id = format!("M{:03}", i + 1);
            let machine_type = MachineType::ALL[seeder.gen_range(0..MachineType::ALL.len())];
            let machine = MachineSimulator::with_seed(
                machine_id,
                machine_type,
                condition,
                config.sensor_ranges.clone(),
                seeder.gen(),
            );
            let p = machine.profile();
            log::info!(
                "  - {} (type: {}, tool wear: {}min, condition: {:?})",
                p.machine_id,
                p.machine_type,
                p.tool_wear as u64,
                condition
            );
            machines.push(Mutex::new(machine));
        }

        log::info!("Initialized {} machine simulators", machines.len());
        Self { machines }
    }

    pub fn len(&self) -> usize {
        self.machines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }

    /// Generate one reading per machine, in creation order.
    pub fn generate_all(&self) -> Vec<Reading> {
        self.machines
            .iter()
            .map(|m| m.lock().generate_reading())
            .collect()
    }

    /// Generate a reading for a single machine.
    pub fn generate_one(&self, machine_id: &str) -> CoreResult<Reading> {
        let machine = self
            .find(machine_id)
            .ok_or_else(|| CoreError::NotFound(format!("machine {}", machine_id)))?;
        Ok(machine.lock().generate_reading())
    }

    /// Reset the tool wear of a machine. Absence of the machine is an
    /// ordinary negative result, not a fault.
    pub fn perform_maintenance(&self, machine_id: &str) -> bool {
        match self.find(machine_id) {
            Some(machine) => {
                machine.lock().reset_wear();
                true
            }
            None => false,
        }
    }

    /// Status snapshot of every machine, in creation order.
    pub fn list_machines(&self) -> Vec<MachineSummary> {
        self.machines
            .iter()
            .map(|m| {
                let machine = m.lock();
                let p = machine.profile();
                MachineSummary {
                    machine_id: p.machine_id.clone(),
                    machine_type: p.machine_type,
                    tool_wear: p.tool_wear as u64,
                    operating_mode: p.operating_mode,
                    cycles: p.cycles,
                    degradation_rate: (p.degradation_rate * 100.0).round() / 100.0,
                }
            })
            .collect()
    }

    fn find(&self, machine_id: &str) -> Option<&Mutex<MachineSimulator>> {
        self.machines
            .iter()
            .find(|m| m.lock().machine_id() == machine_id)
    }
}

/// Deliberate condition mix so the fleet always demonstrates the full
/// alert spectrum: majority healthy, one approaching the threshold, one
/// requiring maintenance.
fn condition_mix(num_machines: usize) -> Vec<InitialCondition> {
    let base = [
        InitialCondition::Healthy,
        InitialCondition::Healthy,
        InitialCondition::Healthy,
        InitialCondition::Risk,
        InitialCondition::Maintenance,
    ];

    (0..num_machines)
        .map(|i| base.get(i).copied().unwrap_or(InitialCondition::Healthy))
        .collect()
}
