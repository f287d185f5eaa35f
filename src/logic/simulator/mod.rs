//! Simulator Module - Stateful sensor-degradation simulation
//!
//! One `MachineSimulator` per machine, fanned out by the `FleetSimulator`.

pub mod fleet;
pub mod machine;

#[cfg(test)]
mod tests;

// Re-export common types
pub use fleet::{FleetSimulator, MachineSummary};
pub use machine::{
    InitialCondition, MachineSimulator, MachineType, OperatingMode, Reading, SensorProfile,
};
