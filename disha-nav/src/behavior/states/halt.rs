//! Halt state.

use serde::{Deserialize, Serialize};

use smriti_map::{RobotCommands, WorldModel};

use crate::behavior::{block_exit, AutoScan, ExitLabel, StateStep};

/// Keeps the robot stopped, optionally sweeping the sensor head so the map
/// stays fresh while parked. Leaves only on timeout or contact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HaltState {
    pub scan: Option<AutoScan>,
}

impl HaltState {
    pub fn step(&self, entry_time: u64, world: &WorldModel) -> StateStep {
        let status = world.status();
        if let Some(exit) = block_exit(status) {
            return (exit, Some(RobotCommands::halt()));
        }
        let mut commands = RobotCommands::halt();
        if let Some(scan) = &self.scan {
            let elapsed = status.simulation_time.saturating_sub(entry_time);
            commands = commands.with_scan(scan.direction(elapsed));
        }
        (ExitLabel::Stay, Some(commands))
    }
}
