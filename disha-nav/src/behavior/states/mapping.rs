//! Panorama-mapping state.

use serde::{Deserialize, Serialize};

use smriti_map::{Bearing, RobotCommands, WorldModel};

use crate::behavior::{block_exit, AutoScan, ExitLabel, StateStep};

/// Heading tolerance while rotating (deg).
const HEADING_EPSILON_DEG: f64 = 5.0;

/// Rotates the robot through a full turn in fixed steps, sweeping the
/// sensor head at each heading, and completes when the panorama is done.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingState {
    /// Rotation step between scan headings (deg).
    pub turn_step_deg: f64,
    /// Sensor sweep performed at each heading.
    pub scan: AutoScan,
    #[serde(skip)]
    start_direction: Option<Bearing>,
    #[serde(skip)]
    heading_index: usize,
    #[serde(skip)]
    heading_time: Option<u64>,
}

impl Default for MappingState {
    fn default() -> Self {
        Self {
            turn_step_deg: 60.0,
            scan: AutoScan::default(),
            start_direction: None,
            heading_index: 0,
            heading_time: None,
        }
    }
}

impl MappingState {
    pub fn reset(&mut self) {
        self.start_direction = None;
        self.heading_index = 0;
        self.heading_time = None;
    }

    fn headings(&self) -> usize {
        (360.0 / self.turn_step_deg).round().max(1.0) as usize
    }

    pub fn step(&mut self, world: &WorldModel) -> StateStep {
        let status = world.status();
        if let Some(exit) = block_exit(status) {
            return (exit, Some(RobotCommands::halt()));
        }
        let time = status.simulation_time;
        let start = *self.start_direction.get_or_insert(status.direction);
        if self.heading_index >= self.headings() {
            return (ExitLabel::Completed, Some(RobotCommands::halt()));
        }
        let target = start.add(Bearing::from_deg(
            self.turn_step_deg * self.heading_index as f64,
        ));
        let epsilon = Bearing::from_deg(HEADING_EPSILON_DEG);
        if !status.direction.is_close_to(target, epsilon) {
            // Rotate in place toward the next scan heading
            self.heading_time = None;
            return (ExitLabel::Stay, Some(RobotCommands::move_to(target, 0.0)));
        }
        let since = *self.heading_time.get_or_insert(time);
        let elapsed = time.saturating_sub(since);
        if elapsed > self.scan.sweep_duration() {
            self.heading_index += 1;
            self.heading_time = None;
            return (ExitLabel::Stay, Some(RobotCommands::halt()));
        }
        (
            ExitLabel::Stay,
            Some(RobotCommands::halt().with_scan(self.scan.direction(elapsed))),
        )
    }
}
