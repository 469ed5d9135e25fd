//! Path-following state.

use serde::{Deserialize, Serialize};

use smriti_map::{Bearing, RobotCommands, WorldModel};

use crate::behavior::{approach_speed, block_exit, EngineContext, ExitLabel, StateStep};

/// Follows the waypoint path published in the context, consuming each
/// waypoint as the robot reaches it and completing at the last one.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovePathState {
    /// Waypoint capture distance (m).
    pub stop_distance: f64,
    /// Maximum cruise speed (pps).
    pub speed: f64,
}

impl Default for MovePathState {
    fn default() -> Self {
        Self {
            stop_distance: 0.2,
            speed: 40.0,
        }
    }
}

impl MovePathState {
    pub fn step(&self, ctx: &mut EngineContext, world: &WorldModel) -> StateStep {
        let status = world.status();
        if let Some(exit) = block_exit(status) {
            return (exit, Some(RobotCommands::halt()));
        }
        while ctx
            .path
            .first()
            .map_or(false, |waypoint| {
                status.location.distance(waypoint) <= self.stop_distance
            })
        {
            ctx.path.remove(0);
        }
        let waypoint = match ctx.path.first() {
            Some(waypoint) => *waypoint,
            None => {
                ctx.clear_route();
                return (ExitLabel::Completed, Some(RobotCommands::halt()));
            }
        };
        let direction = Bearing::direction(&status.location, &waypoint);
        // Ramp down toward the end of the whole path, not each waypoint
        let remaining = ctx
            .path
            .last()
            .map_or(0.0, |last| status.location.distance(last));
        let speed = approach_speed(remaining, self.stop_distance, self.speed);
        (
            ExitLabel::Stay,
            Some(RobotCommands::move_and_front_scan(direction, speed)),
        )
    }
}
