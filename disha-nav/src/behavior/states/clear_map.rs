//! Map-reset state.

use serde::{Deserialize, Serialize};

use smriti_map::RobotCommands;

use crate::behavior::{EngineContext, ExitLabel, StateStep};

/// Requests a radar-map reset and completes immediately.
///
/// The engine applies the reset after the step, so the single writer of
/// the world model stays the control loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClearMapState {}

impl ClearMapState {
    pub fn step(&self, ctx: &mut EngineContext) -> StateStep {
        ctx.clear_map_requested = true;
        // A cleared map invalidates any published route
        ctx.clear_route();
        (ExitLabel::Completed, Some(RobotCommands::halt()))
    }
}
