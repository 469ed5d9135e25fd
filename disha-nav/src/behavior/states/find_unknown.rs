//! Frontier-search state.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use smriti_map::{RobotCommands, WorldModel};

use crate::behavior::{EngineContext, ExitLabel, StateStep};
use crate::planning::RrtPathFinder;

/// Grows an RRT toward the frontier of the unknown region and publishes
/// the found path.
///
/// The whole iteration budget runs inside one step; the robot is halted
/// while planning. A fixed seed keeps replanning reproducible.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FindUnknownState {
    /// RRT steering step (m).
    pub growth_distance: f64,
    /// Growth-round budget.
    pub max_iterations: usize,
    /// Sampler seed.
    pub seed: u64,
}

impl Default for FindUnknownState {
    fn default() -> Self {
        Self {
            growth_distance: 0.5,
            max_iterations: 500,
            seed: 1234,
        }
    }
}

impl FindUnknownState {
    pub fn step(&self, ctx: &mut EngineContext, world: &WorldModel) -> StateStep {
        let status = world.status();
        let mut finder = RrtPathFinder::unknown_targets(
            world.radar(),
            status.location,
            self.growth_distance,
            self.max_iterations,
            StdRng::seed_from_u64(self.seed),
        );
        while !finder.is_completed() {
            finder.grow();
        }
        match finder.path() {
            Some(path) => {
                ctx.publish_path(path);
                (ExitLabel::Completed, Some(RobotCommands::halt()))
            }
            None => (ExitLabel::NotFound, Some(RobotCommands::halt())),
        }
    }
}
