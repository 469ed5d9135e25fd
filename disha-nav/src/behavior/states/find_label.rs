//! Label-search state.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use smriti_map::{Point2, RobotCommands, WorldModel};

use crate::behavior::{EngineContext, ExitLabel, StateStep};
use crate::planning::RrtPathFinder;

/// Grows an RRT toward the ring of cells around any tracked marker and
/// publishes the found path. `NotFound` when no marker is tracked.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FindLabelState {
    /// Restrict the search to one label; any marker when absent.
    pub label: Option<String>,
    /// Inner radius of the goal ring around a marker (m).
    pub min_distance: f64,
    /// Outer radius of the goal ring (m).
    pub max_distance: f64,
    /// RRT steering step (m).
    pub growth_distance: f64,
    /// Growth-round budget.
    pub max_iterations: usize,
    /// Sampler seed.
    pub seed: u64,
}

impl Default for FindLabelState {
    fn default() -> Self {
        Self {
            label: None,
            min_distance: 0.4,
            max_distance: 1.0,
            growth_distance: 0.5,
            max_iterations: 500,
            seed: 1234,
        }
    }
}

impl FindLabelState {
    pub fn step(&self, ctx: &mut EngineContext, world: &WorldModel) -> StateStep {
        let status = world.status();
        let markers: Vec<Point2> = match &self.label {
            Some(label) => world.marker(label).map(|m| m.location).into_iter().collect(),
            None => world.markers().values().map(|m| m.location).collect(),
        };
        if markers.is_empty() {
            return (ExitLabel::NotFound, Some(RobotCommands::halt()));
        }
        let mut finder = RrtPathFinder::label_targets(
            world.radar(),
            status.location,
            &markers,
            self.min_distance,
            self.max_distance,
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
