//! Grid-path planning state.

use serde::{Deserialize, Serialize};

use smriti_map::{RobotCommands, WorldModel};

use crate::behavior::{EngineContext, ExitLabel, StateStep};
use crate::planning::SafePlanner;

/// Plans an optimal grid path to the context target over the inflated
/// obstacle map and publishes it for the path follower.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FindPathState {
    /// Obstacle inflation margin (m).
    pub safe_distance: f64,
}

impl Default for FindPathState {
    fn default() -> Self {
        Self { safe_distance: 0.3 }
    }
}

impl FindPathState {
    pub fn step(&self, ctx: &mut EngineContext, world: &WorldModel) -> StateStep {
        let status = world.status();
        let target = match ctx.target {
            Some(target) => target,
            None => return (ExitLabel::NotFound, Some(RobotCommands::halt())),
        };
        let planner = SafePlanner::new(world.radar(), self.safe_distance);
        match planner.find_path(&status.location, &target) {
            Some(path) => {
                ctx.publish_path(path);
                (ExitLabel::Completed, Some(RobotCommands::halt()))
            }
            None => (ExitLabel::NotFound, Some(RobotCommands::halt())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smriti_map::{Point2, RadarConfig, RobotStatus, WorldModelConfig};

    fn world() -> WorldModel {
        let mut config = WorldModelConfig::default();
        config.radar = RadarConfig {
            width: 21,
            height: 21,
            ..Default::default()
        };
        let mut world = WorldModel::new(config).unwrap();
        world.update(RobotStatus::new(1000), None);
        world
    }

    #[test]
    fn test_publishes_path_to_target() {
        let mut ctx = EngineContext::new();
        ctx.target = Some(Point2::new(0.0, 1.0));
        let (exit, _) = FindPathState::default().step(&mut ctx, &world());
        assert_eq!(exit, ExitLabel::Completed);
        assert!(!ctx.path.is_empty());
        assert_eq!(*ctx.path.last().unwrap(), Point2::new(0.0, 1.0));
    }

    #[test]
    fn test_no_target_is_not_found() {
        let mut ctx = EngineContext::new();
        let (exit, _) = FindPathState::default().step(&mut ctx, &world());
        assert_eq!(exit, ExitLabel::NotFound);
    }

    #[test]
    fn test_unreachable_target_is_not_found() {
        let mut ctx = EngineContext::new();
        ctx.target = Some(Point2::new(9.0, 9.0));
        let (exit, _) = FindPathState::default().step(&mut ctx, &world());
        assert_eq!(exit, ExitLabel::NotFound);
    }
}
