//! Point-approach state.

use serde::{Deserialize, Serialize};

use smriti_map::{Bearing, Point2, RobotCommands, WorldModel};

use crate::behavior::{approach_speed, block_exit, EngineContext, ExitLabel, StateStep};

/// Moves the robot to a target point, ramping the speed down on approach
/// and optionally settling on a final heading.
///
/// The target is either configured or taken from the context, where a
/// finder state published it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveToState {
    /// Fixed target; falls back to the context target when absent.
    pub target: Option<Point2>,
    /// Completion distance from the target (m).
    pub stop_distance: f64,
    /// Maximum approach speed (pps).
    pub speed: f64,
    /// Required final heading (deg), if any.
    pub final_direction_deg: Option<f64>,
    /// Heading tolerance for completion (deg).
    pub direction_range_deg: f64,
}

impl Default for MoveToState {
    fn default() -> Self {
        Self {
            target: None,
            stop_distance: 0.2,
            speed: 40.0,
            final_direction_deg: None,
            direction_range_deg: 10.0,
        }
    }
}

impl MoveToState {
    pub fn step(&self, ctx: &EngineContext, world: &WorldModel) -> StateStep {
        let status = world.status();
        if let Some(exit) = block_exit(status) {
            return (exit, Some(RobotCommands::halt()));
        }
        let target = match self.target.or(ctx.target) {
            Some(target) => target,
            None => return (ExitLabel::NotFound, Some(RobotCommands::halt())),
        };
        let distance = status.location.distance(&target);
        if distance <= self.stop_distance {
            if let Some(final_deg) = self.final_direction_deg {
                let final_direction = Bearing::from_deg(final_deg);
                let epsilon = Bearing::from_deg(self.direction_range_deg);
                if !status.direction.is_close_to(final_direction, epsilon) {
                    // In position, settle the heading
                    return (
                        ExitLabel::Stay,
                        Some(RobotCommands::move_to(final_direction, 0.0)),
                    );
                }
            }
            return (ExitLabel::Completed, Some(RobotCommands::halt()));
        }
        let direction = Bearing::direction(&status.location, &target);
        let speed = approach_speed(distance, self.stop_distance, self.speed);
        (
            ExitLabel::Stay,
            Some(RobotCommands::move_and_front_scan(direction, speed)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::behavior::MIN_PPS;
    use smriti_map::{RobotStatus, WorldModelConfig};

    fn world_at(location: Point2, heading_deg: f64) -> WorldModel {
        let mut world = WorldModel::new(WorldModelConfig::default()).unwrap();
        let mut status = RobotStatus::new(1000);
        status.location = location;
        status.direction = Bearing::from_deg(heading_deg);
        world.update(status, None);
        world
    }

    fn to(target: Point2) -> MoveToState {
        MoveToState {
            target: Some(target),
            ..Default::default()
        }
    }

    #[test]
    fn test_far_approach_is_fast() {
        let state = to(Point2::new(0.0, 3.0));
        let (exit, commands) = state.step(&EngineContext::new(), &world_at(Point2::ZERO, 0.0));
        assert_eq!(exit, ExitLabel::Stay);
        let movement = commands.unwrap().movement.unwrap();
        assert_eq!(movement.direction.to_int_deg(), 0);
        assert_eq!(movement.speed, state.speed);
    }

    #[test]
    fn test_near_approach_slows() {
        let state = to(Point2::new(0.0, 0.3));
        let (_, commands) = state.step(&EngineContext::new(), &world_at(Point2::ZERO, 0.0));
        assert_relative_eq!(
            commands.unwrap().movement.unwrap().speed,
            MIN_PPS + (state.speed - MIN_PPS) * 0.25,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_completes_inside_stop_distance() {
        let state = to(Point2::new(0.0, 0.1));
        let (exit, commands) = state.step(&EngineContext::new(), &world_at(Point2::ZERO, 0.0));
        assert_eq!(exit, ExitLabel::Completed);
        assert!(commands.unwrap().halt);
    }

    #[test]
    fn test_settles_final_heading() {
        let state = MoveToState {
            target: Some(Point2::ZERO),
            final_direction_deg: Some(90.0),
            ..Default::default()
        };
        let (exit, commands) = state.step(&EngineContext::new(), &world_at(Point2::ZERO, 0.0));
        assert_eq!(exit, ExitLabel::Stay);
        let movement = commands.unwrap().movement.unwrap();
        assert_eq!(movement.direction.to_int_deg(), 90);
        assert_eq!(movement.speed, 0.0);
        let (exit, _) = state.step(&EngineContext::new(), &world_at(Point2::ZERO, 85.0));
        assert_eq!(exit, ExitLabel::Completed);
    }

    #[test]
    fn test_context_target_fallback() {
        let mut ctx = EngineContext::new();
        ctx.target = Some(Point2::new(1.0, 0.0));
        let state = MoveToState::default();
        let (exit, commands) = state.step(&ctx, &world_at(Point2::ZERO, 0.0));
        assert_eq!(exit, ExitLabel::Stay);
        assert_eq!(
            commands.unwrap().movement.unwrap().direction.to_int_deg(),
            90
        );
    }

    #[test]
    fn test_no_target_anywhere() {
        let state = MoveToState::default();
        let (exit, _) = state.step(&EngineContext::new(), &world_at(Point2::ZERO, 0.0));
        assert_eq!(exit, ExitLabel::NotFound);
    }
}
