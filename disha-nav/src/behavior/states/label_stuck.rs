//! Marker-parking state.

use serde::{Deserialize, Serialize};

use smriti_map::{Bearing, Point2, RobotCommands, WorldModel};

use crate::behavior::{approach_speed, block_exit, ExitLabel, StateStep};

/// Parks the robot inside a distance band of a tracked marker, facing it.
///
/// Completes once the robot sits in the band with the marker within the
/// heading tolerance; `NotFound` when no marker is tracked.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelStuckState {
    /// Restrict to one label; the nearest marker when absent.
    pub label: Option<String>,
    /// Inner parking distance (m).
    pub min_distance: f64,
    /// Outer parking distance (m).
    pub max_distance: f64,
    /// Approach speed (pps).
    pub speed: f64,
    /// Heading tolerance toward the marker (deg).
    pub direction_range_deg: f64,
}

impl Default for LabelStuckState {
    fn default() -> Self {
        Self {
            label: None,
            min_distance: 0.6,
            max_distance: 1.0,
            speed: 20.0,
            direction_range_deg: 15.0,
        }
    }
}

impl LabelStuckState {
    fn marker_location(&self, world: &WorldModel) -> Option<Point2> {
        let location = world.status().location;
        match &self.label {
            Some(label) => world.marker(label).map(|marker| marker.location),
            None => world
                .markers()
                .values()
                .map(|marker| marker.location)
                .min_by(|a, b| location.distance(a).total_cmp(&location.distance(b))),
        }
    }

    pub fn step(&self, world: &WorldModel) -> StateStep {
        let status = world.status();
        if let Some(exit) = block_exit(status) {
            return (exit, Some(RobotCommands::halt()));
        }
        let marker = match self.marker_location(world) {
            Some(marker) => marker,
            None => return (ExitLabel::NotFound, Some(RobotCommands::halt())),
        };
        let distance = status.location.distance(&marker);
        let to_marker = Bearing::direction(&status.location, &marker);
        if distance >= self.min_distance && distance <= self.max_distance {
            let epsilon = Bearing::from_deg(self.direction_range_deg);
            if status.direction.is_close_to(to_marker, epsilon) {
                return (ExitLabel::Completed, Some(RobotCommands::halt()));
            }
            // In the band, turn to face the marker
            return (ExitLabel::Stay, Some(RobotCommands::move_to(to_marker, 0.0)));
        }
        // Head for the middle of the band on the robot's side of the marker
        let park = Bearing::direction(&marker, &status.location)
            .at(&marker, (self.min_distance + self.max_distance) / 2.0);
        let direction = Bearing::direction(&status.location, &park);
        let speed = approach_speed(status.location.distance(&park), 0.1, self.speed);
        (
            ExitLabel::Stay,
            Some(RobotCommands::move_and_front_scan(direction, speed)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smriti_map::{CameraEvent, RobotStatus, WorldModelConfig};

    /// A world tracking a "dock" marker at roughly (0, 2.1).
    fn world_at(location: Point2, heading_deg: f64) -> WorldModel {
        let mut world = WorldModel::new(WorldModelConfig::default()).unwrap();
        let mut status = RobotStatus::new(1000);
        status.echo.time = 1000;
        status.echo.distance = 2.0;
        let camera = CameraEvent {
            time: 1000,
            label: "dock".to_string(),
        };
        world.update(status, Some(&camera));
        let mut status = RobotStatus::new(2000);
        status.location = location;
        status.direction = Bearing::from_deg(heading_deg);
        world.update(status, None);
        world
    }

    #[test]
    fn test_approaches_from_afar() {
        let world = world_at(Point2::new(0.0, -1.0), 0.0);
        let (exit, commands) = LabelStuckState::default().step(&world);
        assert_eq!(exit, ExitLabel::Stay);
        let movement = commands.unwrap().movement.unwrap();
        assert_eq!(movement.direction.to_int_deg(), 0);
        assert!(movement.speed > 0.0);
    }

    #[test]
    fn test_turns_in_band() {
        let world = world_at(Point2::new(0.0, 1.3), 90.0);
        let (exit, commands) = LabelStuckState::default().step(&world);
        assert_eq!(exit, ExitLabel::Stay);
        let movement = commands.unwrap().movement.unwrap();
        assert_eq!(movement.speed, 0.0);
        assert_eq!(movement.direction.to_int_deg(), 0);
    }

    #[test]
    fn test_completes_parked_and_facing() {
        let world = world_at(Point2::new(0.0, 1.3), 0.0);
        let (exit, commands) = LabelStuckState::default().step(&world);
        assert_eq!(exit, ExitLabel::Completed);
        assert!(commands.unwrap().halt);
    }

    #[test]
    fn test_no_marker_is_not_found() {
        let mut world = WorldModel::new(WorldModelConfig::default()).unwrap();
        world.update(RobotStatus::new(1000), None);
        let (exit, _) = LabelStuckState::default().step(&world);
        assert_eq!(exit, ExitLabel::NotFound);
    }
}
