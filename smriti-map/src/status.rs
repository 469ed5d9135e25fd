//! Robot telemetry and command types.
//!
//! [`RobotStatus`] is the immutable per-cycle snapshot coming up from the
//! hardware layer; [`RobotCommands`] is the single actuation message going
//! back down. The behavior layer never talks to the hardware any other way.

use crate::bearing::Bearing;
use crate::point::Point2;

/// Maximum wheel speed in encoder pulses per second.
pub const MAX_PPS: f64 = 60.0;

/// One range-sensor measurement.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EchoSignal {
    /// Sensor head direction relative to the robot at measurement time.
    pub direction: Bearing,
    /// Measured distance in meters, 0 = no echo within range.
    pub distance: f64,
    /// Measurement time (ms).
    pub time: u64,
}

/// Immutable snapshot of the robot state for one control cycle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RobotStatus {
    /// Simulation clock (ms). All decay arithmetic uses this clock.
    pub simulation_time: u64,
    /// Estimated robot location (m).
    pub location: Point2,
    /// Robot heading.
    pub direction: Bearing,
    /// Sensor head direction relative to the robot.
    pub sensor_direction: Bearing,
    /// False when the front contact sensors inhibit forward motion.
    pub can_move_forward: bool,
    /// False when the rear contact sensors inhibit backward motion.
    pub can_move_backward: bool,
    /// Front proximity range (m, 0 = unknown).
    pub front_range: f64,
    /// Rear proximity range (m, 0 = unknown).
    pub rear_range: f64,
    /// Latest range measurement.
    pub echo: EchoSignal,
}

impl RobotStatus {
    /// A free-standing status at `time`, unobstructed, heading north.
    pub fn new(time: u64) -> Self {
        Self {
            simulation_time: time,
            can_move_forward: true,
            can_move_backward: true,
            ..Default::default()
        }
    }

    /// Sensor head direction in world frame.
    pub fn absolute_sensor_direction(&self) -> Bearing {
        self.direction.add(self.sensor_direction)
    }

    /// Echo direction in world frame.
    pub fn absolute_echo_direction(&self) -> Bearing {
        self.direction.add(self.echo.direction)
    }

    /// True when any contact sensor is active.
    pub fn has_contact(&self) -> bool {
        !self.can_move_forward || !self.can_move_backward
    }
}

/// Movement part of a command: heading and signed speed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Movement {
    pub direction: Bearing,
    /// Signed speed in pps; negative moves backward.
    pub speed: f64,
}

/// One actuation message: any combination of halt, move, and scan.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RobotCommands {
    pub halt: bool,
    pub movement: Option<Movement>,
    pub scan: Option<Bearing>,
}

impl RobotCommands {
    /// No actuation at all.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Stop the wheels.
    pub fn halt() -> Self {
        Self {
            halt: true,
            ..Default::default()
        }
    }

    /// Move along `direction` at `speed` pps, clamped to the drivetrain
    /// limit.
    pub fn move_to(direction: Bearing, speed: f64) -> Self {
        Self {
            movement: Some(Movement {
                direction,
                speed: speed.clamp(-MAX_PPS, MAX_PPS),
            }),
            ..Default::default()
        }
    }

    /// Point the sensor head at `direction` (robot-relative).
    pub fn scan(direction: Bearing) -> Self {
        Self {
            scan: Some(direction),
            ..Default::default()
        }
    }

    /// Move with the sensor head locked forward.
    pub fn move_and_front_scan(direction: Bearing, speed: f64) -> Self {
        Self::move_to(direction, speed).with_scan(Bearing::NORTH)
    }

    /// Add or replace the scan part of this command.
    pub fn with_scan(mut self, direction: Bearing) -> Self {
        self.scan = Some(direction);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_clamped() {
        let cmd = RobotCommands::move_to(Bearing::NORTH, 1000.0);
        assert_eq!(cmd.movement.unwrap().speed, MAX_PPS);
        let cmd = RobotCommands::move_to(Bearing::NORTH, -1000.0);
        assert_eq!(cmd.movement.unwrap().speed, -MAX_PPS);
    }

    #[test]
    fn test_move_and_front_scan() {
        let cmd = RobotCommands::move_and_front_scan(Bearing::EAST, 20.0);
        assert!(cmd.movement.is_some());
        assert_eq!(cmd.scan, Some(Bearing::NORTH));
        assert!(!cmd.halt);
    }

    #[test]
    fn test_absolute_directions() {
        let mut status = RobotStatus::new(0);
        status.direction = Bearing::from_deg(90.0);
        status.sensor_direction = Bearing::from_deg(30.0);
        assert_eq!(status.absolute_sensor_direction().to_int_deg(), 120);
    }

    #[test]
    fn test_contact_flags() {
        let mut status = RobotStatus::new(0);
        assert!(!status.has_contact());
        status.can_move_forward = false;
        assert!(status.has_contact());
    }
}
