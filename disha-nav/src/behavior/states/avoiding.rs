//! Contact-escape state.

use serde::{Deserialize, Serialize};

use smriti_map::{Bearing, Point2, RobotCommands, WorldModel};

use crate::behavior::{ExitLabel, StateStep};

/// Where and how the robot hit something.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Contact {
    point: Point2,
    front: bool,
}

/// Backs the robot away from a contact until it is a safe distance from
/// the contact point.
///
/// On the first step with an active contact the state remembers the point
/// and which end hit; it then retreats toward a safe cell picked from the
/// radar map (or blindly away when the map offers none) and completes at
/// `safe_distance` from the remembered point. Both ends blocked is a dead
/// end and exits `Blocked`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvoidingState {
    /// Escape distance from the contact point (m).
    pub safe_distance: f64,
    /// Search radius for a safe retreat cell (m).
    pub max_distance: f64,
    /// Retreat speed (pps).
    pub speed: f64,
    #[serde(skip)]
    contact: Option<Contact>,
    #[serde(skip)]
    target: Option<Point2>,
}

impl Default for AvoidingState {
    fn default() -> Self {
        Self {
            safe_distance: 0.3,
            max_distance: 2.0,
            speed: 20.0,
            contact: None,
            target: None,
        }
    }
}

impl AvoidingState {
    /// Forget the remembered contact.
    pub fn reset(&mut self) {
        self.contact = None;
        self.target = None;
    }

    pub fn step(&mut self, world: &WorldModel) -> StateStep {
        let status = world.status();
        if !status.can_move_forward && !status.can_move_backward {
            return (ExitLabel::Blocked, Some(RobotCommands::halt()));
        }
        let contact = match self.contact {
            Some(contact) => contact,
            None => {
                if !status.has_contact() {
                    // Nothing to escape from
                    return (ExitLabel::Completed, Some(RobotCommands::halt()));
                }
                let contact = Contact {
                    point: status.location,
                    front: !status.can_move_forward,
                };
                self.contact = Some(contact);
                contact
            }
        };
        if status.location.distance(&contact.point) >= self.safe_distance {
            self.reset();
            return (ExitLabel::Completed, Some(RobotCommands::halt()));
        }
        if self.target.is_none() {
            let escape = if contact.front {
                status.direction.opposite()
            } else {
                status.direction
            };
            self.target = world.radar().find_safe_target(
                &status.location,
                escape,
                self.safe_distance + 0.2,
                self.max_distance,
            );
        }
        let commands = match self.target {
            Some(target) => {
                let direction = Bearing::direction(&status.location, &target);
                // Reverse toward targets behind the robot instead of
                // turning around while still in contact
                if direction.sub(status.direction).cos() >= 0.0 {
                    RobotCommands::move_to(direction, self.speed)
                } else {
                    RobotCommands::move_to(direction.opposite(), -self.speed)
                }
            }
            None => {
                let speed = if contact.front { -self.speed } else { self.speed };
                RobotCommands::move_to(status.direction, speed)
            }
        };
        (ExitLabel::Stay, Some(commands))
    }
}
