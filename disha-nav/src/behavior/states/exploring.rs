//! Free-roam exploration state.

use serde::{Deserialize, Serialize};

use smriti_map::{Bearing, Point2, RadarMap, RobotCommands, WorldModel};

use crate::behavior::{block_exit, AutoScan, ExitLabel, StateStep};
use crate::planning::pathfinder::safety_margin;

/// Candidate turns, smallest first so ties favor going straight.
const TURNS_DEG: [f64; 12] = [
    0.0, 30.0, -30.0, 60.0, -60.0, 90.0, -90.0, 120.0, -120.0, 150.0, -150.0, 180.0,
];

/// Drives ahead and turns toward the clearest heading whenever the current
/// one closes up within the stop distance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExploringState {
    /// Clearance below which a new heading is picked (m).
    pub stop_distance: f64,
    /// Probe range for clearance checks (m).
    pub max_distance: f64,
    /// Cruise speed (pps).
    pub speed: f64,
    pub scan: Option<AutoScan>,
}

impl Default for ExploringState {
    fn default() -> Self {
        Self {
            stop_distance: 0.4,
            max_distance: 2.0,
            speed: 30.0,
            scan: None,
        }
    }
}

impl ExploringState {
    pub fn step(&self, entry_time: u64, world: &WorldModel) -> StateStep {
        let status = world.status();
        if let Some(exit) = block_exit(status) {
            return (exit, Some(RobotCommands::halt()));
        }
        let map = world.radar();
        let safety = safety_margin(map);
        let ahead = clearance(
            map,
            &status.location,
            status.direction,
            safety,
            self.max_distance,
        );
        let direction = if ahead > self.stop_distance {
            status.direction
        } else {
            self.clearest_heading(map, status.location, status.direction, safety)
        };
        let mut commands = RobotCommands::move_and_front_scan(direction, self.speed);
        if let Some(scan) = &self.scan {
            let elapsed = status.simulation_time.saturating_sub(entry_time);
            commands = commands.with_scan(scan.direction(elapsed));
        }
        (ExitLabel::Stay, Some(commands))
    }

    fn clearest_heading(
        &self,
        map: &RadarMap,
        location: Point2,
        heading: Bearing,
        safety: f64,
    ) -> Bearing {
        let mut best = heading;
        let mut best_clearance = -1.0;
        for turn in TURNS_DEG {
            let candidate = heading.add(Bearing::from_deg(turn));
            let free = clearance(map, &location, candidate, safety, self.max_distance);
            if free > best_clearance {
                best = candidate;
                best_clearance = free;
            }
        }
        best
    }
}

/// The largest probed distance along `direction` with a clear trajectory,
/// probed in cell-size steps up to `max_distance`.
fn clearance(map: &RadarMap, from: &Point2, direction: Bearing, safety: f64, max_distance: f64) -> f64 {
    let step = map.topology().grid_size();
    let mut free = 0.0;
    let mut distance = step;
    while distance <= max_distance {
        if !map.free_trajectory(from, &direction.at(from, distance), safety) {
            break;
        }
        free = distance;
        distance += step;
    }
    free
}
