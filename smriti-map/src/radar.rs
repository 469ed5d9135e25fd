//! Decaying probabilistic occupancy map.
//!
//! The radar map owns a flat row-major buffer of [`MapCell`] over a
//! [`GridTopology`] and mutates it in place: the control loop is the single
//! writer, once per cycle, so there is no need for functional copies or
//! interior locking.

use std::collections::HashSet;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::bearing::Bearing;
use crate::cell::{CellBelief, MapCell};
use crate::error::Result;
use crate::grid::GridTopology;
use crate::point::Point2;
use crate::status::RobotStatus;

/// Maximum usable range of the echo sensor (m). Beyond this a missing echo
/// carries no information.
pub const MAX_SIGNAL_DISTANCE: f64 = 3.0;

/// Radar map tuning.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    /// Grid center in world coordinates (m).
    pub center: Point2,
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    /// Cell edge length (m).
    pub grid_size: f64,
    /// Echo evidence blend window (ms).
    pub echo_decay: f64,
    /// Echo evidence lifetime (ms).
    pub echo_persistence: u64,
    /// Contact evidence lifetime (ms).
    pub contact_persistence: u64,
    /// Minimum interval between expiry passes (ms).
    pub clean_interval: u64,
    /// Lateral tolerance of the echo beam (m).
    pub receptive_distance: f64,
    /// Angular half-width of the echo beam (deg).
    pub receptive_angle_deg: f64,
    /// Radius of the contact footprint around the robot (m).
    pub contact_radius: f64,
    /// Echoes closer than this are discarded as sensor noise (m).
    pub min_distance: f64,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            center: Point2::ZERO,
            width: 51,
            height: 51,
            grid_size: 0.2,
            echo_decay: 100_000.0,
            echo_persistence: 300_000,
            contact_persistence: 300_000,
            clean_interval: 30_000,
            receptive_distance: 0.1,
            receptive_angle_deg: 15.0,
            contact_radius: 0.28,
            min_distance: 0.1,
        }
    }
}

/// One echo measurement in world frame, ready for map fusion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SensorSignal {
    /// Sensor location (m).
    pub location: Point2,
    /// Beam direction in world frame.
    pub direction: Bearing,
    /// Measured distance (m), 0 = no echo within range.
    pub distance: f64,
    /// Measurement time (ms).
    pub time: u64,
}

/// The decaying occupancy grid.
#[derive(Clone, Debug)]
pub struct RadarMap {
    topology: GridTopology,
    cells: Vec<MapCell>,
    config: RadarConfig,
    /// Time of the last expiry pass (ms).
    clean_time: u64,
}

impl RadarMap {
    /// Build an all-unknown map from the configuration.
    pub fn new(config: RadarConfig) -> Result<Self> {
        let topology =
            GridTopology::new(config.center, config.width, config.height, config.grid_size)?;
        Ok(Self {
            topology,
            cells: vec![MapCell::UNKNOWN; topology.len()],
            config,
            clean_time: 0,
        })
    }

    pub fn topology(&self) -> &GridTopology {
        &self.topology
    }

    pub fn config(&self) -> &RadarConfig {
        &self.config
    }

    pub fn cells(&self) -> &[MapCell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> &MapCell {
        &self.cells[index]
    }

    /// Reset every cell to unknown.
    pub fn clear(&mut self) {
        self.cells.fill(MapCell::UNKNOWN);
        self.clean_time = 0;
        debug!("radar map cleared");
    }

    /// Classify a cell as read at `now`, applying the persistence cutoffs.
    pub fn belief_at(&self, index: usize, now: u64) -> CellBelief {
        self.cells[index].belief(
            now,
            self.config.echo_persistence,
            self.config.contact_persistence,
        )
    }

    /// Fuse one echo measurement into every cell inside the beam cone.
    ///
    /// A genuine hit marks the band at the reported distance echogenic and
    /// the cells before it anechoic; a max-range timeout (distance 0) marks
    /// the whole cone anechoic. Cells holding contact evidence are never
    /// overwritten by echo evidence.
    pub fn update_echo(&mut self, signal: &SensorSignal) {
        let receptive_angle = self.config.receptive_angle_deg.to_radians();
        let no_echo = signal.distance <= 0.0;
        if !no_echo && signal.distance < self.config.min_distance {
            return;
        }
        for index in 0..self.cells.len() {
            if self.cells[index].has_contact() {
                continue;
            }
            let location = self.topology.location(index);
            let distance = signal.location.distance(&location);
            if distance < self.config.min_distance || distance > MAX_SIGNAL_DISTANCE {
                continue;
            }
            // Beam half-width widens near the sensor so every cell whose
            // center is within the lateral tolerance is covered.
            let half_width = (self.config.receptive_distance / distance).min(1.0).asin()
                + receptive_angle;
            let offset = Bearing::direction(&signal.location, &location).sub(signal.direction);
            if offset.to_rad().abs() > half_width {
                continue;
            }
            if no_echo || distance < signal.distance - self.config.receptive_distance {
                self.cells[index].add_anechoic(signal.time, self.config.echo_decay);
            } else if distance <= signal.distance + self.config.receptive_distance {
                self.cells[index].add_echogenic(signal.time, self.config.echo_decay);
            }
            // Cells beyond the echo are shadowed, no evidence either way.
        }
    }

    /// Register contact evidence on every cell within `radius` of
    /// `location`.
    pub fn set_contacts_at(&mut self, location: &Point2, radius: f64, time: u64) {
        for index in 0..self.cells.len() {
            if self.topology.location(index).distance(location) <= radius {
                self.cells[index].set_contact(time);
            }
        }
    }

    /// Expire stale evidence. Gated by the clean interval so the sweep does
    /// not run every cycle.
    pub fn clean(&mut self, time: u64) {
        if time < self.clean_time + self.config.clean_interval {
            return;
        }
        let echo_limit = time.saturating_sub(self.config.echo_persistence);
        let contact_limit = time.saturating_sub(self.config.contact_persistence);
        for cell in &mut self.cells {
            cell.clean(echo_limit, contact_limit);
        }
        self.clean_time = time;
    }

    /// One telemetry fusion step: echo, contacts, then expiry.
    pub fn update(&mut self, status: &RobotStatus) {
        if status.echo.time > 0 {
            self.update_echo(&SensorSignal {
                location: status.location,
                direction: status.absolute_echo_direction(),
                distance: status.echo.distance,
                time: status.echo.time,
            });
        }
        if status.has_contact() {
            self.set_contacts_at(
                &status.location,
                self.config.contact_radius,
                status.simulation_time,
            );
        }
        self.clean(status.simulation_time);
    }

    /// Locations of all hindered cells.
    pub fn hindered_locations(&self) -> Vec<Point2> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.hindered())
            .map(|(index, _)| self.topology.location(index))
            .collect()
    }

    /// Indices of all unknown cells.
    pub fn unknown_indices(&self) -> HashSet<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.unknown())
            .map(|(index, _)| index)
            .collect()
    }

    /// True when no hindered cell lies within `safety` of the segment from
    /// `from` to `to`.
    pub fn free_trajectory(&self, from: &Point2, to: &Point2, safety: f64) -> bool {
        self.cells.iter().enumerate().all(|(index, cell)| {
            !cell.hindered()
                || self.topology.location(index).distance_to_segment(from, to) >= safety
        })
    }

    /// Centers of empty cells at least `safety` away from every hindered
    /// cell.
    pub fn safe_locations(&self, safety: f64) -> Vec<Point2> {
        let hindered = self.hindered_locations();
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.empty())
            .map(|(index, _)| self.topology.location(index))
            .filter(|location| hindered.iter().all(|h| h.distance(location) >= safety))
            .collect()
    }

    /// The nearest empty cell within the `[min_distance, max_distance]`
    /// band of `location` and within a quarter turn of `escape_dir`.
    ///
    /// Used by the contact-escape behavior to pick a retreat point.
    pub fn find_safe_target(
        &self,
        location: &Point2,
        escape_dir: Bearing,
        min_distance: f64,
        max_distance: f64,
    ) -> Option<Point2> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.empty())
            .map(|(index, _)| self.topology.location(index))
            .filter(|candidate| {
                let distance = location.distance(candidate);
                distance >= min_distance
                    && distance <= max_distance
                    && Bearing::direction(location, candidate)
                        .sub(escape_dir)
                        .cos()
                        > 0.0
            })
            .min_by(|a, b| {
                location
                    .distance(a)
                    .total_cmp(&location.distance(b))
            })
    }
}
