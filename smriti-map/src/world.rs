//! Per-robot world model.
//!
//! One [`WorldModel`] holds everything a robot believes about its
//! surroundings: the decaying radar map, the named markers, and the last
//! telemetry snapshot. It is owned by the control loop and updated exactly
//! once per cycle, never shared.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::marker::{CameraEvent, LabelMarker, MarkerLocator};
use crate::radar::{RadarConfig, RadarMap, MAX_SIGNAL_DISTANCE};
use crate::status::RobotStatus;

/// World-model configuration, loadable from TOML.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldModelConfig {
    pub radar: RadarConfig,
    pub markers: MarkerLocator,
}

/// The robot's complete spatial belief.
#[derive(Clone, Debug)]
pub struct WorldModel {
    radar: RadarMap,
    markers: HashMap<String, LabelMarker>,
    locator: MarkerLocator,
    status: RobotStatus,
}

impl WorldModel {
    pub fn new(config: WorldModelConfig) -> Result<Self> {
        Ok(Self {
            radar: RadarMap::new(config.radar)?,
            markers: HashMap::new(),
            locator: config.markers,
            status: RobotStatus::new(0),
        })
    }

    pub fn radar(&self) -> &RadarMap {
        &self.radar
    }

    pub fn markers(&self) -> &HashMap<String, LabelMarker> {
        &self.markers
    }

    pub fn marker(&self, label: &str) -> Option<&LabelMarker> {
        self.markers.get(label)
    }

    /// The last telemetry snapshot fused into the model.
    pub fn status(&self) -> &RobotStatus {
        &self.status
    }

    /// Forget all radar evidence. Markers are kept, they decay on their own
    /// clock.
    pub fn clear_radar(&mut self) {
        self.radar.clear();
    }

    /// One fusion cycle: radar evidence, marker correlation, marker decay.
    pub fn update(&mut self, status: RobotStatus, camera: Option<&CameraEvent>) {
        self.radar.update(&status);
        if let Some(camera) = camera {
            self.locator.update(&mut self.markers, camera, &status);
        }
        self.locator.clean(
            &mut self.markers,
            &status.location,
            status.absolute_sensor_direction(),
            MAX_SIGNAL_DISTANCE,
            self.radar.config().receptive_angle_deg.to_radians(),
            status.simulation_time,
        );
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point2;

    fn world() -> WorldModel {
        let mut config = WorldModelConfig::default();
        config.radar.min_distance = 0.0;
        WorldModel::new(config).unwrap()
    }

    fn status_with_echo(time: u64, distance: f64) -> RobotStatus {
        let mut status = RobotStatus::new(time);
        status.echo.time = time;
        status.echo.distance = distance;
        status
    }

    #[test]
    fn test_update_fuses_radar_and_markers() {
        let mut world = world();
        let camera = CameraEvent {
            time: 1000,
            label: "dock".to_string(),
        };
        world.update(status_with_echo(1000, 1.0), Some(&camera));

        // Marker anchored by the echo
        let marker = world.marker("dock").unwrap();
        assert!(marker.location.y > 1.0);
        // Radar sees the obstacle band at the echo distance
        let index = world
            .radar()
            .topology()
            .index_of(&Point2::new(0.0, 1.0))
            .unwrap();
        assert!(world.radar().cell(index).echogenic());
        assert_eq!(world.status().simulation_time, 1000);
    }

    #[test]
    fn test_clear_radar_keeps_markers() {
        let mut world = world();
        let camera = CameraEvent {
            time: 1000,
            label: "dock".to_string(),
        };
        world.update(status_with_echo(1000, 1.0), Some(&camera));
        world.clear_radar();
        assert!(world.radar().cells().iter().all(|cell| cell.unknown()));
        assert!(world.marker("dock").is_some());
    }
}
