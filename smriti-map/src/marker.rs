//! Named landmark tracking.
//!
//! Labels recognized by the camera are anchored in the world by correlating
//! each sighting with a fresh range echo: the echo gives the distance, the
//! sensor heading gives the direction. Marker confidence decays on its own
//! clock, independent of radar-cell decay, and a marker swept repeatedly by
//! the sensor without being re-sighted is eventually dropped.

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::bearing::Bearing;
use crate::point::Point2;
use crate::status::RobotStatus;

/// One camera recognition event.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraEvent {
    /// Recognition time (ms).
    pub time: u64,
    /// Recognized label, empty when nothing was recognized.
    pub label: String,
}

/// A tracked landmark.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelMarker {
    pub label: String,
    /// Estimated location (m).
    pub location: Point2,
    /// Confidence weight in `(0, 1]`.
    pub weight: f64,
    /// Time of the last sighting (ms).
    pub marker_time: u64,
    /// Time of the last decay pass that touched this marker (ms).
    pub clean_time: u64,
}

/// Correlates camera sightings with echoes and ages the marker set.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerLocator {
    /// Location low-pass window (ms).
    pub location_decay: f64,
    /// Confidence decay window for unconfirmed sweeps (ms).
    pub clean_decay: f64,
    /// Maximum echo age for a sighting to be localizable (ms).
    pub correlation_interval: u64,
    /// Physical marker size (m), offsets the echo distance to the marker
    /// center.
    pub marker_size: f64,
}

impl Default for MarkerLocator {
    fn default() -> Self {
        Self {
            location_decay: 100_000.0,
            clean_decay: 30_000.0,
            correlation_interval: 500,
            marker_size: 0.2,
        }
    }
}

impl MarkerLocator {
    /// Fuse one camera sighting into the marker set.
    ///
    /// The sighting is dropped when no echo is close enough in time to give
    /// it a range.
    pub fn update(
        &self,
        markers: &mut HashMap<String, LabelMarker>,
        camera: &CameraEvent,
        status: &RobotStatus,
    ) {
        if camera.label.is_empty() {
            return;
        }
        let echo = &status.echo;
        if echo.distance <= 0.0
            || camera.time < echo.time
            || camera.time - echo.time > self.correlation_interval
        {
            return;
        }
        let observed = status
            .absolute_echo_direction()
            .at(&status.location, echo.distance + self.marker_size / 2.0);
        match markers.get_mut(&camera.label) {
            Some(marker) => {
                let alpha =
                    ((camera.time.saturating_sub(marker.marker_time)) as f64 / self.location_decay)
                        .min(1.0);
                marker.weight += (1.0 - marker.weight) * alpha;
                marker.location = Point2::new(
                    marker.location.x + (observed.x - marker.location.x) * alpha,
                    marker.location.y + (observed.y - marker.location.y) * alpha,
                );
                marker.marker_time = camera.time;
                marker.clean_time = camera.time;
            }
            None => {
                debug!("new marker {} at {:?}", camera.label, observed);
                markers.insert(
                    camera.label.clone(),
                    LabelMarker {
                        label: camera.label.clone(),
                        location: observed,
                        weight: 1.0,
                        marker_time: camera.time,
                        clean_time: camera.time,
                    },
                );
            }
        }
    }

    /// Decay markers inside the swept sensor cone that were not re-sighted,
    /// removing those whose confidence drops to zero.
    ///
    /// `half_angle_rad` is the angular half-width of the cone.
    pub fn clean(
        &self,
        markers: &mut HashMap<String, LabelMarker>,
        center: &Point2,
        direction: Bearing,
        distance: f64,
        half_angle_rad: f64,
        time: u64,
    ) {
        markers.retain(|label, marker| {
            if marker.clean_time >= time {
                return true;
            }
            let range = center.distance(&marker.location);
            if range > distance {
                return true;
            }
            let offset = Bearing::direction(center, &marker.location).sub(direction);
            if offset.to_rad().abs() > half_angle_rad {
                return true;
            }
            let alpha = ((time - marker.clean_time) as f64 / self.clean_decay).min(1.0);
            marker.weight -= (1.0 + marker.weight) * alpha;
            marker.clean_time = time;
            if marker.weight <= 0.0 {
                debug!("marker {} expired", label);
                false
            } else {
                true
            }
        });
    }
}
