//! Per-cell decaying evidence.
//!
//! Each cell accumulates two independent evidence channels:
//!
//! - **echo** evidence from the range sensor, a weight in `[-1, 1]` where
//!   positive means echogenic (obstacle) and non-positive means anechoic
//!   (free), blended toward the new observation by a time-proportional
//!   factor so stale evidence yields faster;
//! - **contact** evidence from the bumpers, a plain timestamp that outranks
//!   echo evidence while fresh.
//!
//! Times are simulation milliseconds; 0 means "no evidence".

use serde::{Deserialize, Serialize};

/// The classified state of a cell at a given read time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellBelief {
    /// No fresh evidence either way.
    Unknown,
    /// Fresh anechoic evidence and no contact.
    Empty,
    /// Fresh echogenic or contact evidence.
    Hindered,
}

/// One cell of decaying occupancy evidence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MapCell {
    /// Time of the last accepted echo observation (ms, 0 = none).
    pub echo_time: u64,
    /// Echo evidence weight in `[-1, 1]`, positive = echogenic.
    pub echo_weight: f64,
    /// Time of the last contact observation (ms, 0 = none).
    pub contact_time: u64,
}

impl MapCell {
    /// A cell with no evidence at all.
    pub const UNKNOWN: MapCell = MapCell {
        echo_time: 0,
        echo_weight: 0.0,
        contact_time: 0,
    };

    /// True when the cell holds no evidence of any kind.
    pub fn unknown(&self) -> bool {
        self.echo_time == 0 && self.contact_time == 0
    }

    /// True when the last echo evidence points to an obstacle.
    pub fn echogenic(&self) -> bool {
        self.echo_time > 0 && self.echo_weight > 0.0
    }

    /// True when the last echo evidence points to free space.
    pub fn anechoic(&self) -> bool {
        self.echo_time > 0 && self.echo_weight <= 0.0
    }

    /// True when the cell holds contact evidence.
    pub fn has_contact(&self) -> bool {
        self.contact_time > 0
    }

    /// True when the cell is known free: anechoic and contact-free.
    pub fn empty(&self) -> bool {
        !self.unknown() && !self.has_contact() && self.anechoic()
    }

    /// True when the cell blocks the robot: echogenic or contact.
    pub fn hindered(&self) -> bool {
        self.echogenic() || self.has_contact()
    }

    /// Blend factor for an observation at `time`: proportional to the age of
    /// the stored evidence, saturating at 1 after `decay` ms.
    fn alpha(&self, time: u64, decay: f64) -> f64 {
        ((time - self.echo_time) as f64 / decay).min(1.0)
    }

    /// Register an obstacle echo at `time`.
    ///
    /// Observations older than the stored evidence are ignored, so replayed
    /// or reordered telemetry can never regress freshness.
    pub fn add_echogenic(&mut self, time: u64, decay: f64) {
        if time < self.echo_time {
            return;
        }
        self.echo_weight = if self.echo_time == 0 {
            1.0
        } else {
            self.echo_weight + (1.0 - self.echo_weight) * self.alpha(time, decay)
        };
        self.echo_time = time;
    }

    /// Register a free-space (no obstacle) echo at `time`.
    pub fn add_anechoic(&mut self, time: u64, decay: f64) {
        if time < self.echo_time {
            return;
        }
        self.echo_weight = if self.echo_time == 0 {
            -1.0
        } else {
            self.echo_weight - (1.0 + self.echo_weight) * self.alpha(time, decay)
        };
        self.echo_time = time;
    }

    /// Register a contact at `time`. Monotonic.
    pub fn set_contact(&mut self, time: u64) {
        if time > self.contact_time {
            self.contact_time = time;
        }
    }

    /// Expire evidence not newer than the given limits.
    pub fn clean(&mut self, echo_limit: u64, contact_limit: u64) {
        if self.echo_time > 0 && self.echo_time <= echo_limit {
            self.echo_time = 0;
            self.echo_weight = 0.0;
        }
        if self.contact_time > 0 && self.contact_time <= contact_limit {
            self.contact_time = 0;
        }
    }

    /// Classify the cell as read at `now`, applying the hard persistence
    /// cutoffs even if no clean pass has run yet.
    pub fn belief(&self, now: u64, echo_persistence: u64, contact_persistence: u64) -> CellBelief {
        if self.contact_time > 0 && now < self.contact_time + contact_persistence {
            return CellBelief::Hindered;
        }
        if self.echo_time > 0 && now < self.echo_time + echo_persistence {
            if self.echo_weight > 0.0 {
                CellBelief::Hindered
            } else {
                CellBelief::Empty
            }
        } else {
            CellBelief::Unknown
        }
    }
}
