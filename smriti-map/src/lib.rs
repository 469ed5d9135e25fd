//! # SmritiMap
//!
//! Decaying occupancy world model for autonomous robot navigation.
//!
//! The map fuses noisy range-sensor echoes and contact-sensor events into a
//! bounded grid of evidence cells. Evidence weakens with elapsed time and
//! expires back to unknown after a persistence window, so the map never needs
//! explicit eviction and never grows.
//!
//! ## Components
//!
//! - [`Bearing`]: normalized directional value used wherever angles are
//!   composed or compared
//! - [`GridTopology`]: immutable world/index mapping of the cell grid
//! - [`MapCell`] / [`RadarMap`]: per-cell decaying echo and contact evidence
//! - [`LabelMarker`] / [`MarkerLocator`]: named landmarks with independent
//!   confidence decay
//! - [`RobotStatus`] / [`RobotCommands`]: the per-cycle telemetry/command
//!   boundary with the hardware layer
//! - [`WorldModel`]: one robot's complete spatial belief, updated once per
//!   control cycle
//!
//! ## Coordinate system
//!
//! World coordinates are meters, X east and Y north. Bearings are measured
//! clockwise from north (the +Y axis), matching the robot compass.

pub mod bearing;
pub mod cell;
pub mod error;
pub mod grid;
pub mod marker;
pub mod point;
pub mod radar;
pub mod status;
pub mod world;

pub use bearing::Bearing;
pub use cell::{CellBelief, MapCell};
pub use error::{MapError, Result};
pub use grid::GridTopology;
pub use marker::{CameraEvent, LabelMarker, MarkerLocator};
pub use point::Point2;
pub use radar::{RadarConfig, RadarMap, SensorSignal};
pub use status::{EchoSignal, RobotCommands, RobotStatus, MAX_PPS};
pub use world::{WorldModel, WorldModelConfig};
