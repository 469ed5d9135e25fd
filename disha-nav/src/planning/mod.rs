//! Path planning.
//!
//! Two generic searchers and their robot-specific adapters:
//!
//! - [`Rrt`]: rapidly-exploring random tree over any state type, strategies
//!   injected as closures
//! - [`AStar`]: optimal graph search over any hashable node type
//! - [`RrtPathFinder`]: RRT over snapped radar-map cell centers with
//!   frontier, label, and least-explored goal selection
//! - [`SafePlanner`]: discrete A* over the radar grid with an inflated
//!   obstacle margin

pub mod astar;
pub mod pathfinder;
pub mod rrt;
pub mod safety;

pub use astar::AStar;
pub use pathfinder::{RrtPathFinder, ROBOT_RADIUS};
pub use rrt::Rrt;
pub use safety::SafePlanner;
