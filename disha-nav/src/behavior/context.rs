//! Shared engine context.

use std::collections::HashMap;

use smriti_map::Point2;

use super::script::Value;

/// Mutable state shared by the flow, its scripts, and the behavior states.
///
/// States communicate through the context, never directly: a finder state
/// publishes a target and a path, the follower state consumes them, and the
/// side-effect scripts read and write the variable store.
#[derive(Clone, Debug, Default)]
pub struct EngineContext {
    /// Script variable store.
    pub vars: HashMap<String, Value>,
    /// Current navigation target, published by finder states.
    pub target: Option<Point2>,
    /// Published waypoint path, consumed front to back by the follower.
    pub path: Vec<Point2>,
    /// Set by the clear-map state, consumed by the engine after the step.
    pub clear_map_requested: bool,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a path and its final point as the current target.
    pub fn publish_path(&mut self, path: Vec<Point2>) {
        self.target = path.last().copied();
        self.path = path;
    }

    /// Drop the published target and path.
    pub fn clear_route(&mut self) {
        self.target = None;
        self.path.clear();
    }
}
