//! Finite-state behavior engine.
//!
//! A behavior is a flow of [`StateNode`]s: each node wraps one closed
//! [`Behavior`] kind, steps once per control cycle against the world model,
//! and reports an [`ExitLabel`]. The flow's transition table routes
//! non-[`Stay`](ExitLabel::Stay) exits to the next node; side-effect
//! [`Program`](script::Program)s run on entry, exit, and transitions.
//!
//! State kinds are a closed enum rather than trait objects: the set of
//! behaviors is part of the configuration contract, and enum dispatch keeps
//! every state inspectable and serde-buildable.

pub mod context;
pub mod engine;
pub mod flow;
pub mod script;
pub mod states;

use serde::{Deserialize, Serialize};

use smriti_map::{Bearing, RobotCommands, RobotStatus, WorldModel};

use crate::error::{NavError, Result};
use script::Program;
use states::{
    AvoidingState, ClearMapState, ExploringState, FindLabelState, FindPathState, FindUnknownState,
    HaltState, LabelStuckState, MappingState, MovePathState, MoveToState,
};

pub use context::EngineContext;
pub use engine::BehaviorEngine;
pub use flow::{StateFlow, Transition};

/// Minimum commanded approach speed (pps).
pub(crate) const MIN_PPS: f64 = 10.0;
/// Distance over which the approach speed ramps from minimum to maximum
/// (m).
pub(crate) const NEAR_DISTANCE: f64 = 0.4;

/// The result one state reports per step: where to go next (or stay) and
/// the actuation for this cycle (`None` keeps the previous actuation).
pub type StateStep = (ExitLabel, Option<RobotCommands>);

/// Exit labels a state can report.
///
/// `Stay` is the in-progress sentinel and can never trigger a transition;
/// the remaining labels are the flow's routing alphabet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExitLabel {
    Stay,
    Completed,
    Timeout,
    Blocked,
    FrontBlocked,
    RearBlocked,
    NotFound,
}

impl ExitLabel {
    /// Parse a configuration trigger name. `Stay` has no trigger form.
    pub fn from_trigger(name: &str) -> Result<Self> {
        match name {
            "completed" => Ok(ExitLabel::Completed),
            "timeout" => Ok(ExitLabel::Timeout),
            "blocked" => Ok(ExitLabel::Blocked),
            "frontBlocked" => Ok(ExitLabel::FrontBlocked),
            "rearBlocked" => Ok(ExitLabel::RearBlocked),
            "notFound" => Ok(ExitLabel::NotFound),
            _ => Err(NavError::Config(format!("unknown trigger {:?}", name))),
        }
    }
}

impl std::fmt::Display for ExitLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ExitLabel::Stay => "stay",
            ExitLabel::Completed => "completed",
            ExitLabel::Timeout => "timeout",
            ExitLabel::Blocked => "blocked",
            ExitLabel::FrontBlocked => "frontBlocked",
            ExitLabel::RearBlocked => "rearBlocked",
            ExitLabel::NotFound => "notFound",
        };
        write!(f, "{}", name)
    }
}

/// The blocked exit for the current contact flags, if any.
pub(crate) fn block_exit(status: &RobotStatus) -> Option<ExitLabel> {
    match (status.can_move_forward, status.can_move_backward) {
        (false, false) => Some(ExitLabel::Blocked),
        (false, true) => Some(ExitLabel::FrontBlocked),
        (true, false) => Some(ExitLabel::RearBlocked),
        (true, true) => None,
    }
}

/// Linear speed ramp: minimum at the stop distance, maximum once
/// `NEAR_DISTANCE` beyond it.
pub(crate) fn approach_speed(distance: f64, stop_distance: f64, max_speed: f64) -> f64 {
    let is_far = ((distance - stop_distance) / NEAR_DISTANCE).clamp(0.0, 1.0);
    MIN_PPS + (max_speed - MIN_PPS) * is_far
}

/// Periodic triangle sweep of the sensor head.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoScan {
    /// Dwell per scan step (ms).
    pub interval: u64,
    /// Sweep start, robot-relative (deg).
    pub min_deg: f64,
    /// Sweep end, robot-relative (deg).
    pub max_deg: f64,
    /// Number of scan positions across the sweep.
    pub steps: usize,
}

impl Default for AutoScan {
    fn default() -> Self {
        Self {
            interval: 1000,
            min_deg: -90.0,
            max_deg: 90.0,
            steps: 7,
        }
    }
}

impl AutoScan {
    /// The scan direction for a state that has been active `elapsed` ms:
    /// sweeps min to max and back, one step per interval.
    pub fn direction(&self, elapsed: u64) -> Bearing {
        if self.steps <= 1 || self.interval == 0 {
            return Bearing::from_deg((self.min_deg + self.max_deg) / 2.0);
        }
        let tick = (elapsed / self.interval) as usize;
        let period = (self.steps - 1) * 2;
        let mut step = tick % period;
        if step >= self.steps {
            step = period - step;
        }
        let fraction = step as f64 / (self.steps - 1) as f64;
        Bearing::from_deg(self.min_deg + (self.max_deg - self.min_deg) * fraction)
    }

    /// Duration of one full min-to-max sweep (ms).
    pub fn sweep_duration(&self) -> u64 {
        self.interval * self.steps.saturating_sub(1) as u64
    }
}

/// The closed set of behavior kinds.
#[derive(Clone, Debug)]
pub enum Behavior {
    Halt(HaltState),
    Avoiding(AvoidingState),
    Exploring(ExploringState),
    Mapping(MappingState),
    MoveTo(MoveToState),
    FindUnknown(FindUnknownState),
    FindLabel(FindLabelState),
    LabelStuck(LabelStuckState),
    FindPath(FindPathState),
    MovePath(MovePathState),
    ClearMap(ClearMapState),
}

impl Behavior {
    /// Forget per-activation memory.
    fn reset(&mut self) {
        match self {
            Behavior::Avoiding(state) => state.reset(),
            Behavior::Mapping(state) => state.reset(),
            _ => {}
        }
    }

    fn step(&mut self, entry_time: u64, ctx: &mut EngineContext, world: &WorldModel) -> StateStep {
        match self {
            Behavior::Halt(state) => state.step(entry_time, world),
            Behavior::Avoiding(state) => state.step(world),
            Behavior::Exploring(state) => state.step(entry_time, world),
            Behavior::Mapping(state) => state.step(world),
            Behavior::MoveTo(state) => state.step(ctx, world),
            Behavior::FindUnknown(state) => state.step(ctx, world),
            Behavior::FindLabel(state) => state.step(ctx, world),
            Behavior::LabelStuck(state) => state.step(world),
            Behavior::FindPath(state) => state.step(ctx, world),
            Behavior::MovePath(state) => state.step(ctx, world),
            Behavior::ClearMap(state) => state.step(ctx),
        }
    }
}

/// One node of the flow: a behavior plus its timeout, hooks, and entry
/// time.
#[derive(Clone, Debug)]
pub struct StateNode {
    id: String,
    /// Maximum activation time (ms) before the node exits `Timeout`.
    timeout: Option<u64>,
    pub(crate) on_init: Program,
    pub(crate) on_entry: Program,
    pub(crate) on_exit: Program,
    entry_time: u64,
    behavior: Behavior,
}

impl StateNode {
    pub fn new(
        id: impl Into<String>,
        timeout: Option<u64>,
        on_init: Program,
        on_entry: Program,
        on_exit: Program,
        behavior: Behavior,
    ) -> Self {
        Self {
            id: id.into(),
            timeout,
            on_init,
            on_entry,
            on_exit,
            entry_time: 0,
            behavior,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Mark the node active as of `time` and drop per-activation memory.
    pub(crate) fn activate(&mut self, time: u64) {
        self.entry_time = time;
        self.behavior.reset();
    }

    /// One step: timeout check first, then the behavior.
    pub(crate) fn step(&mut self, ctx: &mut EngineContext, world: &WorldModel) -> StateStep {
        let time = world.status().simulation_time;
        if let Some(timeout) = self.timeout {
            if time.saturating_sub(self.entry_time) >= timeout {
                return (ExitLabel::Timeout, Some(RobotCommands::halt()));
            }
        }
        self.behavior.step(self.entry_time, ctx, world)
    }
}
