//! Declarative flow configuration.
//!
//! A behavior flow is described as data (typically TOML): named states
//! with a `kind` tag and kind-specific parameters, an entry state, and a
//! transition table. [`FlowConfig::build`] resolves names, parses the
//! side-effect scripts, and validates everything; a flow that builds
//! cannot fail at runtime.
//!
//! ```toml
//! entry = "explore"
//!
//! [states.explore]
//! kind = "exploring"
//! timeout = 60000
//! stop_distance = 0.4
//!
//! [states.avoid]
//! kind = "avoiding"
//!
//! [[transitions]]
//! from = "explore"
//! trigger = "frontBlocked"
//! to = "avoid"
//!
//! [[transitions]]
//! from = "avoid"
//! trigger = "completed"
//! to = "explore"
//! ```

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::behavior::script::Program;
use crate::behavior::states::{
    AvoidingState, ClearMapState, ExploringState, FindLabelState, FindPathState, FindUnknownState,
    HaltState, LabelStuckState, MappingState, MovePathState, MoveToState,
};
use crate::behavior::{Behavior, ExitLabel, StateFlow, StateNode, Transition};
use crate::error::{NavError, Result};

/// The behavior kind and its parameters; the state structs double as
/// their own configuration payloads.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum KindConfig {
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

impl KindConfig {
    /// Parameter sanity for the kind. Field names in the messages are the
    /// TOML keys.
    fn validate(&self) -> std::result::Result<(), String> {
        match self {
            KindConfig::Halt(state) => check_scan(&state.scan),
            KindConfig::Avoiding(state) => {
                check_positive("speed", state.speed)?;
                check_positive("safe_distance", state.safe_distance)?;
                check_band(state.safe_distance, state.max_distance)
            }
            KindConfig::Exploring(state) => {
                check_positive("speed", state.speed)?;
                check_positive("stop_distance", state.stop_distance)?;
                check_band(state.stop_distance, state.max_distance)?;
                check_scan(&state.scan)
            }
            KindConfig::Mapping(state) => {
                if !(state.turn_step_deg > 0.0 && state.turn_step_deg <= 180.0) {
                    return Err(format!(
                        "turn_step_deg {} outside (0, 180]",
                        state.turn_step_deg
                    ));
                }
                check_scan(&Some(state.scan))
            }
            KindConfig::MoveTo(state) => {
                check_positive("speed", state.speed)?;
                check_positive("stop_distance", state.stop_distance)?;
                check_positive("direction_range_deg", state.direction_range_deg)
            }
            KindConfig::FindUnknown(state) => {
                check_positive("growth_distance", state.growth_distance)?;
                check_iterations(state.max_iterations)
            }
            KindConfig::FindLabel(state) => {
                check_positive("growth_distance", state.growth_distance)?;
                check_iterations(state.max_iterations)?;
                check_band(state.min_distance, state.max_distance)
            }
            KindConfig::LabelStuck(state) => {
                check_positive("speed", state.speed)?;
                check_positive("direction_range_deg", state.direction_range_deg)?;
                check_band(state.min_distance, state.max_distance)
            }
            KindConfig::FindPath(state) => check_positive("safe_distance", state.safe_distance),
            KindConfig::MovePath(state) => {
                check_positive("speed", state.speed)?;
                check_positive("stop_distance", state.stop_distance)
            }
            KindConfig::ClearMap(_) => Ok(()),
        }
    }

    fn to_behavior(&self) -> Behavior {
        match self.clone() {
            KindConfig::Halt(state) => Behavior::Halt(state),
            KindConfig::Avoiding(state) => Behavior::Avoiding(state),
            KindConfig::Exploring(state) => Behavior::Exploring(state),
            KindConfig::Mapping(state) => Behavior::Mapping(state),
            KindConfig::MoveTo(state) => Behavior::MoveTo(state),
            KindConfig::FindUnknown(state) => Behavior::FindUnknown(state),
            KindConfig::FindLabel(state) => Behavior::FindLabel(state),
            KindConfig::LabelStuck(state) => Behavior::LabelStuck(state),
            KindConfig::FindPath(state) => Behavior::FindPath(state),
            KindConfig::MovePath(state) => Behavior::MovePath(state),
            KindConfig::ClearMap(state) => Behavior::ClearMap(state),
        }
    }
}

/// One named state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StateConfig {
    #[serde(flatten)]
    pub kind: KindConfig,
    /// Activation timeout (ms).
    #[serde(default)]
    pub timeout: Option<u64>,
    #[serde(default)]
    pub on_init: Option<String>,
    #[serde(default)]
    pub on_entry: Option<String>,
    #[serde(default)]
    pub on_exit: Option<String>,
}

/// One transition table row.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransitionConfig {
    pub from: String,
    pub trigger: String,
    pub to: String,
    #[serde(default)]
    pub on_transition: Option<String>,
}

/// A whole flow as data.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Name of the entry state.
    pub entry: String,
    /// Named states; name order fixes the arena indices.
    pub states: BTreeMap<String, StateConfig>,
    #[serde(default)]
    pub transitions: Vec<TransitionConfig>,
    #[serde(default)]
    pub on_init: Option<String>,
}

impl FlowConfig {
    /// Parse a TOML document.
    pub fn from_toml(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Resolve and validate the configuration into a runnable flow.
    pub fn build(&self) -> Result<StateFlow> {
        let index: HashMap<&str, usize> = self
            .states
            .keys()
            .enumerate()
            .map(|(position, name)| (name.as_str(), position))
            .collect();

        let mut states = Vec::with_capacity(self.states.len());
        for (name, config) in &self.states {
            config
                .kind
                .validate()
                .map_err(|error| NavError::Config(format!("state {:?}: {}", name, error)))?;
            states.push(StateNode::new(
                name.clone(),
                config.timeout,
                parse_program(&config.on_init, name)?,
                parse_program(&config.on_entry, name)?,
                parse_program(&config.on_exit, name)?,
                config.kind.to_behavior(),
            ));
        }

        let entry = *index
            .get(self.entry.as_str())
            .ok_or_else(|| NavError::Config(format!("unknown entry state {:?}", self.entry)))?;

        let mut transitions = Vec::with_capacity(self.transitions.len());
        for config in &self.transitions {
            let from = *index.get(config.from.as_str()).ok_or_else(|| {
                NavError::Config(format!("transition from unknown state {:?}", config.from))
            })?;
            let to = *index.get(config.to.as_str()).ok_or_else(|| {
                NavError::Config(format!("transition to unknown state {:?}", config.to))
            })?;
            transitions.push(Transition {
                from,
                trigger: ExitLabel::from_trigger(&config.trigger)?,
                to,
                on_transition: parse_program(&config.on_transition, &config.from)?,
            });
        }

        StateFlow::new(states, entry, transitions, parse_program(&self.on_init, "flow")?)
    }
}

fn check_positive(name: &str, value: f64) -> std::result::Result<(), String> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(format!("{} must be positive, got {}", name, value))
    }
}

fn check_band(min: f64, max: f64) -> std::result::Result<(), String> {
    if min >= 0.0 && max > min {
        Ok(())
    } else {
        Err(format!("distance band [{}, {}] is empty", min, max))
    }
}

fn check_iterations(max_iterations: usize) -> std::result::Result<(), String> {
    if max_iterations > 0 {
        Ok(())
    } else {
        Err("max_iterations must be positive".to_string())
    }
}

fn check_scan(scan: &Option<crate::behavior::AutoScan>) -> std::result::Result<(), String> {
    if let Some(scan) = scan {
        if scan.interval == 0 {
            return Err("scan interval must be positive".to_string());
        }
        if scan.steps == 0 {
            return Err("scan needs at least one step".to_string());
        }
        if scan.min_deg > scan.max_deg {
            return Err(format!(
                "scan range [{}, {}] is empty",
                scan.min_deg, scan.max_deg
            ));
        }
    }
    Ok(())
}

fn parse_program(source: &Option<String>, context: &str) -> Result<Program> {
    match source {
        Some(source) => Program::parse(source)
            .map_err(|error| NavError::Config(format!("{}: {}", context, error))),
        None => Ok(Program::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLOW: &str = r#"
        entry = "halt"
        on_init = "0 bumps put"

        [states.halt]
        kind = "halt"
        timeout = 5000

        [states.explore]
        kind = "exploring"
        stop_distance = 0.5
        on_entry = "time started put"

        [states.avoid]
        kind = "avoiding"
        safe_distance = 0.4

        [states.goto]
        kind = "moveTo"
        target = { x = 1.0, y = 2.0 }

        [[transitions]]
        from = "halt"
        trigger = "timeout"
        to = "explore"

        [[transitions]]
        from = "explore"
        trigger = "frontBlocked"
        to = "avoid"
        on_transition = "bumps get 1 add bumps put"

        [[transitions]]
        from = "avoid"
        trigger = "completed"
        to = "explore"
    "#;

    #[test]
    fn test_parses_and_builds() {
        let config = FlowConfig::from_toml(FLOW).unwrap();
        let flow = config.build().unwrap();
        assert_eq!(flow.states().len(), 4);
        // BTreeMap order: avoid, explore, goto, halt
        assert_eq!(flow.states()[flow.entry()].id(), "halt");
        assert!(flow
            .transition_for(1, ExitLabel::FrontBlocked)
            .is_some());
    }

    #[test]
    fn test_kind_parameters_are_applied() {
        let config = FlowConfig::from_toml(FLOW).unwrap();
        match &config.states["goto"].kind {
            KindConfig::MoveTo(state) => {
                let target = state.target.unwrap();
                assert_eq!((target.x, target.y), (1.0, 2.0));
            }
            other => panic!("unexpected kind {:?}", other),
        }
        match &config.states["avoid"].kind {
            KindConfig::Avoiding(state) => assert_eq!(state.safe_distance, 0.4),
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_unknown_entry_rejected() {
        let source = FLOW.replace("entry = \"halt\"", "entry = \"nowhere\"");
        let error = FlowConfig::from_toml(&source).unwrap().build().unwrap_err();
        assert!(error.to_string().contains("nowhere"));
    }

    #[test]
    fn test_dangling_transition_rejected() {
        let source = FLOW.replace("to = \"avoid\"", "to = \"missing\"");
        let error = FlowConfig::from_toml(&source).unwrap().build().unwrap_err();
        assert!(error.to_string().contains("missing"));
    }

    #[test]
    fn test_bad_trigger_rejected() {
        let source = FLOW.replace("trigger = \"timeout\"", "trigger = \"sometimes\"");
        let error = FlowConfig::from_toml(&source).unwrap().build().unwrap_err();
        assert!(error.to_string().contains("sometimes"));
    }

    #[test]
    fn test_bad_script_rejected() {
        let source = FLOW.replace("on_init = \"0 bumps put\"", "on_init = \"bumps add\"");
        let error = FlowConfig::from_toml(&source).unwrap().build().unwrap_err();
        assert!(matches!(error, NavError::Config(_)));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let source = FLOW.replace("kind = \"exploring\"", "kind = \"teleporting\"");
        assert!(FlowConfig::from_toml(&source).is_err());
    }

    fn build_single(state: &str) -> Result<StateFlow> {
        let source = format!(
            r#"
            entry = "only"

            [states.only]
            {}
        "#,
            state
        );
        FlowConfig::from_toml(&source)?.build()
    }

    #[test]
    fn test_zero_turn_step_rejected() {
        let error = build_single("kind = \"mapping\"\nturn_step_deg = 0.0").unwrap_err();
        assert!(error.to_string().contains("turn_step_deg"));
    }

    #[test]
    fn test_zero_speed_rejected() {
        let error = build_single("kind = \"movePath\"\nspeed = 0.0").unwrap_err();
        assert!(error.to_string().contains("speed"));
    }

    #[test]
    fn test_inverted_distance_band_rejected() {
        let error = build_single(
            "kind = \"findLabel\"\nmin_distance = 1.0\nmax_distance = 0.5",
        )
        .unwrap_err();
        assert!(error.to_string().contains("band"));
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let error = build_single("kind = \"findUnknown\"\nmax_iterations = 0").unwrap_err();
        assert!(error.to_string().contains("max_iterations"));
    }

    #[test]
    fn test_degenerate_scan_rejected() {
        let error =
            build_single("kind = \"halt\"\nscan = { interval = 0 }").unwrap_err();
        assert!(error.to_string().contains("scan"));
    }

    #[test]
    fn test_defaults_validate() {
        for kind in [
            "halt",
            "avoiding",
            "exploring",
            "mapping",
            "moveTo",
            "findUnknown",
            "findLabel",
            "labelStuck",
            "findPath",
            "movePath",
            "clearMap",
        ] {
            assert!(
                build_single(&format!("kind = \"{}\"", kind)).is_ok(),
                "defaults for {} rejected",
                kind
            );
        }
    }
}
