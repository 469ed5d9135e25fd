//! State flow: the arena of nodes and the transition table.

use crate::error::{NavError, Result};

use super::script::Program;
use super::{ExitLabel, StateNode};

/// One routing entry: `(from, trigger) -> to`, with an optional
/// side-effect program.
#[derive(Clone, Debug)]
pub struct Transition {
    pub from: usize,
    pub trigger: ExitLabel,
    pub to: usize,
    pub on_transition: Program,
}

/// A validated behavior flow.
///
/// Nodes live in an arena and transitions address them by index; all name
/// resolution happens in the configuration builder, so a constructed flow
/// cannot dangle.
#[derive(Clone, Debug)]
pub struct StateFlow {
    pub(crate) states: Vec<StateNode>,
    pub(crate) entry: usize,
    pub(crate) transitions: Vec<Transition>,
    pub(crate) on_init: Program,
}

impl StateFlow {
    pub fn new(
        states: Vec<StateNode>,
        entry: usize,
        transitions: Vec<Transition>,
        on_init: Program,
    ) -> Result<Self> {
        if states.is_empty() {
            return Err(NavError::Config("flow has no states".to_string()));
        }
        if entry >= states.len() {
            return Err(NavError::Config(format!(
                "entry index {} out of range",
                entry
            )));
        }
        for transition in &transitions {
            if transition.from >= states.len() || transition.to >= states.len() {
                return Err(NavError::Config(format!(
                    "transition {} -> {} out of range",
                    transition.from, transition.to
                )));
            }
            if transition.trigger == ExitLabel::Stay {
                return Err(NavError::Config(format!(
                    "transition from {:?} cannot trigger on stay",
                    states[transition.from].id()
                )));
            }
        }
        for (index, transition) in transitions.iter().enumerate() {
            let duplicate = transitions[..index]
                .iter()
                .any(|t| t.from == transition.from && t.trigger == transition.trigger);
            if duplicate {
                return Err(NavError::Config(format!(
                    "duplicate transition from {:?} on {}",
                    states[transition.from].id(),
                    transition.trigger
                )));
            }
        }
        Ok(Self {
            states,
            entry,
            transitions,
            on_init,
        })
    }

    pub fn entry(&self) -> usize {
        self.entry
    }

    pub fn states(&self) -> &[StateNode] {
        &self.states
    }

    /// The transition routed for `(from, trigger)`, if any.
    pub fn transition_for(&self, from: usize, trigger: ExitLabel) -> Option<&Transition> {
        self.transitions
            .iter()
            .find(|t| t.from == from && t.trigger == trigger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::states::HaltState;
    use crate::behavior::Behavior;

    fn node(id: &str) -> StateNode {
        StateNode::new(
            id,
            None,
            Program::default(),
            Program::default(),
            Program::default(),
            Behavior::Halt(HaltState::default()),
        )
    }

    fn transition(from: usize, trigger: ExitLabel, to: usize) -> Transition {
        Transition {
            from,
            trigger,
            to,
            on_transition: Program::default(),
        }
    }

    #[test]
    fn test_builds_and_routes() {
        let flow = StateFlow::new(
            vec![node("a"), node("b")],
            0,
            vec![transition(0, ExitLabel::Timeout, 1)],
            Program::default(),
        )
        .unwrap();
        assert_eq!(flow.transition_for(0, ExitLabel::Timeout).unwrap().to, 1);
        assert!(flow.transition_for(0, ExitLabel::Completed).is_none());
        assert!(flow.transition_for(1, ExitLabel::Timeout).is_none());
    }

    #[test]
    fn test_rejects_empty_flow() {
        assert!(StateFlow::new(vec![], 0, vec![], Program::default()).is_err());
    }

    #[test]
    fn test_rejects_bad_entry() {
        assert!(StateFlow::new(vec![node("a")], 1, vec![], Program::default()).is_err());
    }

    #[test]
    fn test_rejects_dangling_transition() {
        let result = StateFlow::new(
            vec![node("a")],
            0,
            vec![transition(0, ExitLabel::Timeout, 5)],
            Program::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_stay_trigger() {
        let result = StateFlow::new(
            vec![node("a"), node("b")],
            0,
            vec![transition(0, ExitLabel::Stay, 1)],
            Program::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_duplicate_route() {
        let result = StateFlow::new(
            vec![node("a"), node("b")],
            0,
            vec![
                transition(0, ExitLabel::Timeout, 1),
                transition(0, ExitLabel::Timeout, 0),
            ],
            Program::default(),
        );
        assert!(result.is_err());
    }
}
