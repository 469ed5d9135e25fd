//! The per-cycle behavior engine.

use log::{debug, info};

use smriti_map::{RobotCommands, WorldModel};

use super::context::EngineContext;
use super::flow::StateFlow;
use super::ExitLabel;

/// Drives one flow against one world model, one step per control cycle.
///
/// The first step lazily runs the flow and state `on_init` programs and
/// enters the entry state; every step then advances the active state and
/// routes its exit through the transition table. An exit with no route is
/// logged and ignored, the state simply remains active.
pub struct BehaviorEngine {
    flow: StateFlow,
    ctx: EngineContext,
    current: usize,
    initialized: bool,
}

impl BehaviorEngine {
    pub fn new(flow: StateFlow) -> Self {
        let current = flow.entry();
        Self {
            flow,
            ctx: EngineContext::new(),
            current,
            initialized: false,
        }
    }

    /// The id of the active state.
    pub fn current_state(&self) -> &str {
        self.flow.states[self.current].id()
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    /// One control cycle: step the active state, apply any map-reset
    /// request, and route the exit.
    pub fn step(&mut self, world: &mut WorldModel) -> Option<RobotCommands> {
        let time = world.status().simulation_time;
        if !self.initialized {
            self.flow.on_init.execute(&mut self.ctx.vars, time);
            for state in &self.flow.states {
                state.on_init.execute(&mut self.ctx.vars, time);
            }
            let entry = &mut self.flow.states[self.current];
            entry.on_entry.execute(&mut self.ctx.vars, time);
            entry.activate(time);
            info!("behavior flow started in {:?}", entry.id());
            self.initialized = true;
        }

        let (exit, commands) = self.flow.states[self.current].step(&mut self.ctx, world);
        if self.ctx.clear_map_requested {
            world.clear_radar();
            self.ctx.clear_map_requested = false;
        }
        if exit != ExitLabel::Stay {
            self.route(exit, time);
        }
        commands
    }

    fn route(&mut self, exit: ExitLabel, time: u64) {
        let (to, program) = match self.flow.transition_for(self.current, exit) {
            Some(transition) => (transition.to, transition.on_transition.clone()),
            None => {
                debug!(
                    "trigger {} ignored in state {:?}",
                    exit,
                    self.current_state()
                );
                return;
            }
        };
        self.flow.states[self.current]
            .on_exit
            .execute(&mut self.ctx.vars, time);
        program.execute(&mut self.ctx.vars, time);
        debug!(
            "{:?} --{}--> {:?}",
            self.current_state(),
            exit,
            self.flow.states[to].id()
        );
        self.current = to;
        let next = &mut self.flow.states[to];
        next.on_entry.execute(&mut self.ctx.vars, time);
        next.activate(time);
    }
}
