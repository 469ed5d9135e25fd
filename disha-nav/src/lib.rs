//! # DishaNav
//!
//! Planning and behavior layer for autonomous robot navigation, built on
//! the [`smriti_map`] world model.
//!
//! ## Components
//!
//! - [`planning`]: generic sampling ([`Rrt`]) and graph ([`AStar`]) search,
//!   plus the radar-map adapters that turn them into robot path finders
//! - [`behavior`]: the finite-state behavior engine, its state kinds, and
//!   the postfix side-effect scripts
//! - [`config`]: declarative flow configuration, loadable from TOML
//! - [`policy`]: the boundary trait for swapping in a learned policy
//!
//! The engine is synchronous and single-robot: one
//! [`BehaviorEngine::step`](behavior::BehaviorEngine::step) per control
//! cycle, reading and mutating one [`WorldModel`](smriti_map::WorldModel).

pub mod behavior;
pub mod config;
pub mod error;
pub mod planning;
pub mod policy;

pub use behavior::{BehaviorEngine, EngineContext, ExitLabel, StateFlow, StateNode};
pub use config::FlowConfig;
pub use error::{NavError, Result};
pub use planning::{AStar, Rrt, RrtPathFinder, SafePlanner};
pub use policy::ActionPolicy;
