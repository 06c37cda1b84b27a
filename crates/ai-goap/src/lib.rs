//! Goal-oriented action planning over presence-based facts.
//!
//! [`GoapPlanner`] searches for the cheapest action sequence; [`GoapAgent`]
//! drives a plan through travel, timed performance and replanning;
//! [`GoapScheduler`] ticks a population of agents against a shared world.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod action;
pub mod agent;
pub mod goal;
pub mod planner;
pub mod scheduler;

pub use action::{Action, ActionBinding, ActionDef, Destination, Rejection};
pub use agent::{AgentPhase, GoapAgent, GoapAgentConfig};
pub use goal::{Goal, GoalEntry, GoalId, GoalList};
pub use planner::{GoapAction, GoapPlanner, GoapPlannerConfig};
pub use scheduler::GoapScheduler;
