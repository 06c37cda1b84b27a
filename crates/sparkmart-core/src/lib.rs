//! SparkMart: a store run by goal-driven shoppers and staff.
//!
//! [`Simulation`] owns the [`Store`] world, the clock, the customer
//! [`Spawner`] and a GOAP scheduler with one agent per customer or employee.

#![forbid(unsafe_code)]

pub mod actions;
pub mod checkout;
pub mod config;
pub mod customer;
pub mod employee;
pub mod metrics;
pub mod persona;
pub mod shelf;
pub mod sim;
pub mod spawner;
pub mod store;

pub use actions::{StoreAction, StoreActionKind};
pub use checkout::{CheckoutLane, LaneId};
pub use config::{ConfigError, Persona, PersonaType, SimConfig};
pub use customer::Customer;
pub use employee::Employee;
pub use metrics::{Metrics, MetricsSnapshot};
pub use shelf::{Shelf, ShelfId, ShelfType};
pub use sim::{SimSummary, Simulation, StoreAgent, StoreScheduler};
pub use spawner::{SpawnRequest, Spawner};
pub use store::{BeliefUpdate, Landmarks, Store};
