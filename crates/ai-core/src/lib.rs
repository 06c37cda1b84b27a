//! Deterministic, engine-agnostic AI kernel primitives.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod agent;
pub mod completion;
pub mod facts;
pub mod plan;
pub mod resource;
pub mod rng;
pub mod tick;
pub mod world;

pub use agent::{AgentId, EntityAllocator, EntityId};
pub use completion::CompletionQueue;
pub use facts::Facts;
pub use plan::Plan;
pub use resource::ResourceQueue;
pub use rng::{DeterministicRng, SplitMix64};
pub use tick::{SimClock, TickContext};
pub use world::{WorldMut, WorldView};
