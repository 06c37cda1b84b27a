//! Navigation primitives consumed by the agent loop (positions, destinations,
//! arrival checks) plus a straight-line reference mover.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod math;
pub mod mover;
pub mod navigator;
pub mod world;

pub use math::Vec2;
pub use mover::{Mover, NavBody};
pub use navigator::{NavPath, Navigator, StraightLineNavigator};
pub use world::{NavWorldMut, NavWorldView};
