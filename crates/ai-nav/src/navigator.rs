use crate::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NavPath {
    pub points: Vec<Vec2>,
}

impl NavPath {
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points }
    }
}

/// Path query backend.
///
/// Real pathfinding (obstacles, nav meshes) belongs to the host engine; the
/// simulation only needs a route from `start` to `goal`.
pub trait Navigator {
    fn find_path(&self, start: Vec2, goal: Vec2) -> Option<NavPath>;
}

/// Open floor: every route is a straight segment.
#[derive(Debug, Clone, Copy, Default)]
pub struct StraightLineNavigator;

impl Navigator for StraightLineNavigator {
    fn find_path(&self, start: Vec2, goal: Vec2) -> Option<NavPath> {
        Some(NavPath::new(vec![start, goal]))
    }
}
