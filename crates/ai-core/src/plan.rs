#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Planner output: indices into the agent's action list, oldest first, plus the
/// summed cost.
///
/// An empty plan is a valid answer (the goal already holds); "no plan" is
/// represented by the planner returning `None`, never by an empty `Plan`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Plan {
    pub steps: Vec<usize>,
    pub cost: f32,
}

impl Plan {
    pub fn new(steps: Vec<usize>, cost: f32) -> Self {
        Self { steps, cost }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), 0.0)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
