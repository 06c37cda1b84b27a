use ai_core::{WorldMut, WorldView};

use crate::Vec2;

pub trait NavWorldView: WorldView {
    fn position(&self, agent: Self::Agent) -> Option<Vec2>;

    /// True when the agent stands strictly within `threshold` of `destination`.
    /// Agents without a position never arrive.
    fn has_arrived(&self, agent: Self::Agent, destination: Vec2, threshold: f32) -> bool {
        self.position(agent)
            .map(|pos| pos.distance(destination) < threshold)
            .unwrap_or(false)
    }
}

pub trait NavWorldMut: WorldMut + NavWorldView {
    /// Ask the navigation collaborator to route `agent` to `destination`.
    /// Returns `false` when the agent has no navigation entry.
    fn set_destination(&mut self, agent: Self::Agent, destination: Vec2) -> bool;
}
