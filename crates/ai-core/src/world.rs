use crate::{AgentId, Facts};

/// Read-only access to the shared simulation context.
///
/// The core only requires the shared world facts; subsystems (navigation, store
/// resources) define extension traits for their own queries.
pub trait WorldView {
    type Agent: AgentId;

    fn facts(&self) -> &Facts;
}

/// Write access / effect sink.
pub trait WorldMut: WorldView {
    fn facts_mut(&mut self) -> &mut Facts;
}
