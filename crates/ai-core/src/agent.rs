use core::fmt::{self, Debug, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable identifier for an agent.
///
/// Deterministic simulation requires:
/// - stable ordering (`Ord`) for scheduling passes and completion tie-breaks
/// - a stable numeric ID (`stable_id`) for seeding and logs
pub trait AgentId: Copy + Ord + Eq + Debug + Display {
    fn stable_id(self) -> u64;
}

/// Numeric handle shared by agents and the simulated objects they claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EntityId(pub u64);

impl Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl AgentId for EntityId {
    fn stable_id(self) -> u64 {
        self.0
    }
}

impl AgentId for u64 {
    fn stable_id(self) -> u64 {
        self
    }
}

/// Hands out increasing [`EntityId`]s.
#[derive(Debug, Clone, Default)]
pub struct EntityAllocator {
    next: u64,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }

    pub fn allocated(&self) -> u64 {
        self.next
    }
}
