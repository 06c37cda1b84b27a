use std::borrow::Cow;

use ai_core::{Facts, TickContext};
use ai_nav::{NavWorldMut, Vec2};
use thiserror::Error;

/// Declarative half of an action: everything the planner is allowed to see.
pub trait ActionDef {
    fn name(&self) -> &str;

    fn cost(&self) -> f32;

    fn preconditions(&self) -> &Facts;

    fn effects(&self) -> &Facts;

    /// Availability gate applied before a search starts, separate from
    /// world-state preconditions.
    fn is_achievable(&self) -> bool {
        true
    }

    /// Precondition keys all present in `state`. Values are not compared.
    fn is_achievable_given(&self, state: &Facts) -> bool {
        state.contains_all(self.preconditions())
    }
}

/// Where the agent has to be for the action to run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Destination {
    /// Perform where the agent currently stands.
    Stay,
    At(Vec2),
}

/// Runtime context bound by `pre_perform` for a single execution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionBinding {
    pub destination: Destination,
    pub duration_seconds: f32,
}

impl ActionBinding {
    pub fn at(point: Vec2, duration_seconds: f32) -> Self {
        Self {
            destination: Destination::At(point),
            duration_seconds,
        }
    }

    pub fn in_place(duration_seconds: f32) -> Self {
        Self {
            destination: Destination::Stay,
            duration_seconds,
        }
    }
}

/// Why an action declined to start. Expected at runtime; the agent absorbs it by
/// discarding the plan and replanning after its cooldown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("precondition no longer holds: {0}")]
    Precondition(Cow<'static, str>),

    #[error("resource unavailable: {0}")]
    ResourceUnavailable(Cow<'static, str>),

    #[error("missing collaborator: {0}")]
    MissingCollaborator(Cow<'static, str>),
}

/// Executable half of an action.
///
/// `pre_perform` claims what the action needs and binds destination/duration;
/// `post_perform` commits the effects once the agent has arrived and the
/// duration has elapsed. `cancel` undoes claims when a bound action cannot
/// proceed.
pub trait Action<W>: ActionDef
where
    W: NavWorldMut,
{
    fn pre_perform(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        beliefs: &mut Facts,
    ) -> Result<ActionBinding, Rejection>;

    fn post_perform(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        beliefs: &mut Facts,
    );

    fn cancel(
        &mut self,
        _ctx: &TickContext,
        _agent: W::Agent,
        _world: &mut W,
        _beliefs: &mut Facts,
    ) {
    }
}
