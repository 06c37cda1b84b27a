use std::collections::VecDeque;
use std::marker::PhantomData;

use ai_core::{AgentId, CompletionQueue, Facts, TickContext};
use ai_nav::{NavWorldMut, Vec2};
use ai_tools::{TraceEvent, TraceSink};

use crate::action::{Action, ActionBinding, Destination, Rejection};
use crate::goal::{Goal, GoalId, GoalList};
use crate::planner::GoapPlanner;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoapAgentConfig {
    /// Minimum gap between planning attempts while the agent has no plan.
    pub replan_cooldown_seconds: f32,
    /// Distance at which a traveling agent counts as arrived.
    pub arrival_distance: f32,
}

impl Default for GoapAgentConfig {
    fn default() -> Self {
        Self {
            replan_cooldown_seconds: 1.0,
            arrival_distance: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AgentPhase {
    Idle,
    Traveling { destination: Vec2 },
    Performing { destination: Vec2, completes_at: f64 },
}

/// Goal-driven agent: plans against world facts plus its own beliefs, then
/// executes the plan one action at a time.
///
/// Per tick the agent either waits (traveling or performing), starts the next
/// queued action, retires a finished plan, or replans once its cooldown has
/// elapsed. Completion of a performing action arrives through the shared
/// [`CompletionQueue`] and is applied by [`GoapAgent::complete_action`].
pub struct GoapAgent<W, A>
where
    W: NavWorldMut,
    A: Action<W>,
{
    id: W::Agent,
    actions: Vec<A>,
    goals: GoalList,
    beliefs: Facts,
    planner: GoapPlanner,
    config: GoapAgentConfig,
    queue: Option<VecDeque<usize>>,
    active_goal: Option<GoalId>,
    current: Option<usize>,
    binding: Option<ActionBinding>,
    phase: AgentPhase,
    cooldown: f32,
    _world: PhantomData<fn() -> W>,
}

impl<W, A> GoapAgent<W, A>
where
    W: NavWorldMut,
    A: Action<W>,
{
    pub fn new(id: W::Agent, actions: Vec<A>) -> Self {
        Self {
            id,
            actions,
            goals: GoalList::new(),
            beliefs: Facts::new(),
            planner: GoapPlanner::new(),
            config: GoapAgentConfig::default(),
            queue: None,
            active_goal: None,
            current: None,
            binding: None,
            phase: AgentPhase::Idle,
            cooldown: 0.0,
            _world: PhantomData,
        }
    }

    pub fn with_config(mut self, config: GoapAgentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_planner(mut self, planner: GoapPlanner) -> Self {
        self.planner = planner;
        self
    }

    pub fn with_goal(mut self, goal: Goal, priority: i32) -> Self {
        self.goals.add(goal, priority);
        self
    }

    pub fn id(&self) -> W::Agent {
        self.id
    }

    pub fn config(&self) -> GoapAgentConfig {
        self.config
    }

    pub fn add_goal(&mut self, goal: Goal, priority: i32) -> GoalId {
        self.goals.add(goal, priority)
    }

    pub fn goals(&self) -> &GoalList {
        &self.goals
    }

    pub fn goals_mut(&mut self) -> &mut GoalList {
        &mut self.goals
    }

    pub fn beliefs(&self) -> &Facts {
        &self.beliefs
    }

    pub fn beliefs_mut(&mut self) -> &mut Facts {
        &mut self.beliefs
    }

    pub fn actions(&self) -> &[A] {
        &self.actions
    }

    pub fn phase(&self) -> AgentPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase != AgentPhase::Idle
    }

    pub fn has_plan(&self) -> bool {
        self.queue.is_some()
    }

    pub fn current_action(&self) -> Option<&A> {
        self.current.map(|idx| &self.actions[idx])
    }

    pub fn current_action_name(&self) -> Option<&str> {
        self.current_action().map(|a| a.name())
    }

    pub fn active_goal(&self) -> Option<&Goal> {
        let id = self.active_goal?;
        self.goals.get(id).map(|e| &e.goal)
    }

    /// Actions still queued behind the current one.
    pub fn pending_actions(&self) -> impl Iterator<Item = &A> + '_ {
        self.queue
            .iter()
            .flat_map(|q| q.iter())
            .map(move |&idx| &self.actions[idx])
    }

    pub fn tick(
        &mut self,
        ctx: &TickContext,
        world: &mut W,
        completions: &mut CompletionQueue<W::Agent>,
        trace: &mut dyn TraceSink,
    ) {
        match self.phase {
            AgentPhase::Performing { .. } => return,
            AgentPhase::Traveling { destination } => {
                if world.has_arrived(self.id, destination, self.config.arrival_distance) {
                    self.arrive(ctx, destination, completions, trace);
                }
                return;
            }
            AgentPhase::Idle => {}
        }

        if self.queue.is_none() {
            self.cooldown -= ctx.dt_seconds;
            if self.cooldown > 0.0 {
                return;
            }
            self.cooldown = self.config.replan_cooldown_seconds;
            self.replan(ctx, world, trace);
        }

        let next = match self.queue.as_mut() {
            Some(queue) => queue.pop_front(),
            None => return,
        };

        match next {
            Some(idx) => self.start_action(idx, ctx, world, trace),
            None => self.finish_plan(ctx, trace),
        }
    }

    /// Commits the performing action. Returns false when nothing was performing,
    /// which makes stale completion events harmless.
    pub fn complete_action(
        &mut self,
        ctx: &TickContext,
        world: &mut W,
        trace: &mut dyn TraceSink,
    ) -> bool {
        if !matches!(self.phase, AgentPhase::Performing { .. }) {
            return false;
        }
        self.phase = AgentPhase::Idle;
        self.binding = None;
        let Some(idx) = self.current.take() else {
            return false;
        };

        self.actions[idx].post_perform(ctx, self.id, world, &mut self.beliefs);

        tracing::debug!(agent = %self.id, action = self.actions[idx].name(), "action complete");
        trace.emit(
            TraceEvent::new(ctx.tick, "goap.action.complete")
                .with_agent(self.id.stable_id())
                .with_subject(self.actions[idx].name()),
        );
        true
    }

    /// Drops the running action and the plan. The action gets a chance to
    /// release anything it claimed.
    pub fn interrupt(&mut self, ctx: &TickContext, world: &mut W) {
        if let Some(idx) = self.current.take() {
            if self.phase != AgentPhase::Idle {
                self.actions[idx].cancel(ctx, self.id, world, &mut self.beliefs);
            }
        }
        self.queue = None;
        self.active_goal = None;
        self.binding = None;
        self.phase = AgentPhase::Idle;
    }

    fn replan(&mut self, ctx: &TickContext, world: &W, trace: &mut dyn TraceSink) {
        let start = GoapPlanner::start_state(world.facts(), &self.beliefs);
        let agent = self.id.stable_id();

        for entry in self.goals.by_priority() {
            let label = entry.goal.label();
            trace.emit(
                TraceEvent::new(ctx.tick, "goap.plan.call")
                    .with_agent(agent)
                    .with_subject(label.clone()),
            );

            let Some(plan) = self.planner.plan(&self.actions, &entry.goal.facts, &start) else {
                continue;
            };

            tracing::debug!(
                agent = %self.id,
                goal = %label,
                steps = ?plan.steps.iter().map(|&i| self.actions[i].name()).collect::<Vec<_>>(),
                cost = plan.cost,
                "plan found"
            );
            trace.emit(
                TraceEvent::new(ctx.tick, "goap.plan.result")
                    .with_agent(agent)
                    .with_subject(label)
                    .with_value(plan.len() as f64),
            );
            self.queue = Some(plan.steps.into_iter().collect());
            self.active_goal = Some(entry.id);
            return;
        }

        tracing::debug!(agent = %self.id, goals = self.goals.len(), "no goal has a plan");
        trace.emit(TraceEvent::new(ctx.tick, "goap.plan.none").with_agent(agent));
    }

    fn start_action(
        &mut self,
        idx: usize,
        ctx: &TickContext,
        world: &mut W,
        trace: &mut dyn TraceSink,
    ) {
        self.current = Some(idx);

        let binding = match self.actions[idx].pre_perform(ctx, self.id, world, &mut self.beliefs) {
            Ok(binding) => binding,
            Err(rejection) => {
                self.abandon(ctx, rejection, trace);
                return;
            }
        };

        let destination = match binding.destination {
            Destination::Stay => world.position(self.id),
            Destination::At(point) => world.set_destination(self.id, point).then_some(point),
        };
        let Some(destination) = destination else {
            self.actions[idx].cancel(ctx, self.id, world, &mut self.beliefs);
            self.abandon(ctx, Rejection::MissingCollaborator("navigation".into()), trace);
            return;
        };

        tracing::debug!(
            agent = %self.id,
            action = self.actions[idx].name(),
            x = destination.x,
            y = destination.y,
            "action started"
        );
        trace.emit(
            TraceEvent::new(ctx.tick, "goap.action.start")
                .with_agent(self.id.stable_id())
                .with_subject(self.actions[idx].name())
                .with_value(f64::from(binding.duration_seconds)),
        );

        self.binding = Some(binding);
        self.phase = AgentPhase::Traveling { destination };
    }

    fn arrive(
        &mut self,
        ctx: &TickContext,
        destination: Vec2,
        completions: &mut CompletionQueue<W::Agent>,
        trace: &mut dyn TraceSink,
    ) {
        let duration = self
            .binding
            .map_or(0.0, |b| b.duration_seconds.max(0.0));
        let completes_at = ctx.now_seconds + f64::from(duration);
        completions.schedule(completes_at, self.id);
        self.phase = AgentPhase::Performing {
            destination,
            completes_at,
        };

        trace.emit(
            TraceEvent::new(ctx.tick, "goap.action.arrived")
                .with_agent(self.id.stable_id())
                .with_subject(self.current_action_name().unwrap_or_default().to_owned())
                .with_value(completes_at),
        );
    }

    fn abandon(&mut self, ctx: &TickContext, rejection: Rejection, trace: &mut dyn TraceSink) {
        let name = self.current_action_name().unwrap_or_default().to_owned();
        tracing::debug!(agent = %self.id, action = %name, %rejection, "action rejected, dropping plan");
        trace.emit(
            TraceEvent::new(ctx.tick, "goap.action.rejected")
                .with_agent(self.id.stable_id())
                .with_subject(name),
        );

        self.queue = None;
        self.active_goal = None;
        self.current = None;
        self.binding = None;
        self.phase = AgentPhase::Idle;
    }

    fn finish_plan(&mut self, ctx: &TickContext, trace: &mut dyn TraceSink) {
        self.queue = None;
        let agent = self.id.stable_id();
        let Some(goal_id) = self.active_goal.take() else {
            return;
        };
        let Some(entry) = self.goals.get(goal_id) else {
            return;
        };

        let label = entry.goal.label();
        let retire = entry.goal.remove_on_achieved && entry.goal.is_achieved(&self.beliefs);
        trace.emit(
            TraceEvent::new(ctx.tick, "goap.plan.exhausted")
                .with_agent(agent)
                .with_subject(label.clone()),
        );

        if retire {
            self.goals.remove(goal_id);
            tracing::debug!(agent = %self.id, goal = %label, "goal achieved");
            trace.emit(
                TraceEvent::new(ctx.tick, "goap.goal.achieved")
                    .with_agent(agent)
                    .with_subject(label),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_store_tuning() {
        let config = GoapAgentConfig::default();
        assert_eq!(config.replan_cooldown_seconds, 1.0);
        assert_eq!(config.arrival_distance, 2.0);
    }
}
