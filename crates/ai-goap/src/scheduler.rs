use ai_core::{CompletionQueue, TickContext};
use ai_nav::NavWorldMut;
use ai_tools::TraceSink;

use crate::action::Action;
use crate::agent::GoapAgent;

/// Owns a set of agents and the completion queue they share.
///
/// Each tick first applies every completion that has come due, in due-time
/// order, then ticks agents in insertion order.
pub struct GoapScheduler<W, A>
where
    W: NavWorldMut,
    A: Action<W>,
{
    agents: Vec<GoapAgent<W, A>>,
    completions: CompletionQueue<W::Agent>,
}

impl<W, A> Default for GoapScheduler<W, A>
where
    W: NavWorldMut,
    A: Action<W>,
{
    fn default() -> Self {
        Self {
            agents: Vec::new(),
            completions: CompletionQueue::new(),
        }
    }
}

impl<W, A> GoapScheduler<W, A>
where
    W: NavWorldMut,
    A: Action<W>,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an agent, replacing any existing agent with the same id.
    pub fn add_agent(&mut self, agent: GoapAgent<W, A>) {
        let id = agent.id();
        match self.agents.iter_mut().find(|a| a.id() == id) {
            Some(existing) => {
                self.completions.cancel_where(|a| *a == id);
                *existing = agent;
            }
            None => self.agents.push(agent),
        }
    }

    /// Removes an agent along with its pending completion. Claims held by its
    /// current action are released first.
    pub fn remove_agent(
        &mut self,
        id: W::Agent,
        ctx: &TickContext,
        world: &mut W,
    ) -> Option<GoapAgent<W, A>> {
        let pos = self.agents.iter().position(|a| a.id() == id)?;
        self.completions.cancel_where(|a| *a == id);
        let mut agent = self.agents.remove(pos);
        agent.interrupt(ctx, world);
        Some(agent)
    }

    /// Stops an agent's current action and plan; it replans after its cooldown.
    pub fn interrupt(&mut self, id: W::Agent, ctx: &TickContext, world: &mut W) -> bool {
        let Some(agent) = self.agents.iter_mut().find(|a| a.id() == id) else {
            return false;
        };
        self.completions.cancel_where(|a| *a == id);
        agent.interrupt(ctx, world);
        true
    }

    pub fn agent(&self, id: W::Agent) -> Option<&GoapAgent<W, A>> {
        self.agents.iter().find(|a| a.id() == id)
    }

    pub fn agent_mut(&mut self, id: W::Agent) -> Option<&mut GoapAgent<W, A>> {
        self.agents.iter_mut().find(|a| a.id() == id)
    }

    pub fn agents(&self) -> impl Iterator<Item = &GoapAgent<W, A>> {
        self.agents.iter()
    }

    pub fn agents_mut(&mut self) -> impl Iterator<Item = &mut GoapAgent<W, A>> {
        self.agents.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn pending_completions(&self) -> usize {
        self.completions.len()
    }

    pub fn next_completion_due(&self) -> Option<f64> {
        self.completions.next_due()
    }

    /// Returns the number of actions completed this tick.
    pub fn tick(&mut self, ctx: &TickContext, world: &mut W, trace: &mut dyn TraceSink) -> usize {
        let mut completed = 0;
        while let Some(id) = self.completions.pop_due(ctx.now_seconds) {
            if let Some(agent) = self.agents.iter_mut().find(|a| a.id() == id) {
                if agent.complete_action(ctx, world, trace) {
                    completed += 1;
                }
            }
        }

        for agent in &mut self.agents {
            agent.tick(ctx, world, &mut self.completions, trace);
        }

        completed
    }
}
