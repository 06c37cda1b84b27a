use ai_core::{Facts, Plan};

use crate::action::ActionDef;

/// Plain-data action description. Useful on its own for planning-only callers
/// and as the declarative part embedded in executable actions.
#[derive(Debug, Clone, PartialEq)]
pub struct GoapAction {
    pub name: String,
    pub cost: f32,
    pub preconditions: Facts,
    pub effects: Facts,
}

impl GoapAction {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cost: 1.0,
            preconditions: Facts::new(),
            effects: Facts::new(),
        }
    }

    pub fn with_cost(mut self, cost: f32) -> Self {
        self.cost = cost;
        self
    }

    pub fn requires(mut self, fact: impl Into<String>) -> Self {
        self.preconditions.set(fact, 1);
        self
    }

    pub fn provides(mut self, fact: impl Into<String>) -> Self {
        self.effects.set(fact, 1);
        self
    }
}

impl ActionDef for GoapAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn cost(&self) -> f32 {
        self.cost
    }

    fn preconditions(&self) -> &Facts {
        &self.preconditions
    }

    fn effects(&self) -> &Facts {
        &self.effects
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GoapPlannerConfig {
    /// Cap on search nodes per call. `None` searches the full space; a search
    /// that hits the cap reports no plan.
    pub max_nodes: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct GoapPlanner {
    config: GoapPlannerConfig,
}

#[derive(Debug)]
struct Node {
    parent: Option<usize>,
    cost: f32,
    state: Facts,
    action: Option<usize>,
}

struct Search<'a, A> {
    actions: &'a [A],
    goal: &'a Facts,
    nodes: Vec<Node>,
    leaves: Vec<usize>,
    max_nodes: Option<usize>,
    truncated: bool,
}

impl<'a, A: ActionDef> Search<'a, A> {
    fn expand(&mut self, parent: usize, usable: &[usize]) -> bool {
        let actions = self.actions;
        let mut found = false;

        for &idx in usable {
            let action = &actions[idx];
            if !action.is_achievable_given(&self.nodes[parent].state) {
                continue;
            }

            if self.max_nodes.is_some_and(|max| self.nodes.len() >= max) {
                self.truncated = true;
                return found;
            }

            // Effects never overwrite keys already in the state.
            let mut state = self.nodes[parent].state.clone();
            state.union_missing(action.effects());
            let cost = self.nodes[parent].cost + action.cost();

            self.nodes.push(Node {
                parent: Some(parent),
                cost,
                state,
                action: Some(idx),
            });
            let node = self.nodes.len() - 1;

            if self.nodes[node].state.contains_all(self.goal) {
                self.leaves.push(node);
                found = true;
            } else {
                let rest: Vec<usize> = usable.iter().copied().filter(|&i| i != idx).collect();
                if self.expand(node, &rest) {
                    found = true;
                }
            }
        }

        found
    }

    fn cheapest_leaf(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for &leaf in &self.leaves {
            match best {
                Some(b) if self.nodes[b].cost <= self.nodes[leaf].cost => {}
                _ => best = Some(leaf),
            }
        }
        best
    }

    fn path_to(&self, leaf: usize) -> Vec<usize> {
        let mut steps = Vec::new();
        let mut current = Some(leaf);
        while let Some(idx) = current {
            let node = &self.nodes[idx];
            if let Some(action) = node.action {
                steps.push(action);
            }
            current = node.parent;
        }
        steps.reverse();
        steps
    }
}

impl GoapPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: GoapPlannerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> GoapPlannerConfig {
        self.config
    }

    /// Starting snapshot for a search: world facts, then any belief keys the
    /// world does not already carry.
    pub fn start_state(world: &Facts, beliefs: &Facts) -> Facts {
        let mut state = world.snapshot();
        state.union_missing(beliefs);
        state
    }

    /// Cheapest ordered action sequence (indices into `actions`) that makes every
    /// key of `goal` present, or `None` when no sequence exists.
    ///
    /// Presence is all that counts: a key with value 0 satisfies a requirement.
    /// An action appears at most once per plan. Equal-cost plans resolve to the
    /// one discovered first when exploring actions in slice order.
    pub fn plan<A: ActionDef>(&self, actions: &[A], goal: &Facts, start: &Facts) -> Option<Plan> {
        if start.contains_all(goal) {
            return Some(Plan::empty());
        }

        let usable: Vec<usize> = actions
            .iter()
            .enumerate()
            .filter(|(_, a)| a.is_achievable())
            .map(|(i, _)| i)
            .collect();

        let mut search = Search {
            actions,
            goal,
            nodes: vec![Node {
                parent: None,
                cost: 0.0,
                state: start.snapshot(),
                action: None,
            }],
            leaves: Vec::new(),
            max_nodes: self.config.max_nodes,
            truncated: false,
        };

        search.expand(0, &usable);

        if search.truncated {
            tracing::warn!(
                nodes = search.nodes.len(),
                leaves = search.leaves.len(),
                "goap search hit node cap, giving up"
            );
            return None;
        }

        let Some(leaf) = search.cheapest_leaf() else {
            tracing::debug!(goal = ?goal.keys().collect::<Vec<_>>(), "no plan");
            return None;
        };

        let cost = search.nodes[leaf].cost;
        let steps = search.path_to(leaf);
        tracing::trace!(nodes = search.nodes.len(), steps = steps.len(), cost, "plan found");
        Some(Plan::new(steps, cost))
    }

    /// State reached by applying `plan` to `start` with the planner's union rule.
    pub fn replay<A: ActionDef>(actions: &[A], plan: &Plan, start: &Facts) -> Facts {
        let mut state = start.snapshot();
        for &idx in &plan.steps {
            state.union_missing(actions[idx].effects());
        }
        state
    }
}
