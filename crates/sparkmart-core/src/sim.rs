//! Headless simulation driver.
//!
//! One [`Simulation::step`] advances the clock, runs patience and break timers,
//! admits new customers, delivers cross-agent belief updates, moves bodies,
//! ticks every agent, then despawns customers who have left.

use ai_core::{rng, EntityAllocator, EntityId, SimClock, TickContext};
use ai_goap::{GoapAgent, GoapAgentConfig, GoapPlanner, GoapPlannerConfig, GoapScheduler, Goal};
use ai_nav::Vec2;
use ai_tools::{NullTraceSink, TraceSink};
use serde::Serialize;

use crate::actions::StoreAction;
use crate::config::{Assignments, EmployeeConfig, Persona, SimConfig};
use crate::customer::Customer;
use crate::employee::Employee;
use crate::metrics::Metrics;
use crate::spawner::Spawner;
use crate::store::Store;

pub type StoreAgent = GoapAgent<Store, StoreAction>;
pub type StoreScheduler = GoapScheduler<Store, StoreAction>;

const SPAWNER_STREAM: u64 = 2;

/// Point-in-time overview for reports.
#[derive(Debug, Clone, Serialize)]
pub struct SimSummary {
    pub ticks: u64,
    pub sim_seconds: f64,
    pub customers_in_store: usize,
    pub customers_spawned: u64,
    pub employees: usize,
    pub metrics: Metrics,
}

pub struct Simulation<S: TraceSink = NullTraceSink> {
    config: SimConfig,
    clock: SimClock,
    store: Store,
    scheduler: StoreScheduler,
    spawner: Spawner,
    allocator: EntityAllocator,
    trace: S,
}

impl Simulation<NullTraceSink> {
    pub fn new(config: SimConfig) -> Self {
        Self::with_trace(config, NullTraceSink)
    }
}

impl<S: TraceSink> Simulation<S> {
    pub fn with_trace(config: SimConfig, trace: S) -> Self {
        let mut clock = SimClock::new(config.clock.tick_seconds, config.clock.seed);
        clock.set_time_scale(config.clock.time_scale);
        let spawner = Spawner::new(
            config.spawner.clone(),
            config.personas.clone(),
            rng::derive_seed(config.clock.seed, 0, SPAWNER_STREAM),
        );

        let mut sim = Self {
            store: Store::new(&config),
            clock,
            scheduler: GoapScheduler::new(),
            spawner,
            allocator: EntityAllocator::new(),
            trace,
            config,
        };
        for employee in sim.config.employees.clone() {
            sim.hire(&employee);
        }
        tracing::info!(
            employees = sim.config.employees.len(),
            shelves = sim.store.shelves().len(),
            lanes = sim.store.lanes().len(),
            seed = sim.config.clock.seed,
            "store opened"
        );
        sim
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut SimClock {
        &mut self.clock
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    pub fn scheduler(&self) -> &StoreScheduler {
        &self.scheduler
    }

    pub fn agent(&self, id: EntityId) -> Option<&StoreAgent> {
        self.scheduler.agent(id)
    }

    pub fn spawner_mut(&mut self) -> &mut Spawner {
        &mut self.spawner
    }

    pub fn trace(&self) -> &S {
        &self.trace
    }

    pub fn metrics(&self) -> &Metrics {
        self.store.metrics()
    }

    fn new_agent(&self, id: EntityId, actions: Vec<StoreAction>) -> StoreAgent {
        let tuning = &self.config.agents;
        GoapAgent::new(id, actions)
            .with_config(GoapAgentConfig {
                replan_cooldown_seconds: tuning.replan_cooldown_seconds,
                arrival_distance: tuning.arrival_distance,
            })
            .with_planner(GoapPlanner::new().with_config(GoapPlannerConfig {
                max_nodes: tuning.max_plan_nodes,
            }))
    }

    pub fn hire(&mut self, config: &EmployeeConfig) -> EntityId {
        let id = self.allocator.allocate();
        let employee = Employee::from_config(id, config);
        let mut agent = self.new_agent(id, StoreAction::employee_set());
        for (fact, priority) in employee.goals() {
            agent.add_goal(Goal::single(fact, 1, false), priority);
        }
        self.store.add_employee(employee, config.position, config.speed);
        self.scheduler.add_agent(agent);
        tracing::info!(employee = %id, name = %config.name, "employee hired");
        id
    }

    /// Swaps an employee's duties and rebuilds their goal list to match.
    pub fn update_assignments(&mut self, id: EntityId, assignments: Assignments) -> bool {
        let Some(employee) = self.store.employee_mut(id) else {
            return false;
        };
        employee.set_assignments(assignments);
        let goals = employee.goals();
        let Some(agent) = self.scheduler.agent_mut(id) else {
            return false;
        };
        agent.goals_mut().clear();
        for (fact, priority) in goals {
            agent.add_goal(Goal::single(fact, 1, false), priority);
        }
        true
    }

    pub fn spawn_customer(&mut self, persona: Persona, position: Vec2) -> EntityId {
        let id = self.allocator.allocate();
        let list = persona.shopping_list(self.store.rng());
        let customer = Customer::new(id, persona, list);

        let mut agent = self.new_agent(id, StoreAction::customer_set());
        for (fact, priority) in customer.goals() {
            agent.add_goal(Goal::single(fact, 1, true), priority);
        }
        tracing::info!(
            customer = %id,
            persona = %customer.persona().name,
            items = customer.shopping_list().len(),
            "customer arrived"
        );
        self.store.add_customer(customer, position);
        self.scheduler.add_agent(agent);
        id
    }

    /// Admits one customer right away, honoring the customer cap.
    pub fn spawn_random_customer(&mut self) -> Option<EntityId> {
        let request = self.spawner.spawn(self.store.customer_count())?;
        Some(self.spawn_customer(request.persona, request.position))
    }

    pub fn step(&mut self) -> TickContext {
        let ctx = self.clock.advance();

        self.run_timers(&ctx);

        if let Some(request) = self.spawner.poll(ctx.now_seconds, self.store.customer_count()) {
            self.spawn_customer(request.persona, request.position);
        }

        self.deliver_beliefs();
        self.store.mover_mut().step(ctx.dt_seconds);
        self.scheduler.tick(&ctx, &mut self.store, &mut self.trace);
        self.despawn_departed(&ctx);
        self.store.metrics_mut().maybe_snapshot(ctx.now_seconds);
        ctx
    }

    /// Steps until at least `seconds` of simulation time have passed. Returns
    /// the number of ticks run.
    pub fn run_for(&mut self, seconds: f64) -> u64 {
        let until = self.clock.now_seconds() + seconds;
        let start = self.clock.tick();
        while self.clock.now_seconds() < until {
            if self.clock.is_paused() {
                tracing::warn!("clock paused, stopping run");
                break;
            }
            self.step();
        }
        self.clock.tick() - start
    }

    pub fn summary(&self) -> SimSummary {
        SimSummary {
            ticks: self.clock.tick(),
            sim_seconds: self.clock.now_seconds(),
            customers_in_store: self.store.customer_count(),
            customers_spawned: self.spawner.total_spawned(),
            employees: self.store.employees().count(),
            metrics: self.store.metrics().clone(),
        }
    }

    fn run_timers(&mut self, ctx: &TickContext) {
        for agent in self.scheduler.agents_mut() {
            let id = agent.id();
            if let Some(customer) = self.store.customer_mut(id) {
                if customer.tick_patience(ctx.dt_seconds, agent.beliefs_mut()) {
                    tracing::debug!(customer = %id, "patience ran out");
                }
            } else if let Some(employee) = self.store.employee_mut(id) {
                if employee.tick_break_timer(ctx.dt_seconds, agent.beliefs_mut()) {
                    tracing::debug!(employee = %id, "needs a break");
                }
            }
        }
    }

    fn deliver_beliefs(&mut self) {
        for update in self.store.take_belief_updates() {
            let Some(agent) = self.scheduler.agent_mut(update.agent) else {
                continue;
            };
            let beliefs = agent.beliefs_mut();
            match update.value {
                Some(value) => beliefs.set(update.fact, value),
                None => {
                    beliefs.remove(update.fact);
                }
            }
        }
    }

    fn despawn_departed(&mut self, ctx: &TickContext) {
        for id in self.store.take_departed() {
            self.scheduler.remove_agent(id, ctx, &mut self.store);
            if let Some(customer) = self.store.remove_customer(id) {
                tracing::info!(
                    customer = %id,
                    satisfaction = customer.satisfaction(),
                    items = customer.items_collected(),
                    "customer left"
                );
            }
        }
    }
}
