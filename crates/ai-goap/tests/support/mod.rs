#![allow(dead_code)]

use ai_core::{Facts, SimClock, TickContext, WorldMut, WorldView};
use ai_goap::{Action, ActionBinding, ActionDef, GoapAction, GoapScheduler, Rejection};
use ai_nav::{Mover, NavWorldMut, NavWorldView, Vec2};
use ai_tools::TraceLog;

/// Tick length used by the loop tests; exact in binary so cooldown arithmetic
/// lands on whole ticks.
pub const DT: f32 = 0.25;

#[derive(Default)]
pub struct ToyWorld {
    pub facts: Facts,
    pub mover: Mover<u64>,
    pub log: Vec<String>,
    pub canceled: Vec<String>,
    pub rejections_left: u32,
}

impl WorldView for ToyWorld {
    type Agent = u64;

    fn facts(&self) -> &Facts {
        &self.facts
    }
}

impl WorldMut for ToyWorld {
    fn facts_mut(&mut self) -> &mut Facts {
        &mut self.facts
    }
}

impl NavWorldView for ToyWorld {
    fn position(&self, agent: u64) -> Option<Vec2> {
        self.mover.position(agent)
    }
}

impl NavWorldMut for ToyWorld {
    fn set_destination(&mut self, agent: u64, destination: Vec2) -> bool {
        self.mover.set_destination(agent, destination)
    }
}

pub struct ToyAction {
    pub def: GoapAction,
    pub place: Option<Vec2>,
    pub duration: f32,
    pub flaky: bool,
}

impl ToyAction {
    pub fn here(def: GoapAction, duration: f32) -> Self {
        Self {
            def,
            place: None,
            duration,
            flaky: false,
        }
    }

    pub fn at(def: GoapAction, place: Vec2, duration: f32) -> Self {
        Self {
            def,
            place: Some(place),
            duration,
            flaky: false,
        }
    }

    /// Rejects while the world still has `rejections_left`.
    pub fn flaky(mut self) -> Self {
        self.flaky = true;
        self
    }
}

impl ActionDef for ToyAction {
    fn name(&self) -> &str {
        self.def.name()
    }

    fn cost(&self) -> f32 {
        self.def.cost()
    }

    fn preconditions(&self) -> &Facts {
        self.def.preconditions()
    }

    fn effects(&self) -> &Facts {
        self.def.effects()
    }
}

impl Action<ToyWorld> for ToyAction {
    fn pre_perform(
        &mut self,
        _ctx: &TickContext,
        _agent: u64,
        world: &mut ToyWorld,
        _beliefs: &mut Facts,
    ) -> Result<ActionBinding, Rejection> {
        if self.flaky && world.rejections_left > 0 {
            world.rejections_left -= 1;
            return Err(Rejection::ResourceUnavailable("flaky".into()));
        }
        Ok(match self.place {
            Some(point) => ActionBinding::at(point, self.duration),
            None => ActionBinding::in_place(self.duration),
        })
    }

    fn post_perform(
        &mut self,
        _ctx: &TickContext,
        _agent: u64,
        world: &mut ToyWorld,
        beliefs: &mut Facts,
    ) {
        world.log.push(self.def.name.clone());
        for key in self.def.effects.keys() {
            beliefs.set(key, 1);
        }
    }

    fn cancel(
        &mut self,
        _ctx: &TickContext,
        _agent: u64,
        world: &mut ToyWorld,
        _beliefs: &mut Facts,
    ) {
        world.canceled.push(self.def.name.clone());
    }
}

pub fn shopping_actions() -> Vec<ToyAction> {
    vec![
        ToyAction::here(GoapAction::new("GetCart").provides("hasCart"), 0.5),
        ToyAction::at(
            GoapAction::new("PickUpItem").requires("hasCart").provides("doneShopping"),
            Vec2::new(6.0, 0.0),
            1.0,
        ),
    ]
}

pub struct Harness {
    pub clock: SimClock,
    pub world: ToyWorld,
    pub scheduler: GoapScheduler<ToyWorld, ToyAction>,
    pub trace: TraceLog,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            clock: SimClock::new(DT, 7),
            world: ToyWorld::default(),
            scheduler: GoapScheduler::new(),
            trace: TraceLog::default(),
        }
    }

    pub fn run(&mut self, ticks: u32) {
        for _ in 0..ticks {
            let ctx = self.clock.advance();
            self.world.mover.step(ctx.dt_seconds);
            self.scheduler.tick(&ctx, &mut self.world, &mut self.trace);
        }
    }

    pub fn subjects(&self, tag: &str) -> Vec<String> {
        self.trace
            .tagged(tag)
            .filter_map(|e| e.subject.clone())
            .collect()
    }
}
