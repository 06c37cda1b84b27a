mod support;

use ai_core::{CompletionQueue, Facts, SimClock};
use ai_goap::{AgentPhase, GoapAction, GoapAgent, Goal};
use ai_nav::Vec2;
use ai_tools::TraceLog;

use support::{shopping_actions, Harness, ToyAction, ToyWorld, DT};

fn shopper(h: &mut Harness, actions: Vec<ToyAction>) -> GoapAgent<ToyWorld, ToyAction> {
    h.world.mover.insert(1, Vec2::ZERO, 4.0);
    GoapAgent::new(1, actions)
}

#[test]
fn executes_plan_and_retires_goal() {
    let mut h = Harness::new();
    let agent = shopper(&mut h, shopping_actions()).with_goal(Goal::single("doneShopping", 1, true), 1);
    h.scheduler.add_agent(agent);

    h.run(20);

    assert_eq!(h.world.log, vec!["GetCart", "PickUpItem"]);
    let agent = h.scheduler.agent(1).expect("agent");
    assert!(agent.goals().is_empty());
    assert!(agent.beliefs().has("doneShopping"));
    assert_eq!(h.trace.count("goap.plan.result"), 1);
    assert_eq!(h.subjects("goap.goal.achieved"), vec!["doneShopping"]);
}

#[test]
fn performing_begins_only_within_arrival_distance() {
    let mut h = Harness::new();
    let agent = shopper(&mut h, shopping_actions()).with_goal(Goal::single("doneShopping", 1, true), 1);
    h.scheduler.add_agent(agent);

    // GetCart completes on tick 4; the walk to x=6 then covers one unit per tick.
    h.run(8);
    let agent = h.scheduler.agent(1).expect("agent");
    assert_eq!(agent.current_action_name(), Some("PickUpItem"));
    assert_eq!(
        agent.phase(),
        AgentPhase::Traveling {
            destination: Vec2::new(6.0, 0.0)
        }
    );

    h.run(1);
    let agent = h.scheduler.agent(1).expect("agent");
    assert!(matches!(agent.phase(), AgentPhase::Performing { .. }));
}

#[test]
fn rejection_drops_plan_and_waits_out_cooldown() {
    let mut h = Harness::new();
    h.world.rejections_left = 1;
    let mut actions = shopping_actions();
    actions[0] = ToyAction::here(GoapAction::new("GetCart").provides("hasCart"), 0.5).flaky();
    let agent = shopper(&mut h, actions).with_goal(Goal::single("doneShopping", 1, true), 1);
    h.scheduler.add_agent(agent);

    h.run(1);
    assert_eq!(h.subjects("goap.action.rejected"), vec!["GetCart"]);
    assert!(!h.scheduler.agent(1).expect("agent").has_plan());

    h.run(3);
    assert_eq!(h.trace.count("goap.plan.call"), 1);

    h.run(1);
    assert_eq!(h.trace.count("goap.plan.call"), 2);

    h.run(20);
    assert_eq!(h.world.log, vec!["GetCart", "PickUpItem"]);
}

#[test]
fn unreachable_goal_replans_once_per_cooldown() {
    let mut h = Harness::new();
    let agent = shopper(&mut h, shopping_actions()).with_goal(Goal::single("leftStore", 1, true), 1);
    h.scheduler.add_agent(agent);

    // 9 ticks of 0.25 s: attempts on ticks 1, 5 and 9.
    h.run(9);

    assert_eq!(h.trace.count("goap.plan.none"), 3);
    assert!(h.world.log.is_empty());
    let agent = h.scheduler.agent(1).expect("agent");
    assert!(agent.beliefs().is_empty());
    assert_eq!(agent.goals().len(), 1);
}

#[test]
fn falls_back_to_lower_priority_goal() {
    let mut h = Harness::new();
    let agent = shopper(&mut h, shopping_actions())
        .with_goal(Goal::single("hasCart", 1, true), 1)
        .with_goal(Goal::single("leftStore", 1, true), 10);
    h.scheduler.add_agent(agent);

    h.run(1);

    assert_eq!(h.subjects("goap.plan.call"), vec!["leftStore", "hasCart"]);
    assert_eq!(h.subjects("goap.plan.result"), vec!["hasCart"]);
}

#[test]
fn prefers_higher_priority_goal() {
    let mut h = Harness::new();
    let agent = shopper(&mut h, shopping_actions())
        .with_goal(Goal::single("hasCart", 1, true), 1)
        .with_goal(Goal::single("doneShopping", 1, true), 5);
    h.scheduler.add_agent(agent);

    h.run(1);

    assert_eq!(h.subjects("goap.plan.result"), vec!["doneShopping"]);
    let agent = h.scheduler.agent(1).expect("agent");
    assert_eq!(agent.active_goal().map(Goal::label).as_deref(), Some("doneShopping"));
    assert_eq!(agent.pending_actions().map(|a| a.def.name.as_str()).collect::<Vec<_>>(), vec!["PickUpItem"]);
}

#[test]
fn standing_goal_survives_achievement() {
    let mut h = Harness::new();
    let agent = shopper(&mut h, shopping_actions()).with_goal(Goal::single("hasCart", 1, false), 1);
    h.scheduler.add_agent(agent);

    h.run(12);

    let agent = h.scheduler.agent(1).expect("agent");
    assert_eq!(agent.goals().len(), 1);
    assert!(h.trace.count("goap.plan.exhausted") >= 1);
    assert_eq!(h.trace.count("goap.goal.achieved"), 0);
    assert_eq!(h.world.log, vec!["GetCart"]);
}

#[test]
fn world_facts_feed_planning() {
    let mut h = Harness::new();
    let actions = vec![ToyAction::here(
        GoapAction::new("GetCart").requires("FreeCart").provides("hasCart"),
        0.0,
    )];
    let agent = shopper(&mut h, actions).with_goal(Goal::single("hasCart", 1, true), 1);
    h.scheduler.add_agent(agent);

    h.run(1);
    assert_eq!(h.trace.count("goap.plan.none"), 1);

    h.world.facts.set("FreeCart", 2);
    h.run(8);
    assert_eq!(h.world.log, vec!["GetCart"]);
}

#[test]
fn missing_position_cancels_bound_action() {
    let mut h = Harness::new();
    let agent = GoapAgent::new(9, shopping_actions()).with_goal(Goal::single("hasCart", 1, true), 1);
    h.scheduler.add_agent(agent);

    h.run(1);

    assert_eq!(h.world.canceled, vec!["GetCart"]);
    assert_eq!(h.subjects("goap.action.rejected"), vec!["GetCart"]);
    assert!(h.world.log.is_empty());
}

#[test]
fn completion_without_performing_action_is_ignored() {
    let mut world = ToyWorld::default();
    world.mover.insert(1, Vec2::ZERO, 1.0);
    let mut agent: GoapAgent<ToyWorld, ToyAction> =
        GoapAgent::new(1, shopping_actions()).with_goal(Goal::single("hasCart", 1, true), 1);
    let mut completions = CompletionQueue::new();
    let mut trace = TraceLog::default();
    let mut clock = SimClock::new(DT, 0);

    let ctx = clock.advance();
    assert!(!agent.complete_action(&ctx, &mut world, &mut trace));

    agent.tick(&ctx, &mut world, &mut completions, &mut trace);
    assert!(agent.is_running());
    assert!(!agent.complete_action(&ctx, &mut world, &mut trace));
    assert!(completions.is_empty());
}

#[test]
fn beliefs_start_empty_and_stay_private() {
    let mut h = Harness::new();
    let agent = shopper(&mut h, shopping_actions()).with_goal(Goal::single("hasCart", 1, true), 1);
    h.scheduler.add_agent(agent);

    h.run(6);

    assert_eq!(h.world.facts, Facts::new());
    assert!(h.scheduler.agent(1).expect("agent").beliefs().has("hasCart"));
}
