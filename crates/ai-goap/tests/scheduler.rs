mod support;

use ai_goap::{AgentPhase, GoapAgent, Goal};
use ai_nav::Vec2;

use support::{shopping_actions, Harness};

fn spawn(h: &mut Harness, id: u64, goal: &str) {
    h.world.mover.insert(id, Vec2::ZERO, 4.0);
    let agent = GoapAgent::new(id, shopping_actions()).with_goal(Goal::single(goal, 1, true), 1);
    h.scheduler.add_agent(agent);
}

#[test]
fn agents_tick_in_insertion_order() {
    let mut h = Harness::new();
    spawn(&mut h, 5, "hasCart");
    spawn(&mut h, 2, "hasCart");
    spawn(&mut h, 8, "hasCart");

    h.run(1);

    let order: Vec<u64> = h.trace.tagged("goap.plan.call").map(|e| e.agent).collect();
    assert_eq!(order, vec![5, 2, 8]);
}

#[test]
fn due_completions_fire_before_agents_tick() {
    let mut h = Harness::new();
    spawn(&mut h, 1, "hasCart");
    spawn(&mut h, 2, "hasCart");

    h.run(3);
    assert_eq!(h.scheduler.pending_completions(), 2);
    assert_eq!(h.scheduler.next_completion_due(), Some(1.0));

    let ctx = h.clock.advance();
    let completed = h.scheduler.tick(&ctx, &mut h.world, &mut h.trace);

    assert_eq!(completed, 2);
    assert_eq!(h.scheduler.pending_completions(), 0);
    assert_eq!(h.world.log, vec!["GetCart", "GetCart"]);
}

#[test]
fn removing_agent_releases_claims_and_completion() {
    let mut h = Harness::new();
    spawn(&mut h, 1, "hasCart");
    h.run(2);
    assert!(matches!(
        h.scheduler.agent(1).expect("agent").phase(),
        AgentPhase::Performing { .. }
    ));

    let ctx = h.clock.advance();
    let removed = h.scheduler.remove_agent(1, &ctx, &mut h.world).expect("removed");

    assert!(!removed.is_running());
    assert_eq!(h.world.canceled, vec!["GetCart"]);
    assert_eq!(h.scheduler.pending_completions(), 0);
    assert!(h.scheduler.is_empty());
}

#[test]
fn interrupted_agent_replans_after_cooldown() {
    let mut h = Harness::new();
    spawn(&mut h, 1, "hasCart");
    h.run(2);

    let ctx = h.clock.advance();
    assert!(h.scheduler.interrupt(1, &ctx, &mut h.world));
    assert!(!h.scheduler.interrupt(4, &ctx, &mut h.world));
    assert_eq!(h.scheduler.pending_completions(), 0);

    let agent = h.scheduler.agent(1).expect("agent");
    assert!(!agent.has_plan());
    assert_eq!(agent.current_action_name(), None);

    h.run(12);
    assert_eq!(h.world.log, vec!["GetCart"]);
    assert_eq!(h.trace.count("goap.plan.call"), 2);
}

#[test]
fn re_adding_an_id_replaces_the_agent() {
    let mut h = Harness::new();
    spawn(&mut h, 1, "hasCart");
    h.run(2);
    spawn(&mut h, 1, "doneShopping");

    assert_eq!(h.scheduler.len(), 1);
    assert_eq!(h.scheduler.pending_completions(), 0);
    let agent = h.scheduler.agent(1).expect("agent");
    assert_eq!(agent.goals().iter().next().map(|e| e.goal.label()).as_deref(), Some("doneShopping"));
}
