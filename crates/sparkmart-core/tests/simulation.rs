use ai_core::WorldView;
use ai_goap::AgentPhase;
use ai_nav::Vec2;
use ai_tools::TraceLog;
use sparkmart_core::config::Assignments;
use sparkmart_core::store::FREE_CART;
use sparkmart_core::{Persona, ShelfId, SimConfig, Simulation};

fn quiet_store() -> SimConfig {
    let mut config = SimConfig::default();
    config.spawner.auto_spawn = false;
    config
}

#[test]
fn staff_is_hired_when_the_store_opens() {
    let sim = Simulation::new(SimConfig::default());
    assert_eq!(sim.store().employees().count(), 2);
    assert_eq!(sim.scheduler().len(), 2);
    assert_eq!(sim.store().customer_count(), 0);
}

#[test]
fn seeded_runs_are_reproducible() {
    let run = || {
        let mut sim = Simulation::new(SimConfig::default());
        sim.run_for(90.0);
        let metrics = sim.metrics();
        (
            sim.summary().customers_spawned,
            metrics.customers_served(),
            metrics.items_sold(),
            metrics.profit(),
        )
    };
    assert_eq!(run(), run());
}

#[test]
fn a_single_shopper_pays_and_leaves() {
    let mut sim = Simulation::new(quiet_store());
    let id = sim.spawn_customer(Persona::default(), Vec2::new(-8.0, -12.0));
    assert!(sim.agent(id).is_some());

    sim.run_for(240.0);

    assert!(sim.store().customer(id).is_none(), "customer still in store");
    assert!(sim.agent(id).is_none());
    let metrics = sim.metrics();
    assert_eq!(metrics.customers_served(), 1);
    assert!(metrics.items_sold() >= 1);
    assert!(metrics.profit() > 0.0);
    assert_eq!(sim.store().facts().get(FREE_CART), Some(6));
    assert!(sim.store().checkout_line().is_empty());
}

/// Every traveling agent is either still walking or close enough to its
/// destination to arrive on its next tick.
fn assert_no_stalled_travelers(sim: &Simulation) {
    let reach = sim.config().agents.arrival_distance;
    for agent in sim.scheduler().agents() {
        let AgentPhase::Traveling { destination } = agent.phase() else {
            continue;
        };
        let body = sim.store().mover().body(agent.id()).expect("body");
        assert!(
            body.is_moving() || body.position.distance(destination) < reach,
            "{} stopped at {:?} while heading for {:?}",
            agent.id(),
            body.position,
            destination
        );
    }
}

/// Steps until the store is empty or `limit` simulated seconds have passed.
fn drain(sim: &mut Simulation, limit: f64) {
    let until = sim.clock().now_seconds() + limit;
    while sim.store().customer_count() > 0 && sim.clock().now_seconds() < until {
        sim.step();
        assert_no_stalled_travelers(sim);
    }
}

#[test]
fn a_crowd_shares_the_lanes_and_everyone_goes_home() {
    let mut sim = Simulation::new(quiet_store());
    let personas = sim.config().personas.clone();
    let quick = personas[0].clone();
    let bulk = personas
        .iter()
        .find(|p| p.requires_cart)
        .cloned()
        .expect("cart persona");

    let spawn = Vec2::new(-8.0, -12.0);
    let crowd = [quick.clone(), bulk.clone(), quick, bulk, personas[1].clone()];
    let ids: Vec<_> = crowd
        .into_iter()
        .map(|persona| sim.spawn_customer(persona, spawn))
        .collect();
    assert_eq!(sim.store().customer_count(), 5);

    drain(&mut sim, 900.0);

    for id in ids {
        assert!(sim.store().customer(id).is_none(), "{id} never left");
    }
    assert_eq!(sim.metrics().customers_served(), 5);
    assert_eq!(sim.store().facts().get(FREE_CART), Some(6));
    assert!(sim.store().checkout_line().is_empty());
    assert!(sim.store().lanes().iter().all(|l| l.queue_len() == 0));
}

#[test]
fn busy_store_empties_once_arrivals_stop() {
    let mut config = SimConfig::default();
    config.spawner.max_customers = 12;
    config.spawner.interval_seconds = 3.0;
    let mut sim = Simulation::new(config);

    let until = 300.0;
    while sim.clock().now_seconds() < until {
        sim.step();
        assert_no_stalled_travelers(&sim);
    }
    let spawned = sim.summary().customers_spawned;
    assert!(spawned > 12, "only {spawned} customers arrived");

    sim.spawner_mut().set_auto_spawn(false);
    drain(&mut sim, 900.0);

    assert_eq!(sim.store().customer_count(), 0);
    assert_eq!(u64::from(sim.metrics().customers_served()), spawned);
    assert_eq!(sim.store().facts().get(FREE_CART), Some(6));
    assert!(sim.store().checkout_line().is_empty());
}

#[test]
fn automatic_arrivals_respect_the_switch_and_cap() {
    let mut sim = Simulation::new(quiet_store());
    sim.run_for(20.0);
    assert_eq!(sim.store().customer_count(), 0);
    assert!(sim.spawn_random_customer().is_some());
    assert_eq!(sim.store().customer_count(), 1);

    let mut config = SimConfig::default();
    config.spawner.max_customers = 2;
    config.spawner.interval_seconds = 1.0;
    config.spawner.interval_variance = 0.0;
    let mut sim = Simulation::new(config);
    sim.run_for(6.0);
    assert_eq!(sim.store().customer_count(), 2);
    assert!(sim.spawn_random_customer().is_none());
}

#[test]
fn stocker_refills_a_depleted_shelf() {
    let mut sim = Simulation::new(quiet_store());
    sim.store_mut()
        .shelf_mut(ShelfId(0))
        .expect("shelf")
        .take_items(95);

    sim.run_for(120.0);

    assert!(sim.metrics().restocks() >= 1);
    assert!(sim.store().shelf(ShelfId(0)).expect("shelf").is_full());
}

#[test]
fn reassignment_rebuilds_goals() {
    let mut sim = Simulation::new(quiet_store());
    let id = sim.store().employees().next().expect("employee").id();

    let idle = Assignments {
        checkout: false,
        restock: false,
        help: false,
        clean: false,
    };
    assert!(sim.update_assignments(id, idle));
    assert_eq!(sim.agent(id).expect("agent").goals().len(), 2);

    assert!(!sim.update_assignments(ai_core::EntityId(999), idle));
}

#[test]
fn trace_records_planning_and_completions() {
    let mut sim = Simulation::with_trace(quiet_store(), TraceLog::default());
    sim.spawn_customer(Persona::default(), Vec2::new(-8.0, -12.0));
    sim.run_for(30.0);

    let trace = sim.trace();
    assert!(trace.count("goap.plan.call") > 0);
    assert!(trace.count("goap.action.start") > 0);
    assert!(trace.count("goap.action.complete") > 0);
}

#[test]
fn metrics_snapshots_are_periodic() {
    let mut config = quiet_store();
    config.metrics.snapshot_interval_seconds = 10.0;
    let mut sim = Simulation::new(config);
    sim.run_for(35.0);
    assert_eq!(sim.metrics().snapshots().count(), 3);
}
