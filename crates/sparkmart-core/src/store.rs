//! Shared store state: world facts, claimable resources, shelves, lanes and
//! the per-entity records that agents act on.

use std::collections::BTreeMap;

use ai_core::{DeterministicRng, EntityId, Facts, ResourceQueue, SplitMix64, WorldMut, WorldView};
use ai_nav::{Mover, NavWorldMut, NavWorldView, Vec2};

use crate::checkout::{CheckoutLane, LaneId};
use crate::config::{CheckoutTiming, SimConfig};
use crate::customer::Customer;
use crate::employee::Employee;
use crate::metrics::Metrics;
use crate::shelf::{Shelf, ShelfId, ShelfType};

pub const FREE_CART: &str = "FreeCart";
pub const FREE_CHECKOUT_LANE: &str = "FreeCheckoutLane";
pub const FREE_BREAK_ROOM: &str = "FreeBreakRoom";
pub const STAFFED_CHECKOUT_LANE: &str = "StaffedCheckoutLane";

/// Fixed points customers and staff walk to.
#[derive(Debug, Clone, PartialEq)]
pub struct Landmarks {
    pub entry_points: Vec<Vec2>,
    pub exit: Option<Vec2>,
    pub warehouse: Option<Vec2>,
    pub spawn_point: Vec2,
}

/// A belief change aimed at another agent. Actions can only touch their own
/// agent's beliefs, so cross-agent updates go through the store and are
/// applied by the simulation before the next scheduler pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeliefUpdate {
    pub agent: EntityId,
    pub fact: &'static str,
    /// `None` removes the fact.
    pub value: Option<i32>,
}

pub struct Store {
    facts: Facts,
    carts: ResourceQueue<usize>,
    cart_positions: Vec<Vec2>,
    free_lanes: ResourceQueue<LaneId>,
    break_slots: ResourceQueue<usize>,
    break_positions: Vec<Vec2>,
    checkout_line: ResourceQueue<EntityId>,
    shelves: Vec<Shelf>,
    lanes: Vec<CheckoutLane>,
    landmarks: Landmarks,
    mover: Mover<EntityId>,
    customers: BTreeMap<EntityId, Customer>,
    employees: BTreeMap<EntityId, Employee>,
    metrics: Metrics,
    checkout: CheckoutTiming,
    rng: SplitMix64,
    mailbox: Vec<BeliefUpdate>,
    departed: Vec<EntityId>,
}

impl Store {
    pub fn new(config: &SimConfig) -> Self {
        let layout = &config.store;
        let mut facts = Facts::new();

        let lanes: Vec<CheckoutLane> = layout
            .checkout_lanes
            .iter()
            .enumerate()
            .map(|(i, lane)| CheckoutLane::from_config(LaneId(i), lane))
            .collect();
        let staffable = lanes
            .iter()
            .filter(|l| !l.is_self_checkout())
            .map(|l| l.id())
            .collect::<Vec<_>>();

        let carts = ResourceQueue::from_handles(0..layout.carts.len(), Some(FREE_CART), &mut facts);
        let free_lanes = ResourceQueue::from_handles(staffable, Some(FREE_CHECKOUT_LANE), &mut facts);
        let break_slots =
            ResourceQueue::from_handles(0..layout.break_room.len(), Some(FREE_BREAK_ROOM), &mut facts);

        let self_checkouts = lanes.iter().filter(|l| l.is_self_checkout()).count();
        if self_checkouts > 0 {
            facts.set(STAFFED_CHECKOUT_LANE, self_checkouts as i32);
        }

        let shelves = layout
            .shelves
            .iter()
            .enumerate()
            .map(|(i, shelf)| Shelf::from_config(ShelfId(i), shelf))
            .collect();

        Self {
            facts,
            carts,
            cart_positions: layout.carts.clone(),
            free_lanes,
            break_slots,
            break_positions: layout.break_room.clone(),
            checkout_line: ResourceQueue::unlinked(),
            shelves,
            lanes,
            landmarks: Landmarks {
                entry_points: layout.entry_points.clone(),
                exit: layout.exit,
                warehouse: layout.warehouse,
                spawn_point: config.spawner.spawn_point,
            },
            mover: Mover::new(),
            customers: BTreeMap::new(),
            employees: BTreeMap::new(),
            metrics: Metrics::new(&config.metrics),
            checkout: config.checkout,
            rng: SplitMix64::new(ai_core::rng::derive_seed(config.clock.seed, 0, 1)),
            mailbox: Vec::new(),
            departed: Vec::new(),
        }
    }

    pub fn landmarks(&self) -> &Landmarks {
        &self.landmarks
    }

    pub fn checkout_timing(&self) -> CheckoutTiming {
        self.checkout
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn metrics_mut(&mut self) -> &mut Metrics {
        &mut self.metrics
    }

    pub fn mover(&self) -> &Mover<EntityId> {
        &self.mover
    }

    pub fn mover_mut(&mut self) -> &mut Mover<EntityId> {
        &mut self.mover
    }

    pub fn rng(&mut self) -> &mut SplitMix64 {
        &mut self.rng
    }

    // --- entities ---

    pub fn add_customer(&mut self, customer: Customer, position: Vec2) {
        let speed = customer.persona().move_speed;
        self.mover.insert(customer.id(), position, speed);
        self.customers.insert(customer.id(), customer);
    }

    /// Drops a customer and releases everything they still hold.
    pub fn remove_customer(&mut self, id: EntityId) -> Option<Customer> {
        let mut customer = self.customers.remove(&id)?;
        if let Some(cart) = customer.cart.take() {
            self.carts.add(cart, &mut self.facts);
        }
        if let Some(shelf) = customer.current_shelf.take() {
            if let Some(shelf) = self.shelves.get_mut(shelf.0) {
                shelf.release_occupant(id);
            }
        }
        self.leave_lane(id);
        self.checkout_line.remove(&id, &mut self.facts);
        self.mover.remove(id);
        Some(customer)
    }

    pub fn customer(&self, id: EntityId) -> Option<&Customer> {
        self.customers.get(&id)
    }

    pub fn customer_mut(&mut self, id: EntityId) -> Option<&mut Customer> {
        self.customers.get_mut(&id)
    }

    pub fn customers(&self) -> impl Iterator<Item = &Customer> {
        self.customers.values()
    }

    pub fn customers_mut(&mut self) -> impl Iterator<Item = &mut Customer> {
        self.customers.values_mut()
    }

    pub fn customer_count(&self) -> usize {
        self.customers.len()
    }

    pub fn add_employee(&mut self, employee: Employee, position: Vec2, speed: f32) {
        self.mover.insert(employee.id(), position, speed);
        self.employees.insert(employee.id(), employee);
    }

    pub fn employee(&self, id: EntityId) -> Option<&Employee> {
        self.employees.get(&id)
    }

    pub fn employee_mut(&mut self, id: EntityId) -> Option<&mut Employee> {
        self.employees.get_mut(&id)
    }

    pub fn employees(&self) -> impl Iterator<Item = &Employee> {
        self.employees.values()
    }

    pub fn employees_mut(&mut self) -> impl Iterator<Item = &mut Employee> {
        self.employees.values_mut()
    }

    pub fn mark_departed(&mut self, id: EntityId) {
        if !self.departed.contains(&id) {
            self.departed.push(id);
        }
    }

    pub fn take_departed(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.departed)
    }

    pub fn post_belief(&mut self, agent: EntityId, fact: &'static str, value: Option<i32>) {
        self.mailbox.push(BeliefUpdate { agent, fact, value });
    }

    pub fn take_belief_updates(&mut self) -> Vec<BeliefUpdate> {
        std::mem::take(&mut self.mailbox)
    }

    // --- shelves ---

    pub fn shelves(&self) -> &[Shelf] {
        &self.shelves
    }

    pub fn shelf(&self, id: ShelfId) -> Option<&Shelf> {
        self.shelves.get(id.0)
    }

    pub fn shelf_mut(&mut self, id: ShelfId) -> Option<&mut Shelf> {
        self.shelves.get_mut(id.0)
    }

    pub fn shelves_needing_restock(&self) -> Vec<ShelfId> {
        self.shelves
            .iter()
            .filter(|s| s.needs_restock())
            .map(Shelf::id)
            .collect()
    }

    /// Closest shelf at or below its restock threshold; earlier shelves win ties.
    pub fn closest_shelf_needing_restock(&self, from: Vec2) -> Option<ShelfId> {
        let mut best: Option<(ShelfId, f32)> = None;
        for shelf in self.shelves.iter().filter(|s| s.needs_restock()) {
            let dist = shelf.position().distance(from);
            if best.map_or(true, |(_, d)| dist < d) {
                best = Some((shelf.id(), dist));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Random stocked shelf of `kind`.
    pub fn shelf_by_type(&mut self, kind: ShelfType) -> Option<ShelfId> {
        let matching: Vec<ShelfId> = self
            .shelves
            .iter()
            .filter(|s| s.kind() == kind && s.has_stock())
            .map(Shelf::id)
            .collect();
        self.rng.pick(&matching).copied()
    }

    pub fn random_stocked_shelf(&mut self) -> Option<ShelfId> {
        let stocked: Vec<ShelfId> = self
            .shelves
            .iter()
            .filter(|s| s.has_stock())
            .map(Shelf::id)
            .collect();
        self.rng.pick(&stocked).copied()
    }

    pub fn random_shelf(&mut self) -> Option<ShelfId> {
        let idx = self.rng.range_usize(0, self.shelves.len());
        self.shelves.get(idx).map(Shelf::id)
    }

    // --- carts ---

    pub fn free_carts(&self) -> usize {
        self.carts.len()
    }

    pub fn take_cart(&mut self) -> Option<usize> {
        self.carts.take(&mut self.facts)
    }

    pub fn return_cart(&mut self, cart: usize) {
        if !self.carts.contains(&cart) {
            self.carts.add(cart, &mut self.facts);
        }
    }

    pub fn cart_position(&self, cart: usize) -> Option<Vec2> {
        self.cart_positions.get(cart).copied()
    }

    // --- break room ---

    pub fn free_break_slots(&self) -> usize {
        self.break_slots.len()
    }

    pub fn take_break_slot(&mut self) -> Option<usize> {
        self.break_slots.take(&mut self.facts)
    }

    pub fn return_break_slot(&mut self, slot: usize) {
        if !self.break_slots.contains(&slot) {
            self.break_slots.add(slot, &mut self.facts);
        }
    }

    pub fn break_slot_position(&self, slot: usize) -> Option<Vec2> {
        self.break_positions.get(slot).copied()
    }

    // --- checkout ---

    pub fn lanes(&self) -> &[CheckoutLane] {
        &self.lanes
    }

    pub fn lane(&self, id: LaneId) -> Option<&CheckoutLane> {
        self.lanes.get(id.0)
    }

    pub fn free_lanes(&self) -> usize {
        self.free_lanes.len()
    }

    pub fn take_free_lane(&mut self) -> Option<LaneId> {
        self.free_lanes.take(&mut self.facts)
    }

    /// Puts an unstaffed lane back into the free pool.
    pub fn release_lane(&mut self, lane: LaneId) {
        if !self.free_lanes.contains(&lane) {
            self.free_lanes.add(lane, &mut self.facts);
        }
    }

    pub fn staff_lane(&mut self, lane: LaneId, employee: EntityId) -> bool {
        let Some(checkout) = self.lanes.get_mut(lane.0) else {
            return false;
        };
        checkout.assign_employee(employee);
        if let Some(e) = self.employees.get_mut(&employee) {
            e.lane = Some(lane);
        }
        self.facts.modify(STAFFED_CHECKOUT_LANE, 1);
        tracing::debug!(%employee, lane = checkout.number(), "lane staffed");
        true
    }

    /// Takes `employee` off their lane and frees it for other staff.
    pub fn leave_checkout_lane(&mut self, employee: EntityId) -> Option<LaneId> {
        let lane = self.employees.get_mut(&employee)?.lane.take()?;
        if let Some(checkout) = self.lanes.get_mut(lane.0) {
            checkout.remove_employee();
        }
        self.release_lane(lane);
        self.facts.modify(STAFFED_CHECKOUT_LANE, -1);
        if self.facts.get(STAFFED_CHECKOUT_LANE).is_some_and(|n| n <= 0) {
            self.facts.remove(STAFFED_CHECKOUT_LANE);
        }
        tracing::debug!(%employee, lane = lane.0, "lane unstaffed");
        Some(lane)
    }

    pub fn first_staffed_lane(&self) -> Option<LaneId> {
        self.lanes.iter().find(|l| l.is_staffed()).map(CheckoutLane::id)
    }

    /// First staffed lane of the preferred kind, else the first staffed lane.
    pub fn pick_lane(&self, prefers_self_checkout: bool) -> Option<LaneId> {
        self.lanes
            .iter()
            .find(|l| l.is_staffed() && l.is_self_checkout() == prefers_self_checkout)
            .map(CheckoutLane::id)
            .or_else(|| self.first_staffed_lane())
    }

    /// Queues `customer` on `lane` and in the store-wide checkout line.
    /// Returns where to stand.
    pub fn join_lane(&mut self, customer: EntityId, lane: LaneId) -> Option<Vec2> {
        let spot = self.lanes.get_mut(lane.0)?.join(customer);
        if let Some(c) = self.customers.get_mut(&customer) {
            c.lane = Some(lane);
        }
        if !self.checkout_line.contains(&customer) {
            self.checkout_line.add(customer, &mut self.facts);
        }
        Some(spot)
    }

    /// Removes `customer` from their lane. Everyone behind moves up one spot;
    /// their bodies are left alone and walk to the new spot when they next
    /// bind an action against the lane.
    pub fn leave_lane(&mut self, customer: EntityId) -> bool {
        let lane = match self.customers.get_mut(&customer) {
            Some(c) => c.lane.take(),
            None => self
                .lanes
                .iter()
                .find(|l| l.queued().contains(&customer))
                .map(CheckoutLane::id),
        };
        let Some(checkout) = lane.and_then(|l| self.lanes.get_mut(l.0)) else {
            return false;
        };
        checkout.leave(customer)
    }

    pub fn checkout_line(&self) -> &ResourceQueue<EntityId> {
        &self.checkout_line
    }

    pub fn take_from_checkout_line(&mut self) -> Option<EntityId> {
        self.checkout_line.take(&mut self.facts)
    }

    pub fn remove_from_checkout_line(&mut self, customer: EntityId) -> bool {
        self.checkout_line.remove(&customer, &mut self.facts)
    }

    /// Puts a customer an operator gave up on back at the end of the line.
    pub fn requeue_customer(&mut self, customer: EntityId) {
        if self.customers.contains_key(&customer) && !self.checkout_line.contains(&customer) {
            self.checkout_line.add(customer, &mut self.facts);
        }
    }

    /// Takes `customer` out of every line and marks them paid. The first
    /// completion records the sale; later calls return false and change nothing.
    pub fn finish_checkout(&mut self, customer: EntityId) -> bool {
        self.leave_lane(customer);
        self.checkout_line.remove(&customer, &mut self.facts);
        let Some(c) = self.customers.get_mut(&customer) else {
            return false;
        };
        if !c.complete_checkout() {
            return false;
        }
        let (profit, items, satisfaction) = (c.profit(), c.items_collected(), c.satisfaction());
        self.metrics.record_sale(profit, items);
        self.metrics.record_satisfaction(satisfaction);
        tracing::info!(%customer, profit, items, satisfaction, "checkout complete");
        true
    }
}

impl WorldView for Store {
    type Agent = EntityId;

    fn facts(&self) -> &Facts {
        &self.facts
    }
}

impl WorldMut for Store {
    fn facts_mut(&mut self) -> &mut Facts {
        &mut self.facts
    }
}

impl NavWorldView for Store {
    fn position(&self, agent: EntityId) -> Option<Vec2> {
        self.mover.position(agent)
    }
}

impl NavWorldMut for Store {
    fn set_destination(&mut self, agent: EntityId, destination: Vec2) -> bool {
        self.mover.set_destination(agent, destination)
    }
}
