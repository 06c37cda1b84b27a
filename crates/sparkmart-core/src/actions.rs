//! Store actions for customers and staff.
//!
//! Every action is one [`StoreActionKind`] wrapped in a [`StoreAction`] that
//! carries the declarative planner data and whatever the current execution
//! has claimed.

use ai_core::{DeterministicRng, EntityId, Facts, TickContext, WorldView};
use ai_goap::{Action, ActionBinding, ActionDef, GoapAction, Rejection};
use ai_nav::{NavWorldView, Vec2};

use crate::checkout::LaneId;
use crate::customer::Customer;
use crate::employee::Employee;
use crate::shelf::ShelfId;
use crate::store::{Store, STAFFED_CHECKOUT_LANE};

const ENTER_SECONDS: f32 = 0.5;
const WAREHOUSE_SECONDS: f32 = 2.0;
const PATROL_SECONDS: (f32, f32) = (3.0, 6.0);
const PATROL_STREAM: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreActionKind {
    GoToStore,
    GetCart,
    GoToShelf,
    PickUpItem,
    GoToCheckout,
    CustomerCheckout,
    CustomerGoHome,
    GoToCheckoutLane,
    OperateCheckout,
    GoToWarehouse,
    RestockShelf,
    TakeBreak,
    EmployeePatrol,
}

impl StoreActionKind {
    pub const CUSTOMER: [StoreActionKind; 7] = [
        StoreActionKind::GoToStore,
        StoreActionKind::GetCart,
        StoreActionKind::GoToShelf,
        StoreActionKind::PickUpItem,
        StoreActionKind::GoToCheckout,
        StoreActionKind::CustomerCheckout,
        StoreActionKind::CustomerGoHome,
    ];

    pub const EMPLOYEE: [StoreActionKind; 6] = [
        StoreActionKind::GoToCheckoutLane,
        StoreActionKind::OperateCheckout,
        StoreActionKind::GoToWarehouse,
        StoreActionKind::RestockShelf,
        StoreActionKind::TakeBreak,
        StoreActionKind::EmployeePatrol,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StoreActionKind::GoToStore => "GoToStore",
            StoreActionKind::GetCart => "GetCart",
            StoreActionKind::GoToShelf => "GoToShelf",
            StoreActionKind::PickUpItem => "PickUpItem",
            StoreActionKind::GoToCheckout => "GoToCheckout",
            StoreActionKind::CustomerCheckout => "CustomerCheckout",
            StoreActionKind::CustomerGoHome => "CustomerGoHome",
            StoreActionKind::GoToCheckoutLane => "GoToCheckoutLane",
            StoreActionKind::OperateCheckout => "OperateCheckout",
            StoreActionKind::GoToWarehouse => "GoToWarehouse",
            StoreActionKind::RestockShelf => "RestockShelf",
            StoreActionKind::TakeBreak => "TakeBreak",
            StoreActionKind::EmployeePatrol => "EmployeePatrol",
        }
    }

    /// Planner-facing preconditions and effects.
    pub fn definition(self) -> GoapAction {
        let action = GoapAction::new(self.name());
        match self {
            StoreActionKind::GoToStore => action.provides("inStore"),
            StoreActionKind::GetCart => action.requires("inStore").provides("hasCart"),
            StoreActionKind::GoToShelf => action.provides("atShelf"),
            StoreActionKind::PickUpItem => action.requires("atShelf").provides("doneShopping"),
            StoreActionKind::GoToCheckout => {
                action.requires("doneShopping").provides("inCheckoutQueue")
            }
            StoreActionKind::CustomerCheckout => {
                action.requires("inCheckoutQueue").provides("hasCheckedOut")
            }
            StoreActionKind::CustomerGoHome => action.requires("hasCheckedOut").provides("leftStore"),
            StoreActionKind::GoToCheckoutLane => action.provides("atCheckoutLane"),
            StoreActionKind::OperateCheckout => {
                action.requires("atCheckoutLane").provides("operatingCheckout")
            }
            StoreActionKind::GoToWarehouse => action.provides("hasStock"),
            StoreActionKind::RestockShelf => action.provides("shelvesRestocked"),
            StoreActionKind::TakeBreak => action.requires("needsBreak").provides("rested"),
            StoreActionKind::EmployeePatrol => action.provides("patrolled"),
        }
    }
}

/// What the running execution holds and must hand back if it is cancelled.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Claim {
    Nothing,
    Cart(usize),
    ShelfSpot(ShelfId),
    Shelf(ShelfId),
    Lane(LaneId),
    Customer(EntityId),
    BreakSlot(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoreAction {
    kind: StoreActionKind,
    def: GoapAction,
    claim: Claim,
}

impl StoreAction {
    pub fn new(kind: StoreActionKind) -> Self {
        Self {
            kind,
            def: kind.definition(),
            claim: Claim::Nothing,
        }
    }

    pub fn customer_set() -> Vec<StoreAction> {
        StoreActionKind::CUSTOMER.into_iter().map(Self::new).collect()
    }

    pub fn employee_set() -> Vec<StoreAction> {
        StoreActionKind::EMPLOYEE.into_iter().map(Self::new).collect()
    }

    pub fn kind(&self) -> StoreActionKind {
        self.kind
    }

    pub fn definition(&self) -> &GoapAction {
        &self.def
    }

    // --- customer ---

    fn go_to_store(&mut self, store: &mut Store, beliefs: &mut Facts) -> Result<ActionBinding, Rejection> {
        let entries = store.landmarks().entry_points.clone();
        let Some(&entry) = store.rng().pick(&entries) else {
            beliefs.set("inStore", 1);
            return Err(Rejection::MissingCollaborator("entry point".into()));
        };
        Ok(ActionBinding::at(entry, ENTER_SECONDS))
    }

    fn get_cart(
        &mut self,
        agent: EntityId,
        store: &mut Store,
        beliefs: &mut Facts,
    ) -> Result<ActionBinding, Rejection> {
        if customer(store, agent)?.has_cart() {
            beliefs.set("hasCart", 1);
            return Err(Rejection::Precondition("already has a cart".into()));
        }
        if store.free_carts() == 0 {
            return Err(Rejection::ResourceUnavailable("cart".into()));
        }
        let cart = store
            .take_cart()
            .ok_or_else(|| Rejection::ResourceUnavailable("cart".into()))?;
        self.claim = Claim::Cart(cart);
        Ok(match store.cart_position(cart) {
            Some(point) => ActionBinding::at(point, 0.0),
            None => ActionBinding::in_place(0.0),
        })
    }

    fn go_to_shelf(
        &mut self,
        agent: EntityId,
        store: &mut Store,
        beliefs: &mut Facts,
    ) -> Result<ActionBinding, Rejection> {
        let (needs_cart, next) = {
            let c = customer(store, agent)?;
            (c.persona().requires_cart && !c.has_cart(), c.next_item())
        };
        if needs_cart {
            return Err(Rejection::Precondition("cart required".into()));
        }
        let Some(kind) = next else {
            beliefs.set("doneShopping", 1);
            return Err(Rejection::Precondition("shopping list complete".into()));
        };

        let shelf_id = match store.shelf_by_type(kind).or_else(|| store.random_stocked_shelf()) {
            Some(id) => id,
            None => {
                customer(store, agent)?.item_out_of_stock(beliefs);
                return Err(Rejection::ResourceUnavailable("stocked shelf".into()));
            }
        };

        let from = store.position(agent).unwrap_or_default();
        let shelf = store
            .shelf_mut(shelf_id)
            .ok_or_else(|| Rejection::MissingCollaborator("shelf".into()))?;
        let spot = shelf
            .nearest_free_spot(from)
            .filter(|&spot| shelf.claim_spot(spot, agent));
        let target = spot
            .and_then(|spot| shelf.spot_position(spot))
            .unwrap_or(shelf.position());

        customer(store, agent)?.current_shelf = Some(shelf_id);
        self.claim = Claim::ShelfSpot(shelf_id);
        Ok(ActionBinding::at(target, 0.0))
    }

    fn pick_up_item(
        &mut self,
        agent: EntityId,
        store: &mut Store,
        beliefs: &mut Facts,
    ) -> Result<ActionBinding, Rejection> {
        let shelf_id = customer(store, agent)?
            .current_shelf
            .ok_or_else(|| Rejection::Precondition("no shelf chosen".into()))?;
        let shelf = store
            .shelf_mut(shelf_id)
            .ok_or_else(|| Rejection::MissingCollaborator("shelf".into()))?;

        if !shelf.has_stock() {
            shelf.release_occupant(agent);
            customer(store, agent)?.item_out_of_stock(beliefs);
            beliefs.remove("atShelf");
            return Err(Rejection::ResourceUnavailable("shelf out of stock".into()));
        }

        let browse = shelf.browse_seconds();
        self.claim = Claim::Shelf(shelf_id);
        Ok(ActionBinding::in_place(browse))
    }

    fn go_to_checkout(&mut self, agent: EntityId, store: &mut Store) -> Result<ActionBinding, Rejection> {
        if !store.facts().has(STAFFED_CHECKOUT_LANE) {
            return Err(Rejection::ResourceUnavailable("staffed checkout lane".into()));
        }
        let prefers_self = customer(store, agent)?.persona().prefers_self_checkout;
        let lane = store
            .pick_lane(prefers_self)
            .ok_or_else(|| Rejection::ResourceUnavailable("staffed checkout lane".into()))?;
        let spot = store
            .join_lane(agent, lane)
            .ok_or_else(|| Rejection::MissingCollaborator("checkout lane".into()))?;
        self.claim = Claim::Lane(lane);
        Ok(ActionBinding::at(spot, 0.0))
    }

    fn customer_checkout(&mut self, agent: EntityId, store: &mut Store) -> Result<ActionBinding, Rejection> {
        let (lane, items) = {
            let c = customer(store, agent)?;
            (c.lane(), c.items_collected())
        };
        let duration = store.checkout_timing().customer_seconds(items);

        let Some(lane) = lane.and_then(|id| store.lane(id)) else {
            return Ok(ActionBinding::in_place(duration));
        };
        if !lane.is_first(agent) {
            return Err(Rejection::Precondition("not first in line".into()));
        }
        Ok(ActionBinding::at(lane.position_of(agent), duration))
    }

    fn customer_go_home(&mut self, store: &mut Store) -> Result<ActionBinding, Rejection> {
        let landmarks = store.landmarks();
        let exit = landmarks.exit.unwrap_or(landmarks.spawn_point);
        Ok(ActionBinding::at(exit, 0.0))
    }

    // --- employee ---

    fn go_to_checkout_lane(
        &mut self,
        agent: EntityId,
        store: &mut Store,
        beliefs: &mut Facts,
    ) -> Result<ActionBinding, Rejection> {
        let (assigned, at_lane) = {
            let e = employee(store, agent)?;
            (e.assignments().checkout, e.is_at_checkout_lane())
        };
        if !assigned {
            return Err(Rejection::Precondition("not assigned to checkout".into()));
        }
        if at_lane {
            beliefs.set("atCheckoutLane", 1);
            return Err(Rejection::Precondition("already at a lane".into()));
        }
        if store.free_lanes() == 0 {
            return Err(Rejection::ResourceUnavailable("checkout lane".into()));
        }
        let lane = store
            .take_free_lane()
            .ok_or_else(|| Rejection::ResourceUnavailable("checkout lane".into()))?;
        self.claim = Claim::Lane(lane);
        let point = store.lane(lane).map_or(Vec2::ZERO, |l| l.position());
        Ok(ActionBinding::at(point, 0.0))
    }

    fn operate_checkout(&mut self, agent: EntityId, store: &mut Store) -> Result<ActionBinding, Rejection> {
        if !employee(store, agent)?.is_at_checkout_lane() {
            return Err(Rejection::Precondition("not at a checkout lane".into()));
        }
        let shopper = store
            .take_from_checkout_line()
            .ok_or_else(|| Rejection::ResourceUnavailable("waiting customer".into()))?;
        let items = store.customer(shopper).map_or(0, Customer::items_collected);
        let base = store.checkout_timing().operator_seconds(items);
        let duration = employee(store, agent)?.adjusted_duration(base);
        self.claim = Claim::Customer(shopper);
        Ok(ActionBinding::in_place(duration))
    }

    fn go_to_warehouse(&mut self, agent: EntityId, store: &mut Store) -> Result<ActionBinding, Rejection> {
        let (assigned, carrying) = {
            let e = employee(store, agent)?;
            (e.assignments().restock, e.has_stock())
        };
        if !assigned {
            return Err(Rejection::Precondition("not assigned to restock".into()));
        }
        if carrying {
            return Err(Rejection::Precondition("already carrying stock".into()));
        }
        if store.shelves_needing_restock().is_empty() {
            return Err(Rejection::Precondition("no shelf needs restock".into()));
        }
        let warehouse = store
            .landmarks()
            .warehouse
            .ok_or_else(|| Rejection::MissingCollaborator("warehouse".into()))?;
        Ok(ActionBinding::at(warehouse, WAREHOUSE_SECONDS))
    }

    fn restock_shelf(&mut self, agent: EntityId, store: &mut Store) -> Result<ActionBinding, Rejection> {
        let (assigned, at_lane) = {
            let e = employee(store, agent)?;
            (e.assignments().restock, e.is_at_checkout_lane())
        };
        if !assigned {
            return Err(Rejection::Precondition("not assigned to restock".into()));
        }
        if at_lane {
            return Err(Rejection::Precondition("staffing a checkout lane".into()));
        }
        let from = store.position(agent).unwrap_or_default();
        let shelf_id = store
            .closest_shelf_needing_restock(from)
            .ok_or_else(|| Rejection::Precondition("no shelf needs restock".into()))?;
        let (target, base) = store
            .shelf(shelf_id)
            .map(|s| (s.restock_target(), s.restock_seconds()))
            .ok_or_else(|| Rejection::MissingCollaborator("shelf".into()))?;
        let duration = employee(store, agent)?.adjusted_duration(base);
        self.claim = Claim::Shelf(shelf_id);
        Ok(ActionBinding::at(target, duration))
    }

    fn take_break(
        &mut self,
        agent: EntityId,
        store: &mut Store,
        beliefs: &mut Facts,
    ) -> Result<ActionBinding, Rejection> {
        employee(store, agent)?;
        let Some(slot) = store.take_break_slot() else {
            employee(store, agent)?.skip_break(beliefs);
            return Err(Rejection::ResourceUnavailable("break room".into()));
        };

        if store.leave_checkout_lane(agent).is_some() {
            beliefs.remove("atCheckoutLane");
        }
        let point = store.break_slot_position(slot).unwrap_or_default();
        let e = employee(store, agent)?;
        e.start_break(beliefs);
        e.break_slot = Some(slot);
        let duration = e.break_duration();
        self.claim = Claim::BreakSlot(slot);
        Ok(ActionBinding::at(point, duration))
    }

    fn employee_patrol(
        &mut self,
        ctx: &TickContext,
        agent: EntityId,
        store: &mut Store,
    ) -> Result<ActionBinding, Rejection> {
        let (at_lane, on_break) = {
            let e = employee(store, agent)?;
            (e.is_at_checkout_lane(), e.is_on_break())
        };
        if at_lane || on_break {
            return Err(Rejection::Precondition("busy".into()));
        }
        let shelf = store
            .random_stocked_shelf()
            .or_else(|| store.random_shelf())
            .and_then(|id| store.shelf(id))
            .map(|s| s.position())
            .ok_or_else(|| Rejection::MissingCollaborator("shelf".into()))?;
        let linger = ctx
            .rng_for_agent(agent, PATROL_STREAM)
            .range_f32(PATROL_SECONDS.0, PATROL_SECONDS.1);
        Ok(ActionBinding::at(shelf, linger))
    }
}

fn customer(store: &mut Store, agent: EntityId) -> Result<&mut Customer, Rejection> {
    store
        .customer_mut(agent)
        .ok_or_else(|| Rejection::MissingCollaborator("customer record".into()))
}

fn employee(store: &mut Store, agent: EntityId) -> Result<&mut Employee, Rejection> {
    store
        .employee_mut(agent)
        .ok_or_else(|| Rejection::MissingCollaborator("employee record".into()))
}

impl ActionDef for StoreAction {
    fn name(&self) -> &str {
        self.kind.name()
    }

    fn cost(&self) -> f32 {
        self.def.cost
    }

    fn preconditions(&self) -> &Facts {
        &self.def.preconditions
    }

    fn effects(&self) -> &Facts {
        &self.def.effects
    }
}

impl Action<Store> for StoreAction {
    fn pre_perform(
        &mut self,
        ctx: &TickContext,
        agent: EntityId,
        store: &mut Store,
        beliefs: &mut Facts,
    ) -> Result<ActionBinding, Rejection> {
        self.claim = Claim::Nothing;
        match self.kind {
            StoreActionKind::GoToStore => self.go_to_store(store, beliefs),
            StoreActionKind::GetCart => self.get_cart(agent, store, beliefs),
            StoreActionKind::GoToShelf => self.go_to_shelf(agent, store, beliefs),
            StoreActionKind::PickUpItem => self.pick_up_item(agent, store, beliefs),
            StoreActionKind::GoToCheckout => self.go_to_checkout(agent, store),
            StoreActionKind::CustomerCheckout => self.customer_checkout(agent, store),
            StoreActionKind::CustomerGoHome => self.customer_go_home(store),
            StoreActionKind::GoToCheckoutLane => self.go_to_checkout_lane(agent, store, beliefs),
            StoreActionKind::OperateCheckout => self.operate_checkout(agent, store),
            StoreActionKind::GoToWarehouse => self.go_to_warehouse(agent, store),
            StoreActionKind::RestockShelf => self.restock_shelf(agent, store),
            StoreActionKind::TakeBreak => self.take_break(agent, store, beliefs),
            StoreActionKind::EmployeePatrol => self.employee_patrol(ctx, agent, store),
        }
    }

    fn post_perform(&mut self, _ctx: &TickContext, agent: EntityId, store: &mut Store, beliefs: &mut Facts) {
        let claim = std::mem::replace(&mut self.claim, Claim::Nothing);
        match self.kind {
            StoreActionKind::GoToStore => {
                beliefs.set("inStore", 1);
            }
            StoreActionKind::GetCart => {
                let Claim::Cart(cart) = claim else { return };
                match store.customer_mut(agent) {
                    Some(c) => {
                        c.cart = Some(cart);
                        beliefs.set("hasCart", 1);
                    }
                    None => store.return_cart(cart),
                }
            }
            StoreActionKind::GoToShelf => {
                beliefs.set("atShelf", 1);
            }
            StoreActionKind::PickUpItem => {
                let Claim::Shelf(shelf_id) = claim else { return };
                let (taken, profit) = match store.shelf_mut(shelf_id) {
                    Some(shelf) => {
                        let taken = shelf.take_items(1);
                        shelf.release_occupant(agent);
                        (taken, shelf.profit(taken))
                    }
                    None => (0, 0.0),
                };
                if let Some(c) = store.customer_mut(agent) {
                    if taken > 0 {
                        c.collect_item(taken, profit, beliefs);
                        beliefs.set("hasItems", 1);
                    } else {
                        c.current_shelf = None;
                    }
                }
                beliefs.remove("atShelf");
            }
            StoreActionKind::GoToCheckout => {
                beliefs.set("inCheckoutQueue", 1);
            }
            StoreActionKind::CustomerCheckout => {
                store.finish_checkout(agent);
                beliefs.set("hasCheckedOut", 1);
                beliefs.remove("inCheckoutQueue");
                beliefs.remove("readyToCheckout");
            }
            StoreActionKind::CustomerGoHome => {
                if let Some(cart) = store.customer_mut(agent).and_then(|c| c.cart.take()) {
                    store.return_cart(cart);
                }
                beliefs.remove("hasCart");
                beliefs.set("leftStore", 1);
                store.mark_departed(agent);
            }
            StoreActionKind::GoToCheckoutLane => {
                let Claim::Lane(lane) = claim else { return };
                if store.staff_lane(lane, agent) {
                    beliefs.set("atCheckoutLane", 1);
                } else {
                    store.release_lane(lane);
                }
            }
            StoreActionKind::OperateCheckout => {
                let Claim::Customer(shopper) = claim else { return };
                if store.finish_checkout(shopper) {
                    store.post_belief(shopper, "hasCheckedOut", Some(1));
                    store.post_belief(shopper, "inCheckoutQueue", None);
                    store.post_belief(shopper, "readyToCheckout", None);
                }
            }
            StoreActionKind::GoToWarehouse => {
                if let Some(e) = store.employee_mut(agent) {
                    e.fill_up();
                    beliefs.set("hasStock", 1);
                }
            }
            StoreActionKind::RestockShelf => {
                let Claim::Shelf(shelf_id) = claim else { return };
                let added = store.shelf_mut(shelf_id).map_or(0, |s| s.restock());
                if let Some(e) = store.employee_mut(agent) {
                    e.deliver_stock();
                }
                beliefs.remove("hasStock");
                store.metrics_mut().record_restock();
                tracing::info!(employee = %agent, shelf = shelf_id.0, added, "shelf restocked");
            }
            StoreActionKind::TakeBreak => {
                let Claim::BreakSlot(slot) = claim else { return };
                store.return_break_slot(slot);
                if let Some(e) = store.employee_mut(agent) {
                    e.break_slot = None;
                    e.finish_break(beliefs);
                }
            }
            StoreActionKind::EmployeePatrol => {}
        }
    }

    fn cancel(&mut self, _ctx: &TickContext, agent: EntityId, store: &mut Store, beliefs: &mut Facts) {
        match std::mem::replace(&mut self.claim, Claim::Nothing) {
            Claim::Nothing => {}
            Claim::Cart(cart) => store.return_cart(cart),
            Claim::ShelfSpot(shelf) | Claim::Shelf(shelf) => {
                if let Some(shelf) = store.shelf_mut(shelf) {
                    shelf.release_occupant(agent);
                }
                if let Some(c) = store.customer_mut(agent) {
                    c.current_shelf = None;
                }
            }
            Claim::Lane(lane) => match self.kind {
                StoreActionKind::GoToCheckout => {
                    store.leave_lane(agent);
                    store.remove_from_checkout_line(agent);
                }
                _ => store.release_lane(lane),
            },
            Claim::Customer(shopper) => store.requeue_customer(shopper),
            Claim::BreakSlot(slot) => {
                store.return_break_slot(slot);
                if let Some(e) = store.employee_mut(agent) {
                    e.break_slot = None;
                    e.abort_break(beliefs);
                }
            }
        }
        tracing::debug!(agent = %agent, action = self.kind.name(), "claims released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declarations_chain_for_customers() {
        let defs: Vec<GoapAction> = StoreAction::customer_set()
            .iter()
            .map(|a| a.definition().clone())
            .collect();
        let plan = ai_goap::GoapPlanner::new()
            .plan(&defs, &Facts::new().with("leftStore", 1), &Facts::new())
            .expect("plan");
        let names: Vec<&str> = plan.steps.iter().map(|&i| defs[i].name.as_str()).collect();
        assert_eq!(
            names,
            vec!["GoToShelf", "PickUpItem", "GoToCheckout", "CustomerCheckout", "CustomerGoHome"]
        );
    }

    #[test]
    fn every_kind_has_a_distinct_name() {
        let mut names: Vec<&str> = StoreActionKind::CUSTOMER
            .iter()
            .chain(StoreActionKind::EMPLOYEE.iter())
            .map(|k| k.name())
            .collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 13);
    }
}
