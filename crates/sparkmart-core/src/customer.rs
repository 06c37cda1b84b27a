use ai_core::{EntityId, Facts};

use crate::checkout::LaneId;
use crate::config::Persona;
use crate::shelf::{ShelfId, ShelfType};

const PATIENCE_PENALTY: f32 = 20.0;
const OUT_OF_STOCK_PENALTY: f32 = 5.0;
const QUICK_CHECKOUT_BONUS: f32 = 5.0;

/// Shopper state the store tracks alongside the customer's GOAP agent.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    id: EntityId,
    persona: Persona,
    shopping_list: Vec<ShelfType>,
    next_item: usize,
    items_collected: u32,
    satisfaction: f32,
    patience: f32,
    profit: f32,
    pub(crate) cart: Option<usize>,
    pub(crate) current_shelf: Option<ShelfId>,
    pub(crate) lane: Option<LaneId>,
    checked_out: bool,
}

impl Customer {
    pub fn new(id: EntityId, persona: Persona, shopping_list: Vec<ShelfType>) -> Self {
        Self {
            id,
            satisfaction: persona.starting_satisfaction.clamp(0.0, 100.0),
            patience: persona.base_patience,
            persona,
            shopping_list,
            next_item: 0,
            items_collected: 0,
            profit: 0.0,
            cart: None,
            current_shelf: None,
            lane: None,
            checked_out: false,
        }
    }

    /// Goals every shopper starts with, highest priority first.
    pub fn goals(&self) -> Vec<(&'static str, i32)> {
        let mut goals = Vec::with_capacity(4);
        if self.persona.requires_cart {
            goals.push(("hasCart", 5));
        }
        goals.extend([("doneShopping", 4), ("hasCheckedOut", 3), ("leftStore", 1)]);
        goals
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    pub fn shopping_list(&self) -> &[ShelfType] {
        &self.shopping_list
    }

    pub fn next_item(&self) -> Option<ShelfType> {
        self.shopping_list.get(self.next_item).copied()
    }

    pub fn remaining_items(&self) -> usize {
        self.shopping_list.len().saturating_sub(self.next_item)
    }

    pub fn items_collected(&self) -> u32 {
        self.items_collected
    }

    pub fn satisfaction(&self) -> f32 {
        self.satisfaction
    }

    pub fn patience(&self) -> f32 {
        self.patience
    }

    pub fn profit(&self) -> f32 {
        self.profit
    }

    pub fn has_cart(&self) -> bool {
        self.cart.is_some()
    }

    pub fn current_shelf(&self) -> Option<ShelfId> {
        self.current_shelf
    }

    pub fn lane(&self) -> Option<LaneId> {
        self.lane
    }

    pub fn has_checked_out(&self) -> bool {
        self.checked_out
    }

    pub fn modify_satisfaction(&mut self, amount: f32) {
        self.satisfaction = (self.satisfaction + amount).clamp(0.0, 100.0);
    }

    /// Drains patience; returns true on the tick it runs out.
    pub fn tick_patience(&mut self, dt_seconds: f32, beliefs: &mut Facts) -> bool {
        if self.patience <= 0.0 {
            return false;
        }
        self.patience -= dt_seconds * self.persona.impatience_multiplier;
        if self.patience > 0.0 {
            return false;
        }
        self.modify_satisfaction(-PATIENCE_PENALTY);
        beliefs.modify("isFrustrated", 1);
        true
    }

    /// Records `count` items from the current list entry and moves on.
    pub fn collect_item(&mut self, count: u32, profit: f32, beliefs: &mut Facts) {
        self.items_collected += count;
        self.profit += profit;
        self.current_shelf = None;
        self.advance_list(beliefs);
    }

    /// The wanted item could not be found; skip it.
    pub fn item_out_of_stock(&mut self, beliefs: &mut Facts) {
        self.modify_satisfaction(-OUT_OF_STOCK_PENALTY);
        beliefs.modify("isFrustrated", 1);
        self.current_shelf = None;
        self.advance_list(beliefs);
    }

    /// Marks the customer as paid. Only the first call has any effect.
    pub fn complete_checkout(&mut self) -> bool {
        if self.checked_out {
            return false;
        }
        self.checked_out = true;
        if self.patience > self.persona.base_patience * 0.5 {
            self.modify_satisfaction(QUICK_CHECKOUT_BONUS);
        }
        true
    }

    fn advance_list(&mut self, beliefs: &mut Facts) {
        self.next_item += 1;
        if self.next_item >= self.shopping_list.len() {
            beliefs.set("doneShopping", 1);
            beliefs.set("readyToCheckout", 1);
        }
    }
}
