use ai_core::EntityId;
use ai_nav::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::ShelfConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShelfType {
    General,
    Produce,
    Frozen,
    Electronics,
    Clothing,
}

impl ShelfType {
    pub const ALL: [ShelfType; 5] = [
        ShelfType::General,
        ShelfType::Produce,
        ShelfType::Frozen,
        ShelfType::Electronics,
        ShelfType::Clothing,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShelfId(pub usize);

#[derive(Debug, Clone, PartialEq)]
struct Spot {
    position: Vec2,
    occupant: Option<EntityId>,
}

/// A stocked shelf with customer standing spots and an optional staff-only
/// restock point.
#[derive(Debug, Clone, PartialEq)]
pub struct Shelf {
    id: ShelfId,
    name: String,
    kind: ShelfType,
    position: Vec2,
    stock: u32,
    max_stock: u32,
    restock_threshold: u32,
    profit_per_item: f32,
    browse_seconds: f32,
    restock_seconds: f32,
    spots: Vec<Spot>,
    restock_point: Option<Vec2>,
}

impl Shelf {
    pub fn from_config(id: ShelfId, config: &ShelfConfig) -> Self {
        let max_stock = config.max_stock.max(1);
        Self {
            id,
            name: config.name.clone(),
            kind: config.kind,
            position: config.position,
            stock: config.initial_stock.min(max_stock),
            max_stock,
            restock_threshold: config.restock_threshold,
            profit_per_item: config.profit_per_item,
            browse_seconds: config.browse_seconds,
            restock_seconds: config.restock_seconds,
            spots: config
                .spots
                .iter()
                .map(|&position| Spot {
                    position,
                    occupant: None,
                })
                .collect(),
            restock_point: config.restock_point,
        }
    }

    pub fn id(&self) -> ShelfId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ShelfType {
        self.kind
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn stock(&self) -> u32 {
        self.stock
    }

    pub fn max_stock(&self) -> u32 {
        self.max_stock
    }

    pub fn stock_fraction(&self) -> f32 {
        self.stock as f32 / self.max_stock as f32
    }

    pub fn needs_restock(&self) -> bool {
        self.stock <= self.restock_threshold
    }

    pub fn has_stock(&self) -> bool {
        self.stock > 0
    }

    pub fn is_full(&self) -> bool {
        self.stock >= self.max_stock
    }

    /// Removes up to `amount` items, returning how many were taken.
    pub fn take_items(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.stock);
        self.stock -= taken;
        taken
    }

    /// Adds `amount` items (or fills the shelf when `None`), capped at the
    /// maximum. Returns how many were added.
    pub fn add_items(&mut self, amount: Option<u32>) -> u32 {
        let before = self.stock;
        self.stock = match amount {
            Some(n) => self.stock.saturating_add(n).min(self.max_stock),
            None => self.max_stock,
        };
        self.stock - before
    }

    pub fn restock(&mut self) -> u32 {
        self.add_items(None)
    }

    pub fn profit(&self, items: u32) -> f32 {
        items as f32 * self.profit_per_item
    }

    pub fn browse_seconds(&self) -> f32 {
        self.browse_seconds
    }

    pub fn restock_seconds(&self) -> f32 {
        self.restock_seconds
    }

    /// Where staff stand to restock. Falls back to the shelf itself.
    pub fn restock_target(&self) -> Vec2 {
        self.restock_point.unwrap_or(self.position)
    }

    pub fn total_spots(&self) -> usize {
        self.spots.len()
    }

    pub fn available_spots(&self) -> usize {
        self.spots.iter().filter(|s| s.occupant.is_none()).count()
    }

    pub fn spot_position(&self, spot: usize) -> Option<Vec2> {
        self.spots.get(spot).map(|s| s.position)
    }

    /// Free spot closest to `from`; the earlier spot wins a tie.
    pub fn nearest_free_spot(&self, from: Vec2) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (idx, spot) in self.spots.iter().enumerate() {
            if spot.occupant.is_some() {
                continue;
            }
            let dist = spot.position.distance(from);
            if best.map_or(true, |(_, d)| dist < d) {
                best = Some((idx, dist));
            }
        }
        best.map(|(idx, _)| idx)
    }

    pub fn claim_spot(&mut self, spot: usize, occupant: EntityId) -> bool {
        match self.spots.get_mut(spot) {
            Some(s) if s.occupant.is_none() => {
                s.occupant = Some(occupant);
                true
            }
            _ => false,
        }
    }

    pub fn release_spot(&mut self, spot: usize) {
        if let Some(s) = self.spots.get_mut(spot) {
            s.occupant = None;
        }
    }

    /// Frees whatever spot `occupant` holds.
    pub fn release_occupant(&mut self, occupant: EntityId) -> bool {
        match self.spots.iter_mut().find(|s| s.occupant == Some(occupant)) {
            Some(s) => {
                s.occupant = None;
                true
            }
            None => false,
        }
    }
}
