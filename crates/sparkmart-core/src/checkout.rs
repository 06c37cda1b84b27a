use ai_core::EntityId;
use ai_nav::Vec2;

use crate::config::LaneConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LaneId(pub usize);

/// Checkout lane with an ordered customer line.
///
/// The first `queue_spots` positions are fixed; customers beyond them stand on
/// an overflow line continuing past the last spot.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutLane {
    id: LaneId,
    number: u32,
    position: Vec2,
    self_checkout: bool,
    staffed: bool,
    employee: Option<EntityId>,
    queue_spots: Vec<Vec2>,
    overflow_spacing: f32,
    overflow_direction: Vec2,
    queued: Vec<EntityId>,
}

impl CheckoutLane {
    pub fn from_config(id: LaneId, config: &LaneConfig) -> Self {
        let overflow_direction = match config.queue_spots.as_slice() {
            [first, .., last] => (*last - *first).normalize_or_zero(),
            _ => Vec2::new(0.0, -1.0),
        };
        Self {
            id,
            number: config.number,
            position: config.position,
            self_checkout: config.self_checkout,
            staffed: false,
            employee: None,
            queue_spots: config.queue_spots.clone(),
            overflow_spacing: config.overflow_spacing,
            overflow_direction,
            queued: Vec::new(),
        }
    }

    pub fn id(&self) -> LaneId {
        self.id
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn is_self_checkout(&self) -> bool {
        self.self_checkout
    }

    /// Self-checkout lanes always count as staffed.
    pub fn is_staffed(&self) -> bool {
        self.staffed || self.self_checkout
    }

    pub fn employee(&self) -> Option<EntityId> {
        self.employee
    }

    pub fn assign_employee(&mut self, employee: EntityId) {
        self.employee = Some(employee);
        self.staffed = true;
    }

    pub fn remove_employee(&mut self) -> Option<EntityId> {
        self.staffed = false;
        self.employee.take()
    }

    /// Adds `customer` to the back of the line and returns where to stand.
    /// Joining twice keeps the original place.
    pub fn join(&mut self, customer: EntityId) -> Vec2 {
        let index = match self.queued.iter().position(|&c| c == customer) {
            Some(index) => index,
            None => {
                self.queued.push(customer);
                self.queued.len() - 1
            }
        };
        self.position_for_index(index)
    }

    /// Removes `customer`; everyone behind moves up one place.
    pub fn leave(&mut self, customer: EntityId) -> bool {
        match self.queued.iter().position(|&c| c == customer) {
            Some(index) => {
                self.queued.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn is_first(&self, customer: EntityId) -> bool {
        self.queued.first() == Some(&customer)
    }

    /// Where `customer` should currently stand; the lane itself when not queued.
    pub fn position_of(&self, customer: EntityId) -> Vec2 {
        match self.queued.iter().position(|&c| c == customer) {
            Some(index) => self.position_for_index(index),
            None => self.position,
        }
    }

    pub fn queued(&self) -> &[EntityId] {
        &self.queued
    }

    pub fn queue_len(&self) -> usize {
        self.queued.len()
    }

    pub fn spot_count(&self) -> usize {
        self.queue_spots.len()
    }

    fn position_for_index(&self, index: usize) -> Vec2 {
        if let Some(spot) = self.queue_spots.get(index) {
            return *spot;
        }
        let overflow = (index + 1 - self.queue_spots.len()) as f32;
        let last = self.queue_spots.last().copied().unwrap_or(self.position);
        last + self.overflow_direction * (overflow * self.overflow_spacing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lane() -> CheckoutLane {
        let config = LaneConfig {
            number: 1,
            position: Vec2::new(0.0, 0.0),
            self_checkout: false,
            queue_spots: vec![Vec2::new(0.0, 1.0), Vec2::new(0.0, 2.0)],
            overflow_spacing: 1.5,
        };
        CheckoutLane::from_config(LaneId(0), &config)
    }

    #[test]
    fn line_order_and_overflow() {
        let mut lane = lane();
        assert_eq!(lane.join(EntityId(1)), Vec2::new(0.0, 1.0));
        assert_eq!(lane.join(EntityId(2)), Vec2::new(0.0, 2.0));
        assert_eq!(lane.join(EntityId(3)), Vec2::new(0.0, 3.5));
        assert_eq!(lane.join(EntityId(2)), Vec2::new(0.0, 2.0));
        assert_eq!(lane.queue_len(), 3);

        assert!(lane.is_first(EntityId(1)));
        assert!(lane.leave(EntityId(1)));
        assert!(!lane.leave(EntityId(1)));
        assert!(lane.is_first(EntityId(2)));
        assert_eq!(lane.position_of(EntityId(3)), Vec2::new(0.0, 2.0));
        assert_eq!(lane.position_of(EntityId(9)), lane.position());
    }

    #[test]
    fn staffing() {
        let mut lane = lane();
        assert!(!lane.is_staffed());
        lane.assign_employee(EntityId(7));
        assert!(lane.is_staffed());
        assert_eq!(lane.remove_employee(), Some(EntityId(7)));
        assert!(!lane.is_staffed());
    }
}
