use ai_core::{EntityId, Facts};

use crate::checkout::LaneId;
use crate::config::{Assignments, EmployeeConfig};

/// Staff state the store tracks alongside the employee's GOAP agent.
#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    id: EntityId,
    name: String,
    assignments: Assignments,
    break_interval: f32,
    break_duration: f32,
    tired_efficiency: f32,
    max_carry: u32,
    since_break: f32,
    on_break: bool,
    tired: bool,
    efficiency: f32,
    carrying: u32,
    pub(crate) lane: Option<LaneId>,
    pub(crate) break_slot: Option<usize>,
}

impl Employee {
    pub fn from_config(id: EntityId, config: &EmployeeConfig) -> Self {
        Self {
            id,
            name: config.name.clone(),
            assignments: config.assignments,
            break_interval: config.break_interval_seconds,
            break_duration: config.break_duration_seconds,
            tired_efficiency: config.tired_efficiency.clamp(0.05, 1.0),
            max_carry: config.max_carry,
            since_break: 0.0,
            on_break: false,
            tired: false,
            efficiency: 1.0,
            carrying: 0,
            lane: None,
            break_slot: None,
        }
    }

    /// Standing goals for the current assignments. None are ever retired.
    pub fn goals(&self) -> Vec<(&'static str, i32)> {
        let mut goals = vec![("rested", 5), ("patrolled", 1)];
        if self.assignments.checkout {
            goals.push(("operatingCheckout", 3));
        }
        if self.assignments.restock {
            goals.push(("shelvesRestocked", 3));
        }
        if self.assignments.help {
            goals.push(("customerHelped", 4));
        }
        if self.assignments.clean {
            goals.push(("spillCleaned", 4));
        }
        goals
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn assignments(&self) -> Assignments {
        self.assignments
    }

    pub fn set_assignments(&mut self, assignments: Assignments) {
        self.assignments = assignments;
    }

    pub fn is_on_break(&self) -> bool {
        self.on_break
    }

    pub fn is_tired(&self) -> bool {
        self.tired
    }

    pub fn efficiency(&self) -> f32 {
        self.efficiency
    }

    pub fn break_duration(&self) -> f32 {
        self.break_duration
    }

    pub fn lane(&self) -> Option<LaneId> {
        self.lane
    }

    pub fn is_at_checkout_lane(&self) -> bool {
        self.lane.is_some()
    }

    pub fn carrying(&self) -> u32 {
        self.carrying
    }

    pub fn has_stock(&self) -> bool {
        self.carrying > 0
    }

    /// Accumulates time on shift and raises `needsBreak` once the interval has
    /// passed. Returns true on the tick the flag is raised.
    pub fn tick_break_timer(&mut self, dt_seconds: f32, beliefs: &mut Facts) -> bool {
        if self.on_break {
            return false;
        }
        self.since_break += dt_seconds;
        if self.since_break >= self.break_interval && !beliefs.has("needsBreak") {
            beliefs.set("needsBreak", 1);
            return true;
        }
        false
    }

    pub fn start_break(&mut self, beliefs: &mut Facts) {
        self.on_break = true;
        beliefs.set("isOnBreak", 1);
    }

    pub fn finish_break(&mut self, beliefs: &mut Facts) {
        self.on_break = false;
        self.tired = false;
        self.efficiency = 1.0;
        self.since_break = 0.0;
        beliefs.remove("isOnBreak");
        beliefs.remove("needsBreak");
        beliefs.remove("isTired");
    }

    /// Break interrupted before it began; the need for one remains.
    pub fn abort_break(&mut self, beliefs: &mut Facts) {
        self.on_break = false;
        beliefs.remove("isOnBreak");
    }

    /// No break slot was free: keep working at reduced efficiency.
    pub fn skip_break(&mut self, beliefs: &mut Facts) {
        self.tired = true;
        self.efficiency = self.tired_efficiency;
        beliefs.set("isTired", 1);
        beliefs.remove("needsBreak");
    }

    pub fn adjusted_duration(&self, base_seconds: f32) -> f32 {
        base_seconds / self.efficiency
    }

    pub fn pick_up_stock(&mut self, amount: u32) {
        self.carrying = amount.min(self.max_carry);
    }

    pub fn fill_up(&mut self) {
        self.pick_up_stock(self.max_carry);
    }

    pub fn deliver_stock(&mut self) -> u32 {
        std::mem::take(&mut self.carrying)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee() -> Employee {
        let config = EmployeeConfig {
            break_interval_seconds: 10.0,
            ..EmployeeConfig::default()
        };
        Employee::from_config(EntityId(3), &config)
    }

    #[test]
    fn break_cycle() {
        let mut e = employee();
        let mut beliefs = Facts::new();

        assert!(!e.tick_break_timer(9.0, &mut beliefs));
        assert!(e.tick_break_timer(1.0, &mut beliefs));
        assert!(!e.tick_break_timer(1.0, &mut beliefs));
        assert!(beliefs.has("needsBreak"));

        e.start_break(&mut beliefs);
        assert!(!e.tick_break_timer(100.0, &mut beliefs));
        e.finish_break(&mut beliefs);
        assert!(!beliefs.has("needsBreak"));
        assert!(!beliefs.has("isOnBreak"));
        assert!(!e.tick_break_timer(5.0, &mut beliefs));
    }

    #[test]
    fn skipping_a_break_slows_work() {
        let mut e = employee();
        let mut beliefs = Facts::new().with("needsBreak", 1);

        e.skip_break(&mut beliefs);
        assert!(e.is_tired());
        assert!(beliefs.has("isTired"));
        assert!(!beliefs.has("needsBreak"));
        assert!((e.adjusted_duration(7.0) - 10.0).abs() < 1e-4);

        e.finish_break(&mut beliefs);
        assert_eq!(e.adjusted_duration(7.0), 7.0);
    }

    #[test]
    fn carry_is_capped() {
        let mut e = employee();
        e.pick_up_stock(500);
        assert_eq!(e.carrying(), 20);
        assert_eq!(e.deliver_stock(), 20);
        assert!(!e.has_stock());
    }

    #[test]
    fn goals_follow_assignments() {
        let mut e = employee();
        assert_eq!(e.goals().len(), 6);
        e.set_assignments(Assignments {
            checkout: true,
            restock: false,
            help: false,
            clean: false,
        });
        let names: Vec<_> = e.goals().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["rested", "patrolled", "operatingCheckout"]);
    }
}
