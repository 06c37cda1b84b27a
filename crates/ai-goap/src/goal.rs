use ai_core::Facts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GoalId(u64);

/// Desired facts plus whether the goal retires once reached.
#[derive(Debug, Clone, PartialEq)]
pub struct Goal {
    pub facts: Facts,
    pub remove_on_achieved: bool,
}

impl Goal {
    pub fn new(facts: Facts, remove_on_achieved: bool) -> Self {
        Self {
            facts,
            remove_on_achieved,
        }
    }

    /// Goal over a single fact.
    pub fn single(fact: impl Into<String>, value: i32, remove_on_achieved: bool) -> Self {
        Self::new(Facts::new().with(fact, value), remove_on_achieved)
    }

    pub fn is_achieved(&self, beliefs: &Facts) -> bool {
        beliefs.contains_all(&self.facts)
    }

    pub fn label(&self) -> String {
        self.facts.keys().collect::<Vec<_>>().join(",")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoalEntry {
    pub id: GoalId,
    pub goal: Goal,
    pub priority: i32,
}

/// Goals with integer priorities, kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct GoalList {
    entries: Vec<GoalEntry>,
    next_id: u64,
}

impl GoalList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, goal: Goal, priority: i32) -> GoalId {
        let id = GoalId(self.next_id);
        self.next_id += 1;
        self.entries.push(GoalEntry { id, goal, priority });
        id
    }

    pub fn remove(&mut self, id: GoalId) -> Option<Goal> {
        let pos = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(pos).goal)
    }

    pub fn get(&self, id: GoalId) -> Option<&GoalEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn set_priority(&mut self, id: GoalId, priority: i32) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.priority = priority;
                true
            }
            None => false,
        }
    }

    /// Highest priority first; equal priorities keep insertion order.
    pub fn by_priority(&self) -> Vec<&GoalEntry> {
        let mut sorted: Vec<&GoalEntry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| b.priority.cmp(&a.priority));
        sorted
    }

    pub fn iter(&self) -> impl Iterator<Item = &GoalEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_ties_keep_insertion_order() {
        let mut goals = GoalList::new();
        let a = goals.add(Goal::single("a", 1, false), 1);
        let b = goals.add(Goal::single("b", 1, false), 5);
        let c = goals.add(Goal::single("c", 1, false), 1);

        let order: Vec<GoalId> = goals.by_priority().iter().map(|e| e.id).collect();
        assert_eq!(order, vec![b, a, c]);
    }

    #[test]
    fn remove_drops_only_that_goal() {
        let mut goals = GoalList::new();
        let a = goals.add(Goal::single("a", 1, true), 1);
        let b = goals.add(Goal::single("b", 1, true), 1);

        assert!(goals.remove(a).is_some());
        assert!(goals.remove(a).is_none());
        assert_eq!(goals.len(), 1);
        assert!(goals.get(b).is_some());
    }
}
