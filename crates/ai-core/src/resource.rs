use std::collections::VecDeque;

use crate::Facts;

/// FIFO pool of exclusively-claimable handles (carts, lanes, break slots).
///
/// A queue may be linked to an aggregate world fact. Every mutating call keeps
/// that fact equal to the queue length and removes it when the queue drains, so
/// presence of the fact always means "at least one handle is free".
#[derive(Debug, Clone)]
pub struct ResourceQueue<H> {
    queue: VecDeque<H>,
    linked_fact: Option<String>,
}

impl<H> ResourceQueue<H>
where
    H: PartialEq,
{
    /// Queue with no linked fact.
    pub fn unlinked() -> Self {
        Self {
            queue: VecDeque::new(),
            linked_fact: None,
        }
    }

    /// Build a queue from the handles found in the environment and publish its
    /// initial length to `linked_fact`.
    pub fn from_handles(
        handles: impl IntoIterator<Item = H>,
        linked_fact: Option<&str>,
        facts: &mut Facts,
    ) -> Self {
        let queue = Self {
            queue: handles.into_iter().collect(),
            linked_fact: linked_fact.map(str::to_owned),
        };
        queue.sync(facts);
        queue
    }

    pub fn linked_fact(&self) -> Option<&str> {
        self.linked_fact.as_deref()
    }

    pub fn add(&mut self, handle: H, facts: &mut Facts) {
        self.queue.push_back(handle);
        self.sync(facts);
    }

    pub fn take(&mut self, facts: &mut Facts) -> Option<H> {
        let handle = self.queue.pop_front()?;
        self.sync(facts);
        Some(handle)
    }

    /// Eject a specific handle regardless of its position. Remaining handles keep
    /// their relative order.
    pub fn remove(&mut self, handle: &H, facts: &mut Facts) -> bool {
        let before = self.queue.len();
        self.queue.retain(|h| h != handle);
        let removed = self.queue.len() != before;
        if removed {
            self.sync(facts);
        }
        removed
    }

    pub fn front(&self) -> Option<&H> {
        self.queue.front()
    }

    pub fn contains(&self, handle: &H) -> bool {
        self.queue.contains(handle)
    }

    pub fn iter(&self) -> impl Iterator<Item = &H> {
        self.queue.iter()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    fn sync(&self, facts: &mut Facts) {
        let Some(name) = self.linked_fact.as_deref() else {
            return;
        };
        if self.queue.is_empty() {
            facts.remove(name);
        } else {
            facts.set(name, self.queue.len() as i32);
        }
    }
}

impl<H> Default for ResourceQueue<H>
where
    H: PartialEq,
{
    fn default() -> Self {
        Self::unlinked()
    }
}
