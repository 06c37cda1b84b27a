use core::cmp::Ordering;
use std::collections::BinaryHeap;

/// Fire-once events keyed by simulation time.
///
/// Replaces per-agent timers: whoever owns the queue polls it once per tick and
/// receives every event whose due time has passed, earliest first. Events due at
/// the same instant come out in scheduling order.
#[derive(Debug, Clone)]
pub struct CompletionQueue<T> {
    heap: BinaryHeap<Scheduled<T>>,
    next_seq: u64,
}

#[derive(Debug, Clone)]
struct Scheduled<T> {
    due: f64,
    seq: u64,
    payload: T,
}

impl<T> Scheduled<T> {
    fn key(&self) -> (f64, u64) {
        (self.due, self.seq)
    }
}

impl<T> PartialEq for Scheduled<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Scheduled<T> {}

impl<T> Ord for Scheduled<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap behave like a min-heap.
        let (a_due, a_seq) = self.key();
        let (b_due, b_seq) = other.key();
        b_due.total_cmp(&a_due).then_with(|| b_seq.cmp(&a_seq))
    }
}

impl<T> PartialOrd for Scheduled<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> CompletionQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    pub fn schedule(&mut self, due: f64, payload: T) {
        self.heap.push(Scheduled {
            due,
            seq: self.next_seq,
            payload,
        });
        self.next_seq += 1;
    }

    /// Remove and return the earliest event if it is due at or before `now`.
    pub fn pop_due(&mut self, now: f64) -> Option<T> {
        if self.heap.peek()?.due > now {
            return None;
        }
        self.heap.pop().map(|s| s.payload)
    }

    pub fn drain_due(&mut self, now: f64) -> Vec<T> {
        let mut due = Vec::new();
        while let Some(payload) = self.pop_due(now) {
            due.push(payload);
        }
        due
    }

    /// Drop pending events matching `pred` (e.g. for a despawned agent).
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&T) -> bool) {
        let kept: Vec<_> = self.heap.drain().filter(|s| !pred(&s.payload)).collect();
        self.heap = kept.into();
    }

    pub fn next_due(&self) -> Option<f64> {
        self.heap.peek().map(|s| s.due)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<T> Default for CompletionQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
