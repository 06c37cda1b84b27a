use std::collections::VecDeque;
use std::fmt::Write as _;

use serde::Serialize;

use crate::config::MetricsConfig;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub at_seconds: f64,
    pub customers_served: u32,
    pub profit: f32,
    pub items_sold: u32,
    pub average_satisfaction: f32,
    pub restocks: u32,
}

/// Store-wide running totals plus a bounded history of periodic snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    customers_served: u32,
    profit: f32,
    items_sold: u32,
    average_satisfaction: f32,
    satisfaction_samples: u32,
    restocks: u32,
    snapshots: VecDeque<MetricsSnapshot>,
    #[serde(skip)]
    snapshot_interval: f64,
    #[serde(skip)]
    max_snapshots: usize,
    #[serde(skip)]
    last_snapshot: f64,
}

impl Metrics {
    pub fn new(config: &MetricsConfig) -> Self {
        Self {
            customers_served: 0,
            profit: 0.0,
            items_sold: 0,
            average_satisfaction: 0.0,
            satisfaction_samples: 0,
            restocks: 0,
            snapshots: VecDeque::new(),
            snapshot_interval: config.snapshot_interval_seconds,
            max_snapshots: config.max_snapshots,
            last_snapshot: 0.0,
        }
    }

    pub fn record_sale(&mut self, profit: f32, items: u32) {
        self.customers_served += 1;
        self.profit += profit;
        self.items_sold += items;
    }

    pub fn record_satisfaction(&mut self, satisfaction: f32) {
        self.satisfaction_samples += 1;
        let n = self.satisfaction_samples as f32;
        self.average_satisfaction += (satisfaction - self.average_satisfaction) / n;
    }

    pub fn record_restock(&mut self) {
        self.restocks += 1;
    }

    pub fn customers_served(&self) -> u32 {
        self.customers_served
    }

    pub fn profit(&self) -> f32 {
        self.profit
    }

    pub fn items_sold(&self) -> u32 {
        self.items_sold
    }

    pub fn average_satisfaction(&self) -> f32 {
        self.average_satisfaction
    }

    pub fn restocks(&self) -> u32 {
        self.restocks
    }

    pub fn snapshots(&self) -> impl Iterator<Item = &MetricsSnapshot> {
        self.snapshots.iter()
    }

    /// Takes a snapshot when a full interval has passed since the last one.
    pub fn maybe_snapshot(&mut self, now_seconds: f64) -> bool {
        if now_seconds - self.last_snapshot < self.snapshot_interval {
            return false;
        }
        self.snapshot(now_seconds);
        self.last_snapshot = now_seconds;
        true
    }

    pub fn snapshot(&mut self, now_seconds: f64) -> MetricsSnapshot {
        let snapshot = MetricsSnapshot {
            at_seconds: now_seconds,
            customers_served: self.customers_served,
            profit: self.profit,
            items_sold: self.items_sold,
            average_satisfaction: self.average_satisfaction,
            restocks: self.restocks,
        };
        self.snapshots.push_back(snapshot);
        while self.snapshots.len() > self.max_snapshots {
            self.snapshots.pop_front();
        }
        snapshot
    }

    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Customers: {}", self.customers_served);
        let _ = writeln!(out, "Profit: ${:.2}", self.profit);
        let _ = writeln!(out, "Items Sold: {}", self.items_sold);
        let _ = writeln!(out, "Satisfaction: {:.1}%", self.average_satisfaction);
        let _ = write!(out, "Restocks: {}", self.restocks);
        out
    }
}
