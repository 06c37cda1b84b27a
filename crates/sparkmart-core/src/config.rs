//! Simulation configuration, loaded from YAML.
//!
//! Every field has a default, so a partial file (or none at all) yields a
//! runnable store.

use std::path::Path;

use ai_nav::Vec2;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shelf::ShelfType;

/// Top-level simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub clock: ClockConfig,
    pub agents: AgentTuning,
    pub store: StoreLayout,
    pub employees: Vec<EmployeeConfig>,
    pub personas: Vec<Persona>,
    pub spawner: SpawnerConfig,
    pub checkout: CheckoutTiming,
    pub metrics: MetricsConfig,
}

/// Semantic problems a config can parse cleanly but still not run with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("tick_seconds must be positive, got {0}")]
    NonPositiveTick(f32),

    #[error("time_scale must be a finite number, got {0}")]
    TimeScale(f32),

    #[error("persona {name:?} has min_list_size {min} above max_list_size {max}")]
    ListSizeRange { name: String, min: u32, max: u32 },

    #[error("shelf {name:?} has initial_stock {initial} above max_stock {max}")]
    InitialStock { name: String, initial: u32, max: u32 },

    #[error("metrics.snapshot_interval_seconds must be positive")]
    SnapshotInterval,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    pub tick_seconds: f32,
    /// Clamped to 0.1..=10 when applied.
    pub time_scale: f32,
    pub seed: u64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            tick_seconds: 0.1,
            time_scale: 1.0,
            seed: 0x5EED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentTuning {
    pub replan_cooldown_seconds: f32,
    pub arrival_distance: f32,
    /// Planner node cap; unset means exhaustive search.
    pub max_plan_nodes: Option<usize>,
}

impl Default for AgentTuning {
    fn default() -> Self {
        Self {
            replan_cooldown_seconds: 1.0,
            arrival_distance: 2.0,
            max_plan_nodes: None,
        }
    }
}

/// Floor plan: where every claimable object and landmark sits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreLayout {
    pub carts: Vec<Vec2>,
    pub checkout_lanes: Vec<LaneConfig>,
    pub break_room: Vec<Vec2>,
    pub shelves: Vec<ShelfConfig>,
    pub entry_points: Vec<Vec2>,
    pub exit: Option<Vec2>,
    pub warehouse: Option<Vec2>,
}

impl Default for StoreLayout {
    fn default() -> Self {
        let shelf = |name: &str, kind, x, y| ShelfConfig {
            name: name.to_string(),
            kind,
            position: Vec2::new(x, y),
            spots: vec![Vec2::new(x - 1.5, y - 1.5), Vec2::new(x + 1.5, y - 1.5)],
            restock_point: Some(Vec2::new(x, y + 1.5)),
            ..ShelfConfig::default()
        };
        let lane = |number, x: f32, self_checkout| LaneConfig {
            number,
            position: Vec2::new(x, 4.0),
            self_checkout,
            queue_spots: (1..=3).map(|i| Vec2::new(x, 4.0 - 1.5 * i as f32)).collect(),
            overflow_spacing: default_overflow_spacing(),
        };

        Self {
            carts: (0..6).map(|i| Vec2::new(-12.0 + i as f32, -8.0)).collect(),
            checkout_lanes: vec![lane(1, 6.0, false), lane(2, 10.0, false), lane(3, 14.0, true)],
            break_room: vec![Vec2::new(-18.0, 16.0), Vec2::new(-16.0, 16.0)],
            shelves: vec![
                shelf("General A", ShelfType::General, -8.0, 8.0),
                shelf("Produce", ShelfType::Produce, -2.0, 8.0),
                shelf("Frozen", ShelfType::Frozen, 4.0, 8.0),
                shelf("Electronics", ShelfType::Electronics, 10.0, 14.0),
                shelf("Clothing", ShelfType::Clothing, 16.0, 14.0),
                shelf("General B", ShelfType::General, -8.0, 14.0),
            ],
            entry_points: vec![Vec2::new(-10.0, -6.0), Vec2::new(-6.0, -6.0)],
            exit: Some(Vec2::new(20.0, -10.0)),
            warehouse: Some(Vec2::new(0.0, 22.0)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneConfig {
    pub number: u32,
    pub position: Vec2,
    #[serde(default)]
    pub self_checkout: bool,
    /// Fixed places in line, first customer first.
    #[serde(default)]
    pub queue_spots: Vec<Vec2>,
    #[serde(default = "default_overflow_spacing")]
    pub overflow_spacing: f32,
}

fn default_overflow_spacing() -> f32 {
    1.5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShelfConfig {
    pub name: String,
    pub kind: ShelfType,
    pub position: Vec2,
    pub max_stock: u32,
    pub restock_threshold: u32,
    pub initial_stock: u32,
    pub profit_per_item: f32,
    pub browse_seconds: f32,
    pub restock_seconds: f32,
    /// Customer standing spots around the shelf.
    pub spots: Vec<Vec2>,
    /// Staff-only spot used while restocking.
    pub restock_point: Option<Vec2>,
}

impl Default for ShelfConfig {
    fn default() -> Self {
        Self {
            name: "Shelf".to_string(),
            kind: ShelfType::General,
            position: Vec2::ZERO,
            max_stock: 100,
            restock_threshold: 20,
            initial_stock: 100,
            profit_per_item: 8.0,
            browse_seconds: 3.0,
            restock_seconds: 10.0,
            spots: Vec::new(),
            restock_point: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assignments {
    pub checkout: bool,
    pub restock: bool,
    pub help: bool,
    pub clean: bool,
}

impl Default for Assignments {
    fn default() -> Self {
        Self {
            checkout: true,
            restock: true,
            help: true,
            clean: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployeeConfig {
    pub name: String,
    pub position: Vec2,
    pub speed: f32,
    pub assignments: Assignments,
    pub break_interval_seconds: f32,
    pub break_duration_seconds: f32,
    /// Efficiency after skipping a break; durations divide by it.
    pub tired_efficiency: f32,
    pub max_carry: u32,
}

impl Default for EmployeeConfig {
    fn default() -> Self {
        Self {
            name: "Employee".to_string(),
            position: Vec2::new(0.0, 18.0),
            speed: 3.5,
            assignments: Assignments::default(),
            break_interval_seconds: 300.0,
            break_duration_seconds: 30.0,
            tired_efficiency: 0.7,
            max_carry: 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonaType {
    QuickShopper,
    Browser,
    BulkBuyer,
    Troublemaker,
}

/// Relative odds of each shelf type landing on a shopping list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShelfWeights {
    pub general: u32,
    pub produce: u32,
    pub frozen: u32,
    pub electronics: u32,
    pub clothing: u32,
}

impl ShelfWeights {
    pub fn weight(&self, kind: ShelfType) -> u32 {
        match kind {
            ShelfType::General => self.general,
            ShelfType::Produce => self.produce,
            ShelfType::Frozen => self.frozen,
            ShelfType::Electronics => self.electronics,
            ShelfType::Clothing => self.clothing,
        }
    }
}

impl Default for ShelfWeights {
    fn default() -> Self {
        Self {
            general: 30,
            produce: 25,
            frozen: 15,
            electronics: 15,
            clothing: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Persona {
    pub name: String,
    pub persona_type: PersonaType,
    pub spawn_weight: u32,
    pub shelf_weights: ShelfWeights,
    pub min_list_size: u32,
    pub max_list_size: u32,
    pub requires_cart: bool,
    pub prefers_self_checkout: bool,
    /// Browsers with an empty list still wander to a few shelves.
    pub browses: bool,
    pub base_patience: f32,
    pub impatience_multiplier: f32,
    pub starting_satisfaction: f32,
    pub move_speed: f32,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            name: "Quick Shopper".to_string(),
            persona_type: PersonaType::QuickShopper,
            spawn_weight: 25,
            shelf_weights: ShelfWeights::default(),
            min_list_size: 1,
            max_list_size: 3,
            requires_cart: false,
            prefers_self_checkout: true,
            browses: false,
            base_patience: 60.0,
            impatience_multiplier: 1.0,
            starting_satisfaction: 70.0,
            move_speed: 3.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    pub interval_seconds: f32,
    pub interval_variance: f32,
    pub max_customers: usize,
    pub spawn_point: Vec2,
    pub auto_spawn: bool,
    /// Half-width of the square around `spawn_point` customers appear in.
    pub jitter: f32,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 5.0,
            interval_variance: 2.0,
            max_customers: 50,
            spawn_point: Vec2::new(-8.0, -12.0),
            auto_spawn: true,
            jitter: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutTiming {
    pub customer_base_seconds: f32,
    pub customer_per_item_seconds: f32,
    pub operator_base_seconds: f32,
    pub operator_per_item_seconds: f32,
}

impl CheckoutTiming {
    pub fn customer_seconds(&self, items: u32) -> f32 {
        self.customer_base_seconds + items as f32 * self.customer_per_item_seconds
    }

    pub fn operator_seconds(&self, items: u32) -> f32 {
        self.operator_base_seconds + items as f32 * self.operator_per_item_seconds
    }
}

impl Default for CheckoutTiming {
    fn default() -> Self {
        Self {
            customer_base_seconds: 5.0,
            customer_per_item_seconds: 1.0,
            operator_base_seconds: 3.0,
            operator_per_item_seconds: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub snapshot_interval_seconds: f64,
    pub max_snapshots: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            snapshot_interval_seconds: 60.0,
            max_snapshots: 1440,
        }
    }
}

fn default_personas() -> Vec<Persona> {
    vec![
        Persona::default(),
        Persona {
            name: "Browser".to_string(),
            persona_type: PersonaType::Browser,
            spawn_weight: 20,
            shelf_weights: ShelfWeights {
                general: 10,
                produce: 10,
                frozen: 10,
                electronics: 35,
                clothing: 35,
            },
            min_list_size: 0,
            max_list_size: 2,
            browses: true,
            base_patience: 120.0,
            impatience_multiplier: 0.7,
            starting_satisfaction: 75.0,
            move_speed: 2.5,
            ..Persona::default()
        },
        Persona {
            name: "Bulk Buyer".to_string(),
            persona_type: PersonaType::BulkBuyer,
            spawn_weight: 15,
            shelf_weights: ShelfWeights {
                general: 40,
                produce: 30,
                frozen: 30,
                electronics: 0,
                clothing: 0,
            },
            min_list_size: 4,
            max_list_size: 8,
            requires_cart: true,
            prefers_self_checkout: false,
            base_patience: 90.0,
            starting_satisfaction: 65.0,
            move_speed: 3.0,
            ..Persona::default()
        },
    ]
}

fn default_employees() -> Vec<EmployeeConfig> {
    vec![
        EmployeeConfig {
            name: "Cashier".to_string(),
            position: Vec2::new(8.0, 8.0),
            assignments: Assignments {
                checkout: true,
                restock: false,
                help: false,
                clean: false,
            },
            ..EmployeeConfig::default()
        },
        EmployeeConfig {
            name: "Stocker".to_string(),
            position: Vec2::new(0.0, 18.0),
            assignments: Assignments {
                checkout: false,
                restock: true,
                help: false,
                clean: false,
            },
            ..EmployeeConfig::default()
        },
    ]
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            clock: ClockConfig::default(),
            agents: AgentTuning::default(),
            store: StoreLayout::default(),
            employees: default_employees(),
            personas: default_personas(),
            spawner: SpawnerConfig::default(),
            checkout: CheckoutTiming::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl SimConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        Ok(config)
    }

    /// Load `path` when it exists, otherwise fall back to the built-in store.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.clock.tick_seconds.is_finite() || self.clock.tick_seconds <= 0.0 {
            return Err(ConfigError::NonPositiveTick(self.clock.tick_seconds));
        }
        if !self.clock.time_scale.is_finite() {
            return Err(ConfigError::TimeScale(self.clock.time_scale));
        }
        if self.metrics.snapshot_interval_seconds <= 0.0 {
            return Err(ConfigError::SnapshotInterval);
        }
        for persona in &self.personas {
            if persona.min_list_size > persona.max_list_size {
                return Err(ConfigError::ListSizeRange {
                    name: persona.name.clone(),
                    min: persona.min_list_size,
                    max: persona.max_list_size,
                });
            }
        }
        for shelf in &self.store.shelves {
            if shelf.initial_stock > shelf.max_stock {
                return Err(ConfigError::InitialStock {
                    name: shelf.name.clone(),
                    initial: shelf.initial_stock,
                    max: shelf.max_stock,
                });
            }
        }
        Ok(())
    }
}
