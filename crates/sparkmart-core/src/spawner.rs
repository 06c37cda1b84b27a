use ai_core::{DeterministicRng, SplitMix64};
use ai_nav::Vec2;

use crate::config::{Persona, PersonaType, SpawnerConfig};

const MIN_SPAWN_GAP_SECONDS: f32 = 1.0;

/// A customer the simulation should create this tick.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRequest {
    pub persona: Persona,
    pub position: Vec2,
}

/// Timed, weighted customer arrivals.
#[derive(Debug, Clone)]
pub struct Spawner {
    config: SpawnerConfig,
    personas: Vec<Persona>,
    next_spawn_at: f64,
    total_spawned: u64,
    rng: SplitMix64,
}

impl Spawner {
    /// The first arrival is due immediately.
    pub fn new(config: SpawnerConfig, personas: Vec<Persona>, seed: u64) -> Self {
        Self {
            config,
            personas,
            next_spawn_at: 0.0,
            total_spawned: 0,
            rng: SplitMix64::new(seed),
        }
    }

    pub fn total_spawned(&self) -> u64 {
        self.total_spawned
    }

    pub fn next_spawn_at(&self) -> f64 {
        self.next_spawn_at
    }

    pub fn personas(&self) -> &[Persona] {
        &self.personas
    }

    pub fn set_auto_spawn(&mut self, enabled: bool) {
        self.config.auto_spawn = enabled;
    }

    pub fn set_persona_weight(&mut self, persona_type: PersonaType, weight: u32) -> bool {
        match self.personas.iter_mut().find(|p| p.persona_type == persona_type) {
            Some(persona) => {
                persona.spawn_weight = weight;
                true
            }
            None => false,
        }
    }

    /// Timed arrival check. The timer always rolls forward once due, even when
    /// the store is full or auto-spawn is off.
    pub fn poll(&mut self, now_seconds: f64, current_customers: usize) -> Option<SpawnRequest> {
        if now_seconds < self.next_spawn_at {
            return None;
        }
        let gap = self.config.interval_seconds
            + self
                .rng
                .range_f32(-self.config.interval_variance, self.config.interval_variance);
        self.next_spawn_at = now_seconds + f64::from(gap.max(MIN_SPAWN_GAP_SECONDS));

        if !self.config.auto_spawn {
            return None;
        }
        self.spawn(current_customers)
    }

    /// Immediate arrival, subject only to the customer cap.
    pub fn spawn(&mut self, current_customers: usize) -> Option<SpawnRequest> {
        if current_customers >= self.config.max_customers {
            return None;
        }
        let weights: Vec<u32> = self.personas.iter().map(|p| p.spawn_weight).collect();
        let idx = self.rng.weighted_index(&weights)?;
        let jitter = self.config.jitter;
        let offset = Vec2::new(
            self.rng.range_f32(-jitter, jitter),
            self.rng.range_f32(-jitter, jitter),
        );
        self.total_spawned += 1;
        Some(SpawnRequest {
            persona: self.personas[idx].clone(),
            position: self.config.spawn_point + offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawner(max_customers: usize) -> Spawner {
        let config = SpawnerConfig {
            interval_seconds: 5.0,
            interval_variance: 2.0,
            max_customers,
            ..SpawnerConfig::default()
        };
        Spawner::new(config, vec![Persona::default()], 1)
    }

    #[test]
    fn arrivals_are_spaced_by_the_interval() {
        let mut s = spawner(10);
        assert!(s.poll(0.0, 0).is_some());
        let next = s.next_spawn_at();
        assert!((3.0..7.0).contains(&next), "next {next}");
        assert!(s.poll(next - 0.1, 1).is_none());
        assert!(s.poll(next, 1).is_some());
        assert_eq!(s.total_spawned(), 2);
    }

    #[test]
    fn cap_and_zero_weights_block_spawns() {
        let mut s = spawner(1);
        assert!(s.spawn(1).is_none());

        let mut s = spawner(5);
        assert!(s.set_persona_weight(PersonaType::QuickShopper, 0));
        assert!(!s.set_persona_weight(PersonaType::Troublemaker, 3));
        assert!(s.spawn(0).is_none());
    }

    #[test]
    fn spawn_position_stays_within_jitter() {
        let mut s = spawner(100);
        let center = SpawnerConfig::default().spawn_point;
        for _ in 0..20 {
            let request = s.spawn(0).expect("spawn");
            assert!((request.position.x - center.x).abs() <= 1.0);
            assert!((request.position.y - center.y).abs() <= 1.0);
        }
    }
}
