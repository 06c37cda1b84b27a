use crate::{rng, AgentId, SplitMix64};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-tick inputs handed to every agent and action.
///
/// `dt_seconds` and `now_seconds` are simulation time, i.e. already multiplied by
/// the clock's time scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    pub tick: u64,
    pub dt_seconds: f32,
    pub now_seconds: f64,
    pub seed: u64,
}

impl TickContext {
    pub fn rng_for_agent<A: AgentId>(&self, agent: A, stream: u64) -> SplitMix64 {
        let seed = rng::derive_seed(self.seed ^ self.tick, agent.stable_id(), stream);
        SplitMix64::new(seed)
    }
}

pub const MIN_TIME_SCALE: f32 = 0.1;
pub const MAX_TIME_SCALE: f32 = 10.0;
pub const TIME_SCALE_PRESETS: [f32; 5] = [0.5, 1.0, 2.0, 5.0, 10.0];

/// Fixed-step simulation clock with a global time multiplier.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimClock {
    tick: u64,
    now_seconds: f64,
    tick_seconds: f32,
    time_scale: f32,
    paused: bool,
    seed: u64,
}

impl SimClock {
    pub fn new(tick_seconds: f32, seed: u64) -> Self {
        Self {
            tick: 0,
            now_seconds: 0.0,
            tick_seconds: tick_seconds.max(f32::EPSILON),
            time_scale: 1.0,
            paused: false,
            seed,
        }
    }

    /// Advance one tick and return its context. A paused clock still counts
    /// ticks but no simulation time passes.
    pub fn advance(&mut self) -> TickContext {
        self.tick += 1;
        let dt = if self.paused {
            0.0
        } else {
            self.tick_seconds * self.time_scale
        };
        self.now_seconds += dt as f64;
        TickContext {
            tick: self.tick,
            dt_seconds: dt,
            now_seconds: self.now_seconds,
            seed: self.seed,
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn now_seconds(&self) -> f64 {
        self.now_seconds
    }

    pub fn tick_seconds(&self) -> f32 {
        self.tick_seconds
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Clamps `scale` into the supported range and returns the scale in
    /// effect. Non-finite values are ignored.
    pub fn set_time_scale(&mut self, scale: f32) -> f32 {
        if scale.is_finite() {
            self.time_scale = scale.clamp(MIN_TIME_SCALE, MAX_TIME_SCALE);
        }
        self.time_scale
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Step to the next faster preset (wrapping to the slowest).
    pub fn next_preset(&mut self) -> f32 {
        let next = TIME_SCALE_PRESETS
            .iter()
            .copied()
            .find(|p| *p > self.time_scale + f32::EPSILON)
            .unwrap_or(TIME_SCALE_PRESETS[0]);
        self.set_time_scale(next)
    }

    /// Step to the next slower preset (wrapping to the fastest).
    pub fn previous_preset(&mut self) -> f32 {
        let prev = TIME_SCALE_PRESETS
            .iter()
            .rev()
            .copied()
            .find(|p| *p < self.time_scale - f32::EPSILON)
            .unwrap_or(TIME_SCALE_PRESETS[TIME_SCALE_PRESETS.len() - 1]);
        self.set_time_scale(prev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_time_accumulates() {
        let mut clock = SimClock::new(0.5, 7);
        clock.set_time_scale(2.0);
        let ctx = clock.advance();
        assert_eq!(ctx.tick, 1);
        assert_eq!(ctx.dt_seconds, 1.0);
        let ctx = clock.advance();
        assert_eq!(ctx.now_seconds, 2.0);
    }

    #[test]
    fn agent_streams_are_stable_and_distinct() {
        use crate::DeterministicRng;

        let ctx = SimClock::new(0.1, 99).advance();
        let a = ctx.rng_for_agent(1u64, 0).next_u64();
        assert_eq!(a, ctx.rng_for_agent(1u64, 0).next_u64());
        assert_ne!(a, ctx.rng_for_agent(2u64, 0).next_u64());
        assert_ne!(a, ctx.rng_for_agent(1u64, 1).next_u64());
    }

    #[test]
    fn time_scale_is_clamped() {
        let mut clock = SimClock::new(0.1, 0);
        assert_eq!(clock.set_time_scale(50.0), MAX_TIME_SCALE);
        assert_eq!(clock.set_time_scale(0.0), MIN_TIME_SCALE);
    }

    #[test]
    fn non_finite_time_scale_keeps_the_current_one() {
        let mut clock = SimClock::new(0.1, 0);
        clock.set_time_scale(2.0);
        assert_eq!(clock.set_time_scale(f32::NAN), 2.0);
        assert_eq!(clock.set_time_scale(f32::INFINITY), 2.0);
        assert_eq!(clock.set_time_scale(f32::NEG_INFINITY), 2.0);
        assert_eq!(clock.advance().dt_seconds, 0.2);
    }

    #[test]
    fn pause_keeps_scale_and_stops_time() {
        let mut clock = SimClock::new(1.0, 0);
        clock.set_time_scale(5.0);
        clock.pause();
        let ctx = clock.advance();
        assert_eq!(ctx.dt_seconds, 0.0);
        clock.resume();
        assert_eq!(clock.time_scale(), 5.0);
        assert_eq!(clock.advance().dt_seconds, 5.0);
    }

    #[test]
    fn presets_cycle() {
        let mut clock = SimClock::new(1.0, 0);
        assert_eq!(clock.next_preset(), 2.0);
        assert_eq!(clock.previous_preset(), 1.0);
        clock.set_time_scale(10.0);
        assert_eq!(clock.next_preset(), 0.5);
    }
}
