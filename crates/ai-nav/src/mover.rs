use std::collections::BTreeMap;

use crate::{NavPath, Navigator, StraightLineNavigator, Vec2};

#[derive(Debug, Clone)]
pub struct NavBody {
    pub position: Vec2,
    pub speed: f32,
    destination: Option<Vec2>,
    path: Option<NavPath>,
    next_index: usize,
}

impl NavBody {
    pub fn new(position: Vec2, speed: f32) -> Self {
        Self {
            position,
            speed,
            destination: None,
            path: None,
            next_index: 1,
        }
    }

    pub fn destination(&self) -> Option<Vec2> {
        self.destination
    }

    pub fn is_moving(&self) -> bool {
        self.path.is_some()
    }

    fn advance(&mut self, dt: f32) {
        let Some(path) = &self.path else {
            return;
        };

        let mut remaining = self.speed.max(0.0) * dt.max(0.0);
        let mut current = self.position;
        while self.next_index < path.points.len() && remaining > 0.0 {
            let target = path.points[self.next_index];
            let to_target = target - current;
            let dist = to_target.length();

            if dist <= f32::EPSILON {
                self.next_index += 1;
                continue;
            }

            if remaining >= dist {
                current = target;
                self.next_index += 1;
                remaining -= dist;
                continue;
            }

            current = current + to_target * (remaining / dist);
            break;
        }

        self.position = current;
        if self.next_index >= path.points.len() {
            self.path = None;
        }
    }
}

/// Kinematic path follower for every agent in the simulation.
///
/// Stand-in for an engine's navigation agents: accepts destinations, moves
/// bodies along navigator paths at their own speed, and reports positions.
#[derive(Debug, Clone)]
pub struct Mover<A, N = StraightLineNavigator> {
    bodies: BTreeMap<A, NavBody>,
    navigator: N,
}

impl<A> Mover<A, StraightLineNavigator>
where
    A: Ord + Copy,
{
    pub fn new() -> Self {
        Self::with_navigator(StraightLineNavigator)
    }
}

impl<A> Default for Mover<A, StraightLineNavigator>
where
    A: Ord + Copy,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<A, N> Mover<A, N>
where
    A: Ord + Copy,
    N: Navigator,
{
    pub fn with_navigator(navigator: N) -> Self {
        Self {
            bodies: BTreeMap::new(),
            navigator,
        }
    }

    pub fn insert(&mut self, agent: A, position: Vec2, speed: f32) {
        self.bodies.insert(agent, NavBody::new(position, speed));
    }

    pub fn remove(&mut self, agent: A) -> Option<NavBody> {
        self.bodies.remove(&agent)
    }

    pub fn body(&self, agent: A) -> Option<&NavBody> {
        self.bodies.get(&agent)
    }

    pub fn position(&self, agent: A) -> Option<Vec2> {
        self.bodies.get(&agent).map(|b| b.position)
    }

    pub fn set_speed(&mut self, agent: A, speed: f32) {
        if let Some(body) = self.bodies.get_mut(&agent) {
            body.speed = speed;
        }
    }

    /// Route `agent` toward `destination`. Fails when the agent is unknown or the
    /// navigator has no route.
    pub fn set_destination(&mut self, agent: A, destination: Vec2) -> bool {
        let Some(body) = self.bodies.get_mut(&agent) else {
            return false;
        };
        let Some(path) = self.navigator.find_path(body.position, destination) else {
            return false;
        };
        if path.points.len() < 2 {
            return false;
        }
        body.destination = Some(destination);
        body.path = Some(path);
        body.next_index = 1;
        true
    }

    /// Move every body along its path by `dt` seconds of simulation time.
    pub fn step(&mut self, dt: f32) {
        for body in self.bodies.values_mut() {
            body.advance(dt);
        }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}
