//! Kinematic body component with named acceleration forces.
//!
//! The [`RigidBody`] component stores velocity and named acceleration forces
//! (gravity in the demo scene).
//!
//! Entities with a `RigidBody` are never ray cast candidates: only static
//! colliders count as floors.

use bevy_ecs::prelude::Component;
use glam::Vec2;
use rustc_hash::FxHashMap;

/// Kinematic body storing velocity and named acceleration forces.
///
/// Consumed by the [`movement`](crate::systems::movement::movement) system to
/// update [`MapPosition`](super::mapposition::MapPosition).
///
/// # Example
/// ```ignore
/// let mut rb = RigidBody::new();
/// rb.add_force("gravity", Vec2::new(0.0, -30.0));
/// rb.velocity.x = 3.0;
/// ```
#[derive(Component, Clone, Debug, Default)]
pub struct RigidBody {
    /// Current velocity in world units per second.
    pub velocity: Vec2,
    /// Named accelerations in world units per second squared.
    pub forces: FxHashMap<String, Vec2>,
    /// When true, the movement system skips this entity.
    pub frozen: bool,
}

impl RigidBody {
    /// Create a RigidBody with zero velocity and no forces.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a named acceleration force.
    pub fn add_force(&mut self, name: &str, value: Vec2) {
        self.forces.insert(name.to_string(), value);
    }

    /// Sum of all forces.
    pub fn total_acceleration(&self) -> Vec2 {
        self.forces.values().copied().sum()
    }

    /// Freeze the rigid body, preventing movement system from updating it.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_acceleration_sums_forces() {
        let mut rb = RigidBody::new();
        assert_eq!(rb.total_acceleration(), Vec2::ZERO);
        rb.add_force("gravity", Vec2::new(0.0, -30.0));
        rb.add_force("wind", Vec2::new(2.0, 0.0));
        assert_eq!(rb.total_acceleration(), Vec2::new(2.0, -30.0));
    }

    #[test]
    fn adding_a_force_twice_replaces_it() {
        let mut rb = RigidBody::new();
        rb.add_force("gravity", Vec2::new(0.0, -30.0));
        rb.add_force("gravity", Vec2::new(0.0, -10.0));
        assert_eq!(rb.total_acceleration(), Vec2::new(0.0, -10.0));
    }
}
