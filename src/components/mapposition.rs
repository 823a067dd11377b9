//! World-space position of an entity.
//!
//! The world is y-up: a ray cast "down" travels toward `-Y`.

use bevy_ecs::prelude::Component;
use glam::Vec2;

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct MapPosition {
    pub pos: Vec2,
}

impl MapPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
        }
    }
}

impl Default for MapPosition {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}
