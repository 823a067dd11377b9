//! 2D scale component.
//!
//! Shadows animate their [`Scale`] between the configured grounded size and a
//! shrunken airborne size; renderers multiply sprite dimensions by it.

use bevy_ecs::prelude::Component;
use glam::Vec2;

#[derive(Component, Clone, Debug, Copy, PartialEq)]
pub struct Scale {
    pub scale: Vec2,
}

impl Scale {
    pub fn new(sx: f32, sy: f32) -> Self {
        Self {
            scale: Vec2::new(sx, sy),
        }
    }

    pub fn uniform(s: f32) -> Self {
        Self::new(s, s)
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::uniform(1.0)
    }
}
