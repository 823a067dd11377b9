//! Ground contact flag for characters.
//!
//! A character controller writes [`Grounded`] every tick. The shadow
//! animation system reads it from the character a shadow tracks.

use bevy_ecs::prelude::Component;

/// Whether the entity is currently touching a floor surface.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Grounded(pub bool);
