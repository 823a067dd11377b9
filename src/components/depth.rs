use bevy_ecs::prelude::Component;

/// Draw depth of an entity, the third coordinate next to its
/// [`MapPosition`](super::mapposition::MapPosition).
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Depth(pub f32);
