use bevy_ecs::prelude::Component;
use glam::Vec2;

/// Sprite is identified by a texture key and its size in world units.
/// The origin selects the pivot point relative to the sprite's top-left
/// used for placement and scaling when rendering.
///
/// `visible` is the only thing shadows toggle; everything else is read by the
/// renderer.
#[derive(Component, Clone, Debug)]
pub struct Sprite {
    pub tex_key: String,
    pub width: f32,
    pub height: f32,
    pub origin: Vec2,
    pub visible: bool,
}

impl Sprite {
    /// Visible sprite pivoting on its center.
    pub fn new(tex_key: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            tex_key: tex_key.into(),
            width,
            height,
            origin: Vec2::new(width * 0.5, height * 0.5),
            visible: true,
        }
    }
}
