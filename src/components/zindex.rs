//! Z-index component for render ordering.
//!
//! The [`ZIndex`] component controls the drawing order of entities. Shadows
//! write their configured sorting order into the `ZIndex` of their first
//! visual when they are initialised.

use bevy_ecs::prelude::Component;

/// Rendering order hint for 2D drawing.
///
/// Higher values are drawn later (on top).
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ZIndex(pub i32);
