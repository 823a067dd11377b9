//! Shadow events.
//!
//! Collaborators such as a character controller trigger these instead of
//! touching the [`Shadow`](crate::components::shadow::Shadow) component
//! directly:
//! - [`ResetShadowEvent`] puts a shadow back to full size in the grounded state
//! - [`ShadowVisibilityEvent`] shows or hides the shadow's visual
//!
//! [`ShadowStateChangedEvent`] goes the other way: the animation system
//! triggers it whenever a shadow's animation state changes.
//!
//! # Example
//!
//! ```ignore
//! commands.trigger(ResetShadowEvent {
//!     entity: shadow,
//!     size: Vec2::new(1.0, 0.5),
//! });
//! ```
//!
//! # Related
//!
//! - [`crate::systems::shadow::reset_shadow_observer`]
//! - [`crate::systems::shadow::shadow_visibility_observer`]

use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::components::shadow::ShadowState;

/// Reset a shadow to `size`, grounded, and place it once.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ResetShadowEvent {
    /// The shadow entity.
    pub entity: Entity,
    /// New full (grounded) scale.
    pub size: Vec2,
}

/// Show or hide the first visual of a shadow.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadowVisibilityEvent {
    pub entity: Entity,
    pub visible: bool,
}

/// Emitted when a shadow's animation state changes.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadowStateChangedEvent {
    pub entity: Entity,
    pub from: ShadowState,
    pub to: ShadowState,
}
