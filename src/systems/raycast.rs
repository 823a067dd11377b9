//! Ray casts against box colliders.
//!
//! [`PhysicsQuery`] is a [`SystemParam`] that gives systems and observers a
//! read-only ray cast over every entity with a [`MapPosition`], a
//! [`BoxCollider`] and a [`CollisionLayer`]. Only static colliders count:
//! shadows and entities with a [`RigidBody`] are never candidates.
//!
//! The cast itself lives in [`raycast`] so it can run over any collider list.

use bevy_ecs::prelude::*;
use bevy_ecs::system::SystemParam;
use glam::Vec2;

use crate::components::boxcollider::BoxCollider;
use crate::components::collisionlayer::{CollisionLayer, LayerMask};
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::components::shadow::Shadow;

/// Result of a ray cast that hit a collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// The entity owning the collider.
    pub entity: Entity,
    /// World position of the hit point.
    pub point: Vec2,
    /// Distance from the ray origin to `point`.
    pub distance: f32,
}

/// Cast a ray over `colliders` and return the nearest hit.
///
/// `direction` does not need to be normalized; a zero direction never hits.
/// Only colliders whose layer is in `mask` are tested, and hits further than
/// `max_distance` are ignored. On equal distances the first collider wins.
pub fn raycast<'a>(
    colliders: impl IntoIterator<Item = (Entity, Vec2, &'a BoxCollider, CollisionLayer)>,
    origin: Vec2,
    direction: Vec2,
    max_distance: f32,
    mask: LayerMask,
) -> Option<RayHit> {
    let dir = direction.try_normalize()?;
    let mut nearest: Option<RayHit> = None;

    for (entity, position, collider, layer) in colliders {
        if !mask.contains(layer) {
            continue;
        }
        let Some(distance) = collider.ray_intersection(position, origin, dir) else {
            continue;
        };
        if distance > max_distance {
            continue;
        }
        if nearest.is_none_or(|hit| distance < hit.distance) {
            nearest = Some(RayHit {
                entity,
                point: origin + dir * distance,
                distance,
            });
        }
    }

    nearest
}

/// Read-only physics queries over collider entities.
#[derive(SystemParam)]
pub struct PhysicsQuery<'w, 's> {
    colliders: Query<
        'w,
        's,
        (
            Entity,
            &'static MapPosition,
            &'static BoxCollider,
            &'static CollisionLayer,
        ),
        (Without<Shadow>, Without<RigidBody>),
    >,
}

impl PhysicsQuery<'_, '_> {
    /// Nearest collider hit by the ray, restricted to `mask`.
    pub fn raycast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        raycast(
            self.colliders
                .iter()
                .map(|(entity, position, collider, layer)| (entity, position.pos, collider, *layer)),
            origin,
            direction,
            max_distance,
            mask,
        )
    }

    /// Cast straight down with unbounded distance.
    pub fn floor_below(&self, origin: Vec2, mask: LayerMask) -> Option<RayHit> {
        self.raycast(origin, Vec2::NEG_Y, f32::INFINITY, mask)
    }
}
