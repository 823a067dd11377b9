//! Kinematic movement with floor landing.
//!
//! Integrates [`RigidBody`] forces and velocity into [`MapPosition`] and keeps
//! bodies from falling through static floors. Bodies that carry a
//! [`Grounded`] component get it updated every tick, which is what the shadow
//! animation reads.

use bevy_ecs::prelude::*;

use crate::components::collisionlayer::LayerMask;
use crate::components::grounded::Grounded;
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::resources::worldtime::WorldTime;
use crate::systems::raycast::PhysicsQuery;

/// Integrate velocity and land bodies on the floor below them.
///
/// The floor is looked up from the position at the start of the tick. A body
/// moving down that would end below it is snapped onto it, its vertical
/// velocity is cleared and it counts as grounded.
pub fn movement(
    time: Res<WorldTime>,
    mut bodies: Query<(&mut MapPosition, &mut RigidBody, Option<&mut Grounded>)>,
    physics: PhysicsQuery,
) {
    let dt = time.delta;
    for (mut position, mut rb, grounded) in bodies.iter_mut() {
        if rb.frozen {
            continue;
        }
        let floor_y = physics
            .floor_below(position.pos, LayerMask::ALL)
            .map(|hit| hit.point.y);

        let acceleration = rb.total_acceleration();
        rb.velocity += acceleration * dt;
        let mut next = position.pos + rb.velocity * dt;

        let mut on_floor = false;
        if let Some(y) = floor_y
            && rb.velocity.y <= 0.0
            && next.y <= y
        {
            next.y = y;
            rb.velocity.y = 0.0;
            on_floor = true;
        }
        position.pos = next;

        if let Some(mut grounded) = grounded
            && grounded.0 != on_floor
        {
            grounded.0 = on_floor;
        }
    }
}
