//! Demo character controller.
//!
//! Paces [`Jumper`] characters between their x bounds and makes them jump
//! after a random wait on the ground.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::grounded::Grounded;
use crate::components::jumper::Jumper;
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::resources::demorng::DemoRng;
use crate::resources::worldtime::WorldTime;

pub fn jumper_system(
    time: Res<WorldTime>,
    mut rng: ResMut<DemoRng>,
    mut query: Query<(Entity, &mut Jumper, &mut RigidBody, &MapPosition, &Grounded)>,
) {
    let dt = time.delta;
    for (entity, mut jumper, mut rb, position, grounded) in query.iter_mut() {
        let speed = jumper.walk_speed.abs();
        if position.pos.x <= jumper.min_x {
            rb.velocity.x = speed;
        } else if position.pos.x >= jumper.max_x {
            rb.velocity.x = -speed;
        } else if rb.velocity.x == 0.0 {
            rb.velocity.x = speed;
        }

        if !grounded.0 {
            continue;
        }
        jumper.wait -= dt;
        if jumper.wait <= 0.0 {
            rb.velocity.y = jumper.jump_speed;
            jumper.wait = rng.range(jumper.min_wait, jumper.max_wait);
            debug!("{:?} jumps, next wait {:.2}s", entity, jumper.wait);
        }
    }
}
