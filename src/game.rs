//! Demo scene setup and fixed-step driver.
//!
//! Builds a world with static floors, one pacing/jumping character and its
//! shadow, then runs the schedule at a fixed tick. Used by the binary and by
//! the integration tests.

use bevy_ecs::hierarchy::ChildOf;
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use glam::Vec2;
use log::{debug, info};

use crate::components::boxcollider::BoxCollider;
use crate::components::collisionlayer::CollisionLayer;
use crate::components::depth::Depth;
use crate::components::grounded::Grounded;
use crate::components::jumper::Jumper;
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::components::scale::Scale;
use crate::components::shadow::{Shadow, ShadowState};
use crate::components::sprite::Sprite;
use crate::events::shadow::ShadowStateChangedEvent;
use crate::resources::debugmode::DebugMode;
use crate::resources::demorng::DemoRng;
use crate::resources::scene::SceneDescription;
use crate::resources::shadowlog::ShadowLog;
use crate::resources::shadowsettings::ShadowSettings;
use crate::resources::worldtime::WorldTime;
use crate::systems::jumper::jumper_system;
use crate::systems::movement::movement;
use crate::systems::shadow::{
    ShadowSet, add_shadow_observers, add_shadow_systems, reset_shadow_to_grounded, spawn_shadow,
};
use crate::systems::time::update_world_time;

pub const GRAVITY_FORCE: &str = "gravity";
pub const SHADOW_TEXTURE: &str = "shadow";
/// Sprite size of the shadow visual at scale 1.
pub const SHADOW_SPRITE_SIZE: Vec2 = Vec2::new(1.0, 0.35);

/// Entities of the demo scene.
#[derive(Debug, Clone)]
pub struct DemoScene {
    pub character: Entity,
    pub shadow: Entity,
    pub shadow_visual: Entity,
    pub floors: Vec<Entity>,
}

/// Create a world with the resources and observers the demo needs.
pub fn init_world(settings: ShadowSettings, debug_mode: bool) -> World {
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.insert_resource(DemoRng::with_seed(settings.seed));
    world.insert_resource(ShadowLog::default());
    if debug_mode {
        world.insert_resource(DebugMode {});
    }
    world.insert_resource(settings);

    add_shadow_observers(&mut world);
    world.add_observer(record_shadow_transitions);
    // Ensure observers are registered before any system may trigger events.
    world.flush();
    world
}

/// Spawn floors, the character and its shadow from `scene`.
///
/// The shadow is built from the [`ShadowSettings`] resource (defaults if
/// missing), gets a child sprite as its visual and starts grounded.
pub fn spawn_scene(world: &mut World, scene: &SceneDescription) -> DemoScene {
    let floors = scene
        .floors
        .iter()
        .map(|f| {
            world
                .spawn((
                    MapPosition::new(f.x, f.y),
                    BoxCollider::new(f.width, f.height).with_offset(Vec2::new(0.0, -f.height)),
                    CollisionLayer(f.layer),
                ))
                .id()
        })
        .collect::<Vec<_>>();

    let c = &scene.character;
    let mut rb = RigidBody::new();
    rb.add_force(GRAVITY_FORCE, Vec2::new(0.0, scene.gravity));
    let character = world
        .spawn((
            MapPosition::new(c.x, c.y),
            rb,
            Grounded(false),
            Jumper::new(c.jump_speed, c.walk_speed, c.min_x, c.max_x)
                .with_wait_range(c.min_wait, c.max_wait),
        ))
        .id();

    let settings = world
        .get_resource::<ShadowSettings>()
        .cloned()
        .unwrap_or_default();
    let shadow = spawn_shadow(world, settings.build_shadow(Some(character)), None);
    let shadow_visual = world
        .spawn((
            Sprite::new(SHADOW_TEXTURE, SHADOW_SPRITE_SIZE.x, SHADOW_SPRITE_SIZE.y),
            ChildOf(shadow),
        ))
        .id();
    reset_shadow_to_grounded(world, shadow, settings.size);

    world.insert_resource(scene.clone());
    info!(
        "Scene ready: {} floors, character {:?}, shadow {:?} ({})",
        floors.len(),
        character,
        shadow,
        settings.mode
    );

    DemoScene {
        character,
        shadow,
        shadow_visual,
        floors,
    }
}

/// Schedule for one fixed tick: character controller, movement, then shadows.
pub fn build_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems((jumper_system, movement).chain().before(ShadowSet));
    add_shadow_systems(&mut schedule);
    schedule
}

/// Run one fixed tick of `dt` seconds.
pub fn tick(world: &mut World, schedule: &mut Schedule, dt: f32) {
    update_world_time(world, dt);
    schedule.run(world);
    world.clear_trackers();
}

/// Run `frames` fixed ticks headless.
pub fn run_headless(world: &mut World, schedule: &mut Schedule, frames: u32, dt: f32) {
    for _ in 0..frames {
        tick(world, schedule, dt);
    }
}

/// Observer keeping the [`ShadowLog`] up to date.
pub fn record_shadow_transitions(
    trigger: On<ShadowStateChangedEvent>,
    mut shadow_log: ResMut<ShadowLog>,
) {
    let event = trigger.event();
    shadow_log.record(event.entity, event.to);
    if event.to == ShadowState::Grounded {
        debug!("shadow {:?} landed", event.entity);
    }
}

/// Log where everything ended up.
pub fn log_summary(world: &World, scene: &DemoScene) {
    let time = world.resource::<WorldTime>();
    info!(
        "Simulated {} ticks ({:.2}s)",
        time.frame_count, time.elapsed
    );
    if let Some(pos) = world.get::<MapPosition>(scene.character) {
        info!("Character at ({:.3}, {:.3})", pos.pos.x, pos.pos.y);
    }
    if let (Some(shadow), Some(pos), Some(depth), Some(scale)) = (
        world.get::<Shadow>(scene.shadow),
        world.get::<MapPosition>(scene.shadow),
        world.get::<Depth>(scene.shadow),
        world.get::<Scale>(scene.shadow),
    ) {
        info!(
            "Shadow at ({:.3}, {:.3}, {:.3}) scale ({:.3}, {:.3}) state {:?} ratio {:.2}",
            pos.pos.x,
            pos.pos.y,
            depth.0,
            scale.scale.x,
            scale.scale.y,
            shadow.animator.state,
            shadow.animator.ratio
        );
    }
    if let Some(shadow_log) = world.get_resource::<ShadowLog>() {
        info!(
            "{} shadow transitions, {} landings",
            shadow_log.transitions,
            shadow_log.landings(scene.shadow)
        );
    }
}
