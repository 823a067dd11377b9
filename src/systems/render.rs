//! Raylib window for the demo scene (`render` feature).
//!
//! Draws floors, the character and every visible shadow visual as an
//! ellipse scaled by the shadow's [`Scale`], in
//! [`ZIndex`](crate::components::zindex::ZIndex) order. World space is y-up,
//! so the vertical axis is flipped when mapping to the screen.
//!
//! Keys:
//! - `H` hides/shows the shadow visual
//! - `R` resets the shadow to grounded
//! - `F1` toggles [`DebugMode`]

use bevy_ecs::prelude::*;
use bevy_ecs::system::SystemState;
use glam::Vec2;
use raylib::prelude::*;

use crate::components::boxcollider::BoxCollider;
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::components::scale::Scale;
use crate::components::shadow::Shadow;
use crate::game::{DemoScene, tick};
use crate::resources::debugmode::DebugMode;
use crate::systems::shadow::{
    ShadowVisuals, hide_shadow_visual, reset_shadow_to_grounded, show_shadow_visual,
};

const WINDOW_WIDTH: i32 = 960;
const WINDOW_HEIGHT: i32 = 540;
const PIXELS_PER_UNIT: f32 = 32.0;
const CHARACTER_SIZE: Vec2 = Vec2::new(0.8, 1.6);
/// Most ticks run in one frame after a stall.
const MAX_CATCH_UP_TICKS: f32 = 5.0;

/// Map a y-up world point to screen pixels.
fn to_screen(p: Vec2) -> (i32, i32) {
    (
        (WINDOW_WIDTH as f32 * 0.5 + p.x * PIXELS_PER_UNIT) as i32,
        (WINDOW_HEIGHT as f32 * 0.75 - p.y * PIXELS_PER_UNIT) as i32,
    )
}

fn draw_box(d: &mut RaylibDrawHandle, min: Vec2, max: Vec2, color: Color) {
    let (x, y) = to_screen(Vec2::new(min.x, max.y));
    let size = (max - min) * PIXELS_PER_UNIT;
    d.draw_rectangle(x, y, size.x as i32, size.y as i32, color);
}

/// Add `frame_time` to `accumulator` and take out whole ticks of `dt`.
///
/// The accumulator is capped at [`MAX_CATCH_UP_TICKS`] ticks, so a stalled
/// frame does not cause a burst of catch-up ticks.
fn pending_ticks(accumulator: &mut f32, frame_time: f32, dt: f32) -> u32 {
    if dt <= 0.0 {
        return 0;
    }
    *accumulator = (*accumulator + frame_time).min(dt * MAX_CATCH_UP_TICKS);
    let mut ticks = 0;
    while *accumulator >= dt {
        *accumulator -= dt;
        ticks += 1;
    }
    ticks
}

/// Draw the current state of `world`.
pub fn render_world(world: &mut World, d: &mut RaylibDrawHandle) {
    d.clear_background(Color::RAYWHITE);

    let mut floors = world.query_filtered::<(&MapPosition, &BoxCollider), Without<RigidBody>>();
    for (pos, collider) in floors.iter(world) {
        let (min, max) = collider.aabb(pos.pos);
        draw_box(d, min, max, Color::DARKGRAY);
    }

    let mut shadows = world.query_filtered::<(Entity, &MapPosition, &Scale), With<Shadow>>();
    let placed: Vec<(Entity, Vec2, Vec2)> = shadows
        .iter(world)
        .map(|(e, pos, scale)| (e, pos.pos, scale.scale))
        .collect();
    let mut visuals_state: SystemState<ShadowVisuals> = SystemState::new(world);
    let visuals = visuals_state.get_mut(world);
    for (shadow, visual) in visuals.draw_order(placed.iter().map(|(e, _, _)| *e)) {
        let Some((_, pos, scale)) = placed.iter().find(|(e, _, _)| *e == shadow) else {
            continue;
        };
        let Ok(sprite) = visuals.sprites.get(visual) else {
            continue;
        };
        let (cx, cy) = to_screen(*pos);
        d.draw_ellipse(
            cx,
            cy,
            sprite.width * 0.5 * scale.x * PIXELS_PER_UNIT,
            sprite.height * 0.5 * scale.y * PIXELS_PER_UNIT,
            Color::new(0, 0, 0, 110),
        );
    }

    let mut characters = world.query_filtered::<&MapPosition, With<RigidBody>>();
    for pos in characters.iter(world) {
        let min = pos.pos - Vec2::new(CHARACTER_SIZE.x * 0.5, 0.0);
        draw_box(d, min, min + CHARACTER_SIZE, Color::MAROON);
    }

    d.draw_text("H: hide/show shadow  R: reset  F1: debug", 10, 10, 20, Color::BLACK);
}

/// Open a window and run the scene until it is closed.
///
/// Ticks run at a fixed `dt` regardless of the display frame rate, at most
/// [`MAX_CATCH_UP_TICKS`] per frame.
pub fn run_windowed(world: &mut World, schedule: &mut Schedule, scene: &DemoScene, dt: f32) {
    let (mut rl, thread) = raylib::init()
        .size(WINDOW_WIDTH, WINDOW_HEIGHT)
        .title("dropshadow")
        .build();
    rl.set_target_fps(120);

    let mut visible = true;
    let mut accumulator = 0.0_f32;
    let size = world
        .get::<Shadow>(scene.shadow)
        .map(|s| s.size)
        .unwrap_or(Vec2::ONE);

    while !rl.window_should_close() {
        if rl.is_key_pressed(KeyboardKey::KEY_H) {
            visible = !visible;
            if visible {
                show_shadow_visual(world, scene.shadow);
            } else {
                hide_shadow_visual(world, scene.shadow);
            }
        }
        if rl.is_key_pressed(KeyboardKey::KEY_R) {
            reset_shadow_to_grounded(world, scene.shadow, size);
        }
        if rl.is_key_pressed(KeyboardKey::KEY_F1) {
            if world.contains_resource::<DebugMode>() {
                world.remove_resource::<DebugMode>();
            } else {
                world.insert_resource(DebugMode {});
            }
        }

        for _ in 0..pending_ticks(&mut accumulator, rl.get_frame_time(), dt) {
            tick(world, schedule, dt);
        }

        let mut d = rl.begin_drawing(&thread);
        render_world(world, &mut d);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_frames_run_whole_ticks() {
        let mut acc = 0.0;
        assert_eq!(pending_ticks(&mut acc, 0.125, 0.25), 0);
        assert_eq!(pending_ticks(&mut acc, 0.1875, 0.25), 1);
        assert_eq!(acc, 0.0625);
    }

    #[test]
    fn long_stall_is_capped() {
        let mut acc = 0.0;
        assert_eq!(pending_ticks(&mut acc, 30.0, 0.25), MAX_CATCH_UP_TICKS as u32);
        assert_eq!(acc, 0.0);
    }
}
