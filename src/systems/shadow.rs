//! Systems and operations for character shadows.
//!
//! Per tick, in this order (see [`add_shadow_systems`]):
//! 1. [`init_shadows`] – first-tick setup of newly spawned shadows
//! 2. [`shadow_animation_system`] – advance the scale animation from the character's [`Grounded`]
//! 3. [`shadow_position_system`] – place shadows per their [`ShadowMode`]
//! 4. [`despawn_orphaned_shadows`] – remove shadows whose character is gone
//!
//! Collaborators holding `&mut World` can use [`reset_shadow_to_grounded`],
//! [`update_shadow`], [`show_shadow_visual`] and [`hide_shadow_visual`]. Inside
//! systems, trigger the events from [`crate::events::shadow`] instead; they are
//! handled by [`reset_shadow_observer`] and [`shadow_visibility_observer`].
//!
//! [`ShadowMode`]: crate::components::shadow::ShadowMode

use bevy_ecs::hierarchy::Children;
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use bevy_ecs::system::{SystemParam, SystemState};
use glam::Vec2;
use log::{debug, trace, warn};
use smallvec::SmallVec;

use crate::components::depth::Depth;
use crate::components::grounded::Grounded;
use crate::components::mapposition::MapPosition;
use crate::components::scale::Scale;
use crate::components::shadow::{DEFAULT_REFERENCE_HZ, Shadow, ShadowState};
use crate::components::sprite::Sprite;
use crate::components::zindex::ZIndex;
use crate::events::shadow::{ResetShadowEvent, ShadowStateChangedEvent, ShadowVisibilityEvent};
use crate::resources::debugmode::DebugMode;
use crate::resources::worldtime::WorldTime;
use crate::systems::raycast::PhysicsQuery;

/// Queries needed to animate and place shadows.
///
/// Shadows are mutated through `shadows`; characters and floor colliders are
/// read through `characters` and `physics`, which never match a shadow.
#[derive(SystemParam)]
pub struct ShadowContext<'w, 's> {
    pub shadows: Query<
        'w,
        's,
        (
            Entity,
            &'static mut Shadow,
            &'static mut Scale,
            &'static mut MapPosition,
            &'static mut Depth,
        ),
    >,
    pub characters: Query<'w, 's, (&'static MapPosition, Option<&'static Grounded>), Without<Shadow>>,
    pub physics: PhysicsQuery<'w, 's>,
}

impl ShadowContext<'_, '_> {
    /// Place one shadow. Returns `false` when nothing moved.
    pub fn place(&mut self, entity: Entity) -> bool {
        let Ok((_, shadow, _, mut position, mut depth)) = self.shadows.get_mut(entity) else {
            return false;
        };
        place_shadow(
            entity,
            &shadow,
            &mut position,
            &mut depth,
            &self.characters,
            &self.physics,
        )
    }

    /// Reset a shadow to `size` in the grounded state and place it.
    ///
    /// Returns the previous animation state, or `None` if `entity` is not a shadow.
    pub fn reset_to_grounded(&mut self, entity: Entity, size: Vec2) -> Option<ShadowState> {
        let Ok((_, mut shadow, mut scale, _, _)) = self.shadows.get_mut(entity) else {
            warn!("reset_to_grounded: {:?} is not a shadow", entity);
            return None;
        };
        let before = shadow.animator.state;
        shadow.size = size;
        shadow.animator.reset_to_grounded(size, &mut scale.scale);
        debug!("shadow {:?} reset to grounded at {:?}", entity, size);
        self.place(entity);
        Some(before)
    }

    /// Advance one shadow's animation by a tick of `dt` seconds.
    ///
    /// Returns `(state_after, previous_state_if_changed)`, or `None` if
    /// `entity` is not a shadow.
    pub fn update(
        &mut self,
        entity: Entity,
        grounded: bool,
        dt: f32,
    ) -> Option<(ShadowState, Option<ShadowState>)> {
        let Ok((_, mut shadow, mut scale, _, _)) = self.shadows.get_mut(entity) else {
            return None;
        };
        let size = shadow.size;
        let changed = shadow
            .animator
            .update(grounded, dt, size, &mut scale.scale);
        let after = shadow.animator.state;
        if let Some(from) = changed {
            debug!("shadow {:?}: {:?} -> {:?}", entity, from, after);
        }
        Some((after, changed))
    }
}

/// Visual sub-objects of shadows: the shadow's own [`Sprite`] first, then
/// the sprites of its children in order.
#[derive(SystemParam)]
pub struct ShadowVisuals<'w, 's> {
    pub children: Query<'w, 's, &'static Children>,
    pub sprites: Query<'w, 's, &'static mut Sprite>,
    pub z_indices: Query<'w, 's, &'static ZIndex>,
}

impl ShadowVisuals<'_, '_> {
    /// Every visual of `shadow`, in resolution order.
    pub fn all(&self, shadow: Entity) -> SmallVec<[Entity; 4]> {
        let mut visuals = SmallVec::new();
        if self.sprites.contains(shadow) {
            visuals.push(shadow);
        }
        if let Ok(children) = self.children.get(shadow) {
            for child in children.iter() {
                if self.sprites.contains(child) {
                    visuals.push(child);
                }
            }
        }
        visuals
    }

    /// The visual that sorting order and visibility apply to.
    pub fn first(&self, shadow: Entity) -> Option<Entity> {
        self.all(shadow).first().copied()
    }

    /// Visible visuals of `shadows` in drawing order: ascending [`ZIndex`]
    /// (missing counts as 0), ties kept in resolution order.
    pub fn draw_order(&self, shadows: impl IntoIterator<Item = Entity>) -> Vec<(Entity, Entity)> {
        let mut visible: Vec<(i32, Entity, Entity)> = shadows
            .into_iter()
            .flat_map(|shadow| self.all(shadow).into_iter().map(move |v| (shadow, v)))
            .filter(|(_, v)| self.sprites.get(*v).is_ok_and(|sprite| sprite.visible))
            .map(|(shadow, v)| (self.z_indices.get(v).map(|z| z.0).unwrap_or(0), shadow, v))
            .collect();
        visible.sort_by_key(|(z, _, _)| *z);
        visible.into_iter().map(|(_, shadow, v)| (shadow, v)).collect()
    }

    /// Show or hide the first visual. Returns `false` when there is none.
    pub fn set_visible(&mut self, shadow: Entity, visible: bool) -> bool {
        let Some(visual) = self.first(shadow) else {
            warn!("shadow {:?} has no visual to {}", shadow, if visible { "show" } else { "hide" });
            return false;
        };
        match self.sprites.get_mut(visual) {
            Ok(mut sprite) => {
                sprite.visible = visible;
                true
            }
            Err(_) => false,
        }
    }
}

/// Compute and write the position and depth of one shadow.
///
/// Skips (returns `false`) when the mode is disabled or the character is
/// absent or gone.
fn place_shadow(
    entity: Entity,
    shadow: &Shadow,
    position: &mut MapPosition,
    depth: &mut Depth,
    characters: &Query<(&MapPosition, Option<&Grounded>), Without<Shadow>>,
    physics: &PhysicsQuery,
) -> bool {
    let Some(character) = shadow.character else {
        trace!("shadow {:?} has no character, skipping", entity);
        return false;
    };
    let Ok((character_pos, _)) = characters.get(character) else {
        trace!("shadow {:?}: character {:?} not found, skipping", entity, character);
        return false;
    };
    let placed = shadow.place(character_pos.pos, |origin, mask| {
        physics.floor_below(origin, mask).map(|hit| hit.point.y)
    });
    match placed {
        Some((pos, z)) => {
            position.pos = pos;
            depth.0 = z;
            true
        }
        None => false,
    }
}

/// Set up shadows spawned since the last run.
///
/// Writes the configured sorting order to the first visual's [`ZIndex`],
/// restores full size and places the shadow once.
pub fn init_shadows(mut ctx: ShadowContext, visuals: ShadowVisuals, mut commands: Commands) {
    let mut added: SmallVec<[Entity; 8]> = SmallVec::new();
    for (entity, mut shadow, mut scale, _, _) in ctx.shadows.iter_mut() {
        if !shadow.is_added() {
            continue;
        }
        let size = shadow.size;
        shadow.animator.reset(size, &mut scale.scale);
        if let Some(visual) = visuals.first(entity) {
            commands.entity(visual).insert(ZIndex(shadow.sorting_order));
        }
        added.push(entity);
    }
    for entity in added {
        ctx.place(entity);
        debug!("shadow {:?} initialised", entity);
    }
}

/// Advance every shadow's scale animation from its character's [`Grounded`] flag.
///
/// Shadows whose character is absent or has no `Grounded` are left alone.
/// A [`ShadowStateChangedEvent`] is triggered for every state change.
pub fn shadow_animation_system(
    world_time: Res<WorldTime>,
    mut ctx: ShadowContext,
    mut commands: Commands,
) {
    let dt = world_time.delta;
    for (entity, mut shadow, mut scale, _, _) in ctx.shadows.iter_mut() {
        let Some(character) = shadow.character else {
            continue;
        };
        let Ok((_, Some(grounded))) = ctx.characters.get(character) else {
            continue;
        };
        let size = shadow.size;
        if let Some(from) = shadow
            .animator
            .update(grounded.0, dt, size, &mut scale.scale)
        {
            let to = shadow.animator.state;
            debug!("shadow {:?}: {:?} -> {:?}", entity, from, to);
            commands.trigger(ShadowStateChangedEvent { entity, from, to });
        }
    }
}

/// Place every shadow according to its mode.
pub fn shadow_position_system(mut ctx: ShadowContext, debug_mode: Option<Res<DebugMode>>) {
    for (entity, shadow, _, mut position, mut depth) in ctx.shadows.iter_mut() {
        if place_shadow(
            entity,
            &shadow,
            &mut position,
            &mut depth,
            &ctx.characters,
            &ctx.physics,
        ) && debug_mode.is_some()
        {
            debug!(
                "shadow {:?} at ({:.3}, {:.3}, {:.3})",
                entity, position.pos.x, position.pos.y, depth.0
            );
        }
    }
}

/// Despawn shadows whose tracked character no longer exists.
///
/// Shadows built with [`Shadow::detached`] and shadows without a character
/// are kept.
pub fn despawn_orphaned_shadows(
    shadows: Query<(Entity, &Shadow)>,
    entities: Query<Entity>,
    mut commands: Commands,
) {
    for (entity, shadow) in shadows.iter() {
        let Some(character) = shadow.character else {
            continue;
        };
        if shadow.despawn_with_character && !entities.contains(character) {
            debug!("character {:?} gone, despawning shadow {:?}", character, entity);
            commands.entity(entity).try_despawn();
        }
    }
}

/// System set holding the shadow systems. Order character controllers
/// `.before(ShadowSet)` so shadows see this tick's positions and contacts.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShadowSet;

/// Register the shadow systems on `schedule`, in tick order.
pub fn add_shadow_systems(schedule: &mut Schedule) {
    schedule.add_systems(
        (
            init_shadows,
            shadow_animation_system,
            shadow_position_system,
            despawn_orphaned_shadows,
        )
            .chain()
            .in_set(ShadowSet),
    );
}

/// Observer applying [`ResetShadowEvent`].
pub fn reset_shadow_observer(
    trigger: On<ResetShadowEvent>,
    mut ctx: ShadowContext,
    mut commands: Commands,
) {
    let event = trigger.event();
    if let Some(from) = ctx.reset_to_grounded(event.entity, event.size)
        && from != ShadowState::Grounded
    {
        commands.trigger(ShadowStateChangedEvent {
            entity: event.entity,
            from,
            to: ShadowState::Grounded,
        });
    }
}

/// Observer applying [`ShadowVisibilityEvent`].
///
/// A shadow without a visual only logs a warning.
pub fn shadow_visibility_observer(trigger: On<ShadowVisibilityEvent>, mut visuals: ShadowVisuals) {
    let event = trigger.event();
    visuals.set_visible(event.entity, event.visible);
}

/// Register the shadow observers on `world`.
pub fn add_shadow_observers(world: &mut World) {
    world.add_observer(reset_shadow_observer);
    world.add_observer(shadow_visibility_observer);
    world.flush();
}

/// Spawn a shadow entity with the components the shadow systems expect.
///
/// When `sprite` is given it becomes the shadow's own visual.
pub fn spawn_shadow(world: &mut World, shadow: Shadow, sprite: Option<Sprite>) -> Entity {
    let mut entity = world.spawn((
        shadow,
        MapPosition::default(),
        Depth::default(),
        Scale::default(),
    ));
    if let Some(sprite) = sprite {
        entity.insert(sprite);
    }
    entity.id()
}

/// Reset `entity` to full `size`, grounded, and place it immediately.
///
/// Returns `false` (with a warning) when `entity` is not a shadow.
pub fn reset_shadow_to_grounded(world: &mut World, entity: Entity, size: Vec2) -> bool {
    let mut state: SystemState<ShadowContext> = SystemState::new(world);
    let from = {
        let mut ctx = state.get_mut(world);
        ctx.reset_to_grounded(entity, size)
    };
    state.apply(world);
    match from {
        Some(from) => {
            if from != ShadowState::Grounded {
                world.trigger(ShadowStateChangedEvent {
                    entity,
                    from,
                    to: ShadowState::Grounded,
                });
            }
            true
        }
        None => false,
    }
}

/// Advance the scale animation of `entity` by one tick.
///
/// Uses the current [`WorldTime`] delta. Before the first tick, or without a
/// `WorldTime`, one reference tick of `1 / DEFAULT_REFERENCE_HZ` is used so
/// repeated calls always make progress.
/// Returns the state after the update, or `None` if `entity` is not a shadow.
pub fn update_shadow(world: &mut World, entity: Entity, grounded: bool) -> Option<ShadowState> {
    let dt = world
        .get_resource::<WorldTime>()
        .map(|t| t.delta)
        .filter(|dt| *dt > 0.0)
        .unwrap_or(1.0 / DEFAULT_REFERENCE_HZ);
    let mut state: SystemState<ShadowContext> = SystemState::new(world);
    let result = {
        let mut ctx = state.get_mut(world);
        ctx.update(entity, grounded, dt)
    };
    state.apply(world);

    let Some((after, changed)) = result else {
        warn!("update_shadow: {:?} is not a shadow", entity);
        return None;
    };
    if let Some(from) = changed {
        world.trigger(ShadowStateChangedEvent {
            entity,
            from,
            to: after,
        });
    }
    Some(after)
}

fn set_shadow_visual(world: &mut World, entity: Entity, visible: bool) -> bool {
    let mut state: SystemState<ShadowVisuals> = SystemState::new(world);
    let done = {
        let mut visuals = state.get_mut(world);
        visuals.set_visible(entity, visible)
    };
    state.apply(world);
    done
}

/// Make the first visual of `entity` visible. `false` if it has none.
pub fn show_shadow_visual(world: &mut World, entity: Entity) -> bool {
    set_shadow_visual(world, entity, true)
}

/// Hide the first visual of `entity`. `false` if it has none.
pub fn hide_shadow_visual(world: &mut World, entity: Entity) -> bool {
    set_shadow_visual(world, entity, false)
}
