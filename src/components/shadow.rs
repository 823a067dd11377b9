//! Component for a 2D shadow that follows a character.
//!
//! A [`Shadow`] tracks a character entity and is placed every tick by the
//! [`shadow_position_system`](crate::systems::shadow::shadow_position_system)
//! according to its [`ShadowMode`]:
//! - [`ShadowMode::StuckToCharacter`] copies the character position plus an offset
//! - [`ShadowMode::ProjectedOnFloor`] casts a ray straight down and sits on the first floor hit
//! - [`ShadowMode::Disabled`] leaves the position alone
//!
//! The [`ShadowAnimator`] shrinks the shadow while the character is in the
//! air and grows it back on landing.
//!
//! # Related
//!
//! - [`crate::systems::shadow`] – systems and public operations driving shadows
//! - [`crate::events::shadow`] – reset, visibility and state change events

use bevy_ecs::prelude::{Component, Entity};
use glam::Vec2;

use crate::components::collisionlayer::LayerMask;

/// Y used when a floor ray cast finds nothing. Far below any scene.
pub const FLOOR_MISS_Y: f32 = -10000.0;
/// Default minimum scale restored by [`ShadowAnimator::reset`].
pub const DEFAULT_MINIMUM_SCALE: Vec2 = Vec2::new(0.241, 0.204);
/// Default draw depth of a floor-projected shadow.
pub const DEFAULT_FLOOR_DEPTH: f32 = -0.08;
/// Default collision layer floors live on.
pub const DEFAULT_FLOOR_LAYER: u8 = 10;
/// Ratio units per second while shrinking or growing.
pub const RATIO_STEP_PER_SECOND: f32 = 8.0;
/// Scale factor applied per update at the reference rate.
pub const SCALE_FACTOR: f32 = 1.1;
/// Tick rate at which [`ScaleStep::TimeNormalized`] matches [`ScaleStep::PerCall`].
pub const DEFAULT_REFERENCE_HZ: f32 = 50.0;

/// Ratio at or below which shrinking stops.
const AIRBORNE_RATIO: f32 = 0.5;
/// Ratio at or above which growing stops.
const GROUNDED_RATIO: f32 = 1.0;

/// How a shadow is positioned each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadowMode {
    StuckToCharacter,
    #[default]
    ProjectedOnFloor,
    Disabled,
}

impl std::str::FromStr for ShadowMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stuck" | "stuck_to_character" => Ok(ShadowMode::StuckToCharacter),
            "floor" | "projected_on_floor" => Ok(ShadowMode::ProjectedOnFloor),
            "none" | "disabled" => Ok(ShadowMode::Disabled),
            other => Err(format!("unknown shadow mode '{}'", other)),
        }
    }
}

impl std::fmt::Display for ShadowMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ShadowMode::StuckToCharacter => "stuck",
            ShadowMode::ProjectedOnFloor => "floor",
            ShadowMode::Disabled => "none",
        };
        f.write_str(name)
    }
}

/// State of the grounded/airborne scale animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShadowState {
    Grounded,
    TransitioningToAirborne,
    Airborne,
    TransitioningToGrounded,
}

/// How the per-update scale factor relates to elapsed time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScaleStep {
    /// Fixed [`SCALE_FACTOR`] per update, whatever the tick length.
    PerCall,
    /// `SCALE_FACTOR ^ (dt * reference_hz)`, so the animation speed does not
    /// depend on how often the shadow is updated.
    TimeNormalized { reference_hz: f32 },
}

impl Default for ScaleStep {
    fn default() -> Self {
        ScaleStep::TimeNormalized {
            reference_hz: DEFAULT_REFERENCE_HZ,
        }
    }
}

impl ScaleStep {
    /// Multiplicative scale factor for one update lasting `dt` seconds.
    pub fn factor(&self, dt: f32) -> f32 {
        match *self {
            ScaleStep::PerCall => SCALE_FACTOR,
            ScaleStep::TimeNormalized { reference_hz } => {
                SCALE_FACTOR.powf((dt * reference_hz).max(0.0))
            }
        }
    }
}

/// Four-state machine that shrinks and grows a shadow's scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowAnimator {
    pub state: ShadowState,
    /// Last grounded value that caused a state change.
    pub tracked_grounded: bool,
    /// Transition progress, kept in `[0, 1]`.
    pub ratio: f32,
    /// Scale reached at the end of the last shrink.
    pub min_scale: Vec2,
    pub scale_step: ScaleStep,
}

impl Default for ShadowAnimator {
    fn default() -> Self {
        Self {
            state: ShadowState::Airborne,
            tracked_grounded: false,
            ratio: 1.0,
            min_scale: DEFAULT_MINIMUM_SCALE,
            scale_step: ScaleStep::default(),
        }
    }
}

impl ShadowAnimator {
    pub fn with_scale_step(mut self, scale_step: ScaleStep) -> Self {
        self.scale_step = scale_step;
        self
    }

    /// Restore full size without touching the state.
    pub fn reset(&mut self, size: Vec2, scale: &mut Vec2) {
        self.ratio = GROUNDED_RATIO;
        self.min_scale = DEFAULT_MINIMUM_SCALE;
        *scale = size;
    }

    /// Reset and force the grounded state, then settle once with `grounded = true`.
    pub fn reset_to_grounded(&mut self, size: Vec2, scale: &mut Vec2) {
        self.reset(size, scale);
        self.tracked_grounded = true;
        self.state = ShadowState::Grounded;
        self.update(true, 0.0, size, scale);
    }

    /// Advance one tick.
    ///
    /// `size` is the resting grounded scale. Returns the previous state when
    /// the state changed during this call.
    pub fn update(
        &mut self,
        grounded: bool,
        dt: f32,
        size: Vec2,
        scale: &mut Vec2,
    ) -> Option<ShadowState> {
        let before = self.state;
        match self.state {
            ShadowState::Grounded => {
                if grounded != self.tracked_grounded {
                    self.tracked_grounded = grounded;
                    self.state = ShadowState::TransitioningToAirborne;
                } else {
                    *scale = size;
                }
            }
            ShadowState::TransitioningToAirborne => {
                if self.ratio > AIRBORNE_RATIO {
                    self.ratio = (self.ratio - dt * RATIO_STEP_PER_SECOND).clamp(0.0, 1.0);
                    *scale /= self.scale_step.factor(dt);
                } else {
                    self.min_scale = *scale;
                    self.state = ShadowState::Airborne;
                }
            }
            ShadowState::Airborne => {
                if grounded != self.tracked_grounded {
                    self.tracked_grounded = grounded;
                    self.state = ShadowState::TransitioningToGrounded;
                } else {
                    self.ratio = AIRBORNE_RATIO;
                    *scale = self.min_scale;
                }
            }
            ShadowState::TransitioningToGrounded => {
                if self.ratio < GROUNDED_RATIO {
                    self.ratio = (self.ratio + dt * RATIO_STEP_PER_SECOND).clamp(0.0, 1.0);
                    *scale *= self.scale_step.factor(dt);
                } else {
                    self.state = ShadowState::Grounded;
                }
            }
        }
        (self.state != before).then_some(before)
    }
}

/// Component that draws a shadow under (or next to) a character.
#[derive(Debug, Clone, Component)]
pub struct Shadow {
    pub mode: ShadowMode,
    /// The character to follow. `None` skips position updates.
    pub character: Option<Entity>,
    /// Offset added to the computed position.
    pub offset: Vec2,
    /// Depth used in [`ShadowMode::StuckToCharacter`].
    pub depth: f32,
    /// Depth used in [`ShadowMode::ProjectedOnFloor`].
    pub floor_depth: f32,
    /// Collision layer index the floor ray cast is restricted to.
    pub floor_layer: u8,
    /// Full (grounded) scale.
    pub size: Vec2,
    /// Sorting order written to the first visual on init.
    pub sorting_order: i32,
    /// Despawn this shadow when its character is gone.
    pub despawn_with_character: bool,
    pub animator: ShadowAnimator,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            mode: ShadowMode::default(),
            character: None,
            offset: Vec2::ZERO,
            depth: 0.0,
            floor_depth: DEFAULT_FLOOR_DEPTH,
            floor_layer: DEFAULT_FLOOR_LAYER,
            size: Vec2::ONE,
            sorting_order: 0,
            despawn_with_character: true,
            animator: ShadowAnimator::default(),
        }
    }
}

impl Shadow {
    /// Shadow copying the character position plus offset.
    pub fn stuck_to(character: Entity) -> Self {
        Self {
            mode: ShadowMode::StuckToCharacter,
            character: Some(character),
            ..Default::default()
        }
    }

    /// Shadow cast straight down onto the floor layer.
    pub fn projected_on_floor(character: Entity) -> Self {
        Self {
            mode: ShadowMode::ProjectedOnFloor,
            character: Some(character),
            ..Default::default()
        }
    }

    pub fn with_mode(mut self, mode: ShadowMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    pub fn with_depth(mut self, depth: f32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_floor_depth(mut self, depth: f32) -> Self {
        self.floor_depth = depth;
        self
    }

    pub fn with_floor_layer(mut self, layer: u8) -> Self {
        self.floor_layer = layer;
        self
    }

    pub fn with_sorting_order(mut self, order: i32) -> Self {
        self.sorting_order = order;
        self
    }

    pub fn with_scale_step(mut self, scale_step: ScaleStep) -> Self {
        self.animator.scale_step = scale_step;
        self
    }

    /// Keep the shadow alive when its character despawns.
    pub fn detached(mut self) -> Self {
        self.despawn_with_character = false;
        self
    }

    pub fn floor_mask(&self) -> LayerMask {
        LayerMask::from_layer(self.floor_layer)
    }

    /// Compute position and depth for a character at `character_pos`.
    ///
    /// `floor_y` is only called in floor mode and returns the y of the floor
    /// hit below the character, if any. Returns `None` when disabled.
    pub fn place(
        &self,
        character_pos: Vec2,
        floor_y: impl FnOnce(Vec2, LayerMask) -> Option<f32>,
    ) -> Option<(Vec2, f32)> {
        match self.mode {
            ShadowMode::StuckToCharacter => Some((character_pos + self.offset, self.depth)),
            ShadowMode::ProjectedOnFloor => {
                let y = floor_y(character_pos, self.floor_mask()).unwrap_or(FLOOR_MISS_Y);
                Some((
                    Vec2::new(character_pos.x + self.offset.x, y + self.offset.y),
                    self.floor_depth,
                ))
            }
            ShadowMode::Disabled => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.02;
    const EPSILON: f32 = 1e-5;

    fn approx_v2(a: Vec2, b: Vec2) -> bool {
        (a - b).abs().max_element() < EPSILON
    }

    fn grounded_animator() -> (ShadowAnimator, Vec2) {
        let mut anim = ShadowAnimator::default();
        let mut scale = Vec2::ZERO;
        anim.reset_to_grounded(Vec2::new(2.0, 1.0), &mut scale);
        (anim, scale)
    }

    #[test]
    fn default_animator_starts_airborne_at_full_ratio() {
        let anim = ShadowAnimator::default();
        assert_eq!(anim.state, ShadowState::Airborne);
        assert!(!anim.tracked_grounded);
        assert_eq!(anim.ratio, 1.0);
        assert_eq!(anim.min_scale, DEFAULT_MINIMUM_SCALE);
    }

    #[test]
    fn reset_to_grounded_pins_full_scale() {
        let (anim, scale) = grounded_animator();
        assert_eq!(anim.state, ShadowState::Grounded);
        assert!(anim.tracked_grounded);
        assert_eq!(anim.ratio, 1.0);
        assert_eq!(scale, Vec2::new(2.0, 1.0));
    }

    #[test]
    fn grounded_resting_snaps_scale_back() {
        let (mut anim, mut scale) = grounded_animator();
        scale = Vec2::splat(7.0);
        for _ in 0..10 {
            assert!(anim.update(true, DT, Vec2::new(2.0, 1.0), &mut scale).is_none());
            assert_eq!(scale, Vec2::new(2.0, 1.0));
        }
    }

    #[test]
    fn leaving_ground_enters_shrink_transition() {
        let (mut anim, mut scale) = grounded_animator();
        let prev = anim.update(false, DT, Vec2::new(2.0, 1.0), &mut scale);
        assert_eq!(prev, Some(ShadowState::Grounded));
        assert_eq!(anim.state, ShadowState::TransitioningToAirborne);
        assert!(!anim.tracked_grounded);
        // the state change itself does not touch the scale
        assert_eq!(scale, Vec2::new(2.0, 1.0));
    }

    #[test]
    fn shrink_divides_by_factor_per_call() {
        let size = Vec2::new(2.0, 1.0);
        let (mut anim, mut scale) = grounded_animator();
        anim.scale_step = ScaleStep::PerCall;
        anim.update(false, DT, size, &mut scale);
        anim.update(false, DT, size, &mut scale);
        assert!(approx_v2(scale, size / 1.1));
        assert!((anim.ratio - (1.0 - DT * 8.0)).abs() < EPSILON);
    }

    #[test]
    fn transitions_ignore_input() {
        let size = Vec2::new(2.0, 1.0);
        let (mut anim, mut scale) = grounded_animator();
        anim.update(false, DT, size, &mut scale);
        // grounded flips back but the shrink keeps going
        anim.update(true, DT, size, &mut scale);
        assert_eq!(anim.state, ShadowState::TransitioningToAirborne);
        assert!(scale.x < size.x);
    }

    #[test]
    fn full_round_trip_restores_size() {
        let size = Vec2::new(2.0, 1.0);
        let (mut anim, mut scale) = grounded_animator();

        let mut calls = 0;
        while anim.state != ShadowState::Airborne {
            anim.update(false, DT, size, &mut scale);
            calls += 1;
            assert!(calls < 100, "never reached Airborne");
        }
        assert!(anim.ratio <= 0.5);
        assert_eq!(anim.min_scale, scale);
        assert!(scale.x < size.x && scale.y < size.y);

        // resting airborne pins the minimum scale
        let min = scale;
        anim.update(false, DT, size, &mut scale);
        assert_eq!(scale, min);
        assert_eq!(anim.ratio, 0.5);

        calls = 0;
        while anim.state != ShadowState::Grounded {
            anim.update(true, DT, size, &mut scale);
            calls += 1;
            assert!(calls < 100, "never reached Grounded");
        }
        assert!(anim.ratio >= 1.0);

        anim.update(true, DT, size, &mut scale);
        assert_eq!(scale, size);
    }

    #[test]
    fn ratio_stays_in_unit_range_with_huge_ticks() {
        let size = Vec2::ONE;
        let (mut anim, mut scale) = grounded_animator();
        for grounded in [false, false, false, false, true, true, true, true] {
            anim.update(grounded, 10.0, size, &mut scale);
            assert!((0.0..=1.0).contains(&anim.ratio));
        }
    }

    #[test]
    fn time_normalized_factor_matches_per_call_at_reference_rate() {
        let step = ScaleStep::default();
        assert!((step.factor(1.0 / DEFAULT_REFERENCE_HZ) - SCALE_FACTOR).abs() < EPSILON);
        // two half ticks compose to one full tick
        let half = step.factor(0.5 / DEFAULT_REFERENCE_HZ);
        assert!((half * half - SCALE_FACTOR).abs() < EPSILON);
        assert_eq!(step.factor(0.0), 1.0);
        assert_eq!(ScaleStep::PerCall.factor(0.5), SCALE_FACTOR);
    }

    #[test]
    fn place_stuck_adds_offset() {
        let shadow = Shadow::stuck_to(Entity::PLACEHOLDER)
            .with_offset(Vec2::new(1.0, -2.0))
            .with_depth(0.5);
        let (pos, depth) = shadow
            .place(Vec2::new(10.0, 20.0), |_, _| panic!("no ray cast when stuck"))
            .unwrap();
        assert_eq!(pos, Vec2::new(11.0, 18.0));
        assert_eq!(depth, 0.5);
    }

    #[test]
    fn place_on_floor_uses_hit_or_sentinel() {
        let shadow = Shadow::projected_on_floor(Entity::PLACEHOLDER).with_offset(Vec2::new(1.0, 0.25));
        let (pos, depth) = shadow.place(Vec2::new(3.0, 40.0), |_, _| Some(5.0)).unwrap();
        assert_eq!(pos, Vec2::new(4.0, 5.25));
        assert_eq!(depth, DEFAULT_FLOOR_DEPTH);

        let (pos, _) = shadow.place(Vec2::new(3.0, 40.0), |_, _| None).unwrap();
        assert_eq!(pos.y, FLOOR_MISS_Y + 0.25);
    }

    #[test]
    fn place_on_floor_passes_layer_mask() {
        let shadow = Shadow::projected_on_floor(Entity::PLACEHOLDER).with_floor_layer(4);
        shadow.place(Vec2::ZERO, |origin, mask| {
            assert_eq!(origin, Vec2::ZERO);
            assert_eq!(mask, LayerMask(16));
            None
        });
    }

    #[test]
    fn disabled_places_nothing() {
        let shadow = Shadow::default().with_mode(ShadowMode::Disabled);
        assert!(shadow.place(Vec2::ZERO, |_, _| Some(0.0)).is_none());
    }

    #[test]
    fn mode_parses_from_config_strings() {
        assert_eq!("Stuck".parse::<ShadowMode>(), Ok(ShadowMode::StuckToCharacter));
        assert_eq!("floor".parse::<ShadowMode>(), Ok(ShadowMode::ProjectedOnFloor));
        assert_eq!("none".parse::<ShadowMode>(), Ok(ShadowMode::Disabled));
        assert!("sideways".parse::<ShadowMode>().is_err());
    }
}
