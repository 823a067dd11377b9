//! Demo character behaviour: walk back and forth, jump at random intervals.

use bevy_ecs::prelude::Component;

/// Drives a character that paces between two x bounds and jumps whenever its
/// wait runs out while grounded.
#[derive(Component, Clone, Debug)]
pub struct Jumper {
    /// Upward speed given on take-off.
    pub jump_speed: f32,
    /// Horizontal speed while pacing.
    pub walk_speed: f32,
    /// Pacing bounds on the x axis.
    pub min_x: f32,
    pub max_x: f32,
    /// Range of the random wait between landings and the next jump, in seconds.
    pub min_wait: f32,
    pub max_wait: f32,
    /// Time left before the next jump.
    pub wait: f32,
}

impl Jumper {
    pub fn new(jump_speed: f32, walk_speed: f32, min_x: f32, max_x: f32) -> Self {
        Self {
            jump_speed,
            walk_speed,
            min_x,
            max_x,
            min_wait: 0.5,
            max_wait: 2.0,
            wait: 0.5,
        }
    }

    pub fn with_wait_range(mut self, min_wait: f32, max_wait: f32) -> Self {
        self.min_wait = min_wait;
        self.max_wait = max_wait.max(min_wait);
        self.wait = min_wait;
        self
    }
}
