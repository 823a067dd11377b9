//! Simulation systems.
//!
//! Submodules overview
//! - [`jumper`] – drive the demo character: pace between bounds and jump
//! - [`movement`] – integrate rigid bodies under their forces and land them on floors
//! - [`raycast`] – ray queries against static box colliders
//! - `render` – draw the scene with Raylib (`render` feature)
//! - [`shadow`] – animate and place shadows, plus the world-level shadow API
//! - [`time`] – update simulation time and delta

pub mod jumper;
pub mod movement;
pub mod raycast;
#[cfg(feature = "render")]
pub mod render;
pub mod shadow;
pub mod time;
