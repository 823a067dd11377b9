//! Dropshadow library.
//!
//! Character drop shadows for a 2D ECS world: a shadow follows its character
//! either directly or projected onto the floor below it, and shrinks while the
//! character is airborne. Exposes the components, resources, systems and
//! events for the binary and for integration tests.

pub mod components;
pub mod events;
pub mod game;
pub mod resources;
pub mod systems;
