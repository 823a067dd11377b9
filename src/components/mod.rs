//! ECS components for entities.
//!
//! Components attached to characters, floors and shadows.
//!
//! Submodules overview:
//! - [`boxcollider`] – axis-aligned rectangular collider, also used as a ray target
//! - [`collisionlayer`] – physics layer of a collider and layer masks for queries
//! - [`depth`] – third (depth) coordinate of an entity
//! - [`grounded`] – whether a character currently stands on a floor
//! - [`jumper`] – pacing/jumping behaviour of the demo character
//! - [`mapposition`] – world-space position (pivot) for an entity
//! - [`rigidbody`] – simple kinematic body storing velocity and named forces
//! - [`scale`] – 2D scale factor for sprites
//! - [`shadow`] – shadow placement settings and its scale animator
//! - [`sprite`] – 2D sprite visual
//! - [`zindex`] – rendering order hint for 2D drawing

pub mod boxcollider;
pub mod collisionlayer;
pub mod depth;
pub mod grounded;
pub mod jumper;
pub mod mapposition;
pub mod rigidbody;
pub mod scale;
pub mod shadow;
pub mod sprite;
pub mod zindex;
