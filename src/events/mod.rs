//! Event types exchanged with the shadow systems.
//!
//! Submodules:
//! - [`shadow`] – reset and visibility requests, and state change notifications
pub mod shadow;
