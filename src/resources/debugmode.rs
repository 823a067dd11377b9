//! Debug toggle resource.
//!
//! The mere presence of this resource indicates that per-tick shadow
//! diagnostics should be logged. Remove it to disable them.

use bevy_ecs::prelude::Resource;

/// Marker resource: when present, systems may log extra diagnostics.
#[derive(Resource, Clone, Copy, Debug)]
pub struct DebugMode {}
