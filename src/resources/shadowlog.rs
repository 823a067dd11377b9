//! Record of shadow animation transitions.
//!
//! Filled by [`record_shadow_transitions`](crate::game::record_shadow_transitions)
//! from [`ShadowStateChangedEvent`](crate::events::shadow::ShadowStateChangedEvent)s
//! and summarised by the demo driver at exit.

use bevy_ecs::prelude::{Entity, Resource};
use rustc_hash::FxHashMap;

use crate::components::shadow::ShadowState;

#[derive(Resource, Debug, Default, Clone)]
pub struct ShadowLog {
    /// Latest state reported per shadow.
    pub last_state: FxHashMap<Entity, ShadowState>,
    /// Number of landings (transitions into `Grounded`) per shadow.
    pub landings: FxHashMap<Entity, u32>,
    /// Total transitions seen.
    pub transitions: u32,
}

impl ShadowLog {
    pub fn record(&mut self, entity: Entity, to: ShadowState) {
        self.transitions += 1;
        self.last_state.insert(entity, to);
        if to == ShadowState::Grounded {
            *self.landings.entry(entity).or_insert(0) += 1;
        }
    }

    pub fn landings(&self, entity: Entity) -> u32 {
        self.landings.get(&entity).copied().unwrap_or(0)
    }
}
