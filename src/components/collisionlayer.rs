//! Collision layers and layer masks.
//!
//! Every collider that takes part in ray casts carries a [`CollisionLayer`]
//! index. Queries filter candidates with a [`LayerMask`] bit set, where layer
//! `i` corresponds to bit `1 << i`.

use bevy_ecs::prelude::Component;

/// Highest valid layer index.
pub const MAX_LAYER: u8 = 31;

/// Layer index of a collider, in `0..=31`.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CollisionLayer(pub u8);

/// Bit set of collision layers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    /// Mask with only `layer` set. Indices above [`MAX_LAYER`] give an empty mask.
    pub fn from_layer(layer: u8) -> Self {
        if layer > MAX_LAYER {
            return Self::NONE;
        }
        LayerMask(1 << layer)
    }

    pub fn with_layer(self, layer: u8) -> Self {
        LayerMask(self.0 | Self::from_layer(layer).0)
    }

    pub fn contains(&self, layer: CollisionLayer) -> bool {
        self.0 & Self::from_layer(layer.0).0 != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_layer_shifts_index() {
        assert_eq!(LayerMask::from_layer(10), LayerMask(1024));
        assert_eq!(LayerMask::from_layer(0), LayerMask(1));
    }

    #[test]
    fn out_of_range_layer_is_empty() {
        assert_eq!(LayerMask::from_layer(32), LayerMask::NONE);
        assert!(!LayerMask::ALL.contains(CollisionLayer(40)));
    }

    #[test]
    fn contains_checks_bits() {
        let mask = LayerMask::from_layer(3).with_layer(10);
        assert!(mask.contains(CollisionLayer(3)));
        assert!(mask.contains(CollisionLayer(10)));
        assert!(!mask.contains(CollisionLayer(4)));
    }
}
