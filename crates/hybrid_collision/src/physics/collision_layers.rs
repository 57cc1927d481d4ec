//! Collision layer system for filtering collision detection
//!
//! Based on Game Engine Architecture 3rd Edition, Section 13.3.8:
//! "Most games need to filter collisions... This is typically done via
//! collision layers or groups."

use bitflags::bitflags;

bitflags! {
    /// Layer membership and mask bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollisionLayers: u32 {
        /// Movable scene solids
        const DYNAMIC = 1 << 0;
        /// Fixed scenery
        const STATIC = 1 << 1;
        /// Objects currently held by the user
        const SELECTED = 1 << 2;
        /// Volumes that report overlap but should not be pushed apart
        const TRIGGER = 1 << 3;
        /// Every layer
        const ALL = u32::MAX;
    }
}

impl CollisionLayers {
    /// Check if two objects should collide based on their layers and masks.
    ///
    /// A's layer must be in B's mask AND B's layer must be in A's mask.
    pub fn should_collide(layer_a: Self, mask_a: Self, layer_b: Self, mask_b: Self) -> bool {
        layer_a.intersects(mask_b) && layer_b.intersects(mask_a)
    }
}

impl Default for CollisionLayers {
    fn default() -> Self {
        Self::ALL
    }
}
