//! Layer/mask collision filtering
//!
//! Detection is directional: an object detects another when its mask
//! intersects the other's layer. The reverse direction is evaluated
//! independently, which lets triggers see characters without characters
//! reacting to triggers.

use bitflags::bitflags;

bitflags! {
    /// Collision layers for filtering which objects can detect which others
    ///
    /// Each layer is a bit in a 32-bit mask. Objects can belong to multiple
    /// layers and declare which layers they detect via a collision mask.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CollisionLayer: u32 {
        /// Default layer for most objects
        const DEFAULT = 1 << 0;
        /// Static world geometry (floors, walls)
        const WORLD = 1 << 1;
        /// Moving characters and other kinematic bodies
        const CHARACTER = 1 << 2;
        /// Trigger volumes
        const TRIGGER = 1 << 3;
        /// All layers
        const ALL = 0xFFFFFFFF;
    }
}

/// Which layers an object belongs to and which it detects
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionFilter {
    /// Which layer(s) this object belongs to
    pub layer: CollisionLayer,
    /// Which layer(s) this object detects
    pub mask: CollisionLayer,
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self {
            layer: CollisionLayer::DEFAULT,
            mask: CollisionLayer::ALL,
        }
    }
}

impl CollisionFilter {
    /// Create a new collision filter with the specified layer and mask
    pub fn new(layer: CollisionLayer, mask: CollisionLayer) -> Self {
        Self { layer, mask }
    }

    /// Whether this object detects the other
    ///
    /// One-directional: `a.detects(&b)` says nothing about `b.detects(&a)`.
    pub fn detects(&self, other: &Self) -> bool {
        self.mask.intersects(other.layer)
    }
}
