//! Axis-aligned bounding boxes, generic over dimension

use sphys_math::Vector;

/// An axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb<V: Vector> {
    /// Minimum corner (all components are minimums)
    pub min: V,
    /// Maximum corner (all components are maximums)
    pub max: V,
}

impl<V: Vector> Aabb<V> {
    /// Create a new AABB from min and max corners
    pub fn new(min: V, max: V) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a position with given half-extents
    pub fn from_center_half_extents(center: V, half_extents: V) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Get the center of the AABB
    pub fn center(&self) -> V {
        (self.min + self.max) * 0.5
    }

    /// Get the half-extents (half the size in each dimension)
    pub fn half_extents(&self) -> V {
        (self.max - self.min) * 0.5
    }

    /// Check whether two AABBs intersect (touching counts)
    pub fn intersects(&self, other: &Self) -> bool {
        (self.min - other.max).max_element() <= 0.0
            && (other.min - self.max).max_element() <= 0.0
    }

    /// Check if a point is inside or on the AABB
    pub fn contains_point(&self, point: V) -> bool {
        (self.min - point).max_element() <= 0.0 && (point - self.max).max_element() <= 0.0
    }

    /// Translate the AABB by a delta
    pub fn translated(&self, delta: V) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Grow the box directionally by a motion vector
    ///
    /// Extends the min corner by the negative components of `motion` and the
    /// max corner by the positive ones, covering the volume swept over one
    /// step.
    pub fn expanded_by(&self, motion: V) -> Self {
        Self {
            min: self.min + motion.min_components(V::zero()),
            max: self.max + motion.max_components(V::zero()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sphys_math::{Vec2, Vec3};

    #[test]
    fn test_from_center_half_extents() {
        let aabb = Aabb::from_center_half_extents(Vec2::new(1.0, 2.0), Vec2::new(0.5, 1.0));
        assert_eq!(aabb.min, Vec2::new(0.5, 1.0));
        assert_eq!(aabb.max, Vec2::new(1.5, 3.0));
        assert_eq!(aabb.center(), Vec2::new(1.0, 2.0));
        assert_eq!(aabb.half_extents(), Vec2::new(0.5, 1.0));
    }

    #[test]
    fn test_intersects() {
        let a = Aabb::from_center_half_extents(Vec2::ZERO, Vec2::new(1.0, 1.0));
        let b = Aabb::from_center_half_extents(Vec2::new(1.5, 0.0), Vec2::new(1.0, 1.0));
        let c = Aabb::from_center_half_extents(Vec2::new(5.0, 0.0), Vec2::new(1.0, 1.0));
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_intersects_touching() {
        let a = Aabb::new(Vec2::ZERO, Vec2::new(1.0, 1.0));
        let b = Aabb::new(Vec2::new(1.0, 0.0), Vec2::new(2.0, 1.0));
        assert!(a.intersects(&b));
    }

    #[test]
    fn test_contains_point() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0));
        assert!(aabb.contains_point(Vec3::new(0.5, 0.5, 0.5)));
        assert!(aabb.contains_point(Vec3::ZERO));
        assert!(!aabb.contains_point(Vec3::new(1.1, 0.5, 0.5)));
    }

    #[test]
    fn test_expanded_by_is_directional() {
        let aabb = Aabb::new(Vec2::ZERO, Vec2::new(1.0, 1.0));
        let swept = aabb.expanded_by(Vec2::new(2.0, -3.0));
        assert_eq!(swept.min, Vec2::new(0.0, -3.0));
        assert_eq!(swept.max, Vec2::new(3.0, 1.0));
    }

    #[test]
    fn test_translated() {
        let aabb = Aabb::new(Vec2::ZERO, Vec2::new(1.0, 1.0)).translated(Vec2::new(2.0, 0.5));
        assert_eq!(aabb.min, Vec2::new(2.0, 0.5));
        assert_eq!(aabb.max, Vec2::new(3.0, 1.5));
    }
}
