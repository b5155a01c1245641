//! The shape capability contract
//!
//! Every primitive the narrow phase can test implements this trait through
//! its dimension's closed enum ([`Shape2D`](crate::shapes2d::Shape2D),
//! [`Shape3D`](crate::shapes3d::Shape3D)). Shapes are plain values stored at
//! a single scope — either object-local or world-space — and are never
//! partially transformed.

use std::fmt::Debug;

use sphys_math::{Rotation, Vector};

use crate::aabb::Aabb;
use crate::projection::Projection;

/// Capabilities required of a collision shape
pub trait Shape: Clone + Debug {
    /// Vector type of the shape's dimension
    type V: Vector;
    /// Rotation type of the shape's dimension
    type R: Rotation<Self::V>;

    /// The shape's reference point (its center)
    fn translation(&self) -> Self::V;

    /// Move the shape's reference point
    fn set_translation(&mut self, translation: Self::V);

    /// The shape placed under a translation and rotation
    ///
    /// Used to derive the world-space shape from the local one. Axis-aligned
    /// shapes have their center rotated but stay axis-aligned.
    fn transformed(&self, translation: Self::V, rotation: Self::R) -> Self;

    /// Tight axis-aligned bounds
    fn bounding_box(&self) -> Aabb<Self::V>;

    /// The shape's extent along a world-space axis (axis must be unit length)
    fn project(&self, axis: Self::V) -> Projection;

    /// Candidate face-normal axes for the separating axis test (unit length)
    ///
    /// Circles and spheres contribute none; their axis comes from the
    /// closest point on the other shape.
    fn separation_axes(&self, out: &mut Vec<Self::V>);

    /// Edge directions for 3D edge-cross axes; empty in 2D
    fn edge_directions(&self, out: &mut Vec<Self::V>);

    /// Closest point on or inside the shape to `point`
    fn closest_point(&self, point: Self::V) -> Self::V;

    /// Center and radius when the shape is a circle or sphere
    fn as_ball(&self) -> Option<(Self::V, f32)>;

    /// The box itself when the shape is axis-aligned
    fn as_aabb(&self) -> Option<Aabb<Self::V>>;
}
