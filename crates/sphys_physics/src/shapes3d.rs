//! 3D collision shapes
//!
//! The 3D half mirrors the 2D set: sphere, axis-aligned box, and oriented
//! box, gathered in the closed [`Shape3D`] enum.

use sphys_math::{Quat, Rotation, Vec3};

use crate::aabb::Aabb;
use crate::projection::Projection;
use crate::shape::Shape;

/// A sphere defined by center and radius
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere3D {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere3D {
    /// Create a new sphere at the given center with the given radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if a point is inside or on the sphere
    pub fn contains(&self, point: Vec3) -> bool {
        (point - self.center).length_squared() <= self.radius * self.radius
    }

    /// Get the closest point on the sphere surface to a given point
    ///
    /// Returns the center when the point coincides with it.
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        let direction = (point - self.center).normalized();
        self.center + direction * self.radius
    }

    pub fn bounding_box(&self) -> Aabb<Vec3> {
        Aabb::from_center_half_extents(
            self.center,
            Vec3::new(self.radius, self.radius, self.radius),
        )
    }

    pub fn project(&self, axis: Vec3) -> Projection {
        let c = self.center.dot(axis);
        Projection::new(c - self.radius, c + self.radius)
    }
}

/// An axis-aligned box defined by center and half-extents
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Box3D {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl Box3D {
    /// Create a new box centered at a position with given half-extents
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    pub fn bounding_box(&self) -> Aabb<Vec3> {
        Aabb::from_center_half_extents(self.center, self.half_extents)
    }

    /// Get the closest point inside or on the box to a given point
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point.clamp_components(
            self.center - self.half_extents,
            self.center + self.half_extents,
        )
    }

    pub fn project(&self, axis: Vec3) -> Projection {
        let c = self.center.dot(axis);
        let extent = self.half_extents.x * axis.x.abs()
            + self.half_extents.y * axis.y.abs()
            + self.half_extents.z * axis.z.abs();
        Projection::new(c - extent, c + extent)
    }
}

/// A box with an arbitrary rotation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrientedBox3D {
    pub center: Vec3,
    pub half_extents: Vec3,
    pub rotation: Quat,
}

impl OrientedBox3D {
    /// Create a new oriented box
    pub fn new(center: Vec3, half_extents: Vec3, rotation: Quat) -> Self {
        Self {
            center,
            half_extents,
            rotation,
        }
    }

    /// Local x axis in world space
    pub fn axis_x(&self) -> Vec3 {
        self.rotation.rotate(Vec3::X)
    }

    /// Local y axis in world space
    pub fn axis_y(&self) -> Vec3 {
        self.rotation.rotate(Vec3::Y)
    }

    /// Local z axis in world space
    pub fn axis_z(&self) -> Vec3 {
        self.rotation.rotate(Vec3::Z)
    }

    /// Apply an additional rotation
    pub fn rotate(&mut self, rotation: Quat) {
        self.rotation = rotation * self.rotation;
    }

    /// World-space half axes scaled by the half-extents
    fn half_axes(&self) -> [Vec3; 3] {
        [
            self.axis_x() * self.half_extents.x,
            self.axis_y() * self.half_extents.y,
            self.axis_z() * self.half_extents.z,
        ]
    }

    pub fn bounding_box(&self) -> Aabb<Vec3> {
        let [ex, ey, ez] = self.half_axes();
        Aabb::from_center_half_extents(self.center, ex.abs() + ey.abs() + ez.abs())
    }

    /// Get the closest point inside or on the box to a given point
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        // Clamp in the box's local frame, then map back
        let local = self.rotation.conjugate().rotate(point - self.center);
        let clamped = local.clamp_components(-self.half_extents, self.half_extents);
        self.center + self.rotation.rotate(clamped)
    }

    pub fn project(&self, axis: Vec3) -> Projection {
        let c = self.center.dot(axis);
        let [ex, ey, ez] = self.half_axes();
        let extent = ex.dot(axis).abs() + ey.dot(axis).abs() + ez.dot(axis).abs();
        Projection::new(c - extent, c + extent)
    }
}

/// Closed set of 3D collision shapes
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape3D {
    Sphere(Sphere3D),
    Box(Box3D),
    OrientedBox(OrientedBox3D),
}

impl Shape for Shape3D {
    type V = Vec3;
    type R = Quat;

    fn translation(&self) -> Vec3 {
        match self {
            Shape3D::Sphere(s) => s.center,
            Shape3D::Box(b) => b.center,
            Shape3D::OrientedBox(b) => b.center,
        }
    }

    fn set_translation(&mut self, translation: Vec3) {
        match self {
            Shape3D::Sphere(s) => s.center = translation,
            Shape3D::Box(b) => b.center = translation,
            Shape3D::OrientedBox(b) => b.center = translation,
        }
    }

    fn transformed(&self, translation: Vec3, rotation: Quat) -> Self {
        match self {
            Shape3D::Sphere(s) => Shape3D::Sphere(Sphere3D {
                center: rotation.rotate(s.center) + translation,
                radius: s.radius,
            }),
            // Axis-aligned boxes do not pick up the rotation
            Shape3D::Box(b) => Shape3D::Box(Box3D {
                center: rotation.rotate(b.center) + translation,
                half_extents: b.half_extents,
            }),
            Shape3D::OrientedBox(b) => Shape3D::OrientedBox(OrientedBox3D {
                center: rotation.rotate(b.center) + translation,
                half_extents: b.half_extents,
                rotation: rotation * b.rotation,
            }),
        }
    }

    fn bounding_box(&self) -> Aabb<Vec3> {
        match self {
            Shape3D::Sphere(s) => s.bounding_box(),
            Shape3D::Box(b) => b.bounding_box(),
            Shape3D::OrientedBox(b) => b.bounding_box(),
        }
    }

    fn project(&self, axis: Vec3) -> Projection {
        match self {
            Shape3D::Sphere(s) => s.project(axis),
            Shape3D::Box(b) => b.project(axis),
            Shape3D::OrientedBox(b) => b.project(axis),
        }
    }

    fn separation_axes(&self, out: &mut Vec<Vec3>) {
        match self {
            Shape3D::Sphere(_) => {}
            Shape3D::Box(_) => {
                out.push(Vec3::X);
                out.push(Vec3::Y);
                out.push(Vec3::Z);
            }
            Shape3D::OrientedBox(b) => {
                out.push(b.axis_x());
                out.push(b.axis_y());
                out.push(b.axis_z());
            }
        }
    }

    fn edge_directions(&self, out: &mut Vec<Vec3>) {
        // Box edges run along the face-normal axes
        self.separation_axes(out);
    }

    fn closest_point(&self, point: Vec3) -> Vec3 {
        match self {
            Shape3D::Sphere(s) => s.closest_point(point),
            Shape3D::Box(b) => b.closest_point(point),
            Shape3D::OrientedBox(b) => b.closest_point(point),
        }
    }

    fn as_ball(&self) -> Option<(Vec3, f32)> {
        match self {
            Shape3D::Sphere(s) => Some((s.center, s.radius)),
            _ => None,
        }
    }

    fn as_aabb(&self) -> Option<Aabb<Vec3>> {
        match self {
            Shape3D::Box(b) => Some(b.bounding_box()),
            _ => None,
        }
    }
}
