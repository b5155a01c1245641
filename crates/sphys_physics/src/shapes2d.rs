//! 2D collision shapes
//!
//! Lightweight primitives for the 2D half of the core: circle, axis-aligned
//! rectangle, and oriented rectangle, gathered in the closed [`Shape2D`]
//! enum.

use sphys_math::{Rotation, Vec2};

use crate::aabb::Aabb;
use crate::projection::Projection;
use crate::shape::Shape;

/// A circle defined by center and radius
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle2D {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle2D {
    /// Create a new circle at the given center with the given radius
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if a point is inside or on the circle
    pub fn contains(&self, point: Vec2) -> bool {
        (point - self.center).length_squared() <= self.radius * self.radius
    }

    /// Get the closest point on the circle surface to a given point
    ///
    /// Returns the center when the point coincides with it.
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        let direction = (point - self.center).normalized();
        self.center + direction * self.radius
    }

    pub fn bounding_box(&self) -> Aabb<Vec2> {
        Aabb::from_center_half_extents(self.center, Vec2::new(self.radius, self.radius))
    }

    pub fn project(&self, axis: Vec2) -> Projection {
        let c = self.center.dot(axis);
        Projection::new(c - self.radius, c + self.radius)
    }
}

/// An axis-aligned rectangle defined by center and half-extents
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect2D {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Rect2D {
    /// Create a new rectangle centered at a position with given half-extents
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    pub fn bounding_box(&self) -> Aabb<Vec2> {
        Aabb::from_center_half_extents(self.center, self.half_extents)
    }

    /// Get the closest point inside or on the rectangle to a given point
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        point.clamp_components(
            self.center - self.half_extents,
            self.center + self.half_extents,
        )
    }

    pub fn project(&self, axis: Vec2) -> Projection {
        let c = self.center.dot(axis);
        let extent = self.half_extents.x * axis.x.abs() + self.half_extents.y * axis.y.abs();
        Projection::new(c - extent, c + extent)
    }
}

/// A rectangle with an arbitrary rotation (radians, counter-clockwise)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrientedRect2D {
    pub center: Vec2,
    pub half_extents: Vec2,
    pub rotation: f32,
}

impl OrientedRect2D {
    /// Create a new oriented rectangle
    pub fn new(center: Vec2, half_extents: Vec2, rotation: f32) -> Self {
        Self {
            center,
            half_extents,
            rotation,
        }
    }

    /// Local x axis in world space
    pub fn axis_x(&self) -> Vec2 {
        self.rotation.rotate(Vec2::X)
    }

    /// Local y axis in world space
    pub fn axis_y(&self) -> Vec2 {
        self.rotation.rotate(Vec2::Y)
    }

    /// Rotate by an additional angle
    pub fn rotate(&mut self, angle: f32) {
        self.rotation += angle;
    }

    pub fn bounding_box(&self) -> Aabb<Vec2> {
        // World half-extents: sum of the absolute world-space half axes
        let ex = (self.axis_x() * self.half_extents.x).abs();
        let ey = (self.axis_y() * self.half_extents.y).abs();
        Aabb::from_center_half_extents(self.center, ex + ey)
    }

    /// Get the closest point inside or on the rectangle to a given point
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        // Clamp in the rectangle's local frame, then map back
        let local = (-self.rotation).rotate(point - self.center);
        let clamped = local.clamp_components(-self.half_extents, self.half_extents);
        self.center + self.rotation.rotate(clamped)
    }

    pub fn project(&self, axis: Vec2) -> Projection {
        let c = self.center.dot(axis);
        let extent = (self.axis_x() * self.half_extents.x).dot(axis).abs()
            + (self.axis_y() * self.half_extents.y).dot(axis).abs();
        Projection::new(c - extent, c + extent)
    }
}

/// Closed set of 2D collision shapes
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape2D {
    Circle(Circle2D),
    Rect(Rect2D),
    OrientedRect(OrientedRect2D),
}

impl Shape for Shape2D {
    type V = Vec2;
    type R = f32;

    fn translation(&self) -> Vec2 {
        match self {
            Shape2D::Circle(c) => c.center,
            Shape2D::Rect(r) => r.center,
            Shape2D::OrientedRect(r) => r.center,
        }
    }

    fn set_translation(&mut self, translation: Vec2) {
        match self {
            Shape2D::Circle(c) => c.center = translation,
            Shape2D::Rect(r) => r.center = translation,
            Shape2D::OrientedRect(r) => r.center = translation,
        }
    }

    fn transformed(&self, translation: Vec2, rotation: f32) -> Self {
        match self {
            Shape2D::Circle(c) => Shape2D::Circle(Circle2D {
                center: rotation.rotate(c.center) + translation,
                radius: c.radius,
            }),
            // Axis-aligned rectangles do not pick up the rotation
            Shape2D::Rect(r) => Shape2D::Rect(Rect2D {
                center: rotation.rotate(r.center) + translation,
                half_extents: r.half_extents,
            }),
            Shape2D::OrientedRect(r) => Shape2D::OrientedRect(OrientedRect2D {
                center: rotation.rotate(r.center) + translation,
                half_extents: r.half_extents,
                rotation: rotation.compose(r.rotation),
            }),
        }
    }

    fn bounding_box(&self) -> Aabb<Vec2> {
        match self {
            Shape2D::Circle(c) => c.bounding_box(),
            Shape2D::Rect(r) => r.bounding_box(),
            Shape2D::OrientedRect(r) => r.bounding_box(),
        }
    }

    fn project(&self, axis: Vec2) -> Projection {
        match self {
            Shape2D::Circle(c) => c.project(axis),
            Shape2D::Rect(r) => r.project(axis),
            Shape2D::OrientedRect(r) => r.project(axis),
        }
    }

    fn separation_axes(&self, out: &mut Vec<Vec2>) {
        match self {
            Shape2D::Circle(_) => {}
            Shape2D::Rect(_) => {
                out.push(Vec2::X);
                out.push(Vec2::Y);
            }
            Shape2D::OrientedRect(r) => {
                out.push(r.axis_x());
                out.push(r.axis_y());
            }
        }
    }

    fn edge_directions(&self, _out: &mut Vec<Vec2>) {
        // Edge-cross axes only exist in 3D
    }

    fn closest_point(&self, point: Vec2) -> Vec2 {
        match self {
            Shape2D::Circle(c) => c.closest_point(point),
            Shape2D::Rect(r) => r.closest_point(point),
            Shape2D::OrientedRect(r) => r.closest_point(point),
        }
    }

    fn as_ball(&self) -> Option<(Vec2, f32)> {
        match self {
            Shape2D::Circle(c) => Some((c.center, c.radius)),
            _ => None,
        }
    }

    fn as_aabb(&self) -> Option<Aabb<Vec2>> {
        match self {
            Shape2D::Rect(r) => Some(r.bounding_box()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    #[test]
    fn test_circle_contains() {
        let circle = Circle2D::new(Vec2::ZERO, 1.0);
        assert!(circle.contains(Vec2::ZERO));
        assert!(circle.contains(Vec2::new(1.0, 0.0))); // on surface
        assert!(!circle.contains(Vec2::new(1.1, 0.0)));
    }

    #[test]
    fn test_circle_project() {
        let circle = Circle2D::new(Vec2::new(3.0, 0.0), 2.0);
        let p = circle.project(Vec2::X);
        assert!((p.min - 1.0).abs() < EPSILON);
        assert!((p.max - 5.0).abs() < EPSILON);
    }

    #[test]
    fn test_rect_project_diagonal_axis() {
        let rect = Rect2D::new(Vec2::ZERO, Vec2::new(1.0, 1.0));
        let axis = Vec2::new(1.0, 1.0).normalized();
        let p = rect.project(axis);
        // Corner (1,1) projects to sqrt(2)
        assert!((p.max - 2.0_f32.sqrt()).abs() < EPSILON);
        assert!((p.min + 2.0_f32.sqrt()).abs() < EPSILON);
    }

    #[test]
    fn test_rect_closest_point() {
        let rect = Rect2D::new(Vec2::ZERO, Vec2::new(1.0, 1.0));
        let inside = Vec2::new(0.5, -0.5);
        assert_eq!(rect.closest_point(inside), inside);
        assert_eq!(
            rect.closest_point(Vec2::new(3.0, 0.5)),
            Vec2::new(1.0, 0.5)
        );
    }

    #[test]
    fn test_oriented_rect_bounding_box() {
        // Unit square rotated 45 degrees spans sqrt(2) per axis
        let rect = OrientedRect2D::new(
            Vec2::ZERO,
            Vec2::new(1.0, 1.0),
            std::f32::consts::FRAC_PI_4,
        );
        let bounds = rect.bounding_box();
        assert!((bounds.max.x - 2.0_f32.sqrt()).abs() < EPSILON);
        assert!((bounds.max.y - 2.0_f32.sqrt()).abs() < EPSILON);
    }

    #[test]
    fn test_oriented_rect_closest_point_round_trips() {
        let rect = OrientedRect2D::new(
            Vec2::new(2.0, 1.0),
            Vec2::new(1.0, 0.5),
            std::f32::consts::FRAC_PI_2,
        );
        // Center is always the closest point to itself
        assert!((rect.closest_point(rect.center) - rect.center).length() < EPSILON);
        // A far point clamps onto the boundary
        let closest = rect.closest_point(Vec2::new(10.0, 1.0));
        let local = (-rect.rotation).rotate(closest - rect.center);
        assert!(local.x.abs() <= rect.half_extents.x + EPSILON);
        assert!(local.y.abs() <= rect.half_extents.y + EPSILON);
    }

    #[test]
    fn test_shape_transformed_circle() {
        let shape = Shape2D::Circle(Circle2D::new(Vec2::new(1.0, 0.0), 2.0));
        let moved = shape.transformed(Vec2::new(0.0, 3.0), std::f32::consts::FRAC_PI_2);
        // Local center (1,0) rotates onto (0,1), then translates to (0,4)
        let center = moved.translation();
        assert!((center - Vec2::new(0.0, 4.0)).length() < EPSILON);
    }

    #[test]
    fn test_shape_transformed_rect_stays_axis_aligned() {
        let shape = Shape2D::Rect(Rect2D::new(Vec2::ZERO, Vec2::new(2.0, 1.0)));
        let moved = shape.transformed(Vec2::new(5.0, 0.0), 1.0);
        match moved {
            Shape2D::Rect(r) => {
                assert_eq!(r.half_extents, Vec2::new(2.0, 1.0));
                assert_eq!(r.center, Vec2::new(5.0, 0.0));
            }
            _ => panic!("rect should stay a rect"),
        }
    }

    #[test]
    fn test_oriented_rect_axes_are_unit() {
        let rect = OrientedRect2D::new(Vec2::ZERO, Vec2::new(1.0, 1.0), 0.37);
        assert!((rect.axis_x().length() - 1.0).abs() < EPSILON);
        assert!((rect.axis_y().length() - 1.0).abs() < EPSILON);
        assert!(rect.axis_x().dot(rect.axis_y()).abs() < EPSILON);
    }
}
