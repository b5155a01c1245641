//! Dimension-generic vector and rotation traits
//!
//! The collision core is written once against these traits and instantiated
//! for 2D ([`Vec2`] + `f32` angle) and 3D ([`Vec3`] + [`Quat`]), which keeps
//! the two dimensions behaviorally identical by construction.

use std::fmt::Debug;
use std::hash::Hash;
use std::ops::{Add, Mul, Neg, Sub};

use crate::{Quat, Vec2, Vec3};

/// Shared surface of the 2D and 3D vector types
pub trait Vector:
    Copy
    + Debug
    + Default
    + PartialEq
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + Mul<f32, Output = Self>
{
    /// Integer cell coordinate used by the uniform spatial hash
    type Cell: Copy + Eq + Hash + Debug;

    /// Number of components
    const DIM: usize;

    fn zero() -> Self;

    /// Unit vector along the `index`-th axis (zero vector out of range)
    fn axis(index: usize) -> Self;

    /// Canonical "up" direction of the dimension
    fn up() -> Self;

    fn dot(self, other: Self) -> f32;

    fn length_squared(self) -> f32 {
        self.dot(self)
    }

    fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    fn normalized(self) -> Self;

    fn min_components(self, other: Self) -> Self;

    fn max_components(self, other: Self) -> Self;

    /// Largest single component
    fn max_element(self) -> f32;

    /// Cross product of two edge directions, used as an extra separation
    /// axis candidate in 3D. `None` in 2D, where edge-cross axes don't exist.
    fn edge_cross(self, other: Self) -> Option<Self>;

    /// The grid cell containing this point
    fn cell(self, chunk_size: f32) -> Self::Cell;

    /// Push every cell the `[min, max]` box spans onto `out`
    fn cover_cells(min: Self, max: Self, chunk_size: f32, out: &mut Vec<Self::Cell>);
}

/// A rotation that can be applied to vectors of one dimension
///
/// 2D rotations are plain `f32` angles in radians; 3D rotations are unit
/// quaternions.
pub trait Rotation<V: Vector>: Copy + Debug + Default + PartialEq {
    fn identity() -> Self;

    /// Rotate a vector
    fn rotate(self, v: V) -> V;

    /// Composition: the result applies `other` first, then `self`
    fn compose(self, other: Self) -> Self;
}

impl Vector for Vec2 {
    type Cell = (i32, i32);

    const DIM: usize = 2;

    fn zero() -> Self {
        Self::ZERO
    }

    fn axis(index: usize) -> Self {
        match index {
            0 => Self::X,
            1 => Self::Y,
            _ => Self::ZERO,
        }
    }

    fn up() -> Self {
        Self::Y
    }

    fn dot(self, other: Self) -> f32 {
        Vec2::dot(self, other)
    }

    fn normalized(self) -> Self {
        Vec2::normalized(self)
    }

    fn min_components(self, other: Self) -> Self {
        Vec2::min_components(self, other)
    }

    fn max_components(self, other: Self) -> Self {
        Vec2::max_components(self, other)
    }

    fn max_element(self) -> f32 {
        self.x.max(self.y)
    }

    fn edge_cross(self, _other: Self) -> Option<Self> {
        None
    }

    fn cell(self, chunk_size: f32) -> Self::Cell {
        (
            (self.x / chunk_size).floor() as i32,
            (self.y / chunk_size).floor() as i32,
        )
    }

    fn cover_cells(min: Self, max: Self, chunk_size: f32, out: &mut Vec<Self::Cell>) {
        let (x0, y0) = min.cell(chunk_size);
        let (x1, y1) = max.cell(chunk_size);
        for x in x0..=x1 {
            for y in y0..=y1 {
                out.push((x, y));
            }
        }
    }
}

impl Vector for Vec3 {
    type Cell = (i32, i32, i32);

    const DIM: usize = 3;

    fn zero() -> Self {
        Self::ZERO
    }

    fn axis(index: usize) -> Self {
        match index {
            0 => Self::X,
            1 => Self::Y,
            2 => Self::Z,
            _ => Self::ZERO,
        }
    }

    fn up() -> Self {
        Self::Y
    }

    fn dot(self, other: Self) -> f32 {
        Vec3::dot(self, other)
    }

    fn normalized(self) -> Self {
        Vec3::normalized(self)
    }

    fn min_components(self, other: Self) -> Self {
        Vec3::min_components(self, other)
    }

    fn max_components(self, other: Self) -> Self {
        Vec3::max_components(self, other)
    }

    fn max_element(self) -> f32 {
        self.x.max(self.y).max(self.z)
    }

    fn edge_cross(self, other: Self) -> Option<Self> {
        Some(self.cross(other))
    }

    fn cell(self, chunk_size: f32) -> Self::Cell {
        (
            (self.x / chunk_size).floor() as i32,
            (self.y / chunk_size).floor() as i32,
            (self.z / chunk_size).floor() as i32,
        )
    }

    fn cover_cells(min: Self, max: Self, chunk_size: f32, out: &mut Vec<Self::Cell>) {
        let (x0, y0, z0) = min.cell(chunk_size);
        let (x1, y1, z1) = max.cell(chunk_size);
        for x in x0..=x1 {
            for y in y0..=y1 {
                for z in z0..=z1 {
                    out.push((x, y, z));
                }
            }
        }
    }
}

/// 2D rotation as an angle in radians
impl Rotation<Vec2> for f32 {
    fn identity() -> Self {
        0.0
    }

    fn rotate(self, v: Vec2) -> Vec2 {
        let (sin, cos) = self.sin_cos();
        Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
    }

    fn compose(self, other: Self) -> Self {
        self + other
    }
}

impl Rotation<Vec3> for Quat {
    fn identity() -> Self {
        Self::IDENTITY
    }

    fn rotate(self, v: Vec3) -> Vec3 {
        Quat::rotate(&self, v)
    }

    fn compose(self, other: Self) -> Self {
        self * other
    }
}
