//! Narrow-phase intersection via the separating axis theorem
//!
//! Two convex shapes are disjoint iff some axis exists on which their
//! projections don't overlap. [`is_intersecting`] answers the boolean
//! question; [`separating_axis_test`] additionally extracts the minimum
//! translation vector (MTV), the smallest displacement that separates an
//! overlapping pair.
//!
//! Axis enumeration per pair:
//! - ball vs ball: closed-form center-distance test, no axes
//! - ball vs polygon: the single axis from the ball's center to the
//!   polygon's closest point (the polygon's own axes when the center sits
//!   exactly on that point, i.e. inside)
//! - axis-aligned box vs axis-aligned box: the world axes (closed form)
//! - polygon vs polygon: both shapes' face-normal axes, plus (3D only) the
//!   normalized cross products of their edge directions

use sphys_math::Vector;

use crate::aabb::Aabb;
use crate::projection::Projection;
use crate::shape::Shape;

/// Axes shorter than this are considered degenerate and skipped
const DEGENERATE_AXIS_EPSILON: f32 = 1e-6;

/// Minimum translation vector separating an overlapping pair
///
/// The normal points from the second shape toward the first; displacing the
/// first shape by [`Mtv::vector`] separates the pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mtv<V: Vector> {
    /// Unit direction of the push, from B toward A
    pub normal: V,
    /// Penetration depth along the normal
    pub depth: f32,
}

impl<V: Vector> Mtv<V> {
    /// The full displacement, `normal * depth`
    pub fn vector(&self) -> V {
        self.normal * self.depth
    }
}

/// Exact overlap test
///
/// Agrees with [`separating_axis_test`] on every pair: this returns `true`
/// iff that returns `Some`.
pub fn is_intersecting<S: Shape>(a: &S, b: &S) -> bool {
    match (a.as_ball(), b.as_ball()) {
        (Some((ca, ra)), Some((cb, rb))) => {
            let min_dist = ra + rb;
            return (ca - cb).length_squared() < min_dist * min_dist;
        }
        (Some((center, _)), None) => {
            let mut axes = Vec::new();
            ball_axis(center, b, &mut axes);
            return projections_overlap(a, b, &axes);
        }
        (None, Some((center, _))) => {
            let mut axes = Vec::new();
            ball_axis(center, a, &mut axes);
            return projections_overlap(a, b, &axes);
        }
        (None, None) => {}
    }
    let mut axes = Vec::new();
    polygon_axes(a, b, &mut axes);
    projections_overlap(a, b, &axes)
}

/// Exact overlap test with minimum translation vector extraction
///
/// Returns `None` when the pair is disjoint (or exactly touching).
pub fn separating_axis_test<S: Shape>(a: &S, b: &S) -> Option<Mtv<S::V>> {
    match (a.as_ball(), b.as_ball()) {
        (Some((ca, ra)), Some((cb, rb))) => return ball_vs_ball(ca, ra, cb, rb),
        (Some((center, _)), None) => {
            let mut axes = Vec::new();
            ball_axis(center, b, &mut axes);
            return minimum_translation(a, b, &axes);
        }
        (None, Some((center, _))) => {
            let mut axes = Vec::new();
            ball_axis(center, a, &mut axes);
            return minimum_translation(a, b, &axes);
        }
        (None, None) => {}
    }
    if let (Some(box_a), Some(box_b)) = (a.as_aabb(), b.as_aabb()) {
        return aabb_vs_aabb(&box_a, &box_b);
    }
    let mut axes = Vec::new();
    polygon_axes(a, b, &mut axes);
    minimum_translation(a, b, &axes)
}

/// Closed-form circle/sphere pair test
///
/// Coincident centers have no meaningful direction; the push falls back to
/// the dimension's up axis so the result stays finite and deterministic.
fn ball_vs_ball<V: Vector>(ca: V, ra: f32, cb: V, rb: f32) -> Option<Mtv<V>> {
    let delta = ca - cb;
    let dist_sq = delta.length_squared();
    let min_dist = ra + rb;
    if dist_sq >= min_dist * min_dist {
        return None;
    }
    if dist_sq > DEGENERATE_AXIS_EPSILON {
        let dist = dist_sq.sqrt();
        Some(Mtv {
            normal: delta * (1.0 / dist),
            depth: min_dist - dist,
        })
    } else {
        Some(Mtv {
            normal: V::up(),
            depth: min_dist,
        })
    }
}

/// Closed-form axis-aligned box pair test over the world axes
fn aabb_vs_aabb<V: Vector>(a: &Aabb<V>, b: &Aabb<V>) -> Option<Mtv<V>> {
    let mut best: Option<Mtv<V>> = None;
    for index in 0..V::DIM {
        let axis = V::axis(index);
        let pa = Projection::new(a.min.dot(axis), a.max.dot(axis));
        let pb = Projection::new(b.min.dot(axis), b.max.dot(axis));
        if !accumulate_axis(&mut best, axis, pa, pb) {
            return None;
        }
    }
    best
}

/// The single candidate axis for a ball against a polygon
///
/// Points from the polygon's closest point toward the ball center. When the
/// center sits inside the polygon the difference degenerates, and the
/// polygon's own axes take over.
fn ball_axis<S: Shape>(ball_center: S::V, polygon: &S, out: &mut Vec<S::V>) {
    let closest = polygon.closest_point(ball_center);
    let axis = ball_center - closest;
    if axis.length_squared() > DEGENERATE_AXIS_EPSILON {
        out.push(axis.normalized());
    } else {
        polygon.separation_axes(out);
    }
}

/// Face-normal axes of both shapes, plus 3D edge-cross axes
fn polygon_axes<S: Shape>(a: &S, b: &S, out: &mut Vec<S::V>) {
    a.separation_axes(out);
    b.separation_axes(out);

    let mut edges_a = Vec::new();
    let mut edges_b = Vec::new();
    a.edge_directions(&mut edges_a);
    b.edge_directions(&mut edges_b);
    for &ea in &edges_a {
        for &eb in &edges_b {
            if let Some(cross) = ea.edge_cross(eb) {
                if cross.length_squared() > DEGENERATE_AXIS_EPSILON {
                    out.push(cross.normalized());
                }
            }
        }
    }
}

/// True when no candidate axis separates the pair
fn projections_overlap<S: Shape>(a: &S, b: &S, axes: &[S::V]) -> bool {
    axes.iter()
        .all(|&axis| a.project(axis).overlap(b.project(axis)) > 0.0)
}

/// Run the full test over `axes`, tracking the minimum-overlap axis
fn minimum_translation<S: Shape>(a: &S, b: &S, axes: &[S::V]) -> Option<Mtv<S::V>> {
    let mut best: Option<Mtv<S::V>> = None;
    for &axis in axes {
        let pa = a.project(axis);
        let pb = b.project(axis);
        if !accumulate_axis(&mut best, axis, pa, pb) {
            return None;
        }
    }
    best
}

/// Fold one axis into the running minimum; false means the pair is disjoint
fn accumulate_axis<V: Vector>(
    best: &mut Option<Mtv<V>>,
    axis: V,
    pa: Projection,
    pb: Projection,
) -> bool {
    let mut overlap = pa.overlap(pb);
    if overlap <= 0.0 {
        return false;
    }
    // Containment correction: when one interval is nested inside the other,
    // the raw overlap understates the push needed to actually separate on
    // this axis, which would otherwise win as a spurious "thin" axis.
    if pa.contains(pb) || pb.contains(pa) {
        overlap += (pa.min - pb.min).abs().min((pa.max - pb.max).abs());
    }
    if best.as_ref().map_or(true, |mtv| overlap < mtv.depth) {
        // Normal points from B toward A on the winning axis
        let normal = if pb.mid() > pa.mid() { -axis } else { axis };
        *best = Some(Mtv {
            normal,
            depth: overlap,
        });
    }
    true
}
