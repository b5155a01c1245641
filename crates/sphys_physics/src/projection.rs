//! Scalar projection intervals for the separating axis test

/// The extent of a shape along a world-space axis, as a scalar interval
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub min: f32,
    pub max: f32,
}

impl Projection {
    /// Create a new projection interval
    #[inline]
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Overlap between two intervals
    ///
    /// Negative when the intervals are disjoint on this axis.
    #[inline]
    pub fn overlap(self, other: Self) -> f32 {
        self.max.min(other.max) - self.min.max(other.min)
    }

    /// Whether this interval fully contains the other
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        self.min <= other.min && self.max >= other.max
    }

    /// Interval midpoint
    #[inline]
    pub fn mid(self) -> f32 {
        (self.min + self.max) * 0.5
    }
}
