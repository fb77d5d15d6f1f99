use crate::error::{GeometryError, Result};
use crate::math::polygon_2d::{distinct_point_count, is_degenerate, signed_area_2d};
use crate::math::Point2;

/// Winding direction of a ring in the XY plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Negative signed area.
    Clockwise,
    /// Positive signed area.
    CounterClockwise,
}

impl Orientation {
    /// Returns the opposite winding.
    #[must_use]
    pub fn reversed(self) -> Self {
        match self {
            Self::Clockwise => Self::CounterClockwise,
            Self::CounterClockwise => Self::Clockwise,
        }
    }
}

/// An open, oriented sequence of 2D points.
///
/// The first point is never repeated at the end; the closing edge from the
/// last point back to the first is implicit. A `Ring` always has at least
/// three distinct, finite points and a non-zero area.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    points: Vec<Point2>,
    orientation: Orientation,
}

impl Ring {
    /// Creates a ring from an open point sequence, computing its orientation.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFiniteCoordinate`] if a coordinate is NaN or
    /// infinite, [`GeometryError::TooFewPoints`] if fewer than three distinct
    /// points remain, and [`GeometryError::Degenerate`] if the points are
    /// collinear.
    pub fn new(points: Vec<Point2>) -> Result<Self> {
        if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(GeometryError::NonFiniteCoordinate.into());
        }
        let found = distinct_point_count(&points);
        if found < 3 {
            return Err(GeometryError::TooFewPoints { found }.into());
        }
        if is_degenerate(&points) {
            return Err(GeometryError::Degenerate("ring has zero area".into()).into());
        }
        let orientation = if signed_area_2d(&points) > 0.0 {
            Orientation::CounterClockwise
        } else {
            Orientation::Clockwise
        };
        Ok(Self {
            points,
            orientation,
        })
    }

    /// Creates a ring from a closed point sequence, dropping the closing point.
    ///
    /// A sequence whose last point differs from the first is treated as
    /// implicitly closed and kept whole.
    ///
    /// # Errors
    ///
    /// Same as [`Ring::new`].
    pub fn from_closed(mut points: Vec<Point2>) -> Result<Self> {
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        Self::new(points)
    }

    /// The points of the ring, without the closing duplicate.
    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Number of points (and edges) in the ring.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the ring has no points.
    ///
    /// [`Ring::new`] rejects rings with fewer than three distinct points, so
    /// a constructed ring is never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The winding direction of the ring.
    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Returns a copy with the point order (and orientation) reversed.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            points: self.points.iter().rev().copied().collect(),
            orientation: self.orientation.reversed(),
        }
    }

    /// Returns the ring with the requested winding, reversing it if needed.
    ///
    /// A ring already wound as requested is returned unchanged.
    #[must_use]
    pub fn oriented(self, target: Orientation) -> Self {
        if self.orientation == target {
            self
        } else {
            self.reversed()
        }
    }
}
