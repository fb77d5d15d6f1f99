use crate::error::TopologyError;
use crate::math::{Point2, Point3};

/// Append-only arena of 3D points for one object under construction.
///
/// The index of a point is its position at append time and never changes.
/// Equal coordinates are never merged: appending the same point twice yields
/// two distinct indices.
#[derive(Debug, Default, Clone)]
pub struct VertexBuffer {
    points: Vec<Point3>,
}

impl VertexBuffer {
    /// Creates a new, empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty buffer with room for `capacity` points.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Appends a point and returns its index.
    pub fn push(&mut self, point: Point3) -> usize {
        self.points.push(point);
        self.points.len() - 1
    }

    /// Appends a 2D point lifted to elevation `z` and returns its index.
    pub fn push_at(&mut self, point: &Point2, z: f64) -> usize {
        self.push(Point3::new(point.x, point.y, z))
    }

    /// Returns the point stored at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::IndexOutOfRange`] if `index` has not been assigned.
    pub fn get(&self, index: usize) -> Result<&Point3, TopologyError> {
        self.points.get(index).ok_or(TopologyError::IndexOutOfRange {
            index,
            len: self.points.len(),
        })
    }

    /// Number of points appended so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if nothing has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The points in index order.
    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Consumes the buffer, returning its points in index order.
    #[must_use]
    pub fn into_points(self) -> Vec<Point3> {
        self.points
    }
}
