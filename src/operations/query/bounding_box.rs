use crate::math::Point3;

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Aabb {
    /// The box as a CityJSON `geographicalExtent`:
    /// `[minx, miny, minz, maxx, maxy, maxz]`.
    #[must_use]
    pub fn to_extent(&self) -> [f64; 6] {
        [
            self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z,
        ]
    }
}

/// Computes the axis-aligned bounding box of a set of vertices.
pub struct BoundingBox<'a> {
    points: &'a [Point3],
}

impl<'a> BoundingBox<'a> {
    /// Creates a new `BoundingBox` query.
    #[must_use]
    pub fn new(points: &'a [Point3]) -> Self {
        Self { points }
    }

    /// Executes the query, returning `None` for an empty point set.
    #[must_use]
    pub fn execute(&self) -> Option<Aabb> {
        let first = *self.points.first()?;
        let aabb = self.points[1..].iter().fold(
            Aabb {
                min: first,
                max: first,
            },
            |acc, p| Aabb {
                min: acc.min.inf(p),
                max: acc.max.sup(p),
            },
        );
        Some(aabb)
    }
}
