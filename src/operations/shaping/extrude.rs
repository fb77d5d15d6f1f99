use crate::error::{GeometryError, Result};
use crate::geometry::Footprint;
use crate::operations::query::IsValid;
use crate::topology::{Solid, VertexBuffer};

use super::assemble_solid::AssembleSolid;
use super::build_caps::BuildCaps;
use super::extrude_walls::ExtrudeWalls;
use super::normalize_rings::NormalizeRings;

/// Extrudes a footprint from elevation 0 to `height` into a closed solid.
///
/// Runs ring normalization, wall extrusion for the exterior and every hole,
/// cap construction and solid assembly, appending every new vertex to the
/// caller's buffer. For an exterior of `E` points and holes of `H_i` points
/// the buffer grows by `6 * (E + sum H_i)` vertices (four per wall, one per
/// roof point, one per floor point) and the shell has
/// `E + sum H_i + 2` surfaces.
pub struct ExtrudeFootprint<'a> {
    footprint: &'a Footprint,
    height: f64,
    lod: f64,
}

impl<'a> ExtrudeFootprint<'a> {
    /// Creates a new `ExtrudeFootprint` operation.
    #[must_use]
    pub fn new(footprint: &'a Footprint, height: f64, lod: f64) -> Self {
        Self {
            footprint,
            height,
            lod,
        }
    }

    /// Executes the extrusion.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidExtrusionHeight`] for a negative or
    /// non-finite height, any ring normalization error, and a
    /// [`TopologyError`](crate::error::TopologyError) if the assembled solid
    /// is internally inconsistent.
    pub fn execute(&self, buffer: &mut VertexBuffer) -> Result<Solid> {
        if !self.height.is_finite() || self.height < 0.0 {
            return Err(GeometryError::InvalidExtrusionHeight(self.height).into());
        }

        let rings = NormalizeRings::new(self.footprint).execute()?;

        let exterior_walls = ExtrudeWalls::new(&rings.exterior, self.height).execute(buffer);
        let hole_walls: Vec<_> = rings
            .holes
            .iter()
            .map(|hole| ExtrudeWalls::new(hole, self.height).execute(buffer))
            .collect();

        let caps = BuildCaps::new(&rings, self.height).execute(buffer);
        let solid = AssembleSolid::new(exterior_walls, hole_walls, caps, self.lod).execute();

        IsValid::new(&solid)
            .with_expected_surfaces(rings.point_count() + 2)
            .execute(buffer)?;

        Ok(solid)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::CityliftError;
    use crate::math::{Point2, Point3};
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn closed(points: Vec<Point2>) -> Vec<Point2> {
        let mut v = points;
        v.push(v[0]);
        v
    }

    /// Regular polygon with `n` points, counter-clockwise, closed.
    #[allow(clippy::cast_precision_loss)]
    fn regular(n: usize, cx: f64, cy: f64, r: f64) -> Vec<Point2> {
        closed(
            (0..n)
                .map(|i| {
                    let t = std::f64::consts::TAU * i as f64 / n as f64;
                    p(cx + r * t.cos(), cy + r * t.sin())
                })
                .collect(),
        )
    }

    #[test]
    fn rectangle_end_to_end() {
        // Clockwise as given.
        let fp = Footprint::from_exterior(closed(vec![
            p(0.0, 0.0),
            p(0.0, 3.0),
            p(4.0, 3.0),
            p(4.0, 0.0),
        ]));
        let mut buf = VertexBuffer::new();
        let solid = ExtrudeFootprint::new(&fp, 10.0, 1.2).execute(&mut buf).unwrap();

        let surfaces = solid.shell().surfaces();
        assert_eq!(surfaces.len(), 6);
        assert_eq!(buf.len(), 24);

        // first wall runs along the first edge of the counter-clockwise ring
        assert_eq!(*buf.get(0).unwrap(), Point3::new(4.0, 0.0, 0.0));
        assert_eq!(*buf.get(1).unwrap(), Point3::new(4.0, 3.0, 0.0));
        assert_eq!(*buf.get(2).unwrap(), Point3::new(4.0, 3.0, 10.0));
        assert_eq!(*buf.get(3).unwrap(), Point3::new(4.0, 0.0, 10.0));

        let roof = &surfaces[4];
        let floor = &surfaces[5];
        assert_eq!(roof.outer(), &[16, 17, 18, 19]);
        assert_eq!(floor.outer(), &[20, 21, 22, 23]);
        assert!(roof.indices().all(|i| buf.get(i).unwrap().z == 10.0));
        assert!(floor.indices().all(|i| buf.get(i).unwrap().z == 0.0));
    }

    #[test]
    fn twenty_six_point_ring_vertex_law() {
        let fp = Footprint::from_exterior(regular(26, 0.0, 0.0, 50.0));
        let mut buf = VertexBuffer::new();
        let solid = ExtrudeFootprint::new(&fp, 239.0, 1.0).execute(&mut buf).unwrap();
        assert_eq!(solid.shell().len(), 28);
        assert_eq!(buf.len(), 156);
    }

    #[test]
    fn vertex_law_with_holes() {
        let outer = regular(8, 0.0, 0.0, 100.0);
        let holes = vec![regular(5, -30.0, 0.0, 10.0), regular(3, 30.0, 0.0, 10.0)];
        let fp = Footprint::new(outer, holes);
        let mut buf = VertexBuffer::new();
        let solid = ExtrudeFootprint::new(&fp, 7.5, 1.0).execute(&mut buf).unwrap();

        let (e, h) = (8, 5 + 3);
        assert_eq!(buf.len(), 4 * e + 4 * h + 2 * (e + h));
        assert_eq!(solid.shell().len(), e + h + 2);

        let roof = &solid.shell().surfaces()[e + h];
        assert_eq!(roof.holes().len(), 2);
        assert_eq!(roof.holes()[0].len(), 5);
        assert_eq!(roof.holes()[1].len(), 3);
    }

    #[test]
    fn wall_normals_point_outward() {
        // For a counter-clockwise exterior the first panel's normal
        // (edge x up) must point away from the centroid.
        let fp = Footprint::from_exterior(regular(6, 0.0, 0.0, 1.0));
        let mut buf = VertexBuffer::new();
        let solid = ExtrudeFootprint::new(&fp, 2.0, 1.0).execute(&mut buf).unwrap();

        for wall in &solid.shell().surfaces()[..6] {
            let q = wall.outer();
            let a = buf.get(q[0]).unwrap();
            let b = buf.get(q[1]).unwrap();
            let c = buf.get(q[2]).unwrap();
            let normal = (b - a).cross(&(c - b));
            let mid = nalgebra::center(a, b);
            assert!(normal.x * mid.x + normal.y * mid.y > 0.0);
        }
    }

    #[test]
    fn zero_height_is_allowed() {
        let fp = Footprint::from_exterior(regular(4, 0.0, 0.0, 1.0));
        let mut buf = VertexBuffer::new();
        let solid = ExtrudeFootprint::new(&fp, 0.0, 1.0).execute(&mut buf).unwrap();
        assert_eq!(solid.shell().len(), 6);
        assert!(buf.points().iter().all(|p| p.z == 0.0));
    }

    #[test]
    fn negative_height_is_rejected() {
        let fp = Footprint::from_exterior(regular(4, 0.0, 0.0, 1.0));
        let mut buf = VertexBuffer::new();
        let err = ExtrudeFootprint::new(&fp, -1.0, 1.0).execute(&mut buf).unwrap_err();
        assert!(matches!(
            err,
            CityliftError::Geometry(GeometryError::InvalidExtrusionHeight(h)) if h < 0.0
        ));
        assert!(buf.is_empty());
    }

    #[test]
    fn invalid_ring_leaves_buffer_untouched() {
        let fp = Footprint::from_exterior(vec![p(0.0, 0.0), p(1.0, 0.0), p(0.0, 0.0)]);
        let mut buf = VertexBuffer::new();
        assert!(ExtrudeFootprint::new(&fp, 3.0, 1.0).execute(&mut buf).is_err());
        assert!(buf.is_empty());
    }

    #[test]
    fn roof_area_matches_footprint() {
        let fp = Footprint::from_exterior(closed(vec![
            p(0.0, 0.0),
            p(4.0, 0.0),
            p(4.0, 3.0),
            p(0.0, 3.0),
        ]));
        let mut buf = VertexBuffer::new();
        let solid = ExtrudeFootprint::new(&fp, 1.0, 1.0).execute(&mut buf).unwrap();
        let roof: Vec<Point2> = solid.shell().surfaces()[4]
            .outer()
            .iter()
            .map(|&i| buf.get(i).unwrap().xy())
            .collect();
        assert_relative_eq!(crate::math::polygon_2d::signed_area_2d(&roof), 12.0);
    }
}
