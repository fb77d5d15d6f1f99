use crate::geometry::Ring;
use crate::topology::{Surface, VertexBuffer};

/// Extrudes one ring into vertical quadrilateral wall panels.
///
/// Each edge `(P_i, P_i+1)`, including the closing edge, appends four fresh
/// vertices in the order `(P_i, 0)`, `(P_i+1, 0)`, `(P_i+1, h)`, `(P_i, h)`
/// and yields one single-ring surface over those indices. Panels never share
/// vertices, even where they meet.
pub struct ExtrudeWalls<'a> {
    ring: &'a Ring,
    height: f64,
}

impl<'a> ExtrudeWalls<'a> {
    /// Creates a new `ExtrudeWalls` operation.
    #[must_use]
    pub fn new(ring: &'a Ring, height: f64) -> Self {
        Self { ring, height }
    }

    /// Executes the extrusion, appending `4 * n` vertices and returning `n`
    /// wall surfaces for an `n`-point ring.
    pub fn execute(&self, buffer: &mut VertexBuffer) -> Vec<Surface> {
        let points = self.ring.points();
        let n = points.len();
        let mut walls = Vec::with_capacity(n);

        for i in 0..n {
            let a = &points[i];
            let b = &points[(i + 1) % n];
            let quad = [
                buffer.push_at(a, 0.0),
                buffer.push_at(b, 0.0),
                buffer.push_at(b, self.height),
                buffer.push_at(a, self.height),
            ];
            walls.push(Surface::quad(quad));
        }

        walls
    }
}
