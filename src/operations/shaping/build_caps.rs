use crate::geometry::Ring;
use crate::topology::{Surface, VertexBuffer};

use super::normalize_rings::NormalizedRings;

/// The roof and floor surfaces of an extruded footprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caps {
    /// Cap at the extrusion height, normal pointing up.
    pub roof: Surface,
    /// Cap at elevation 0, normal pointing down.
    pub floor: Surface,
}

/// Builds the roof and floor of a footprint, holes included.
///
/// The roof keeps the canonical winding (counter-clockwise exterior,
/// clockwise holes); the floor reverses every ring so its normal points
/// downward. Each cap projects its own fresh copy of the points, so a
/// footprint with `k` points adds `2k` vertices.
pub struct BuildCaps<'a> {
    rings: &'a NormalizedRings,
    height: f64,
}

impl<'a> BuildCaps<'a> {
    /// Creates a new `BuildCaps` operation.
    #[must_use]
    pub fn new(rings: &'a NormalizedRings, height: f64) -> Self {
        Self { rings, height }
    }

    /// Executes the operation, appending the cap vertices to `buffer`.
    pub fn execute(&self, buffer: &mut VertexBuffer) -> Caps {
        let roof = project_face(&self.rings.exterior, &self.rings.holes, self.height, buffer);

        let exterior = self.rings.exterior.reversed();
        let holes: Vec<Ring> = self.rings.holes.iter().map(Ring::reversed).collect();
        let floor = project_face(&exterior, &holes, 0.0, buffer);

        Caps { roof, floor }
    }
}

/// Lifts a polygon with holes to elevation `z`, one fresh index per point.
fn project_face(exterior: &Ring, holes: &[Ring], z: f64, buffer: &mut VertexBuffer) -> Surface {
    let outer = project_ring(exterior, z, buffer);
    let holes = holes.iter().map(|h| project_ring(h, z, buffer)).collect();
    Surface::new(outer, holes)
}

fn project_ring(ring: &Ring, z: f64, buffer: &mut VertexBuffer) -> Vec<usize> {
    ring.points().iter().map(|p| buffer.push_at(p, z)).collect()
}
