use crate::topology::{Shell, Solid, Surface};

use super::build_caps::Caps;

/// Combines wall and cap surfaces into one closed-shell solid.
///
/// Boundary order is fixed: exterior walls, then the walls of each hole in
/// hole order, then the roof, then the floor.
pub struct AssembleSolid {
    exterior_walls: Vec<Surface>,
    hole_walls: Vec<Vec<Surface>>,
    caps: Caps,
    lod: f64,
}

impl AssembleSolid {
    /// Creates a new `AssembleSolid` operation.
    #[must_use]
    pub fn new(
        exterior_walls: Vec<Surface>,
        hole_walls: Vec<Vec<Surface>>,
        caps: Caps,
        lod: f64,
    ) -> Self {
        Self {
            exterior_walls,
            hole_walls,
            caps,
            lod,
        }
    }

    /// Executes the assembly, consuming the surfaces.
    #[must_use]
    pub fn execute(self) -> Solid {
        let count = self.exterior_walls.len()
            + self.hole_walls.iter().map(Vec::len).sum::<usize>()
            + 2;
        let mut surfaces = Vec::with_capacity(count);
        surfaces.extend(self.exterior_walls);
        for walls in self.hole_walls {
            surfaces.extend(walls);
        }
        surfaces.push(self.caps.roof);
        surfaces.push(self.caps.floor);

        Solid::new(self.lod, Shell::new(surfaces))
    }
}
