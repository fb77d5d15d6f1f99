use serde::Serialize;

/// A planar face described by rings of vertex indices.
///
/// `rings[0]` is the outer boundary; any further rings are holes of the same
/// face. Serializes as a plain nested array, the CityJSON surface encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Surface {
    rings: Vec<Vec<usize>>,
}

impl Surface {
    /// Creates a surface from an outer ring and hole rings.
    #[must_use]
    pub fn new(outer: Vec<usize>, holes: Vec<Vec<usize>>) -> Self {
        let mut rings = Vec::with_capacity(holes.len() + 1);
        rings.push(outer);
        rings.extend(holes);
        Self { rings }
    }

    /// Creates a single-ring quadrilateral surface.
    #[must_use]
    pub fn quad(indices: [usize; 4]) -> Self {
        Self {
            rings: vec![indices.to_vec()],
        }
    }

    /// All rings, outer boundary first.
    #[must_use]
    pub fn rings(&self) -> &[Vec<usize>] {
        &self.rings
    }

    /// The outer boundary ring.
    #[must_use]
    pub fn outer(&self) -> &[usize] {
        &self.rings[0]
    }

    /// The hole rings.
    #[must_use]
    pub fn holes(&self) -> &[Vec<usize>] {
        &self.rings[1..]
    }

    /// Iterates over every referenced index, ring by ring.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.rings.iter().flatten().copied()
    }

    /// Rewrites every index through `f`.
    pub fn map_indices(&mut self, mut f: impl FnMut(usize) -> usize) {
        for index in self.rings.iter_mut().flatten() {
            *index = f(*index);
        }
    }
}

/// The ordered set of surfaces bounding one solid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Shell {
    surfaces: Vec<Surface>,
}

impl Shell {
    /// Creates a shell from surfaces in boundary order.
    #[must_use]
    pub fn new(surfaces: Vec<Surface>) -> Self {
        Self { surfaces }
    }

    /// The surfaces of the shell.
    #[must_use]
    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    /// Mutable access to the surfaces, for index remapping.
    pub fn surfaces_mut(&mut self) -> &mut [Surface] {
        &mut self.surfaces
    }

    /// Number of surfaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    /// Returns `true` if the shell has no surfaces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_serializes_as_nested_arrays() {
        let surface = Surface::new(vec![0, 1, 2, 3], vec![vec![4, 5, 6]]);
        let json = serde_json::to_string(&surface).unwrap_or_default();
        assert_eq!(json, "[[0,1,2,3],[4,5,6]]");
    }

    #[test]
    fn holes_exclude_outer_ring() {
        let surface = Surface::new(vec![0, 1, 2], vec![vec![3, 4, 5], vec![6, 7, 8]]);
        assert_eq!(surface.outer(), &[0, 1, 2]);
        assert_eq!(surface.holes().len(), 2);
        assert_eq!(surface.indices().count(), 9);
    }

    #[test]
    fn map_indices_rewrites_every_ring() {
        let mut surface = Surface::new(vec![0, 1, 2], vec![vec![3, 4, 5]]);
        surface.map_indices(|i| i + 10);
        assert_eq!(surface.rings(), &[vec![10, 11, 12], vec![13, 14, 15]]);
    }
}
