use rustc_hash::FxHashMap;

use crate::math::Point3;
use crate::topology::Solid;

/// Merges vertices with identical coordinates and remaps every solid.
///
/// This is an explicit optimization: extrusion never shares vertices, so
/// adjacent wall panels and caps store coincident points separately. Only
/// bitwise-equal coordinates are merged (`-0.0` and `0.0` are treated as
/// equal). The first occurrence of each coordinate keeps its relative order.
#[derive(Debug, Default)]
pub struct DeduplicateVertices;

impl DeduplicateVertices {
    /// Creates a new `DeduplicateVertices` operation.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the operation in place, returning the number of vertices removed.
    ///
    /// Every solid whose indices refer into `vertices` must be passed, or its
    /// indices will be left dangling.
    pub fn execute<'s>(
        &self,
        vertices: &mut Vec<Point3>,
        solids: impl IntoIterator<Item = &'s mut Solid>,
    ) -> usize {
        let mut first_seen: FxHashMap<[u64; 3], usize> = FxHashMap::default();
        let mut remap = Vec::with_capacity(vertices.len());
        let mut unique = Vec::with_capacity(vertices.len());

        for p in vertices.iter() {
            let key = [bits(p.x), bits(p.y), bits(p.z)];
            let index = *first_seen.entry(key).or_insert_with(|| {
                unique.push(*p);
                unique.len() - 1
            });
            remap.push(index);
        }

        for solid in solids {
            for surface in solid.shell_mut().surfaces_mut() {
                surface.map_indices(|i| remap[i]);
            }
        }

        let removed = vertices.len() - unique.len();
        *vertices = unique;
        removed
    }
}

fn bits(v: f64) -> u64 {
    // folds -0.0 onto 0.0
    (v + 0.0).to_bits()
}
