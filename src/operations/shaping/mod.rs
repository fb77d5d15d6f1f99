mod assemble_solid;
mod build_caps;
mod extrude;
mod extrude_walls;
mod normalize_rings;

pub use assemble_solid::AssembleSolid;
pub use build_caps::{BuildCaps, Caps};
pub use extrude::ExtrudeFootprint;
pub use extrude_walls::ExtrudeWalls;
pub use normalize_rings::{NormalizeRings, NormalizedRings};
